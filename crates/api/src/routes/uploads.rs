//! Route definitions for the upload proxy, mounted at `/uploads`.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use beatstore_core::uploads::MAX_VIDEO_BYTES;

use crate::handlers::uploads;
use crate::state::AppState;

/// Room for multipart framing and the text fields around the largest file.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST /         -> upload_file (artist or admin, multipart)
/// POST /delete   -> delete_file (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(uploads::upload_file)
                .layer(DefaultBodyLimit::max((MAX_VIDEO_BYTES + MULTIPART_OVERHEAD_BYTES) as usize)),
        )
        .route("/delete", post(uploads::delete_file))
}
