//! Handler for the admin analytics overview.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use beatstore_services::AnalyticsService;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/analytics
///
/// Catalog and content engagement totals, top items, order and
/// collaboration figures.
pub async fn overview(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let analytics = AnalyticsService::overview(&state.ctx, &admin.caller()).await?;
    Ok(Json(DataResponse { data: analytics }))
}
