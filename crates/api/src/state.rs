use std::sync::Arc;

use beatstore_db::DocumentStore;
use beatstore_events::EventBus;
use beatstore_services::{ServiceContext, UploadProxy};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Store and event bus handed to every service call.
    pub ctx: ServiceContext,
    pub config: Arc<ServerConfig>,
    /// Absent when no upload proxy is configured.
    pub uploads: Option<Arc<UploadProxy>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, events: Arc<EventBus>, config: ServerConfig) -> Self {
        let uploads = config
            .upload_proxy_url
            .as_ref()
            .map(|url| Arc::new(UploadProxy::new(url.clone(), config.upload_proxy_api_key.clone())));
        Self {
            ctx: ServiceContext::new(store, events),
            config: Arc::new(config),
            uploads,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.ctx.store()
    }
}
