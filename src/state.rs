use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::store::AuthorStore;
use crate::services::AuthorService;

/// Shared per-process state handed to every handler. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn AuthorStore>,
    pub authors: AuthorService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn AuthorStore>) -> Self {
        Self {
            config: Arc::new(config),
            authors: AuthorService::new(Arc::clone(&store)),
            store,
        }
    }

    /// Path of the author collection, e.g. `/api/authors`
    pub fn authors_path(&self) -> String {
        format!("{}/authors", self.config.api.prefix)
    }
}
