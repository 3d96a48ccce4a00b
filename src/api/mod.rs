pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::config::SearchConfig;
use crate::gateway::RetrievalGateway;
use crate::schema::IndexSchema;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<IndexSchema>,
    pub gateway: Arc<dyn RetrievalGateway>,
    pub search: SearchConfig,
}

impl AppState {
    pub fn new(
        schema: Arc<IndexSchema>,
        gateway: Arc<dyn RetrievalGateway>,
        search: SearchConfig,
    ) -> Self {
        Self {
            schema,
            gateway,
            search,
        }
    }
}
