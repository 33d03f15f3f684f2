use std::sync::Arc;

use crate::service::PlayerService;
use crate::store::PlayerStore;

#[derive(Clone)]
pub struct AppState {
    pub service: PlayerService,
}

impl AppState {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self {
            service: PlayerService::new(store),
        }
    }
}
