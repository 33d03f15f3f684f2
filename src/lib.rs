// ============================================================================
// Player Registry
// ============================================================================

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod handlers;
pub mod model;
pub mod query;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;

pub use app::build_router;
pub use error::{ServiceError, ServiceResult};
pub use service::PlayerService;
