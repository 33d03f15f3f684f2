pub mod memory;
pub mod pattern;
pub mod predicate;
pub mod sort;

use async_trait::async_trait;

use crate::core::Result;
use crate::model::{NewPlayer, Player};
use crate::query::{CountQuery, ListQuery};

pub use memory::{InMemoryPlayerStore, WriteTransaction};

/// Persistence backend for player records.
///
/// Each call is one self-contained unit of work: an implementation acquires
/// whatever scope it needs and releases it before returning, on success and
/// on failure alike.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Persists a new player and returns it with its assigned id.
    async fn insert(&self, player: NewPlayer) -> Result<Player>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Player>>;
    /// Overwrites an existing record. Fails if the id is gone.
    async fn update(&self, player: &Player) -> Result<Player>;
    /// Returns `false` when there was nothing to remove.
    async fn remove(&self, id: i64) -> Result<bool>;
    async fn find(&self, query: &ListQuery) -> Result<Vec<Player>>;
    async fn count(&self, query: &CountQuery) -> Result<u64>;
}
