use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::debug;

use crate::core::{Result, StoreError};
use crate::model::{NewPlayer, Player};
use crate::query::{CountQuery, ListQuery};
use crate::store::PlayerStore;
use crate::store::predicate::PredicateEvaluator;
use crate::store::sort::SortExecutor;

#[derive(Debug)]
struct PlayerTable {
    rows: BTreeMap<i64, Player>,
    next_id: i64,
}

impl Default for PlayerTable {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Player table kept in process memory.
///
/// Ids are handed out sequentially from 1 and never reused. Writes go
/// through a [`WriteTransaction`], which holds the table's write lock for its
/// whole lifetime.
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    table: RwLock<PlayerTable>,
    max_players: Option<usize>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses inserts once it holds `max_players` records.
    pub fn with_max_players(max_players: usize) -> Self {
        Self {
            table: RwLock::default(),
            max_players: Some(max_players),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Opens a write transaction. Dropping it without [`WriteTransaction::commit`]
    /// discards every staged change.
    pub async fn begin(&self) -> WriteTransaction<'_> {
        WriteTransaction {
            table: self.table.write().await,
            max_players: self.max_players,
            pending: Vec::new(),
        }
    }
}

#[derive(Debug)]
enum PendingWrite {
    Insert(Player),
    Update(Player),
    Delete(i64),
}

pub struct WriteTransaction<'a> {
    table: RwLockWriteGuard<'a, PlayerTable>,
    max_players: Option<usize>,
    pending: Vec<PendingWrite>,
}

impl WriteTransaction<'_> {
    pub fn insert(&mut self, player: NewPlayer) -> Result<Player> {
        if let Some(max) = self.max_players {
            if self.live_rows() >= max {
                return Err(StoreError::ConstraintViolation(format!(
                    "player table is full ({max} records)"
                )));
            }
        }

        let player = player.into_player(self.next_id());
        self.pending.push(PendingWrite::Insert(player.clone()));
        Ok(player)
    }

    pub fn update(&mut self, player: &Player) -> Result<()> {
        if !self.is_visible(player.id) {
            return Err(StoreError::RecordNotFound(player.id));
        }
        self.pending.push(PendingWrite::Update(player.clone()));
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> bool {
        if !self.is_visible(id) {
            return false;
        }
        self.pending.push(PendingWrite::Delete(id));
        true
    }

    pub fn commit(mut self) {
        let pending = std::mem::take(&mut self.pending);
        for write in pending {
            match write {
                PendingWrite::Insert(player) => {
                    self.table.next_id = self.table.next_id.max(player.id + 1);
                    self.table.rows.insert(player.id, player);
                }
                PendingWrite::Update(player) => {
                    self.table.rows.insert(player.id, player);
                }
                PendingWrite::Delete(id) => {
                    self.table.rows.remove(&id);
                }
            }
        }
    }

    fn next_id(&self) -> i64 {
        let staged = self
            .pending
            .iter()
            .filter(|write| matches!(write, PendingWrite::Insert(_)))
            .count() as i64;
        self.table.next_id + staged
    }

    fn is_visible(&self, id: i64) -> bool {
        let mut present = self.table.rows.contains_key(&id);
        for write in &self.pending {
            match write {
                PendingWrite::Insert(player) if player.id == id => present = true,
                PendingWrite::Delete(deleted) if *deleted == id => present = false,
                _ => {}
            }
        }
        present
    }

    fn live_rows(&self) -> usize {
        let mut live = self.table.rows.len();
        for write in &self.pending {
            match write {
                PendingWrite::Insert(_) => live += 1,
                PendingWrite::Delete(_) => live = live.saturating_sub(1),
                PendingWrite::Update(_) => {}
            }
        }
        live
    }
}

impl Drop for WriteTransaction<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            debug!(
                staged = self.pending.len(),
                "rolling back uncommitted player writes"
            );
        }
    }
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn insert(&self, player: NewPlayer) -> Result<Player> {
        let mut tx = self.begin().await;
        let player = tx.insert(player)?;
        tx.commit();
        Ok(player)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, player: &Player) -> Result<Player> {
        let mut tx = self.begin().await;
        tx.update(player)?;
        tx.commit();
        Ok(player.clone())
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let mut tx = self.begin().await;
        let removed = tx.delete(id);
        tx.commit();
        Ok(removed)
    }

    async fn find(&self, query: &ListQuery) -> Result<Vec<Player>> {
        debug!(query = %query, "executing player query");

        let evaluator = PredicateEvaluator;
        let mut matched = Vec::new();
        {
            let table = self.table.read().await;
            for player in table.rows.values() {
                if evaluator.matches_all(player, &query.predicates)? {
                    matched.push(player.clone());
                }
            }
        }

        SortExecutor::sort(&mut matched, &query.sort)?;
        Ok(SortExecutor::paginate(matched, &query.page))
    }

    async fn count(&self, query: &CountQuery) -> Result<u64> {
        debug!(query = %query, "executing player count");

        let evaluator = PredicateEvaluator;
        let table = self.table.read().await;
        let mut count = 0;
        for player in table.rows.values() {
            if evaluator.matches_all(player, &query.predicates)? {
                count += 1;
            }
        }
        Ok(count)
    }
}
