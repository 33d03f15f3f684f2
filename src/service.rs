use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::StoreError;
use crate::error::{ServiceError, ServiceResult};
use crate::model::{NewPlayer, Player, PlayerForm, check_create, check_update};
use crate::query::{FilterParams, build_count_query, build_list_query};
use crate::store::PlayerStore;

/// Player CRUD and search on top of a [`PlayerStore`].
///
/// Validation, id checks and the partial-update merge happen here; the store
/// only persists what it is given.
#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, form: PlayerForm) -> ServiceResult<Player> {
        if let Err(violation) = check_create(&form) {
            warn!(%violation, "rejected player creation");
            return Err(violation.into());
        }

        let new_player = NewPlayer::from_form(&form)?;
        let player = self
            .store
            .insert(new_player)
            .await
            .map_err(persistence_failure("create"))?;

        info!(id = player.id, name = %player.name, "player created");
        Ok(player)
    }

    pub async fn update(&self, id: i64, form: PlayerForm) -> ServiceResult<Player> {
        ensure_valid_id(id)?;

        let mut player = self.require(id).await?;

        if let Err(violation) = check_update(&form) {
            warn!(id, %violation, "rejected player update");
            return Err(violation.into());
        }

        if !player.merge(&form)? {
            debug!(id, "update form carried no fields");
            return Ok(player);
        }
        player.refresh_progression();

        let player = self
            .store
            .update(&player)
            .await
            .map_err(persistence_failure("update"))?;

        info!(id, "player updated");
        Ok(player)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        ensure_valid_id(id)?;
        self.require(id).await?;

        let removed = self
            .store
            .remove(id)
            .await
            .map_err(persistence_failure("delete"))?;
        if !removed {
            return Err(player_not_found(id));
        }

        info!(id, "player deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Player> {
        ensure_valid_id(id)?;
        self.require(id).await
    }

    pub async fn list(&self, params: &FilterParams) -> ServiceResult<Vec<Player>> {
        let query = build_list_query(params)?;
        let players = self
            .store
            .find(&query)
            .await
            .map_err(persistence_failure("list"))?;

        debug!(returned = players.len(), "listed players");
        Ok(players)
    }

    pub async fn count(&self, params: &FilterParams) -> ServiceResult<u64> {
        let query = build_count_query(params)?;
        self.store
            .count(&query)
            .await
            .map_err(persistence_failure("count"))
    }

    async fn require(&self, id: i64) -> ServiceResult<Player> {
        self.store
            .find_by_id(id)
            .await
            .map_err(persistence_failure("lookup"))?
            .ok_or_else(|| player_not_found(id))
    }
}

fn ensure_valid_id(id: i64) -> ServiceResult<()> {
    if id < 1 {
        return Err(ServiceError::invalid_input(format!(
            "player id must be positive, got {id}"
        )));
    }
    Ok(())
}

fn player_not_found(id: i64) -> ServiceError {
    ServiceError::not_found(format!("player {id} not found"))
}

fn persistence_failure(operation: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
    move |err| {
        let err = ServiceError::from(err);
        if let ServiceError::PersistenceFailure(source) = &err {
            warn!(operation, error = %source, "player store failed");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Profession, Race};
    use crate::store::InMemoryPlayerStore;
    use chrono::{TimeZone, Utc};
    use tokio_test::{assert_err, assert_ok, block_on};

    fn service() -> PlayerService {
        PlayerService::new(Arc::new(InMemoryPlayerStore::new()))
    }

    fn millis(year: i32) -> i64 {
        Utc.with_ymd_and_hms(year, 3, 15, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn form(name: &str, experience: i64) -> PlayerForm {
        PlayerForm {
            name: Some(name.into()),
            title: Some("Shieldbearer".into()),
            race: Some(Race::Dwarf),
            profession: Some(Profession::Warrior),
            birthday: Some(millis(2010)),
            banned: None,
            experience: Some(experience),
        }
    }

    #[test]
    fn create_computes_progression_and_defaults_banned() {
        let service = service();
        let player = assert_ok!(block_on(service.create(form("Gimli", 750))));
        assert_eq!(player.id, 1);
        assert!(!player.banned);
        assert_eq!((player.level, player.until_next_level), (3, 250));
    }

    #[test]
    fn create_rejects_long_name_and_out_of_range_birthday() {
        let service = service();
        let err = assert_err!(block_on(service.create(form("Thirteen_char", 0))));
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let mut early = form("Early", 0);
        early.birthday = Some(millis(1999));
        let err = assert_err!(block_on(service.create(early)));
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let mut late = form("Late", 0);
        late.birthday = Some(millis(3000));
        assert_ok!(block_on(service.create(late)));
    }

    #[tokio::test]
    async fn update_merges_present_fields() {
        let service = service();
        let created = service.create(form("Gimli", 100)).await.unwrap();

        let patch = PlayerForm {
            title: Some("Lord of the Glittering Caves".into()),
            experience: Some(750),
            ..PlayerForm::default()
        };
        let updated = service.update(created.id, patch).await.unwrap();

        assert_eq!(updated.name, "Gimli");
        assert_eq!(updated.title, "Lord of the Glittering Caves");
        assert_eq!((updated.level, updated.until_next_level), (3, 250));
        assert_eq!(service.get_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn empty_update_returns_record_unchanged() {
        let service = service();
        let created = service.create(form("Gimli", 100)).await.unwrap();
        let updated = service
            .update(created.id, PlayerForm::default())
            .await
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn update_checks_id_then_existence_then_form() {
        let service = service();
        let invalid = PlayerForm {
            experience: Some(-1),
            ..PlayerForm::default()
        };

        let err = service.update(0, invalid.clone()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = service.update(5, invalid.clone()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let created = service.create(form("Gimli", 0)).await.unwrap();
        let err = service.update(created.id, invalid).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn delete_and_lookup_errors() {
        let service = service();
        assert!(matches!(
            service.delete(-3).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));
        assert!(matches!(
            service.delete(1).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));

        let created = service.create(form("Gimli", 0)).await.unwrap();
        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.get_by_id(created.id).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn list_and_count_share_filters() {
        let service = service();
        for (name, experience) in [("Gimli", 100), ("Gloin", 150), ("Balin", 900)] {
            service.create(form(name, experience)).await.unwrap();
        }

        let params = FilterParams::new()
            .with("name", "G")
            .with("order", "experience");
        let players = service.list(&params).await.unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Gimli", "Gloin"]);
        assert_eq!(service.count(&params).await.unwrap(), 2);

        let bad = FilterParams::new().with("minExperience", "lots");
        assert!(matches!(
            service.list(&bad).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));
        assert!(matches!(
            service.count(&bad).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn capacity_limit_surfaces_as_persistence_failure() {
        let service = PlayerService::new(Arc::new(InMemoryPlayerStore::with_max_players(1)));
        service.create(form("Gimli", 0)).await.unwrap();
        let err = service.create(form("Gloin", 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::PersistenceFailure(_)));
    }
}
