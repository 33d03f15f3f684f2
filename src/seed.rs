use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::PlayerForm;
use crate::service::PlayerService;

/// Reads a JSON array of creation forms.
pub fn load_forms(path: &Path) -> Result<Vec<PlayerForm>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("seed file {} is not a JSON array of players", path.display()))
}

/// Creates every form through the service, stopping at the first rejection.
pub async fn seed_players(service: &PlayerService, forms: Vec<PlayerForm>) -> Result<usize> {
    let total = forms.len();
    for (index, form) in forms.into_iter().enumerate() {
        service
            .create(form)
            .await
            .with_context(|| format!("failed to insert seed player #{index}"))?;
    }

    info!(count = total, "seed players inserted");
    Ok(total)
}
