use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    error::ServiceResult,
    model::{Player, PlayerForm},
    query::FilterParams,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn healthcheck() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ServiceResult<Json<Vec<Player>>> {
    let players = state.service.list(&FilterParams::from(params)).await?;
    Ok(Json(players))
}

pub async fn count_players(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ServiceResult<Json<u64>> {
    let count = state.service.count(&FilterParams::from(params)).await?;
    Ok(Json(count))
}

pub async fn create_player(
    State(state): State<AppState>,
    payload: Result<Json<PlayerForm>, JsonRejection>,
) -> ServiceResult<Json<Player>> {
    let Json(form) = payload?;
    let player = state.service.create(form).await?;
    Ok(Json(player))
}

pub async fn get_player(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ServiceResult<Json<Player>> {
    let Path(id) = id?;
    let player = state.service.get_by_id(id).await?;
    Ok(Json(player))
}

pub async fn update_player(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PlayerForm>, JsonRejection>,
) -> ServiceResult<Json<Player>> {
    let Path(id) = id?;
    let Json(form) = payload?;
    let player = state.service.update(id, form).await?;
    Ok(Json(player))
}

pub async fn delete_player(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ServiceResult<StatusCode> {
    let Path(id) = id?;
    state.service.delete(id).await?;
    Ok(StatusCode::OK)
}
