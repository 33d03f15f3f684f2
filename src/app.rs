use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        count_players, create_player, delete_player, get_player, healthcheck, list_players,
        update_player,
    },
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/rest/players", get(list_players).post(create_player))
        .route("/rest/players/", post(create_player))
        .route("/rest/players/count", get(count_players))
        .route(
            "/rest/players/:id",
            get(get_player).post(update_player).delete(delete_player),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
