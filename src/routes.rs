// region:    --- Imports
use crate::handlers::{
    handle_bid, handle_get_bids, handle_get_lot, handle_health, handle_relist,
    handle_win_checkout, AppState,
};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/bids", post(handle_bid).get(handle_get_bids))
        .route("/api/lots/:lot_id", get(handle_get_lot))
        .route("/api/lots/:lot_id/relist", post(handle_relist))
        .route("/api/wins/:win_id/checkout", post(handle_win_checkout))
        .layer(cors)
        .with_state(state)
}
