use crate::handlers::{
    admin::{create_page, create_submit, delete_submit, edit_page, edit_submit, index},
    auth::login,
    health::health_check,
    players::{create_player, delete_player, list_players, update_player},
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Mutating routes take an `AdminSession` argument, which rejects the
    // request before the body is touched.
    let api_routes = Router::new()
        .route("/login", get(login).post(login))
        .route("/players", get(list_players).post(create_player))
        .route("/players/{id}", put(update_player).delete(delete_player));

    let admin_routes = Router::new()
        .route("/", get(index))
        .route("/create", get(create_page).post(create_submit))
        .route("/edit/{id}", get(edit_page).post(edit_submit))
        .route("/delete/{id}", post(delete_submit));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
