use crate::docs::ApiDoc;
use crate::state::AppState;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower_http::cors::{Any, CorsLayer};

pub fn configure_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes())
        .merge(crate::modules::video::router())
        .merge(crate::modules::proxy::router())
        .layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new().route("/health", axum::routing::get(|| async { "ok" }))
}
