use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod entities;
mod handler;
mod model;
mod openapi;
mod repo;
mod schema;
mod service;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let state = state::AppState::new().await;
    let port = state.config().port();

    let app = Router::new()
        .merge(handler::health::routes())
        .merge(handler::settings::routes(state))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("failed to bind to {}", bind_addr));

    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .await
        .expect("server error");
}
