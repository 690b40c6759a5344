use crate::server::{ServerError, ServerRouter};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;

mod posts;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(health)
        .merge(posts::routes())
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/health", rejection(ServerError))]
struct HealthPath();

async fn health(HealthPath(): HealthPath) -> &'static str {
    "ok"
}
