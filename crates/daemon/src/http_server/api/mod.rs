use axum::routing::get;
use axum::Router;

pub mod client;
pub mod resource;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/:bundle", get(resource::list::handler))
        .route(
            "/:bundle/:filename",
            get(resource::get::handler).put(resource::put::handler),
        )
        .with_state(state)
}
