//! HTTP layer of the postboard service: routing, extractors and handlers

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
