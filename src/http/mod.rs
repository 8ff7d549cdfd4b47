//! HTTP surface for the projection service.

mod handlers;
mod server;
mod throttle;

pub use handlers::ProjectionRequest;
pub use server::{AppState, HttpServer};
pub use throttle::too_many_requests;
