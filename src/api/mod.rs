//! API Module
//!
//! HTTP handlers and routing for the cache gateway.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value (fire-and-forget)
//! - `POST /add` - Store a JSON value only if the key is absent
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key (fire-and-forget)
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
