//! API Module
//!
//! HTTP handlers and routing for the namespaced cache server.
//!
//! # Endpoints
//! - `PUT /cache/:namespace/:key` - Store a value
//! - `GET /cache/:namespace/:key` - Retrieve a value
//! - `POST /cache/bulk` - Retrieve many values in one store round trip
//! - `POST /namespaces/:namespace/invalidate` - Invalidate a namespace
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
