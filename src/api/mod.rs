//! API Module
//!
//! HTTP handlers and routing that serve a cache instance to other processes.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value
//! - `GET /get/:key` - Retrieve a live entry
//! - `GET /has/:key` - Check for a live entry
//! - `DELETE /del/:key` - Delete a key
//! - `GET /keys` - List stored keys
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
