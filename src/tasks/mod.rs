//! Background Tasks Module
//!
//! Tasks owned by the server binary, never by the cache client.
//!
//! # Tasks
//! - Expiry sweep: drops expired entries from the in-memory store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
