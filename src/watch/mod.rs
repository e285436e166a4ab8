// src/watch/mod.rs

//! Catalog file watching.
//!
//! This module turns filesystem events on the catalog file into
//! [`SessionEvent::CatalogChanged`](crate::engine::SessionEvent) and provides
//! content hashing so the session can skip saves that did not change
//! anything. It knows nothing about stages or schedules.

pub mod hash;
pub mod watcher;

pub use hash::content_hash;
pub use watcher::{spawn_watcher, WatcherHandle};
