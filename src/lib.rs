//! Bookshelf application library
//!
//! Book module, store wiring, and the seeding utility.

pub mod app;
pub mod modules;
pub mod seed;

pub use app::{build_registry, open_store, serve};
