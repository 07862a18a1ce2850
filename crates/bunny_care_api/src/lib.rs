//! HTTP backend for the bunny care tracker: log and event CRUD plus the
//! dashboard summary engine, served over the care store.

pub mod config;
pub mod domains;
pub mod error;
pub mod middleware;
pub mod server;
