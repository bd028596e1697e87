//! HTTP API handlers

pub mod fuse;
pub mod health;

pub use fuse::fuse_routes;
pub use health::health_routes;
