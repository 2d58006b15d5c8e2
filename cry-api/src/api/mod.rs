//! HTTP API handlers for cry-api

pub mod classify;

pub use classify::classify_routes;
