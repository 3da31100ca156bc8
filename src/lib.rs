pub mod advisory;
pub mod api;
pub mod config;
pub mod db;
pub mod health;
pub mod light_cache;
pub mod monitor;
pub mod notify;
pub mod plants;
pub mod telemetry;
