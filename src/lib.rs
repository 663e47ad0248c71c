// Library exports for forumd
// This allows integration tests and external code to use forumd modules

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod forum;
pub mod routes;
pub mod state;
