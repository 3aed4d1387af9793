// Closet Home API v0.1

pub mod config;
pub mod db;
pub mod errors;
pub mod routes;
pub mod services;
