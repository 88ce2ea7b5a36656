pub mod auth;
pub mod config;
pub mod controller;
pub mod db;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod roster;
pub mod server;
pub mod state;
pub mod stats;
pub mod storage;
