pub mod actions;
pub mod clients;
pub mod config;
pub mod host;
pub mod models;
pub mod runtime;
pub mod service;
pub mod tasks;
