// src/infra/mod.rs

pub mod config;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod workspace;
