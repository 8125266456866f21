// src/lib.rs — Library root for Parsesmith

pub mod agent;
pub mod backend;
pub mod cli;
pub mod compare;
pub mod infra;
pub mod prompt;
pub mod sandbox;
pub mod store;
pub mod table;
pub mod util;
