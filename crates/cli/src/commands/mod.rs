pub mod config;
pub mod issues;
pub mod projects;
pub mod seed;
pub mod states;
pub mod utils;
