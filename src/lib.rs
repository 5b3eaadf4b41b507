pub mod alerter;
pub mod config;
pub mod history;
pub mod incident;
pub mod probe;
pub mod scheduler;
pub mod target;
pub mod types;
