pub mod config;
pub mod control;
pub mod error;
pub mod job;
pub mod logging;
pub mod orchestrator;
pub mod source;
pub mod transfer;
