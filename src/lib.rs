pub mod config;
pub mod error;
pub mod labels;
pub mod platform;
pub mod review;
pub mod rules;
pub mod server;
pub mod shutdown;
pub mod snapshot;
pub mod webhook;
pub mod workflow;
