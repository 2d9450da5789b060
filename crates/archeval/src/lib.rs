//! Decision support for choosing between self-hosted small language models
//! and managed large language model APIs.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
