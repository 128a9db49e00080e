//! ADN command line interface
//!
//! The `adn` binary wires the pipeline, configuration and review crates to a
//! clap command tree. Modules are exposed for the integration tests.

pub mod cli;
pub mod commands;
pub mod context;
pub mod logging;
pub mod output;
pub mod presenter;
pub mod progress;
