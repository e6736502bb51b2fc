//! CLI subcommand implementations.

pub mod publish;
pub mod show;
