//! CLI subcommands

pub mod defaults;
pub mod seed;
pub mod serve;
