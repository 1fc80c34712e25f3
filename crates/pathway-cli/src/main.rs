//! # pathway
//!
//! Evaluates a student intake record against a pathway ruleset and prints
//! the recommendation as JSON.

#![deny(unsafe_code)]

mod cli;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
