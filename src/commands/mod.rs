//! # CLI Command Implementations
//!
//! Each subcommand of `mcp-catalog` lives in its own file and provides:
//! - An `Args` struct derived with `clap` describing its arguments.
//! - An `execute` function that runs the command using the `mcp_catalog`
//!   library.

pub mod classify;
pub mod completions;
pub mod fetch;
pub mod parse;
