//! CLI module for promptline.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//!
//! # Usage
//!
//! ```ignore
//! use promptline::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     Ok(CliCommand::Version) => promptline::cli::handle_version_command(),
//!     Ok(command) => { /* run it */ }
//!     Err(message) => eprintln!("{}", message),
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{handle_version_command, version_line, VERSION};
