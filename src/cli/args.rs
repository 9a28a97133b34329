//! Command-line argument parsing.
//!
//! This module turns the raw argument list into the [`CliCommand`] the
//! binary should run.

use crate::models::ImageSize;

pub const USAGE: &str = "\
Usage:
  promptline chat [PROMPT...]                 Send one prompt, or chat interactively without one
  promptline image [--size WxH] [-n N] PROMPT Generate images
  promptline models                           List models available to the image API key
  promptline --version | -V
  promptline --help | -h

Configuration is read from <config dir>/promptline/config.json and the
PROMPTLINE_* / OPENAI_API_KEY environment variables.";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// One prompt, or an interactive session when `prompt` is `None`
    Chat { prompt: Option<String> },
    /// Generate `count` images; `size` overrides the configured size
    Image {
        prompt: String,
        size: Option<ImageSize>,
        count: u32,
    },
    Models,
    /// Show version information
    Version,
    Help,
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Returns
///
/// The `CliCommand` to execute, or a message describing the bad argument.
///
/// # Examples
///
/// ```
/// use promptline::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["promptline".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);

    let Some(first) = args.next() else {
        return Ok(CliCommand::Help);
    };

    match first.as_str() {
        "--version" | "-V" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "models" => Ok(CliCommand::Models),
        "chat" => {
            let prompt = join_words(args);
            Ok(CliCommand::Chat {
                prompt: (!prompt.is_empty()).then_some(prompt),
            })
        }
        "image" => parse_image(args),
        other if other.starts_with('-') => Err(format!("unknown flag '{}'", other)),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn parse_image<I>(mut args: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    let mut size = None;
    let mut count = 1;
    let mut words = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--size" | "-s" => {
                let value = args.next().ok_or("--size needs a value")?;
                size = Some(value.parse::<ImageSize>()?);
            }
            "-n" | "--count" => {
                let value = args.next().ok_or("-n needs a value")?;
                count = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("image count must be a positive number, got '{}'", value))?;
            }
            _ => words.push(arg),
        }
    }

    let prompt = join_words(words.into_iter());
    if prompt.is_empty() {
        return Err("image needs a prompt".to_string());
    }
    Ok(CliCommand::Image {
        prompt,
        size,
        count,
    })
}

fn join_words<I: Iterator<Item = String>>(words: I) -> String {
    words.collect::<Vec<_>>().join(" ").trim().to_string()
}
