//! Command-line configuration for the `encode` and `decode` binaries.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_OUTPUT: &str = "output.huff";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required argument <{0}>")]
    MissingArgument(&'static str),

    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("unexpected extra argument {0}")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub quiet: bool,
}

impl EncodeConfig {
    pub const USAGE: &'static str = "<input_file> [output_file] [--quiet]";

    /// Parses arguments without the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (positional, quiet) = split_args(args)?;
        let mut positional = positional.into_iter();

        let input = positional
            .next()
            .ok_or(ConfigError::MissingArgument("input_file"))?;
        let output = positional
            .next()
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        if let Some(extra) = positional.next() {
            return Err(ConfigError::UnexpectedArgument(extra));
        }

        Ok(EncodeConfig {
            input: input.into(),
            output: output.into(),
            quiet,
        })
    }
}

impl DecodeConfig {
    pub const USAGE: &'static str = "<input_file> <output_file> [--quiet]";

    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (positional, quiet) = split_args(args)?;
        let mut positional = positional.into_iter();

        let input = positional
            .next()
            .ok_or(ConfigError::MissingArgument("input_file"))?;
        let output = positional
            .next()
            .ok_or(ConfigError::MissingArgument("output_file"))?;
        if let Some(extra) = positional.next() {
            return Err(ConfigError::UnexpectedArgument(extra));
        }

        Ok(DecodeConfig {
            input: input.into(),
            output: output.into(),
            quiet,
        })
    }
}

fn split_args<I, S>(args: I) -> Result<(Vec<String>, bool), ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut positional = Vec::new();
    let mut quiet = false;

    for arg in args.into_iter().map(Into::into) {
        match arg.as_str() {
            "--quiet" | "-q" => quiet = true,
            s if s.starts_with('-') && s.len() > 1 => {
                return Err(ConfigError::UnknownOption(arg));
            }
            _ => positional.push(arg),
        }
    }
    Ok((positional, quiet))
}
