//! Command-line schema.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use magic_config::OutputFormat;
use magic_types::Value;

/// Build an attribute bag from a JSON object and print one of its projections.
#[derive(Debug, Parser)]
#[command(name = "magic", version, about)]
pub struct Args {
    /// JSON object holding the initial attributes (`-` reads stdin).
    pub input: PathBuf,

    /// Projection to print: debug, json or keys.
    #[arg(long, short)]
    pub format: Option<OutputFormat>,

    /// Write `KEY=VALUE` through the bag. Unknown keys are ignored.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub sets: Vec<Assignment>,

    /// Remove a stored attribute. Applied after every `--set`.
    #[arg(long = "unset", value_name = "KEY")]
    pub unsets: Vec<String>,

    /// Print JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

impl Args {
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

/// A `KEY=VALUE` pair.
///
/// The value is parsed as JSON when it is valid JSON (`165`, `true`,
/// `[1,2]`), otherwise it is taken as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub key: String,
    pub value: Value,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, raw) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing key in {s:?}"));
        }
        let value = serde_json::from_str::<serde_json::Value>(raw)
            .map(Value::from_plain_json)
            .unwrap_or_else(|_| Value::from(raw));
        Ok(Self {
            key: key.to_string(),
            value,
        })
    }
}
