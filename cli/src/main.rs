//! Magic CLI - builds an attribute bag from a JSON document.
//!
//! ```text
//! main() -> init_tracing() -> MagicConfig::load() -> read_attributes()
//!        -> AttributeBag::new() -> --set / --unset -> render() -> stdout
//! ```

mod args;
mod render;

use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use magic_config::MagicConfig;
use magic_core::AttributeBag;
use magic_types::{Attributes, Value};

use crate::args::Args;
use crate::render::render;

fn init_tracing(config: Option<&MagicConfig>) {
    let fallback = config.map_or("info", MagicConfig::log_filter);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the projection; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn read_attributes(args: &Args) -> Result<Attributes> {
    let content = if args.reads_stdin() {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read attributes from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.input)
            .with_context(|| format!("Failed to read {}", args.input.display()))?
    };
    parse_attributes(&content)
}

fn parse_attributes(content: &str) -> Result<Attributes> {
    let json: serde_json::Value =
        serde_json::from_str(content).context("Attributes are not valid JSON")?;
    match Value::from_plain_json(json) {
        Value::Map(attributes) => Ok(attributes),
        other => bail!("Expected a JSON object of attributes, got {}", other.kind()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Config is loaded before tracing so its log filter applies; a broken
    // config is reported once tracing is up.
    let loaded = MagicConfig::load();
    let config = loaded.as_ref().ok().and_then(Option::as_ref);
    init_tracing(config);
    if let Err(err) = &loaded {
        tracing::warn!(path = %err.path().display(), "Ignoring config: {err}");
    }

    let format = args
        .format
        .unwrap_or_else(|| config.map(MagicConfig::output_format).unwrap_or_default());
    let pretty = !args.compact && config.is_none_or(MagicConfig::pretty);

    let attributes = read_attributes(&args)?;
    tracing::debug!(attributes = attributes.len(), "Attributes loaded");

    let mut bag: AttributeBag = AttributeBag::new(attributes);
    for assignment in &args.sets {
        if !bag.isset(&assignment.key) {
            tracing::info!(attribute = %assignment.key, "Skipping write to unknown attribute");
        }
        bag.set(&assignment.key, assignment.value.clone());
    }
    for key in &args.unsets {
        bag.unset(key);
    }

    let out = render(&bag, format, pretty)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    if !out.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
