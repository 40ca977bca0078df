//! Text projections of a bag for stdout.

use anyhow::{Context, Result};
use magic_config::OutputFormat;
use magic_core::{AttributeBag, Mutators};
use magic_types::attributes_to_plain_json;

pub fn render<K: Mutators>(
    bag: &AttributeBag<K>,
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        OutputFormat::Debug => Ok(if pretty {
            format!("{bag:#?}")
        } else {
            format!("{bag:?}")
        }),
        // Plain JSON, so the output can be fed back in as input.
        OutputFormat::Json => {
            let json = serde_json::Value::Object(
                attributes_to_plain_json(&bag.to_attributes())
                    .context("Failed to encode attributes")?,
            );
            let out = if pretty {
                serde_json::to_string_pretty(&json)
            } else {
                serde_json::to_string(&json)
            };
            out.context("Failed to encode attributes")
        }
        OutputFormat::Keys => {
            let mut out = String::new();
            for key in bag.keys() {
                out.push_str(key);
                out.push('\n');
            }
            Ok(out)
        }
    }
}
