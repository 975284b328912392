//! The `list` command: show the embed references a file contains.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::markdown::find_embeds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// List embed references found in a markdown file.
///
/// Scanning is purely textual; targets are listed whether or not they would
/// resolve. JSON output includes the byte offsets of each marker.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Markdown file to scan
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ListCommand {
    pub async fn execute(self) -> Result<()> {
        let text = tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("failed to read '{}'", self.file.display()))?;
        let embeds = find_embeds(&text);

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&embeds)?);
            }
            OutputFormat::Text => {
                for embed in &embeds {
                    match &embed.alias {
                        Some(alias) => println!("{} (as: {alias})", embed.target),
                        None => println!("{}", embed.target),
                    }
                }
            }
        }
        Ok(())
    }
}
