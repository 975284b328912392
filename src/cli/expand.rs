//! The `expand` command: expand embed markers in a file or a stdin span.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::GraftError;
use crate::expander::{DEFAULT_MAX_DEPTH, expand};
use crate::store::Vault;

/// Expand embedded note references in markdown text.
///
/// With a FILE argument the whole file is expanded and the file's own vault
/// path anchors link resolution. Without one, the text to expand is read
/// from stdin — the caller owns the selection — and `--base` names the
/// vault document the selection belongs to.
#[derive(Args, Debug)]
pub struct ExpandCommand {
    /// Markdown file to expand; reads stdin when omitted
    file: Option<PathBuf>,

    /// Vault root directory links are resolved against
    #[arg(long, env = "GRAFT_VAULT")]
    vault: PathBuf,

    /// Vault-relative path of the document a stdin span belongs to
    #[arg(long)]
    base: Option<String>,

    /// Maximum levels of nested expansion
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Write the result back to FILE instead of stdout
    #[arg(long, requires = "file")]
    in_place: bool,
}

impl ExpandCommand {
    pub async fn execute(self) -> Result<()> {
        let vault = Vault::open(&self.vault)?;

        let (text, base_path) = match &self.file {
            Some(file) => {
                let base_path = vault_relative(&vault, file)?;
                let text = tokio::fs::read_to_string(file)
                    .await
                    .with_context(|| format!("failed to read '{}'", file.display()))?;
                (text, base_path)
            }
            None => {
                let base_path = self
                    .base
                    .clone()
                    .context("--base is required when expanding a stdin span")?;
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                (text, base_path)
            }
        };

        let expanded = expand(&vault, &text, &base_path, self.max_depth).await;

        match (&self.file, self.in_place) {
            (Some(file), true) => {
                tokio::fs::write(file, &expanded)
                    .await
                    .with_context(|| format!("failed to write '{}'", file.display()))?;
            }
            _ => print!("{expanded}"),
        }
        Ok(())
    }
}

/// Compute `file`'s path relative to the vault root.
fn vault_relative(vault: &Vault, file: &Path) -> Result<String> {
    let root = vault
        .root()
        .canonicalize()
        .with_context(|| format!("failed to resolve '{}'", vault.root().display()))?;
    let file = file
        .canonicalize()
        .with_context(|| format!("failed to resolve '{}'", file.display()))?;

    let rel = file.strip_prefix(&root).map_err(|_| GraftError::OutsideVault {
        path: file.display().to_string(),
    })?;
    Ok(rel.to_string_lossy().replace('\\', "/"))
}
