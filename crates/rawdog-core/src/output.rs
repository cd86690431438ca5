//! Write generated artifacts to disk.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;

/// Write `text` to `path`, replacing any existing file in one step.
///
/// The content goes to a temporary file in the destination directory first,
/// which is then renamed over `path`, so readers never see a partial file.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!("wrote {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// File stem of a declaration file, used as the table name (`models/account.go` → `account`).
pub fn base_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Destination of the query artifact for `input` inside `out_dir`.
pub fn queries_path(out_dir: &Path, input: &Path, config: &OutputConfig) -> Option<PathBuf> {
    let base = base_name(input)?;
    Some(out_dir.join(format!(
        "{base}{}.{}",
        config.queries_suffix, config.extension
    )))
}

/// Destination of the test scaffold for `input` inside `out_dir`.
pub fn tests_path(out_dir: &Path, input: &Path, config: &OutputConfig) -> Option<PathBuf> {
    let base = base_name(input)?;
    Some(out_dir.join(format!("{base}{}.{}", config.tests_suffix, config.extension)))
}

/// Whether `path` looks like an artifact this tool produced.
pub fn is_generated(path: &Path, config: &OutputConfig) -> bool {
    base_name(path).is_some_and(|stem| {
        stem.ends_with(&config.queries_suffix) || stem.ends_with(&config.tests_suffix)
    })
}
