use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where a rendered report should be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// `report_YYYYmmdd_HHMMSS.txt` in the current directory
    Generated,
    Path(PathBuf),
}

impl SaveTarget {
    /// `--output` wins over `--save`; neither means the report is not saved.
    pub fn from_args(output: Option<PathBuf>, save: bool) -> Option<Self> {
        match (output, save) {
            (Some(path), _) => Some(SaveTarget::Path(path)),
            (None, true) => Some(SaveTarget::Generated),
            (None, false) => None,
        }
    }

    fn resolve(&self) -> PathBuf {
        match self {
            SaveTarget::Generated => generated_file_name(),
            SaveTarget::Path(path) => path.clone(),
        }
    }
}

fn generated_file_name() -> PathBuf {
    PathBuf::from(format!("report_{}.txt", Local::now().format("%Y%m%d_%H%M%S")))
}

/// Writes `content` as UTF-8 and returns the path written to. The file is
/// flushed before returning and closed on every path out of this function.
pub fn persist_report(content: &str, target: &SaveTarget) -> Result<PathBuf> {
    let path = target.resolve();
    write_file(&path, content)?;
    info!("Saved report to {}", path.display());
    Ok(path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write report file: {}", path.display()))
}

/// Runs `compute` and saves its output when a target is given. Nothing is
/// written when `compute` fails.
pub fn compute_and_persist<F>(target: Option<&SaveTarget>, compute: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    let content = compute()?;
    if let Some(target) = target {
        persist_report(&content, target)?;
    }
    Ok(content)
}
