use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct SourceLoader;

impl SourceLoader {
    /// Read a whole source file into memory.
    pub fn load(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        log::debug!("loaded {} ({} bytes)", path.display(), content.len());
        Ok(content)
    }
}
