//! Rendering and persisting descriptor snapshots.

use std::{fs, io, path::Path};

use anyhow::{Context, Result};

use crate::core::{
    descriptor::ApiDescriptor,
    validate::validate,
};

/// Validate the batch, then pretty-print it as a JSON array.
///
/// Nothing is rendered while any descriptor is invalid.
pub fn render_json(descriptors: &[ApiDescriptor]) -> Result<String> {
    validate(descriptors)?;
    let mut json = serde_json::to_string_pretty(descriptors)?;
    json.push('\n');
    Ok(json)
}

/// Read a previously written snapshot. A missing file is an empty snapshot.
pub fn load_snapshot(path: &Path) -> Result<Vec<ApiDescriptor>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
