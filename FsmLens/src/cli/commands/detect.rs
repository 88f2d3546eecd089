//! CLI command for container type detection

use crate::assets::detect_file_type_path;
use anyhow::Context;
use std::path::Path;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    let file_type =
        detect_file_type_path(file).with_context(|| format!("Failed to read {}", file.display()))?;
    println!("{}: {file_type}", file.display());
    Ok(())
}
