use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use xaml_compiler::CompileOutput;

/// Write each generated container to `out_dir`, returning the written paths.
pub fn write_containers(out_dir: &Path, output: &CompileOutput) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(output.containers.len());
    for container in &output.containers {
        let path = out_dir.join(&container.file_name);
        fs::write(&path, &container.source).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
