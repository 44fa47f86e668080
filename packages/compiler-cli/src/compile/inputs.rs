use std::path::PathBuf;

use anyhow::Context;

/// Expand file arguments; anything with glob metacharacters is a pattern.
/// Results keep argument order and drop duplicates.
pub fn expand_inputs(arguments: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for argument in arguments {
        if argument.contains(['*', '?', '[']) {
            let paths = glob::glob(argument).with_context(|| format!("invalid pattern '{}'", argument))?;
            for entry in paths {
                let path = entry?;
                if path.is_file() {
                    files.push(path);
                }
            }
        } else {
            files.push(PathBuf::from(argument));
        }
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|f| seen.insert(f.clone()));
    Ok(files)
}
