use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;
use tracing::{debug, info};
use xaml_compiler::{BindingCompiler, BindingsOptimizerSettings, CompileOutput, CompilerError, TypeResolver};

/// Outcome for one markup file
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    /// `Ok(None)` when the file does not opt in to optimizations
    pub output: Result<Option<CompileOutput>, FileError>,
}

#[derive(Debug)]
pub enum FileError {
    Io(anyhow::Error),
    Compile(CompilerError),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::Io(error) => write!(f, "{:#}", error),
            FileError::Compile(error) => write!(f, "{}", error),
        }
    }
}

impl FileResult {
    pub fn is_failure(&self) -> bool {
        self.output.is_err()
    }
}

fn compile_file(path: &Path, settings: &BindingsOptimizerSettings, type_resolver: &dyn TypeResolver) -> FileResult {
    let output = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(FileError::Io)
        .and_then(|source| {
            BindingCompiler::new(settings, type_resolver)
                .compile_source(&source)
                .map_err(FileError::Compile)
        });
    debug!(file = %path.display(), ok = output.is_ok(), "compiled file");
    FileResult {
        path: path.to_path_buf(),
        output,
    }
}

/// Compile every file, in parallel unless `settings.parallelism` is 1.
/// Results are in input order.
pub fn parallel_compile(
    files: &[PathBuf],
    settings: &BindingsOptimizerSettings,
    type_resolver: &dyn TypeResolver,
) -> anyhow::Result<Vec<FileResult>> {
    let start = Instant::now();
    let results = match settings.parallelism {
        Some(1) => files
            .iter()
            .map(|path| compile_file(path, settings, type_resolver))
            .collect(),
        parallelism => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(parallelism.unwrap_or(0))
                .build()?;
            pool.install(|| {
                files
                    .par_iter()
                    .map(|path| compile_file(path, settings, type_resolver))
                    .collect::<Vec<_>>()
            })
        }
    };

    info!(files = files.len(), elapsed = ?start.elapsed(), "compilation finished");
    Ok(results)
}
