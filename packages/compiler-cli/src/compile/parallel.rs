use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};
use vue_jsx_compiler::TransformOptions;

use super::unit::{CompilationUnit, EmitKind};

#[derive(Debug)]
pub struct CompiledFile {
    pub path: PathBuf,
    pub result: Result<String>,
}

/// Read, lower and render one file.
pub fn compile_file(path: &Path, options: &TransformOptions, bindings: &[String], emit: EmitKind) -> Result<String> {
    let unit = CompilationUnit::read(path)?;
    let output = unit
        .transform(options, bindings)
        .with_context(|| format!("failed to compile {}", path.display()))?;
    debug!(path = %path.display(), imports = output.imports.len(), "compiled unit");
    emit.render(&output)
}

/// Compile every file independently. Results keep the input order; one failing file does
/// not stop the others.
pub fn parallel_compile(
    files: &[PathBuf],
    options: &TransformOptions,
    bindings: &[String],
    emit: EmitKind,
) -> Vec<CompiledFile> {
    let start = Instant::now();
    info!(files = files.len(), "compiling");

    let results: Vec<CompiledFile> = files
        .par_iter()
        .map(|path| CompiledFile {
            path: path.clone(),
            result: compile_file(path, options, bindings, emit),
        })
        .collect();

    info!(elapsed = ?start.elapsed(), "compilation finished");
    results
}
