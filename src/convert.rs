use std::fs;

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::compiler::Compiler;

const SOURCE_EXT: &str = ".c";
const TARGET_EXT: &str = ".ll";

/// Derive the output file name from an input entry name.
///
/// Every literal `.c` occurrence is replaced, not just a trailing extension,
/// so `a.c.c` maps to `a.ll.ll`. Existing output layouts depend on this
/// substitution, so it is kept as-is rather than anchored to the suffix.
pub fn derive_output_name(name: &str) -> String {
    name.replace(SOURCE_EXT, TARGET_EXT)
}

/// Pair every immediate entry of `input_dir` with its derived output path.
///
/// One level only; subdirectories are not filtered out and fail downstream
/// when the compiler cannot read them. Entries are sorted by name so logs and
/// failure order are deterministic (the contract guarantees no order).
pub fn plan_entries(
    input_dir: &Utf8Path,
    output_dir: &Utf8Path,
) -> Result<Vec<(Utf8PathBuf, Utf8PathBuf)>> {
    let dir = fs::read_dir(input_dir).with_context(|| format!("reading directory {input_dir}"))?;

    let mut entries = Vec::new();
    for entry in dir {
        let entry = entry.with_context(|| format!("reading directory {input_dir}"))?;
        let name = entry.file_name();
        let name = name
            .to_str()
            .ok_or_else(|| anyhow!("non-UTF-8 file name {:?} in {input_dir}", entry.file_name()))?;
        let input = input_dir.join(name);
        let output = output_dir.join(derive_output_name(name));
        entries.push((input, output));
    }

    entries.sort();
    Ok(entries)
}

/// Compile one input file to one output path through the adapter. The
/// external process creates or overwrites exactly one file on disk.
pub fn convert(compiler: &dyn Compiler, input: &Utf8Path, output: &Utf8Path) -> Result<()> {
    compiler
        .compile(input, output)
        .with_context(|| format!("converting {input}"))
}

/// Convert every entry of `input_dir` into `output_dir`, creating the output
/// directory first (idempotent). The first failing entry aborts the batch;
/// with `keep_going`, failures are collected and reported at the end instead,
/// and the run still exits with an error. Already-produced outputs are never
/// cleaned up.
pub fn convert_dir(
    compiler: &dyn Compiler,
    input_dir: &Utf8Path,
    output_dir: &Utf8Path,
    keep_going: bool,
) -> Result<()> {
    fs::create_dir_all(output_dir.as_std_path())
        .with_context(|| format!("creating directory {output_dir}"))?;

    let entries = plan_entries(input_dir, output_dir)?;
    if entries.is_empty() {
        debug!("no entries in {input_dir}");
        return Ok(());
    }

    let total = entries.len();
    let mut failures: Vec<(Utf8PathBuf, anyhow::Error)> = Vec::new();
    for (idx, (input, output)) in entries.iter().enumerate() {
        println!("[{}/{}] {} -> {}", idx + 1, total, input, output);
        match convert(compiler, input, output) {
            Ok(()) => {}
            Err(err) if keep_going => {
                println!("[warn] {input} failed (continuing)");
                failures.push((input.clone(), err));
            }
            Err(err) => return Err(err),
        }
    }

    if failures.is_empty() {
        println!("Converted {total} entries into {output_dir}");
        return Ok(());
    }

    for (input, err) in &failures {
        println!("[error] {input}: {err:#}");
    }
    bail!("{} of {} conversions failed", failures.len(), total)
}
