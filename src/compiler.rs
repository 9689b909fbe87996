use std::io;
use std::process::Command as ProcessCommand;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::debug;

/// Fixed flag set requesting unoptimized, text-form IR emission.
const IR_FLAGS: [&str; 3] = ["-O0", "-emit-llvm", "-S"];

pub const DEFAULT_COMPILER: &str = "clang";

/// Errors surfaced by a single external compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler binary could not be found or started.
    #[error("failed to launch `{compiler}` for {input}: {source}")]
    Launch {
        compiler: String,
        input: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The compiler ran but exited non-zero.
    #[error("`{compiler}` exited with code {code:?} compiling {input} -> {output}")]
    Exit {
        compiler: String,
        input: Utf8PathBuf,
        output: Utf8PathBuf,
        code: Option<i32>,
    },
}

/// Narrow seam around the external toolchain so the batch loop can be
/// exercised without a real compiler on PATH.
pub trait Compiler {
    fn compile(&self, input: &Utf8Path, output: &Utf8Path) -> Result<(), CompileError>;
}

/// Spawns `<compiler> <input> -O0 -emit-llvm -S -o <output>`, binary resolved
/// via the standard executable search path.
pub struct ClangCompiler {
    binary: String,
}

impl ClangCompiler {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The exact argv handed to the OS, binary first. Positions matter.
    pub fn argv(&self, input: &Utf8Path, output: &Utf8Path) -> Vec<String> {
        let mut argv = vec![self.binary.clone(), input.to_string()];
        argv.extend(IR_FLAGS.iter().map(|flag| (*flag).to_owned()));
        argv.push("-o".to_owned());
        argv.push(output.to_string());
        argv
    }
}

impl Compiler for ClangCompiler {
    fn compile(&self, input: &Utf8Path, output: &Utf8Path) -> Result<(), CompileError> {
        let argv = self.argv(input, output);
        debug!(command = %argv.join(" "), "spawning compiler");

        // No stdin; stdout/stderr of the child are inherited so diagnostics
        // reach the operator directly.
        let status = ProcessCommand::new(&argv[0])
            .args(&argv[1..])
            .status()
            .map_err(|source| CompileError::Launch {
                compiler: self.binary.clone(),
                input: input.to_owned(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CompileError::Exit {
                compiler: self.binary.clone(),
                input: input.to_owned(),
                output: output.to_owned(),
                code: status.code(),
            })
        }
    }
}
