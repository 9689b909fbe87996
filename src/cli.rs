use camino::Utf8PathBuf;
use clap::Parser;

/// Batch conversion of a directory of C sources into LLVM IR text files,
/// delegating the actual translation to an external compiler.
#[derive(Parser, Debug)]
#[command(name = "llconv", version, about = "Batch-compile C sources to LLVM IR text")]
pub struct Cli {
    /// Directory of source files to convert (falls back to config).
    pub input_dir: Option<Utf8PathBuf>,

    /// Directory receiving the .ll outputs, created if absent (falls back to config).
    pub output_dir: Option<Utf8PathBuf>,

    /// External compiler binary to invoke.
    #[arg(long = "compiler")]
    pub compiler: Option<String>,

    /// Explicit config file instead of ./llconv.toml.
    #[arg(short = 'f', long = "file")]
    pub file: Option<Utf8PathBuf>,

    /// Collect per-entry failures and report them at the end instead of
    /// aborting on the first one.
    #[arg(long = "keep-going", default_value_t = false)]
    pub keep_going: bool,

    /// Print the commands that would run without spawning anything.
    #[arg(short = 'n', long = "dry-run", default_value_t = false)]
    pub dry_run: bool,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
