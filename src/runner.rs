use anyhow::{Result, bail};
use camino::Utf8PathBuf;
use tracing::debug;

use crate::cli::Cli;
use crate::compiler::{ClangCompiler, DEFAULT_COMPILER};
use crate::config::{self, ConvertConfig};
use crate::convert;

/// Fully resolved inputs for one conversion run.
#[derive(Debug)]
struct ConvertOptions {
    input_dir: Utf8PathBuf,
    output_dir: Utf8PathBuf,
    compiler: String,
    keep_going: bool,
    dry_run: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = config::resolve(cli.file.as_deref())?;
    let opts = merge(cli, config)?;
    debug!(?opts, "resolved options");

    let compiler = ClangCompiler::new(opts.compiler.clone());

    if opts.dry_run {
        return dry_run(&compiler, &opts);
    }

    convert::convert_dir(&compiler, &opts.input_dir, &opts.output_dir, opts.keep_going)
}

fn merge(cli: Cli, config: ConvertConfig) -> Result<ConvertOptions> {
    let Some(input_dir) = cli
        .input_dir
        .or_else(|| config.input_dir.map(Utf8PathBuf::from))
    else {
        bail!("no input directory; pass <INPUT_DIR> or set `input_dir` in llconv.toml");
    };

    let Some(output_dir) = cli
        .output_dir
        .or_else(|| config.output_dir.map(Utf8PathBuf::from))
    else {
        bail!("no output directory; pass <OUTPUT_DIR> or set `output_dir` in llconv.toml");
    };

    let compiler = cli
        .compiler
        .or(config.compiler)
        .unwrap_or_else(|| DEFAULT_COMPILER.to_owned());

    Ok(ConvertOptions {
        input_dir,
        output_dir,
        compiler,
        keep_going: cli.keep_going,
        dry_run: cli.dry_run,
    })
}

/// Print the exact command lines a real run would spawn. Reads the input
/// directory listing but creates nothing and launches nothing.
fn dry_run(compiler: &ClangCompiler, opts: &ConvertOptions) -> Result<()> {
    let entries = convert::plan_entries(&opts.input_dir, &opts.output_dir)?;
    if entries.is_empty() {
        println!("Nothing to convert in {}.", opts.input_dir);
        return Ok(());
    }

    for (input, output) in &entries {
        println!("(dry-run) {}", format_command(&compiler.argv(input, output)));
    }
    Ok(())
}

fn format_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.chars().any(|c| c.is_whitespace()) {
                let escaped = arg.replace('"', "\\\"");
                format!("\"{}\"", escaped)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(input: Option<&str>, output: Option<&str>) -> Cli {
        Cli {
            input_dir: input.map(Utf8PathBuf::from),
            output_dir: output.map(Utf8PathBuf::from),
            compiler: None,
            file: None,
            keep_going: false,
            dry_run: false,
            verbose: 0,
        }
    }

    #[test]
    fn cli_dirs_override_config() {
        let config = ConvertConfig {
            input_dir: Some("cfg-in".to_owned()),
            output_dir: Some("cfg-out".to_owned()),
            compiler: Some("clang-18".to_owned()),
        };
        let opts = merge(cli(Some("cli-in"), Some("cli-out")), config).unwrap();
        assert_eq!(opts.input_dir, Utf8PathBuf::from("cli-in"));
        assert_eq!(opts.output_dir, Utf8PathBuf::from("cli-out"));
        assert_eq!(opts.compiler, "clang-18");
    }

    #[test]
    fn config_fills_missing_cli_dirs() {
        let config = ConvertConfig {
            input_dir: Some("assign2-tests".to_owned()),
            output_dir: Some("assign2-ll".to_owned()),
            compiler: None,
        };
        let opts = merge(cli(None, None), config).unwrap();
        assert_eq!(opts.input_dir, Utf8PathBuf::from("assign2-tests"));
        assert_eq!(opts.output_dir, Utf8PathBuf::from("assign2-ll"));
        assert_eq!(opts.compiler, DEFAULT_COMPILER);
    }

    #[test]
    fn missing_input_dir_is_a_usage_error() {
        let err = merge(cli(None, Some("out")), ConvertConfig::default()).unwrap_err();
        assert!(err.to_string().contains("input directory"));
    }

    #[test]
    fn missing_output_dir_is_a_usage_error() {
        let err = merge(cli(Some("in"), None), ConvertConfig::default()).unwrap_err();
        assert!(err.to_string().contains("output directory"));
    }

    #[test]
    fn format_command_quotes_whitespace() {
        let argv = vec!["clang".to_owned(), "my file.c".to_owned()];
        assert_eq!(format_command(&argv), "clang \"my file.c\"");
    }
}
