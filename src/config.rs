use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// File picked up from the working directory when no `--file` is given.
const DISCOVERED_NAME: &str = "llconv.toml";

/// Optional configuration document. CLI arguments override every field.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertConfig {
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub compiler: Option<String>,
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<ConvertConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {path}"))
}

/// Resolve the effective configuration: an explicit path is loaded and any
/// failure is fatal; otherwise `llconv.toml` is used when present; otherwise
/// built-in defaults apply.
pub fn resolve(explicit: Option<&Utf8Path>) -> Result<ConvertConfig> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let discovered = Utf8PathBuf::from(DISCOVERED_NAME);
    if discovered.exists() {
        return load_from_path(&discovered);
    }

    Ok(ConvertConfig::default())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> Utf8PathBuf {
        let mut dir = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("llconv-test-{ts}"));
        Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn parses_full_document() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.as_std_path()).unwrap();
        let path = root.join("llconv.toml");
        fs::write(
            path.as_std_path(),
            r#"input_dir = "assign2-tests"
output_dir = "assign2-ll"
compiler = "clang-18"
"#,
        )
        .unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.input_dir.as_deref(), Some("assign2-tests"));
        assert_eq!(config.output_dir.as_deref(), Some("assign2-ll"));
        assert_eq!(config.compiler.as_deref(), Some("clang-18"));

        let _ = fs::remove_dir_all(root.as_std_path());
    }

    #[test]
    fn every_field_is_optional() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.as_std_path()).unwrap();
        let path = root.join("llconv.toml");
        fs::write(path.as_std_path(), "compiler = 'clang'\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert!(config.input_dir.is_none());
        assert!(config.output_dir.is_none());

        let _ = fs::remove_dir_all(root.as_std_path());
    }

    #[test]
    fn explicit_missing_file_is_fatal() {
        let root = unique_temp_dir();
        let path = root.join("absent.toml");
        let err = resolve(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
