//! CLI subcommands.

pub mod config;
pub mod convert;
pub mod interactive;

use std::path::Path;

use facto_core::FactoConfig;

/// Effective configuration: the given file, or defaults.
pub(crate) fn load_config(path: Option<&str>) -> anyhow::Result<FactoConfig> {
    match path {
        Some(path) => Ok(FactoConfig::from_file(Path::new(path))?),
        None => Ok(FactoConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_without_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.geocoding.delay_ms, 1000);
    }

    #[test]
    fn test_load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"geocoding": {{"delay_ms": 250}}}}"#).unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.geocoding.delay_ms, 250);
    }

    #[test]
    fn test_load_config_missing_file_is_an_error() {
        assert!(load_config(Some("/nonexistent/facto.json")).is_err());
    }
}
