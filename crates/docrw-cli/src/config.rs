//! `docrw.toml` discovery and loading, mirroring `core-config`'s
//! `discover`/`load_from` split: a local file in the working directory
//! wins, falling back to the platform config dir.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

/// Partial `Options` overrides as read from `docrw.toml`. Every field is
/// optional -- absence means "let the built-in default or a CLI flag
/// decide", so unknown/omitted keys never force a value.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub reflow: Option<bool>,
    #[serde(default)]
    pub reflow_tab_width: Option<u32>,
    #[serde(default)]
    pub reflow_max_width: Option<u32>,
    #[serde(default)]
    pub reject_updates: Option<bool>,
}

pub fn discover() -> PathBuf {
    let local = PathBuf::from("docrw.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("docrw").join("docrw.toml");
    }
    PathBuf::from("docrw.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<ConfigFile> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(_) => Ok(ConfigFile::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_docrw__.toml"))).unwrap();
        assert_eq!(cfg.reflow, None);
        assert_eq!(cfg.reflow_max_width, None);
    }

    #[test]
    fn parses_known_keys() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "reflow = true\nreflow_max_width = 100\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.reflow, Some(true));
        assert_eq!(cfg.reflow_max_width, Some(100));
        assert_eq!(cfg.reject_updates, None);
    }
}
