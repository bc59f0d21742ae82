use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{MetaError, Result};

pub(crate) const DEFAULT_CACHE_DIR: &str = "MTGODecklistCache/Tournaments";
pub(crate) const DEFAULT_MODIFIED_ROOT: &str = "MTGODecklistCacheModified";
pub(crate) const DEFAULT_RULES_FILE: &str = "archetype_rules.json";
pub(crate) const DEFAULT_FILELIST: &str = "filelist.txt";

pub(crate) fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub(crate) fn resolve_cache_root(cli: Option<PathBuf>) -> PathBuf {
    cli.or_else(|| env_optional("DECKMETA_CACHE_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
}

pub(crate) fn resolve_modified_root() -> String {
    env_optional("DECKMETA_MODIFIED_ROOT").unwrap_or_else(|| DEFAULT_MODIFIED_ROOT.to_string())
}

pub(crate) fn resolve_rules_path() -> PathBuf {
    env_optional("DECKMETA_RULES")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_FILE))
}

pub(crate) fn resolve_filelist_path() -> PathBuf {
    env_optional("DECKMETA_FILELIST")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILELIST))
}

/// The working list sits next to the cache list with a `.working` suffix.
pub(crate) fn working_filelist_path() -> PathBuf {
    let mut name = resolve_filelist_path().into_os_string();
    name.push(".working");
    PathBuf::from(name)
}

/// Serialize to `<path>.tmp`, then rename over `path`. A failure mid-write
/// leaves the previous content intact.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| MetaError::io(parent, e))?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| MetaError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let tmp = tmp_path(path);
    std::fs::write(&tmp, &json).map_err(|e| MetaError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| MetaError::io(path, e))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("deckmeta_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(format!("util_{}_{name}", std::process::id()))
    }

    #[test]
    fn atomic_write_replaces_content_and_cleans_tmp() {
        let path = temp_path("atomic.json");
        write_json_atomic(&path, &vec![1, 2, 3], false).unwrap();
        write_json_atomic(&path, &vec![4], false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[4]");
        assert!(!tmp_path(&path).exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn working_list_name_appends_suffix() {
        assert_eq!(
            working_filelist_path(),
            PathBuf::from(format!("{DEFAULT_FILELIST}.working"))
        );
    }
}
