use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use walkdir::WalkDir;

use crate::error::{MetaError, Result};
use crate::types::TournamentDocument;
use crate::util::write_json_atomic;

pub(crate) fn parse_after_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| MetaError::InvalidDate {
        value: value.to_string(),
    })
}

/// Files under the cache tree, which is laid out as
/// `<root>/<subdir>/<year>/<month>/<day>/<file>`, dated at or after `after`
/// and with `token` somewhere in the filename. Branches that do not fit the
/// layout are skipped.
pub(crate) fn collect_cache_files(
    root: &Path,
    after: NaiveDate,
    token: &str,
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MetaError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "cache directory not found"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(date) = entry_date(root, entry.path()) else {
            continue;
        };
        if date < after {
            continue;
        }
        if entry.file_name().to_string_lossy().contains(token) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// The `<year>/<month>/<day>` components between the cache subdir and the
/// filename.
fn entry_date(root: &Path, path: &Path) -> Option<NaiveDate> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(p) => p.to_str(),
            _ => None,
        })
        .collect();
    // subdir / year / month / day / filename
    if parts.len() != 5 {
        return None;
    }
    let year: i32 = parts[1].parse().ok()?;
    let month: u32 = parts[2].parse().ok()?;
    let day: u32 = parts[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Copy each source file into a parallel tree whose first path component is
/// `modified_root`, creating directories as needed; returns the new paths.
/// Originals stay pristine — everything downstream mutates only the copies.
pub(crate) fn materialize_working_copies(
    paths: &[PathBuf],
    modified_root: &str,
) -> Result<Vec<PathBuf>> {
    let mut working = Vec::with_capacity(paths.len());
    for path in paths {
        let target = rebase_path(path, modified_root);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MetaError::io(parent, e))?;
        }
        std::fs::copy(path, &target).map_err(|e| MetaError::io(path, e))?;
        working.push(target);
    }
    Ok(working)
}

/// Swap the first normal path component for `modified_root`.
pub(crate) fn rebase_path(path: &Path, modified_root: &str) -> PathBuf {
    let mut out = PathBuf::new();
    let mut replaced = false;
    for component in path.components() {
        match component {
            Component::Normal(_) if !replaced => {
                out.push(modified_root);
                replaced = true;
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// File lists persist as plain JSON arrays of paths.
pub(crate) fn write_filelist(path: &Path, files: &[PathBuf]) -> Result<()> {
    write_json_atomic(path, &files, false)
}

pub(crate) fn load_filelist(path: &Path) -> Result<Vec<PathBuf>> {
    let data = std::fs::read_to_string(path).map_err(|e| MetaError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| MetaError::MalformedDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub(crate) fn load_document(path: &Path) -> Result<TournamentDocument> {
    let data = std::fs::read_to_string(path).map_err(|e| MetaError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| MetaError::MalformedDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Refresh `DeckCount` and rewrite the whole document in place. Fields this
/// tool does not interpret round-trip through the `extra` maps.
pub(crate) fn save_document(path: &Path, doc: &mut TournamentDocument) -> Result<()> {
    doc.deck_count = doc.decks.len() as u64;
    // Compact encoding, like the cache's own files.
    write_json_atomic(path, doc, false)
}

/// Every working document, in list order.
pub(crate) fn load_working_documents(list_path: &Path) -> Result<Vec<TournamentDocument>> {
    let mut docs = Vec::new();
    for path in load_filelist(list_path)? {
        docs.push(load_document(&path)?);
    }
    Ok(docs)
}

/// Recompute `DeckCount` for every listed working file; returns the total
/// number of decks seen.
pub(crate) fn enrich_documents(paths: &[PathBuf]) -> Result<usize> {
    let mut total = 0usize;
    for path in paths {
        let mut doc = load_document(path)?;
        total += doc.decks.len();
        save_document(path, &mut doc)?;
    }
    Ok(total)
}
