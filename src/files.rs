//! Source file collection.
//!
//! Files are selected by the configuration's include globs, minus the
//! built-in exclusions and the configured exclude globs. Only files with a
//! recognized extension (see [`Dialect::from_path`]) are collected. Results
//! are sorted by workspace-relative path.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use steadyref_jsx::Dialect;
use thiserror::Error;
use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::config::Config;

/// Directory exclusions that always apply.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/dist/**",
    "**/build/**",
];

// ============================================================================
// Error Types
// ============================================================================

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// File not found.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// Invalid glob pattern syntax.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

// ============================================================================
// Filter
// ============================================================================

/// Include/exclude globs matched against workspace-relative paths.
#[derive(Debug)]
pub struct FileFilter {
    inclusions: GlobSet,
    exclusions: GlobSet,
    default_exclusions: GlobSet,
}

impl FileFilter {
    /// Build the filter described by `config`.
    pub fn from_config(config: &Config) -> FileResult<Self> {
        let defaults: Vec<String> = DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect();
        Ok(FileFilter {
            inclusions: build_glob_set(&config.include)?,
            exclusions: build_glob_set(&config.exclude)?,
            default_exclusions: build_glob_set(&defaults)?,
        })
    }

    /// Check if a path is excluded, regardless of the include globs.
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        self.default_exclusions.is_match(rel_path) || self.exclusions.is_match(rel_path)
    }

    /// Check if a workspace-relative path is selected.
    pub fn matches(&self, rel_path: &Path) -> bool {
        !self.is_excluded(rel_path) && self.inclusions.is_match(rel_path)
    }
}

/// Build a GlobSet from a list of pattern strings.
fn build_glob_set(patterns: &[String]) -> FileResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| FileError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| FileError::InvalidPattern {
        pattern: "<combined>".to_string(),
        message: e.to_string(),
    })
}

// ============================================================================
// Collection
// ============================================================================

/// A file selected for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Workspace-relative path with `/` separators.
    pub path: String,
    /// Absolute (or workspace-joined) path on disk.
    pub disk_path: PathBuf,
    /// Grammar dialect.
    pub dialect: Dialect,
}

impl SourceFile {
    /// Read the file's content.
    pub fn read(&self) -> FileResult<String> {
        fs::read_to_string(&self.disk_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FileError::NotFound {
                path: self.path.clone(),
            },
            _ => FileError::Io(e),
        })
    }
}

/// Workspace-relative path string with `/` separators.
pub fn relative_path(workspace_root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(workspace_root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

/// Collect every selected file under `workspace_root`.
pub fn collect_workspace_files(
    workspace_root: &Path,
    filter: &FileFilter,
) -> FileResult<Vec<SourceFile>> {
    let mut files = BTreeMap::new();
    walk_into(workspace_root, workspace_root, filter, &mut files);
    Ok(files.into_values().collect())
}

/// Collect the files named by `paths` (files or directories, relative to the
/// workspace root or absolute).
///
/// Directories are walked with the filter. Files named explicitly skip the
/// include globs but not the exclusions; an explicitly named file with an
/// unrecognized extension is skipped with a warning.
pub fn collect_paths(
    workspace_root: &Path,
    paths: &[PathBuf],
    filter: &FileFilter,
) -> FileResult<Vec<SourceFile>> {
    let mut files = BTreeMap::new();
    for path in paths {
        let disk_path = if path.is_absolute() {
            path.clone()
        } else {
            workspace_root.join(path)
        };
        if disk_path.is_dir() {
            walk_into(workspace_root, &disk_path, filter, &mut files);
            continue;
        }
        if !disk_path.is_file() {
            return Err(FileError::NotFound {
                path: path.display().to_string(),
            });
        }
        let Some(rel) = relative_path(workspace_root, &disk_path) else {
            warn!(path = %path.display(), "file is outside the workspace; skipping");
            continue;
        };
        if filter.is_excluded(Path::new(&rel)) {
            trace!(path = %rel, "excluded");
            continue;
        }
        let Some(dialect) = Dialect::from_path(&disk_path) else {
            warn!(path = %rel, "unsupported file extension; skipping");
            continue;
        };
        files.insert(
            rel.clone(),
            SourceFile {
                path: rel,
                disk_path,
                dialect,
            },
        );
    }
    Ok(files.into_values().collect())
}

fn walk_into(
    workspace_root: &Path,
    dir: &Path,
    filter: &FileFilter,
    files: &mut BTreeMap<String, SourceFile>,
) {
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(rel) = relative_path(workspace_root, path) else {
            continue;
        };
        if !filter.matches(Path::new(&rel)) {
            continue;
        }
        let Some(dialect) = Dialect::from_path(path) else {
            continue;
        };
        files.insert(
            rel.clone(),
            SourceFile {
                path: rel,
                disk_path: path.to_path_buf(),
                dialect,
            },
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {}\n").unwrap();
    }

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        for rel in [
            "src/App.tsx",
            "src/util.ts",
            "src/legacy.jsx",
            "src/styles.css",
            "src/App.stories.tsx",
            "node_modules/pkg/index.js",
            "dist/bundle.js",
            "scripts/build.mjs",
        ] {
            write(dir.path(), rel);
        }
        dir
    }

    fn paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn default_config_collects_sorted_sources() {
        let dir = workspace();
        let filter = FileFilter::from_config(&Config::default()).unwrap();
        let files = collect_workspace_files(dir.path(), &filter).unwrap();
        assert_eq!(
            paths(&files),
            vec!["src/App.stories.tsx", "src/App.tsx", "src/legacy.jsx", "src/util.ts"]
        );
        assert_eq!(files[1].dialect, Dialect::Tsx);
        assert_eq!(files[3].dialect, Dialect::TypeScript);
    }

    #[test]
    fn configured_globs_apply() {
        let dir = workspace();
        let config = Config {
            include: vec!["src/**/*.tsx".to_string(), "scripts/**".to_string()],
            exclude: vec!["**/*.stories.tsx".to_string()],
            ..Config::default()
        };
        let filter = FileFilter::from_config(&config).unwrap();
        let files = collect_workspace_files(dir.path(), &filter).unwrap();
        assert_eq!(paths(&files), vec!["scripts/build.mjs", "src/App.tsx"]);
    }

    #[test]
    fn explicit_paths() {
        let dir = workspace();
        let filter = FileFilter::from_config(&Config::default()).unwrap();
        let files = collect_paths(
            dir.path(),
            &[
                PathBuf::from("src/util.ts"),
                PathBuf::from("src/styles.css"),
                PathBuf::from("src"),
                PathBuf::from("node_modules/pkg/index.js"),
            ],
            &filter,
        )
        .unwrap();
        assert_eq!(
            paths(&files),
            vec!["src/App.stories.tsx", "src/App.tsx", "src/legacy.jsx", "src/util.ts"]
        );
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = workspace();
        let filter = FileFilter::from_config(&Config::default()).unwrap();
        let err = collect_paths(dir.path(), &[PathBuf::from("src/Nope.tsx")], &filter).unwrap_err();
        assert!(matches!(err, FileError::NotFound { ref path } if path == "src/Nope.tsx"));
    }

    #[test]
    fn invalid_glob_is_reported() {
        let config = Config {
            include: vec!["src/[".to_string()],
            ..Config::default()
        };
        let err = FileFilter::from_config(&config).unwrap_err();
        assert!(matches!(err, FileError::InvalidPattern { .. }));
    }
}
