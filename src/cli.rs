//! CLI front door.
//!
//! Provides the command implementations behind the `steadyref` binary:
//! - `check` - analyze files and report diagnostics
//! - `fix` - show (and optionally apply) the suggestion for one diagnostic
//! - `rules` - list known rules
//!
//! ## Error Handling
//!
//! All functions return `Result<T, SteadyError>`. The `SteadyError` type
//! provides stable error codes for JSON output and process exit status.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use steadyref_core::error::SteadyError;
use steadyref_core::output::{CheckResponse, FixResponse, Location, RuleInfo, RulesResponse};
use steadyref_core::patch::FixPlan;
use steadyref_jsx::{all_rules, analyze_source, Diagnostic, Dialect, RuleSet};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::files::{
    collect_paths, collect_workspace_files, relative_path, FileFilter, SourceFile,
};

// ============================================================================
// Workspace
// ============================================================================

/// A workspace root with its loaded configuration.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
    rules: RuleSet,
    filter: FileFilter,
}

impl Workspace {
    /// Open the workspace at `root`, loading `config_path` if given or
    /// `steadyref.toml` from the root otherwise.
    pub fn open(root: &Path, config_path: Option<&Path>) -> Result<Self, SteadyError> {
        if !root.is_dir() {
            return Err(SteadyError::invalid_args(format!(
                "workspace root is not a directory: {}",
                root.display()
            )));
        }
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_from_workspace(root)?,
        };
        let rules = config.rule_set()?;
        let filter = FileFilter::from_config(&config)?;
        Ok(Workspace {
            root: root.to_path_buf(),
            config,
            rules,
            filter,
        })
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The enabled rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

// ============================================================================
// check
// ============================================================================

/// Analyze `paths` (or the whole workspace when empty).
///
/// Files that cannot be read as UTF-8 are skipped with a warning; one bad
/// file never aborts the run.
pub fn run_check(ws: &Workspace, paths: &[PathBuf]) -> Result<CheckResponse, SteadyError> {
    let files = if paths.is_empty() {
        collect_workspace_files(&ws.root, &ws.filter)?
    } else {
        collect_paths(&ws.root, paths, &ws.filter)?
    };
    info!(files = files.len(), "checking");

    let mut files_checked = 0u32;
    let mut diagnostics = Vec::new();
    for file in &files {
        let source = match file.read() {
            Ok(source) => source,
            Err(e) => {
                warn!(path = %file.path, error = %e, "skipping unreadable file");
                continue;
            }
        };
        files_checked += 1;
        for diagnostic in analyze_file(file, &source, &ws.rules)? {
            diagnostics.push(diagnostic.to_info(&file.path, &source)?);
        }
    }

    Ok(CheckResponse::new(files_checked, diagnostics))
}

fn analyze_file(
    file: &SourceFile,
    source: &str,
    rules: &RuleSet,
) -> Result<Vec<Diagnostic>, SteadyError> {
    Ok(analyze_source(&file.path, source, file.dialect, rules)?)
}

/// Render a check response as `path:line:col: rule: message` lines.
pub fn render_check_text(response: &CheckResponse, writer: &mut impl Write) -> io::Result<()> {
    for d in &response.diagnostics {
        writeln!(writer, "{}: {}: {}", d.location, d.rule, d.message)?;
        for s in &d.suggestions {
            writeln!(writer, "  suggestion: {}", s.description)?;
        }
    }
    let n = response.diagnostics.len();
    writeln!(
        writer,
        "{} {} in {} {}",
        n,
        if n == 1 { "finding" } else { "findings" },
        response.files_checked,
        if response.files_checked == 1 { "file" } else { "files" }
    )
}

// ============================================================================
// fix
// ============================================================================

/// Select the diagnostic starting at `at` (`line:col`) in `file` and return
/// its suggestion as a patch. With `apply`, write the patch to disk.
///
/// Exactly one suggestion is handled per call. Before writing, the file is
/// re-read and its content hash compared with the analyzed content.
pub fn run_fix(
    ws: &Workspace,
    file: &Path,
    at: &str,
    rule: Option<&str>,
    apply: bool,
) -> Result<FixResponse, SteadyError> {
    let (line, col) = Location::parse_position(at).ok_or_else(|| {
        SteadyError::invalid_args(format!(
            "invalid position format '{}', expected line:col",
            at
        ))
    })?;

    let source_file = resolve_single_file(ws, file)?;
    let source = source_file.read()?;
    // An explicit --rule selects that rule even when the config disables it.
    let rules = match rule {
        Some(name) => RuleSet::all().only(name)?,
        None => RuleSet::from_config(&ws.config.rules)?,
    };

    let diagnostics = analyze_file(&source_file, &source, &rules)?;
    let mut matching = diagnostics
        .into_iter()
        .filter(|d| d.line == line && d.col == col);
    let Some(diagnostic) = matching.next() else {
        return Err(SteadyError::finding_not_found(&source_file.path, line, col));
    };
    if let Some(other) = matching.next() {
        return Err(SteadyError::invalid_args(format!(
            "several findings at {}:{}:{} ({}, {}); pass --rule",
            source_file.path, line, col, diagnostic.rule, other.rule
        )));
    }
    let Some(suggestion) = diagnostic.suggestions.first() else {
        return Err(SteadyError::internal(format!(
            "finding at {}:{}:{} has no suggestion",
            source_file.path, line, col
        )));
    };

    let patch = suggestion.edit.materialize(&source_file.path, &source)?;
    debug!(
        path = %source_file.path,
        rule = diagnostic.rule,
        edits = patch.edits.len(),
        "selected suggestion"
    );

    if apply {
        let mut plan = FixPlan::new(&source);
        plan.admit(suggestion.edit.clone())
            .map_err(|c| SteadyError::apply(c.to_string(), &source_file.path))?;
        let current = source_file.read()?;
        let rewritten = plan
            .apply(&current)
            .map_err(|e| SteadyError::apply(e.to_string(), &source_file.path))?;
        fs::write(&source_file.disk_path, rewritten)?;
        info!(path = %source_file.path, rule = diagnostic.rule, "applied suggestion");
    }

    Ok(FixResponse::new(
        diagnostic.rule,
        diagnostic.message.clone(),
        suggestion.description.clone(),
        patch,
        apply,
    ))
}

fn resolve_single_file(ws: &Workspace, file: &Path) -> Result<SourceFile, SteadyError> {
    let disk_path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        ws.root.join(file)
    };
    if !disk_path.is_file() {
        return Err(SteadyError::file_not_found(file.display().to_string()));
    }
    let path = relative_path(&ws.root, &disk_path)
        .unwrap_or_else(|| file.display().to_string());
    let dialect = Dialect::from_path(&disk_path).ok_or_else(|| {
        SteadyError::invalid_args(format!("unsupported file type: {}", path))
    })?;
    Ok(SourceFile {
        path,
        disk_path,
        dialect,
    })
}

// ============================================================================
// rules
// ============================================================================

/// List every known rule with its enabled state in `ws`.
pub fn run_rules(ws: &Workspace) -> RulesResponse {
    let rules = all_rules()
        .iter()
        .map(|r| RuleInfo {
            name: r.name().to_string(),
            description: r.description().to_string(),
            enabled: ws.rules.is_enabled(r.name()),
        })
        .collect();
    RulesResponse::new(rules)
}

/// Render a rules response as a table.
pub fn render_rules_text(response: &RulesResponse, writer: &mut impl Write) -> io::Result<()> {
    for rule in &response.rules {
        let state = if rule.enabled { "on" } else { "off" };
        writeln!(writer, "{:<28} {:<3}  {}", rule.name, state, rule.description)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
