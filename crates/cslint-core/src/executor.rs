//! Parallel analysis driver
//!
//! Runs an analysis callback over many files with rayon. Analysis is
//! stateless and reentrant, so files are processed independently; the only
//! shared data is the immutable configuration and rule registry owned by
//! the callback. Cancellation aborts the whole pass and discards partial
//! results; recoverable per-file failures (unreadable file, parse trouble)
//! are recorded on the file's result instead of aborting the pass.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::cancel::CancellationToken;
use crate::diagnostics::Diagnostic;
use crate::error::CslintError;
use crate::result::Result;

/// Outcome of analyzing one file
#[derive(Debug)]
pub struct FileExecutionResult {
    pub file: PathBuf,
    /// File content as read; kept for rendering code frames
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Recoverable failure for this file, if any
    pub error: Option<String>,
}

/// Analyze `files` in parallel with `analyze`.
///
/// `analyze` receives the file path and its content and returns the file's
/// diagnostics. Returns `Err(Cancelled)` as soon as cancellation is
/// observed; partial results are discarded.
pub fn execute<F>(
    files: &[PathBuf],
    cancel: &CancellationToken,
    analyze: F,
) -> Result<Vec<FileExecutionResult>>
where
    F: Fn(&Path, &str) -> Result<Vec<Diagnostic>> + Sync,
{
    let mut results: Vec<FileExecutionResult> = files
        .par_iter()
        .map(|file| {
            cancel.check()?;
            analyze_one(file, &analyze)
        })
        .collect::<Result<Vec<_>>>()?;

    // par_iter preserves order, but sort anyway for a deterministic report
    results.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(results)
}

fn analyze_one<F>(file: &Path, analyze: &F) -> Result<FileExecutionResult>
where
    F: Fn(&Path, &str) -> Result<Vec<Diagnostic>> + Sync,
{
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!("cannot read {}: {e}", file.display());
            return Ok(FileExecutionResult {
                file: file.to_path_buf(),
                source: String::new(),
                diagnostics: Vec::new(),
                error: Some(format!("cannot read file: {e}")),
            });
        }
    };

    match analyze(file, &source) {
        Ok(diagnostics) => Ok(FileExecutionResult {
            file: file.to_path_buf(),
            source,
            diagnostics,
            error: None,
        }),
        // Cancellation aborts the whole pass, not just this file
        Err(CslintError::Cancelled) => Err(CslintError::Cancelled),
        Err(e) => {
            tracing::warn!("analysis failed for {}: {e}", file.display());
            Ok(FileExecutionResult {
                file: file.to_path_buf(),
                source,
                diagnostics: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Location, Severity};

    #[test]
    fn analyzes_files_in_parallel() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.cs");
        let b = dir.path().join("b.cs");
        std::fs::write(&a, "one").unwrap();
        std::fs::write(&b, "two").unwrap();

        let cancel = CancellationToken::new();
        let results = execute(&[b.clone(), a.clone()], &cancel, |file, source| {
            Ok(vec![Diagnostic::new(
                "TEST001",
                Severity::Info,
                source.to_string(),
                Location::new(file.to_path_buf(), 1, 1, 0, 0),
            )])
        })
        .unwrap();

        assert_eq!(results.len(), 2);
        // Sorted by path
        assert_eq!(results[0].file, a);
        assert_eq!(results[0].diagnostics[0].message, "one");
        assert_eq!(results[1].diagnostics[0].message, "two");
    }

    #[test]
    fn cancellation_aborts_the_pass() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.cs");
        std::fs::write(&a, "x").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = execute(&[a], &cancel, |_, _| Ok(Vec::new()));
        assert!(matches!(result, Err(CslintError::Cancelled)));
    }

    #[test]
    fn unreadable_file_is_recorded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().join("ok.cs");
        std::fs::write(&ok, "x").unwrap();
        let missing = dir.path().join("missing.cs");

        let cancel = CancellationToken::new();
        let results = execute(&[ok, missing], &cancel, |_, _| Ok(Vec::new())).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|r| r.error.is_some()));
        assert!(results.iter().any(|r| r.error.is_none()));
    }
}
