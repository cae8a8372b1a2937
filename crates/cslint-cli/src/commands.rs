//! CLI command implementations

use anyhow::Context;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use cslint_core::{
    CancellationToken, Color, Console, CslintConfig, DiagnosticRenderer, FixConfig, OutputFormat,
    Severity, discover_files, execute, render_diff,
};
use cslint_rules::LintEngine;

/// Load configuration from an explicit path or the current directory
fn load_config(config_path: Option<&Path>) -> anyhow::Result<CslintConfig> {
    match config_path {
        Some(path) => {
            CslintConfig::load_from_path(path).context("failed to load configuration file")
        }
        None => CslintConfig::load_from_dir(Path::new(".")).context("failed to load configuration"),
    }
}

fn default_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    }
}

/// `cslint check`
pub fn check(
    paths: &[PathBuf],
    json: bool,
    config_path: Option<&Path>,
    no_color: bool,
) -> anyhow::Result<u8> {
    let config = load_config(config_path)?;
    let engine = LintEngine::new(config);
    let files = discover_files(&default_paths(paths))?;
    tracing::info!("analyzing {} file(s)", files.len());

    let cancel = CancellationToken::new();
    let results = execute(&files, &cancel, |file, source| {
        engine.analyze_source(file, source, &cancel)
    })?;

    let mut diagnostics = Vec::new();
    let mut failed_files = 0usize;
    for result in &results {
        if let Some(error) = &result.error {
            failed_files += 1;
            eprintln!("{}: {error}", result.file.display());
        }
        diagnostics.extend(
            result
                .diagnostics
                .iter()
                .filter(|d| d.severity > Severity::Hidden)
                .cloned(),
        );
    }
    cslint_core::sort_diagnostics(&mut diagnostics);

    let renderer = match (json, no_color) {
        (true, _) => DiagnosticRenderer::with_format(OutputFormat::Json),
        (false, true) => DiagnosticRenderer::no_colors(),
        (false, false) => DiagnosticRenderer::new(),
    };
    let rendered = renderer.render_all(&diagnostics, |diagnostic| {
        results
            .iter()
            .find(|r| r.file == diagnostic.location.file)
            .map(|r| r.source.clone())
    });
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    if !json {
        let console = if no_color {
            Console::no_colors()
        } else {
            Console::new()
        };
        let summary = format!(
            "{} file(s) analyzed, {} finding(s)",
            results.len(),
            diagnostics.len()
        );
        let color = if diagnostics.is_empty() {
            Color::Green
        } else {
            Color::Yellow
        };
        println!("{}", console.colorize(&summary, color));
    }

    let blocking = diagnostics
        .iter()
        .any(|d| d.severity >= Severity::Warning);
    if failed_files > 0 {
        Ok(2)
    } else if blocking {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// `cslint fix`
pub fn fix(paths: &[PathBuf], dry_run: bool, config_path: Option<&Path>) -> anyhow::Result<u8> {
    let config = load_config(config_path)?;
    let engine = LintEngine::new(config);
    let files = discover_files(&default_paths(paths))?;

    let fix_config = if dry_run {
        FixConfig::dry_run()
    } else {
        FixConfig::default()
    };
    let cancel = CancellationToken::new();

    let outcomes: Vec<anyhow::Result<(PathBuf, usize, usize, Option<String>)>> = files
        .par_iter()
        .map(|file| {
            let source = std::fs::read_to_string(file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let result = engine.fix_source(file, &source, &fix_config, &cancel)?;

            let diff = if result.changed() {
                if fix_config.dry_run {
                    Some(render_diff(&source, &result.content, file))
                } else {
                    std::fs::write(file, &result.content)
                        .with_context(|| format!("cannot write {}", file.display()))?;
                    None
                }
            } else {
                None
            };
            Ok((
                file.clone(),
                result.applied_count,
                result.unavailable_count,
                diff,
            ))
        })
        .collect();

    let mut total_applied = 0usize;
    let mut total_unavailable = 0usize;
    let mut changed_files = 0usize;
    for outcome in outcomes {
        let (file, applied, unavailable, diff) = outcome?;
        if applied > 0 {
            changed_files += 1;
            tracing::info!("{}: {applied} fix(es)", file.display());
        }
        if let Some(diff) = diff {
            print!("{diff}");
        }
        total_applied += applied;
        total_unavailable += unavailable;
    }

    let action = if dry_run { "would apply" } else { "applied" };
    println!(
        "{action} {total_applied} fix(es) across {changed_files} file(s); {total_unavailable} finding(s) without an available fix"
    );
    Ok(0)
}

/// `cslint rules`
pub fn rules(config_path: Option<&Path>) -> anyhow::Result<u8> {
    let config = load_config(config_path)?;
    let engine = LintEngine::new(config);

    for rule in engine.registry().rules() {
        let descriptor = rule.descriptor;
        let state = if rule.enabled { "enabled" } else { "disabled" };
        println!(
            "{} {} [{}/{}] {}: {}",
            descriptor.id,
            rule.severity,
            descriptor.category.slug(),
            state,
            descriptor.name,
            descriptor.description
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_fall_back_to_cwd() {
        assert_eq!(default_paths(&[]), vec![PathBuf::from(".")]);
        let explicit = vec![PathBuf::from("src")];
        assert_eq!(default_paths(&explicit), explicit);
    }

    #[test]
    fn check_reports_and_fix_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Foo.cs");
        std::fs::write(&file, "if (x)\n    M();\n").unwrap();

        let code = check(&[file.clone()], true, None, true).unwrap();
        assert_eq!(code, 1);

        let code = fix(&[file.clone()], false, None).unwrap();
        assert_eq!(code, 0);
        let fixed = std::fs::read_to_string(&file).unwrap();
        assert_eq!(fixed, "if (x)\n{\n    M();\n}\n");

        let code = check(&[file], true, None, true).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Foo.cs");
        let source = "if (x)\n    M();\n";
        std::fs::write(&file, source).unwrap();

        fix(&[file.clone()], true, None).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), source);
    }
}
