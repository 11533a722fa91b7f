//! Artifact assembly and the terminal summary.
//!
//! The primary artifact is the CCM document. The legacy artifact keeps the
//! flat IR arrays plus run statistics for older consumers.

use colored::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::ccm::{NodeType, RelationshipType};
use crate::error::AnalyzerError;
use crate::ir::{ClassInfo, CommentInfo, ModuleInfo};
use crate::language::Language;
use crate::pipeline::{AnalysisOutcome, RunStats};

/// File name of the CCM document inside the output directory.
pub const PRIMARY_ARTIFACT: &str = "analysis.json";
/// File name of the legacy document inside the output directory.
pub const LEGACY_ARTIFACT: &str = "analysis_legacy.json";

const LEGACY_FEATURES: &[&str] = &[
    "functions",
    "classes",
    "imports",
    "comments",
    "docstrings",
    "type_annotations",
];

/// Paths written by [`write_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub primary: PathBuf,
    pub legacy: Option<PathBuf>,
}

#[derive(Serialize)]
struct LegacyMetadata<'a> {
    analyzer_version: &'static str,
    features: &'static [&'static str],
    tree_sitter_available: bool,
    supported_languages: Vec<&'static str>,
    project_type: &'a str,
    files_analyzed: usize,
    files_ignored: usize,
}

#[derive(Serialize)]
struct LegacyReport<'a> {
    functions: Vec<Value>,
    classes: &'a [ClassInfo],
    modules: &'a [ModuleInfo],
    comments: &'a [CommentInfo],
    stats: &'a RunStats,
    repository_path: String,
    analysis_metadata: LegacyMetadata<'a>,
}

/// Write the primary artifact and, when `legacy` is set, the legacy one.
pub fn write_artifacts(
    outcome: &AnalysisOutcome,
    output_dir: &Path,
    legacy: bool,
) -> Result<Artifacts, AnalyzerError> {
    fs::create_dir_all(output_dir).map_err(|source| AnalyzerError::OutputWrite {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let primary = output_dir.join(PRIMARY_ARTIFACT);
    write_json(&primary, &outcome.ccm)?;
    info!(path = %primary.display(), "wrote primary artifact");

    let legacy = if legacy {
        let path = output_dir.join(LEGACY_ARTIFACT);
        write_json(&path, &legacy_report(outcome)?)?;
        info!(path = %path.display(), "wrote legacy artifact");
        Some(path)
    } else {
        None
    };

    Ok(Artifacts { primary, legacy })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AnalyzerError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| AnalyzerError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn legacy_report(outcome: &AnalysisOutcome) -> Result<LegacyReport<'_>, AnalyzerError> {
    let batch = &outcome.batch;
    let called_by = called_by(outcome);

    let functions = batch
        .functions
        .iter()
        .zip(called_by)
        .map(|(func, callers)| {
            let mut value = serde_json::to_value(func)?;
            if let Value::Object(map) = &mut value {
                map.insert("called_by".to_string(), Value::from(callers));
            }
            Ok(value)
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;

    Ok(LegacyReport {
        functions,
        classes: &batch.classes,
        modules: &batch.modules,
        comments: &batch.comments,
        stats: &outcome.stats,
        repository_path: outcome.root.display().to_string(),
        analysis_metadata: LegacyMetadata {
            analyzer_version: env!("CARGO_PKG_VERSION"),
            features: LEGACY_FEATURES,
            tree_sitter_available: cfg!(feature = "tree-sitter"),
            supported_languages: Language::ALL
                .iter()
                .filter(|l| l.is_analyzable())
                .map(Language::as_str)
                .collect(),
            project_type: outcome.project_type.as_str(),
            files_analyzed: outcome.stats.total_files,
            files_ignored: outcome.stats.files_ignored,
        },
    })
}

/// Qualified names of each function's resolved callers, index-aligned with
/// the batch functions. Derived from the graph's call edges.
fn called_by(outcome: &AnalysisOutcome) -> Vec<Vec<String>> {
    let functions = &outcome.batch.functions;

    // Function-like nodes are created in batch order.
    let function_ids: Vec<&str> = outcome
        .ccm
        .nodes
        .iter()
        .filter(|n| {
            matches!(
                n.node_type,
                NodeType::Function | NodeType::Method | NodeType::Constructor
            )
        })
        .map(|n| n.id.as_str())
        .collect();
    let index: HashMap<&str, usize> = function_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let mut callers = vec![Vec::new(); functions.len()];
    for (caller, id) in functions.iter().zip(&function_ids) {
        let Some(node) = outcome.ccm.node(id) else {
            continue;
        };
        for rel in node.relationships() {
            if rel.kind != RelationshipType::Calls {
                continue;
            }
            if let Some(&target) = index.get(rel.target_id.as_str()) {
                let name = caller.qualified_name();
                if !callers[target].contains(&name) {
                    callers[target].push(name);
                }
            }
        }
    }
    callers
}

/// Print the run summary to stdout.
pub fn print_summary(outcome: &AnalysisOutcome, artifacts: &Artifacts) {
    let stats = &outcome.stats;
    let meta = &outcome.ccm.metadata;

    println!();
    print!("  {}", "ccm-analyzer".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Repository:   ".dimmed());
    println!("{}", outcome.root.display());
    print!("  {}", "Project type: ".dimmed());
    println!("{}", outcome.project_type);
    println!();

    println!(
        "  {} files  {} functions  {} classes  {} comments",
        stats.total_files.to_string().bold(),
        stats.total_functions.to_string().bold(),
        stats.total_classes.to_string().bold(),
        stats.total_comments.to_string().bold(),
    );
    if stats.files_failed > 0 {
        println!(
            "  {}",
            format!("{} files failed to read", stats.files_failed).yellow()
        );
    }
    if !stats.languages.is_empty() {
        let languages: Vec<String> = stats
            .languages
            .iter()
            .map(|(lang, count)| format!("{} ({})", lang, count))
            .collect();
        print!("  {}", "Languages: ".dimmed());
        println!("{}", languages.join(", "));
    }
    println!();

    println!("  {}", "Nodes".bold());
    for (node_type, count) in &meta.node_type_counts {
        println!("    {:<12} {}", node_type, count);
    }
    println!();

    print!("  {} ", "Relationships:".bold());
    println!(
        "{} ({} resolved, {} unresolved)",
        meta.total_relationships, meta.resolved_relationships, meta.unresolved_relationships
    );
    print!("  Resolution rate: ");
    write_colored_rate(meta.resolution_rate);
    println!();
    println!();

    print!("  {}", "CCM:    ".dimmed());
    println!("{}", artifacts.primary.display());
    if let Some(legacy) = &artifacts.legacy {
        print!("  {}", "Legacy: ".dimmed());
        println!("{}", legacy.display());
    }
    println!();
}

fn write_colored_rate(rate: f64) {
    let text = format!("{:.1}%", rate);
    match rate {
        r if r >= 60.0 => print!("{}", text.green().bold()),
        r if r >= 30.0 => print!("{}", text.yellow()),
        _ => print!("{}", text.red()),
    }
}

/// Print the classifier table for the `languages` subcommand.
pub fn print_languages() {
    println!(
        "  {:<12} {:<10} {:<8} {}",
        "LANGUAGE".bold(),
        "ANALYZED".bold(),
        "GRAMMAR".bold(),
        "EXTENSIONS".bold()
    );
    for language in Language::ALL {
        let analyzed = if language.is_analyzable() { "yes" } else { "no" };
        let grammar = if has_grammar(*language) { "yes" } else { "no" };
        println!(
            "  {:<12} {:<10} {:<8} {}",
            language.as_str(),
            analyzed,
            grammar,
            language.extensions().join(" ")
        );
    }
}

#[cfg(feature = "tree-sitter")]
fn has_grammar(language: Language) -> bool {
    crate::extract::grammar::grammar_for(language, Path::new("")).is_some()
}

#[cfg(not(feature = "tree-sitter"))]
fn has_grammar(_language: Language) -> bool {
    false
}
