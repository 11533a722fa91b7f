//! The analysis run: walk, extract, build.
//!
//! Files are extracted independently, sequentially or on the rayon pool.
//! Parallel results are put back into path order before anything reads
//! them, so both modes produce the same batch and the same graph.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ccm::{build_ccm, CcmAnalysisResult, ProjectInfo};
use crate::config::Config;
use crate::error::{AnalyzerError, FileFailure};
use crate::extract::{extract_as, Extraction, Strategy};
use crate::ir::IrBatch;
use crate::language::Language;
use crate::walker::{ProjectType, SourceFile, Walker};

/// Statistics of one run. Serialized into the legacy artifact and carried
/// in the CCM metadata as `original_stats`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub total_files: usize,
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_comments: usize,
    /// Files analyzed per language.
    pub languages: BTreeMap<String, usize>,
    pub functions_per_language: BTreeMap<String, usize>,
    pub classes_per_language: BTreeMap<String, usize>,
    pub comments_per_language: BTreeMap<String, usize>,
    pub project_type: String,
    /// Files too small or without any IR.
    pub files_skipped: usize,
    /// Files excluded by ignore rules before extraction.
    pub files_ignored: usize,
    pub files_failed: usize,
    /// Files per extraction strategy.
    pub strategies: BTreeMap<String, usize>,
    pub failures: Vec<FileFailure>,
}

impl RunStats {
    fn record(&mut self, language: Language, extraction: &Extraction) {
        let ir = &extraction.ir;
        let lang = language.as_str().to_string();
        self.total_files += 1;
        self.total_functions += ir.functions.len();
        self.total_classes += ir.classes.len();
        self.total_comments += ir.module.comments.len();
        *self.languages.entry(lang.clone()).or_insert(0) += 1;
        *self.functions_per_language.entry(lang.clone()).or_insert(0) += ir.functions.len();
        *self.classes_per_language.entry(lang.clone()).or_insert(0) += ir.classes.len();
        *self.comments_per_language.entry(lang).or_insert(0) += ir.module.comments.len();
        *self
            .strategies
            .entry(extraction.strategy.as_str().to_string())
            .or_insert(0) += 1;
    }

    /// Languages that contributed IR, in classifier order.
    pub fn language_list(&self) -> Vec<Language> {
        Language::ALL
            .iter()
            .copied()
            .filter(|l| self.languages.contains_key(l.as_str()))
            .collect()
    }

    pub fn strategy_count(&self, strategy: Strategy) -> usize {
        self.strategies.get(strategy.as_str()).copied().unwrap_or(0)
    }
}

/// Everything a run produced.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub root: PathBuf,
    pub project_type: ProjectType,
    pub batch: IrBatch,
    pub stats: RunStats,
    pub ccm: CcmAnalysisResult,
}

enum FileResult {
    Extracted(Language, Extraction),
    Skipped,
    Failed(FileFailure),
}

/// Runs the analysis of one repository.
pub struct Analyzer {
    root: PathBuf,
    config: Config,
    progress: bool,
}

impl Analyzer {
    pub fn new<P: Into<PathBuf>>(root: P, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            progress: false,
        }
    }

    /// Show a progress bar on stderr during extraction.
    pub fn progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self) -> Result<AnalysisOutcome, AnalyzerError> {
        let root = validate_root(&self.root)?;
        let project_type = ProjectType::detect(&root);
        info!(root = %root.display(), project_type = %project_type, "starting analysis");

        let walk = Walker::new(&root, &self.config, project_type).walk();
        info!(files = walk.files.len(), ignored = walk.ignored, "collected source files");

        let bar = self.progress_bar(walk.files.len());
        let mut results: Vec<(&SourceFile, FileResult)> = if self.config.parallel {
            walk.files
                .par_iter()
                .map(|file| {
                    let result = analyze_file(file);
                    bar.inc(1);
                    (file, result)
                })
                .collect()
        } else {
            walk.files
                .iter()
                .map(|file| {
                    let result = analyze_file(file);
                    bar.inc(1);
                    (file, result)
                })
                .collect()
        };
        bar.finish_and_clear();
        results.sort_by(|a, b| a.0.relative.cmp(&b.0.relative));

        let mut stats = RunStats {
            project_type: project_type.as_str().to_string(),
            files_ignored: walk.ignored,
            files_failed: walk.failures.len(),
            failures: walk.failures.clone(),
            ..RunStats::default()
        };
        let mut batch = IrBatch::new();
        for (_, result) in results {
            match result {
                FileResult::Extracted(language, extraction) => {
                    stats.record(language, &extraction);
                    batch.push(extraction.ir);
                }
                FileResult::Skipped => stats.files_skipped += 1,
                FileResult::Failed(failure) => {
                    stats.files_failed += 1;
                    stats.failures.push(failure);
                }
            }
        }
        stats.failures.sort_by(|a, b| a.path.cmp(&b.path));
        info!(
            files = stats.total_files,
            functions = stats.total_functions,
            classes = stats.total_classes,
            comments = stats.total_comments,
            skipped = stats.files_skipped,
            failed = stats.files_failed,
            "extraction complete"
        );

        let project = ProjectInfo {
            name: root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| root.display().to_string()),
            root_path: root.display().to_string(),
            project_type: project_type.as_str().to_string(),
            languages: stats.language_list(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            stats: serde_json::to_value(&stats).ok(),
        };
        let ccm = build_ccm(&batch, project);

        Ok(AnalysisOutcome {
            root,
            project_type,
            batch,
            stats,
            ccm,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>4}/{len:4} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("extracting");
        bar
    }
}

/// Check the input root and make it absolute.
fn validate_root(root: &Path) -> Result<PathBuf, AnalyzerError> {
    if !root.exists() {
        return Err(AnalyzerError::InputNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(AnalyzerError::InputNotDirectory(root.to_path_buf()));
    }
    Ok(root.canonicalize().unwrap_or_else(|_| root.to_path_buf()))
}

fn analyze_file(file: &SourceFile) -> FileResult {
    let bytes = match fs::read(&file.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %file.relative, error = %e, "failed to read file");
            return FileResult::Failed(FileFailure::new(file.relative.as_str(), e));
        }
    };
    let content = String::from_utf8_lossy(&bytes);

    match extract_as(&file.path, &file.relative, &content, file.language) {
        Some(extraction) => FileResult::Extracted(file.language, extraction),
        None => FileResult::Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = Analyzer::new(&missing, Config::default()).run().unwrap_err();
        assert!(matches!(err, AnalyzerError::InputNotFound(_)));

        let file = dir.path().join("a.py");
        fs::write(&file, "def a():\n    pass\n").unwrap();
        let err = Analyzer::new(&file, Config::default()).run().unwrap_err();
        assert!(matches!(err, AnalyzerError::InputNotDirectory(_)));
    }

    #[test]
    fn test_empty_repository_completes() {
        let dir = TempDir::new().unwrap();
        let outcome = Analyzer::new(dir.path(), Config::default()).run().unwrap();
        assert!(outcome.batch.is_empty());
        assert_eq!(outcome.stats.total_files, 0);
        assert_eq!(outcome.ccm.metadata.total_nodes, 0);
        assert_eq!(outcome.ccm.metadata.resolution_rate, 0.0);
        assert_eq!(outcome.stats.project_type, "unknown");
    }

    #[test]
    fn test_tiny_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tiny.py"), "x = 1\n").unwrap();
        let outcome = Analyzer::new(dir.path(), Config::default()).run().unwrap();
        assert_eq!(outcome.stats.files_skipped, 1);
        assert_eq!(outcome.stats.total_files, 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_broken_link_is_recorded_as_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.py"), "def good():\n    return 1\n").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.py"), dir.path().join("broken.py"))
            .unwrap();

        let outcome = Analyzer::new(dir.path(), Config::default()).run().unwrap();
        assert_eq!(outcome.stats.total_files, 1);
        assert_eq!(outcome.stats.files_failed, 1);
        assert_eq!(outcome.stats.failures.len(), 1);
        assert_eq!(outcome.stats.failures[0].path, "broken.py");
        assert!(!outcome.stats.failures[0].reason.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_file_is_recorded_as_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locked.py");
        fs::write(&path, "def locked():\n    return 1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can still read the file.
        if fs::read(&path).is_ok() {
            return;
        }

        let outcome = Analyzer::new(dir.path(), Config::default()).run().unwrap();
        assert_eq!(outcome.stats.files_failed, 1);
        assert_eq!(outcome.stats.failures[0].path, "locked.py");
        assert_eq!(outcome.stats.total_files, 0);
    }

    #[test]
    fn test_stats_language_list() {
        let mut stats = RunStats::default();
        stats.languages.insert("rust".to_string(), 1);
        stats.languages.insert("python".to_string(), 2);
        assert_eq!(stats.language_list(), vec![Language::Python, Language::Rust]);
    }
}
