//! Repository walking: project-type detection and source file discovery.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{Config, PathMatcher};
use crate::error::FileFailure;
use crate::language::{classify, Language};

/// Directories never descended into.
const IGNORED_DIRS: &[&str] = &[
    // Version control
    ".git", ".svn", ".hg",
    // Dependencies
    "node_modules", "bower_components", "site-packages",
    // Python environments and caches
    "__pycache__", ".pytest_cache", "venv", "env", ".venv", ".tox", ".coverage", "htmlcov",
    // Build output
    "dist", "build", ".next", "out", "target", "bin", "obj",
    // Editors
    ".vscode", ".idea", ".vs", ".eclipse",
    // Scratch, logs and caches
    "tmp", "temp", ".tmp", "logs", "log", ".cache", "coverage", ".nyc_output",
    // Mobile shells and deploy tooling
    "ios", "android", ".expo", ".terraform", ".serverless",
];

/// Directories that only hold tests.
const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "__test__", "spec", "testdata", "test_data"];

/// File names skipped regardless of project type (compared lowercased).
const IGNORED_NAMES: &[&str] = &[
    ".env", ".env.local", ".env.development", ".env.production", ".gitignore",
    ".gitattributes", ".editorconfig", ".dockerignore", "dockerfile", "docker-compose.yml",
    "docker-compose.yaml", "readme.md", "license", "changelog.md", "contributing.md",
    "package.json", "package-lock.json", "yarn.lock", "pnpm-lock.yaml", "requirements.txt",
    "pipfile", "pipfile.lock", "poetry.lock", "composer.json", "composer.lock", "gemfile",
    "gemfile.lock", "tsconfig.json", "jsconfig.json", "ccm.yaml", ".ccm.yaml",
];

/// Generated or bundled artifacts.
const IGNORED_SUFFIXES: &[&str] = &[
    ".min.js", ".min.css", ".bundle.js", ".bundle.css", ".d.ts", ".map", ".backup", ".swp",
    ".tmp",
];

/// Tool configuration files, matched against the lowercased stem.
const CONFIG_MARKERS: &[&str] = &[
    "config", "settings", "webpack", "rollup", "vite", "babel", "eslint", "prettier", "jest",
    "cypress", "playwright",
];

/// Build system flavour of the repository, detected from marker files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    NodeJs,
    Python,
    Java,
    Go,
    Rust,
    Php,
    Ruby,
    Unknown,
}

impl ProjectType {
    /// Detect from marker files in `root`. The first match wins.
    pub fn detect(root: &Path) -> Self {
        let has = |name: &str| root.join(name).exists();
        if has("package.json") {
            ProjectType::NodeJs
        } else if has("requirements.txt") || has("setup.py") {
            ProjectType::Python
        } else if has("pom.xml") || has("build.gradle") {
            ProjectType::Java
        } else if has("go.mod") {
            ProjectType::Go
        } else if has("Cargo.toml") {
            ProjectType::Rust
        } else if has("composer.json") {
            ProjectType::Php
        } else if has("Gemfile") {
            ProjectType::Ruby
        } else {
            ProjectType::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::NodeJs => "nodejs",
            ProjectType::Python => "python",
            ProjectType::Java => "java",
            ProjectType::Go => "go",
            ProjectType::Rust => "rust",
            ProjectType::Php => "php",
            ProjectType::Ruby => "ruby",
            ProjectType::Unknown => "unknown",
        }
    }

    /// Extra file names skipped for this project type.
    pub fn ignored_files(&self) -> &'static [&'static str] {
        match self {
            ProjectType::NodeJs => &[
                ".npmrc", ".yarnrc", "babel.config.js", "webpack.config.js", "next.config.js",
                "nuxt.config.js", "vue.config.js",
            ],
            ProjectType::Python => &[
                "setup.py", "setup.cfg", "pyproject.toml", ".flake8", "pytest.ini", "tox.ini",
                ".coveragerc", "mypy.ini",
            ],
            ProjectType::Java => &[
                "pom.xml", "build.gradle", "gradle.properties", "application.properties",
                "application.yml",
            ],
            ProjectType::Go => &["go.mod", "go.sum"],
            ProjectType::Rust => &["cargo.toml", "cargo.lock"],
            ProjectType::Php | ProjectType::Ruby | ProjectType::Unknown => &[],
        }
    }

    /// Extra directories skipped for this project type.
    pub fn ignored_dirs(&self) -> &'static [&'static str] {
        match self {
            ProjectType::Java => &[".gradle"],
            ProjectType::Go | ProjectType::Php => &["vendor"],
            ProjectType::Ruby => &["vendor", "bundle"],
            _ => &[],
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the input root with `/` separators. Used as the IR
    /// file path.
    pub relative: String,
    pub language: Language,
}

#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Sorted by relative path.
    pub files: Vec<SourceFile>,
    /// Files seen but skipped by ignore rules, size or exclusion globs.
    pub ignored: usize,
    /// Source files that could not be visited (broken links, permissions).
    pub failures: Vec<FileFailure>,
}

pub struct Walker<'a> {
    root: &'a Path,
    config: &'a Config,
    project_type: ProjectType,
    matcher: PathMatcher,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, config: &'a Config, project_type: ProjectType) -> Self {
        Self {
            root,
            config,
            project_type,
            matcher: config.exclusion_matcher(),
        }
    }

    /// Collect analyzable source files under the root.
    pub fn walk(&self) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        let entries = WalkDir::new(self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || !self.skip_dir(e.path()));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    if let Some(failure) = self.entry_failure(&e) {
                        outcome.failures.push(failure);
                    }
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(language) = classify(path).filter(Language::is_analyzable) else {
                continue;
            };

            let relative = self.relative(path);
            if self.skip_file(path, &relative, entry.metadata().ok().map(|m| m.len())) {
                debug!(path = %relative, "ignored");
                outcome.ignored += 1;
                continue;
            }

            outcome.files.push(SourceFile {
                path: path.to_path_buf(),
                relative,
                language,
            });
        }

        outcome.files.sort_by(|a, b| a.relative.cmp(&b.relative));
        outcome.failures.sort_by(|a, b| a.path.cmp(&b.path));
        outcome
    }

    /// A walk error counts as a file failure when it names a source file the
    /// walk would otherwise have analyzed.
    fn entry_failure(&self, err: &walkdir::Error) -> Option<FileFailure> {
        let path = err.path()?;
        classify(path).filter(Language::is_analyzable)?;
        let relative = self.relative(path);
        if self.skip_file(path, &relative, None) {
            return None;
        }
        Some(FileFailure::new(relative, err))
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn skip_dir(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = name.as_str();
        if name.starts_with('.') || IGNORED_DIRS.contains(&name) {
            return true;
        }
        if self.project_type.ignored_dirs().contains(&name)
            || self.config.extra_ignore_dirs.iter().any(|d| d == name)
        {
            return true;
        }
        if !self.config.include_test_files && TEST_DIRS.contains(&name) {
            return true;
        }
        let relative = self.relative(path);
        self.matcher.is_excluded(Path::new(&relative))
    }

    fn skip_file(&self, path: &Path, relative: &str, size: Option<u64>) -> bool {
        if should_ignore_file(path, self.project_type, self.config.include_test_files) {
            return true;
        }
        if size.is_some_and(|s| s > self.config.max_file_bytes) {
            return true;
        }
        self.matcher.is_excluded(Path::new(relative))
    }
}

/// Name-based ignore rules for a single file.
pub fn should_ignore_file(path: &Path, project_type: ProjectType, include_tests: bool) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or(&name);

    if IGNORED_NAMES.contains(&name.as_str()) || project_type.ignored_files().contains(&name.as_str()) {
        return true;
    }
    if IGNORED_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return true;
    }
    if CONFIG_MARKERS.iter().any(|m| stem.contains(m)) || (name.starts_with('.') && name.ends_with("rc")) {
        return true;
    }
    if !include_tests && is_test_file(&name, stem) {
        return true;
    }
    name.starts_with('.')
}

/// Test-file naming conventions across the supported languages.
pub fn is_test_file(name: &str, stem: &str) -> bool {
    name.contains(".test.")
        || name.contains(".spec.")
        || stem == "conftest"
        || stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem.ends_with("_spec")
        || (stem.ends_with("test") && stem.len() > 4 && !stem.ends_with("latest"))
}
