//! Language classification by file path.
//!
//! Special file names are recognized first (`Dockerfile`, `Makefile`), then
//! the suffix is looked up case-insensitively. Everything downstream keys off
//! the resulting [`Language`] tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A language tag produced by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Kotlin,
    Scala,
    C,
    Cpp,
    Go,
    Rust,
    Swift,
    CSharp,
    Ruby,
    Php,
    Perl,
    Bash,
    Html,
    Css,
    Json,
    Yaml,
    Toml,
    Xml,
    Sql,
    Markdown,
    Dockerfile,
    Makefile,
}

/// Suffix table. Order matters only for compound suffixes, which are checked
/// before the plain extension.
const SUFFIXES: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("pyi", Language::Python),
    ("js", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("java", Language::Java),
    ("kt", Language::Kotlin),
    ("scala", Language::Scala),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("cxx", Language::Cpp),
    ("cc", Language::Cpp),
    ("hpp", Language::Cpp),
    ("hxx", Language::Cpp),
    ("go", Language::Go),
    ("rs", Language::Rust),
    ("swift", Language::Swift),
    ("cs", Language::CSharp),
    ("rb", Language::Ruby),
    ("php", Language::Php),
    ("pl", Language::Perl),
    ("sh", Language::Bash),
    ("bash", Language::Bash),
    ("zsh", Language::Bash),
    ("html", Language::Html),
    ("htm", Language::Html),
    ("css", Language::Css),
    ("scss", Language::Css),
    ("sass", Language::Css),
    ("json", Language::Json),
    ("yaml", Language::Yaml),
    ("yml", Language::Yaml),
    ("toml", Language::Toml),
    ("xml", Language::Xml),
    ("sql", Language::Sql),
    ("dockerfile", Language::Dockerfile),
    ("md", Language::Markdown),
    ("makefile", Language::Makefile),
];

/// Classify a path into a language tag.
///
/// Returns `None` for unrecognized files. Never fails otherwise.
pub fn classify<P: AsRef<Path>>(path: P) -> Option<Language> {
    let path = path.as_ref();
    let file_name = path.file_name()?.to_string_lossy().to_lowercase();

    match file_name.as_str() {
        "dockerfile" => return Some(Language::Dockerfile),
        "makefile" => return Some(Language::Makefile),
        _ => {}
    }

    if file_name.ends_with(".d.ts") {
        return Some(Language::TypeScript);
    }

    let ext = path.extension()?.to_string_lossy().to_lowercase();
    SUFFIXES
        .iter()
        .find(|(suffix, _)| *suffix == ext)
        .map(|(_, lang)| *lang)
}

impl Language {
    /// All language tags, in declaration order.
    pub const ALL: &'static [Language] = &[
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Kotlin,
        Language::Scala,
        Language::C,
        Language::Cpp,
        Language::Go,
        Language::Rust,
        Language::Swift,
        Language::CSharp,
        Language::Ruby,
        Language::Php,
        Language::Perl,
        Language::Bash,
        Language::Html,
        Language::Css,
        Language::Json,
        Language::Yaml,
        Language::Toml,
        Language::Xml,
        Language::Sql,
        Language::Markdown,
        Language::Dockerfile,
        Language::Makefile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Perl => "perl",
            Language::Bash => "bash",
            Language::Html => "html",
            Language::Css => "css",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Xml => "xml",
            Language::Sql => "sql",
            Language::Markdown => "markdown",
            Language::Dockerfile => "dockerfile",
            Language::Makefile => "makefile",
        }
    }

    /// Whether files of this language take part in a repository run.
    ///
    /// Markup and data formats that are classified but never analyzed
    /// (toml, xml, markdown, dockerfile, makefile, perl) return false.
    pub fn is_analyzable(&self) -> bool {
        !matches!(
            self,
            Language::Perl
                | Language::Toml
                | Language::Xml
                | Language::Markdown
                | Language::Dockerfile
                | Language::Makefile
        )
    }

    /// File extensions mapped to this language (without dot).
    pub fn extensions(&self) -> Vec<&'static str> {
        SUFFIXES
            .iter()
            .filter(|(_, lang)| lang == self)
            .map(|(suffix, _)| *suffix)
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Language::ALL
            .iter()
            .find(|lang| lang.as_str() == lower)
            .copied()
            .ok_or_else(|| format!("unknown language: {}", s))
    }
}
