//! Structural extraction: source text in, per-file IR out.
//!
//! Two strategies implement [`StructuralExtractor`]: a grammar-backed walker
//! over tree-sitter trees (behind the `tree-sitter` feature) and a regex
//! fallback. [`extract_file`] picks between them for a single file.

pub mod comments;
#[cfg(feature = "tree-sitter")]
pub mod grammar;
pub mod pattern;
pub mod profile;

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::ir::FileIr;
use crate::language::{classify, Language};

pub use pattern::PatternExtractor;
pub use profile::{profile_for, LanguageProfile};

#[cfg(feature = "tree-sitter")]
pub use grammar::GrammarExtractor;

/// Files with fewer significant characters than this are skipped.
pub const MIN_SIGNIFICANT_CHARS: usize = 10;

/// Which extractor produced a file's IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Grammar,
    Pattern,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Grammar => "grammar",
            Strategy::Pattern => "pattern",
        }
    }
}

/// A structural extractor for one language.
///
/// Implementations must be cheap to construct and hold no per-file state;
/// `extract` may be called from several threads at once.
pub trait StructuralExtractor: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn language(&self) -> Language;

    /// Extract IR from one file.
    ///
    /// `Ok(None)` means the extractor has nothing to offer for this
    /// language. `Err` means the extraction attempt itself failed.
    fn extract(&self, file_path: &str, content: &str) -> anyhow::Result<Option<FileIr>>;
}

/// IR for one file together with the strategy that produced it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub ir: FileIr,
    pub strategy: Strategy,
}

/// Count of non-whitespace characters.
pub fn significant_chars(content: &str) -> usize {
    content.chars().filter(|c| !c.is_whitespace()).count()
}

/// Classify `path` and extract its IR. `None` for unrecognized files.
pub fn extract_file(path: &Path, file_path: &str, content: &str) -> Option<Extraction> {
    let language = classify(path)?;
    extract_as(path, file_path, content, language)
}

/// Extract IR for a file of a known language.
///
/// The grammar pass runs first when a grammar is bound. Its result is kept
/// if it recovered any declaration or import. Otherwise the pattern pass
/// runs and wins if it produced anything; a grammar result with only
/// comments is the last resort. `None` means the file contributes no IR.
pub fn extract_as(
    path: &Path,
    file_path: &str,
    content: &str,
    language: Language,
) -> Option<Extraction> {
    if significant_chars(content) < MIN_SIGNIFICANT_CHARS {
        debug!(path = file_path, "skipping near-empty file");
        return None;
    }

    let grammar_result = match grammar_pass(path, file_path, content, language) {
        Some(ir) if !ir.has_no_declarations() => {
            return Some(Extraction {
                ir,
                strategy: Strategy::Grammar,
            });
        }
        other => other,
    };

    match PatternExtractor::new(language).extract(file_path, content) {
        Ok(Some(ir)) if !ir.has_no_declarations() || grammar_result.is_none() => {
            return Some(Extraction {
                ir,
                strategy: Strategy::Pattern,
            });
        }
        Ok(_) => {}
        Err(e) => {
            debug!(path = file_path, error = %e, "pattern pass failed");
        }
    }

    grammar_result.map(|ir| Extraction {
        ir,
        strategy: Strategy::Grammar,
    })
}

#[cfg(feature = "tree-sitter")]
fn grammar_pass(path: &Path, file_path: &str, content: &str, language: Language) -> Option<FileIr> {
    let extractor = GrammarExtractor::for_path(path, language)?;
    match extractor.extract(file_path, content) {
        Ok(ir) => ir,
        Err(e) => {
            debug!(path = file_path, error = %e, "grammar pass failed, using patterns");
            None
        }
    }
}

#[cfg(not(feature = "tree-sitter"))]
fn grammar_pass(_path: &Path, _file_path: &str, _content: &str, _language: Language) -> Option<FileIr> {
    None
}
