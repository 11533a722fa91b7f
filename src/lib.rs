//! ccm-analyzer - multi-language repository analyzer.
//!
//! Walks a source tree, extracts a flat intermediate representation of
//! every file (functions, classes, imports, comments), and links it into a
//! Canonical Code Model: a graph of modules, classes, functions and
//! comments joined by containment and by import, inheritance and call
//! relationships.
//!
//! # Architecture
//!
//! - `language`: file classification
//! - `extract`: per-language profiles, the tree-sitter extractor and the
//!   regex fallback
//! - `ir`: the per-file intermediate representation
//! - `ccm`: graph model, symbol table and the two-phase builder
//! - `walker` / `pipeline`: file discovery and the run itself
//! - `output`: JSON artifacts and the terminal summary
//!
//! # Adding a New Language
//!
//! Add a variant to `Language`, describe its syntax in a `LanguageProfile`
//! in `extract/profile.rs`, and bind a grammar in `extract/grammar.rs` if a
//! tree-sitter crate exists for it. Without a grammar the profile's
//! fallback patterns are used.

pub mod ccm;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod ir;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod walker;

pub use ccm::{build_ccm, CcmAnalysisResult, CcmNode, NodeType, ProjectInfo, Relationship, RelationshipType};
pub use config::Config;
pub use error::{AnalyzerError, FileFailure};
pub use extract::{extract_file, Extraction, Strategy, StructuralExtractor};
pub use ir::{ClassInfo, CommentInfo, FileIr, FunctionInfo, IrBatch, ModuleInfo};
pub use language::{classify, Language};
pub use pipeline::{AnalysisOutcome, Analyzer, RunStats};

/// Initialize shared state.
///
/// Compiles every language profile up front. Optional; profiles are built
/// on first use otherwise.
pub fn init() {
    for language in Language::ALL {
        extract::profile_for(*language);
    }
}
