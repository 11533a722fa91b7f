//! Integration tests for strategy selection in structural extraction.

use std::path::Path;

use ccm_analyzer::{extract_file, CommentInfo, Strategy};
use ccm_analyzer::ir::CommentKind;

fn extract(name: &str, source: &str) -> Option<ccm_analyzer::Extraction> {
    extract_file(Path::new(name), name, source)
}

fn comment_texts(comments: &[CommentInfo]) -> Vec<&str> {
    comments.iter().map(|c| c.content.as_str()).collect()
}

// =============================================================================
// Pattern-only languages
// =============================================================================

#[test]
fn test_kotlin_uses_patterns() {
    let source = r#"
import kotlin.math.max

// Tracks totals.
class Counter {
    fun increment(by: Int): Int {
        return max(by, 1)
    }
}
"#;
    let extraction = extract("Counter.kt", source).expect("kotlin has fallback patterns");
    assert_eq!(extraction.strategy, Strategy::Pattern);

    let ir = extraction.ir;
    assert_eq!(ir.classes[0].name, "Counter");
    assert_eq!(ir.functions[0].name, "increment");
    assert_eq!(ir.functions[0].start_line, 6);
    assert_eq!(ir.module.imports, vec!["import kotlin.math.max".to_string()]);
    assert_eq!(comment_texts(&ir.module.comments), vec!["Tracks totals."]);
}

#[test]
fn test_markup_without_extractor_is_skipped() {
    let source = "<html><body><!-- banner --><h1>Hello there</h1></body></html>\n";
    assert!(extract("index.html", source).is_none());
}

#[test]
fn test_unclassified_file_is_skipped() {
    assert!(extract("notes.txt", "some notes that are long enough").is_none());
}

// =============================================================================
// Grammar-backed languages
// =============================================================================

#[test]
#[cfg(feature = "tree-sitter")]
fn test_python_prefers_grammar() {
    let source = r#"
import os


class Cache:
    """Keeps recent values."""

    def get_value(self, key: str) -> str:
        return self.load(key)
"#;
    let extraction = extract("cache.py", source).unwrap();
    assert_eq!(extraction.strategy, Strategy::Grammar);

    let ir = extraction.ir;
    let class = &ir.classes[0];
    assert_eq!(class.name, "Cache");
    assert_eq!(class.docstring.as_deref(), Some("Keeps recent values."));
    assert_eq!(class.methods, vec!["get_value".to_string()]);

    let method = &ir.functions[0];
    assert_eq!(method.class_name.as_deref(), Some("Cache"));
    assert_eq!(method.return_type.as_deref(), Some("str"));
    assert_eq!(method.type_annotations.get("key").map(String::as_str), Some("str"));
    assert_eq!(method.calls, vec!["self.load".to_string()]);
    assert_eq!(ir.module.imports, vec!["import os".to_string()]);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_comment_only_file_keeps_grammar_result() {
    // Neither strategy finds declarations; the grammar result with its
    // comments is kept.
    let source = "# Settings loaded at import time.\nVALUE = compute_value()\n";
    let extraction = extract("values.py", source).unwrap();
    assert_eq!(extraction.strategy, Strategy::Grammar);
    assert!(extraction.ir.functions.is_empty());
    assert_eq!(extraction.ir.module.comments[0].comment_type, CommentKind::Line);
}

#[test]
#[cfg(not(feature = "tree-sitter"))]
fn test_python_without_grammars_uses_patterns() {
    let source = "import os\n\n\ndef main():\n    return os.getcwd()\n";
    let extraction = extract("main.py", source).unwrap();
    assert_eq!(extraction.strategy, Strategy::Pattern);
    assert_eq!(extraction.ir.functions[0].name, "main");
}
