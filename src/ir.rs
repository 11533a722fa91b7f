//! Intermediate representation produced by the structural extractors.
//!
//! IR records are flat and per file. They are created once during extraction
//! and only read afterwards: the CCM builder and the legacy artifact both
//! consume them by reference.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::language::Language;

/// Comment flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Line,
    Block,
    Doc,
}

impl CommentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentKind::Line => "line",
            CommentKind::Block => "block",
            CommentKind::Doc => "doc",
        }
    }
}

/// A single comment found in raw source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentInfo {
    pub content: String,
    /// 1-indexed line of the comment.
    pub line_number: usize,
    pub comment_type: CommentKind,
    pub language: Language,
    pub file_path: String,
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Parameter names in declaration order. Splats keep their `*` prefix.
    pub parameters: Vec<String>,
    pub return_type: Option<String>,
    /// Raw callee text, unresolved.
    pub calls: Vec<String>,
    /// Owning class (or impl/receiver type) when the function is a method.
    pub class_name: Option<String>,
    pub module_name: String,
    pub language: Language,
    pub docstring: Option<String>,
    pub comments: Vec<CommentInfo>,
    pub is_async: bool,
    pub is_static: bool,
    pub visibility: String,
    pub decorators: Vec<String>,
    pub type_annotations: BTreeMap<String, String>,
}

impl FunctionInfo {
    /// Create a function record with every optional field empty.
    pub fn new(name: impl Into<String>, file_path: &str, language: Language, line: usize) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.to_string(),
            start_line: line,
            end_line: line,
            parameters: Vec::new(),
            return_type: None,
            calls: Vec::new(),
            class_name: None,
            module_name: module_name_for(file_path),
            language,
            docstring: None,
            comments: Vec::new(),
            is_async: false,
            is_static: false,
            visibility: "public".to_string(),
            decorators: Vec::new(),
            type_annotations: BTreeMap::new(),
        }
    }

    /// `module.Class.name` for methods, `module.name` otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.class_name {
            Some(class) => format!("{}.{}.{}", self.module_name, class, self.name),
            None => format!("{}.{}", self.module_name, self.name),
        }
    }
}

/// A class-like declaration (class, struct, interface, Go type spec).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassInfo {
    pub name: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub methods: Vec<String>,
    /// Raw parent names as written in the heritage clause.
    pub parent_classes: Vec<String>,
    pub module_name: String,
    pub language: Language,
    pub docstring: Option<String>,
    pub comments: Vec<CommentInfo>,
    pub decorators: Vec<String>,
    pub is_abstract: bool,
    pub is_interface: bool,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, file_path: &str, language: Language, line: usize) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.to_string(),
            start_line: line,
            end_line: line,
            methods: Vec::new(),
            parent_classes: Vec::new(),
            module_name: module_name_for(file_path),
            language,
            docstring: None,
            comments: Vec::new(),
            decorators: Vec::new(),
            is_abstract: false,
            is_interface: false,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module_name, self.name)
    }
}

/// One source file viewed as a module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleInfo {
    /// File stem.
    pub name: String,
    pub file_path: String,
    /// Raw import statements.
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub language: Language,
    pub comments: Vec<CommentInfo>,
    pub docstring: Option<String>,
    /// Interpreter line (`#!...`) on line 1, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shebang: Option<String>,
    pub line_count: usize,
}

/// Everything extracted from one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileIr {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub module: ModuleInfo,
}

impl FileIr {
    /// True when no declarations and no imports were recovered.
    ///
    /// Comments alone do not count: a grammar pass that only produced
    /// comments is treated as having yielded nothing.
    pub fn has_no_declarations(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.module.imports.is_empty()
    }

    /// Number of IR entities (functions, classes, comments and the module).
    pub fn entity_count(&self) -> usize {
        self.functions.len() + self.classes.len() + self.module.comments.len() + 1
    }
}

/// Whole-repository IR, accumulated file by file in path order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IrBatch {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub modules: Vec<ModuleInfo>,
    /// Flattened copy of every module's comments.
    pub comments: Vec<CommentInfo>,
}

impl IrBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file's IR.
    pub fn push(&mut self, ir: FileIr) {
        self.functions.extend(ir.functions);
        self.classes.extend(ir.classes);
        self.comments.extend(ir.module.comments.iter().cloned());
        self.modules.push(ir.module);
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Module name for a file: its stem.
pub fn module_name_for(file_path: &str) -> String {
    Path::new(file_path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
