//! Regex fallback extractor.
//!
//! Used for languages without a grammar binding, and for files where the
//! grammar pass failed or recovered nothing. Matches run over the whole file
//! in multi-line mode; declarations carry a line number but no body extent.

use crate::ir::{ClassInfo, FileIr, FunctionInfo, ModuleInfo};
use crate::language::Language;

use super::comments::{scan_comments, shebang};
use super::profile::{profile_for, LanguageProfile};
use super::{Strategy, StructuralExtractor};

pub struct PatternExtractor {
    profile: &'static LanguageProfile,
}

impl PatternExtractor {
    pub fn new(language: Language) -> Self {
        Self {
            profile: profile_for(language),
        }
    }
}

impl StructuralExtractor for PatternExtractor {
    fn strategy(&self) -> Strategy {
        Strategy::Pattern
    }

    fn language(&self) -> Language {
        self.profile.language
    }

    fn extract(&self, file_path: &str, content: &str) -> anyhow::Result<Option<FileIr>> {
        let fallback = &self.profile.fallback;
        if fallback.is_empty() {
            return Ok(None);
        }

        let language = self.profile.language;
        let comments = scan_comments(content, file_path, self.profile);

        let mut functions = Vec::new();
        for regex in &fallback.functions {
            for caps in regex.captures_iter(content) {
                let whole = caps.get(0).map(|m| m.start()).unwrap_or(0);
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or("unknown");
                functions.push(FunctionInfo::new(
                    name,
                    file_path,
                    language,
                    line_at(content, whole),
                ));
            }
        }

        let mut classes = Vec::new();
        for regex in &fallback.classes {
            for caps in regex.captures_iter(content) {
                let whole = caps.get(0).map(|m| m.start()).unwrap_or(0);
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or("unknown");
                classes.push(ClassInfo::new(name, file_path, language, line_at(content, whole)));
            }
        }

        let mut imports = Vec::new();
        for regex in &fallback.imports {
            for m in regex.find_iter(content) {
                imports.push(m.as_str().trim().to_string());
            }
        }

        let module = ModuleInfo {
            name: crate::ir::module_name_for(file_path),
            file_path: file_path.to_string(),
            imports,
            exports: Vec::new(),
            functions: functions.iter().map(|f| f.name.clone()).collect(),
            classes: classes.iter().map(|c| c.name.clone()).collect(),
            language,
            comments,
            docstring: None,
            shebang: shebang(content),
            line_count: content.lines().count(),
        };

        Ok(Some(FileIr {
            functions,
            classes,
            module,
        }))
    }
}

/// 1-indexed line of a byte offset: newlines before it, plus one.
fn line_at(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
        + 1
}
