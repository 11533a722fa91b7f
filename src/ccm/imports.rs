//! Import statement reduction.
//!
//! An import statement is stripped down to the first segment of the module
//! it references, which is then looked up like any other name.

use lazy_static::lazy_static;
use regex::Regex;

/// Leading path segments that refer to the current crate or module.
const SELF_SEGMENTS: &[&str] = &["crate", "self", "super", "static"];

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r#"["'`<]([^"'`<>]+)["'`>]"#).unwrap();
    static ref IDENT: Regex = Regex::new(r"^[A-Za-z_$][\w$-]*$").unwrap();
}

/// Reduce an import statement to the name it targets.
///
/// Returns `None` when nothing name-like remains (`from . import x`,
/// `use super::*`).
pub fn import_target(statement: &str) -> Option<String> {
    let stmt = statement.trim();

    // Path-based imports: JS/TS, Go, C/C++ includes, Ruby/PHP requires.
    if let Some(caps) = QUOTED.captures(stmt) {
        let path = caps.get(1)?.as_str().trim_end_matches('/');
        let last = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let stem = last.split('.').next().unwrap_or(last);
        return valid(stem);
    }

    let reference = if let Some(rest) = stmt.strip_prefix("from ") {
        rest.split(" import ").next().unwrap_or(rest)
    } else {
        let mut rest = stmt;
        for keyword in ["pub ", "import ", "use ", "using ", "static "] {
            rest = rest.strip_prefix(keyword).unwrap_or(rest).trim_start();
        }
        rest
    };

    let reference = reference
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';' || c == '{')
        .next()
        .unwrap_or("")
        .trim_start_matches('.');

    reference
        .split(['.', ':', '\\', '/'])
        .filter(|s| !s.is_empty())
        .find(|s| !SELF_SEGMENTS.contains(s))
        .and_then(valid)
}

fn valid(segment: &str) -> Option<String> {
    IDENT.is_match(segment).then(|| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_imports() {
        assert_eq!(import_target("import os").as_deref(), Some("os"));
        assert_eq!(import_target("import a.b as c").as_deref(), Some("a"));
        assert_eq!(import_target("import os, sys").as_deref(), Some("os"));
        assert_eq!(import_target("from a.b import c").as_deref(), Some("a"));
        assert_eq!(import_target("from .utils import helper").as_deref(), Some("utils"));
        assert_eq!(import_target("from . import helper"), None);
    }

    #[test]
    fn test_dotted_references() {
        assert_eq!(import_target("import java.util.List;").as_deref(), Some("java"));
        assert_eq!(import_target("import static org.junit.Assert.*;").as_deref(), Some("org"));
        assert_eq!(import_target("using System.Text;").as_deref(), Some("System"));
        assert_eq!(import_target("import UIKit").as_deref(), Some("UIKit"));
    }

    #[test]
    fn test_rust_use() {
        assert_eq!(import_target("use std::collections::HashMap;").as_deref(), Some("std"));
        assert_eq!(import_target("use crate::utils::helper;").as_deref(), Some("utils"));
        assert_eq!(import_target("pub use self::model::Node;").as_deref(), Some("model"));
        assert_eq!(import_target("use super::*;"), None);
        assert_eq!(import_target("use serde::{Deserialize, Serialize};").as_deref(), Some("serde"));
    }

    #[test]
    fn test_quoted_paths() {
        assert_eq!(
            import_target("import { helper } from './lib/helper.js';").as_deref(),
            Some("helper")
        );
        assert_eq!(import_target("\"github.com/acme/store\"").as_deref(), Some("store"));
        assert_eq!(import_target("#include <stdio.h>").as_deref(), Some("stdio"));
        assert_eq!(import_target("require 'json'").as_deref(), Some("json"));
        assert_eq!(import_target("import './styles.css';").as_deref(), Some("styles"));
    }

    #[test]
    fn test_php_namespace() {
        assert_eq!(import_target("use App\\Models\\User;").as_deref(), Some("App"));
    }
}
