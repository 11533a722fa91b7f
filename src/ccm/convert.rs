//! IR attribute conversion: visibility, modifiers, types, parameters and
//! documentation.

use std::collections::BTreeMap;

use crate::extract::profile_for;
use crate::ir::{ClassInfo, CommentInfo, CommentKind, FunctionInfo};
use crate::language::Language;

use super::model::{Documentation, Modifier, Parameter, TypeInfo, Visibility};

const ARRAY_MARKERS: &[&str] = &["[]", "List[", "Array<", "Vec<", "list[", "array["];
const NULLABLE_MARKERS: &[&str] = &["?", "Optional[", "Maybe<", "Option<"];
const WRAPPER_MARKERS: &[&str] = &[
    "[]", "?", "Optional[", "List[", "Array<", "Vec<", "Maybe<", "Option<", "list[", "array[",
];

/// Map an IR visibility string. Unknown values are public.
pub fn visibility(text: &str) -> Visibility {
    match text.to_lowercase().as_str() {
        "private" => Visibility::Private,
        "protected" => Visibility::Protected,
        "internal" => Visibility::Internal,
        "package" => Visibility::Package,
        _ => Visibility::Public,
    }
}

fn push_unique(modifiers: &mut Vec<Modifier>, modifier: Modifier) {
    if !modifiers.contains(&modifier) {
        modifiers.push(modifier);
    }
}

pub fn function_modifiers(func: &FunctionInfo) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    if func.is_static {
        push_unique(&mut modifiers, Modifier::Static);
    }
    if func.is_async {
        push_unique(&mut modifiers, Modifier::Async);
    }
    for decorator in &func.decorators {
        let lower = decorator.to_lowercase();
        if lower.contains("abstract") {
            push_unique(&mut modifiers, Modifier::Abstract);
        } else if lower.contains("static") {
            push_unique(&mut modifiers, Modifier::Static);
        } else if lower.contains("override") {
            push_unique(&mut modifiers, Modifier::Override);
        }
    }
    modifiers
}

pub fn class_modifiers(class: &ClassInfo) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    if class.is_abstract {
        push_unique(&mut modifiers, Modifier::Abstract);
    }
    for decorator in &class.decorators {
        let lower = decorator.to_lowercase();
        if lower.contains("abstract") {
            push_unique(&mut modifiers, Modifier::Abstract);
        } else if lower.contains("final") {
            push_unique(&mut modifiers, Modifier::Final);
        }
    }
    modifiers
}

/// Parse raw type text into a [`TypeInfo`]. Blank text yields `None`.
pub fn type_info(text: &str, language: Language) -> Option<TypeInfo> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let is_array = ARRAY_MARKERS.iter().any(|m| text.contains(m));
    let is_nullable = NULLABLE_MARKERS.iter().any(|m| text.contains(m));

    let mut name = text.to_string();
    for marker in WRAPPER_MARKERS {
        name = name.replace(marker, "");
    }
    let name = name.replace([']', '>'], "").trim().to_string();

    Some(TypeInfo {
        is_primitive: profile_for(language).is_primitive(&name),
        name,
        is_array,
        is_nullable,
        generic_parameters: generic_arguments(text),
    })
}

/// Top-level arguments of the first `<...>` or `[...]` group, so
/// `HashMap<String, Vec<u8>>` gives `String` and `Vec<u8>`.
fn generic_arguments(text: &str) -> Option<Vec<String>> {
    let open = text.find(['<', '['])?;
    let mut depth = 0usize;
    let mut args = Vec::new();
    let mut current = String::new();

    for c in text[open + 1..].chars() {
        match c {
            '<' | '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            '>' | ']' | ')' if depth == 0 => break,
            '>' | ']' | ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => args.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    args.push(current);

    let args: Vec<String> = args
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    (!args.is_empty()).then_some(args)
}

/// Convert parameter texts, joining type annotations by name.
pub fn parameters(
    names: &[String],
    annotations: &BTreeMap<String, String>,
    language: Language,
) -> Vec<Parameter> {
    names
        .iter()
        .map(|raw| {
            let (name, default_value) = match raw.split_once('=') {
                Some((name, default)) => (name.trim(), Some(default.trim().to_string())),
                None => (raw.trim(), None),
            };
            let marked_optional = name.ends_with('?');
            let name = name.trim_end_matches('?');
            let is_variadic = name.starts_with('*') || name.starts_with("...");
            let name = name.trim_start_matches(['*', '.']);

            Parameter {
                name: name.to_string(),
                type_info: annotations
                    .get(name)
                    .and_then(|t| type_info(t, language)),
                is_optional: marked_optional || default_value.is_some(),
                default_value,
                is_variadic,
            }
        })
        .collect()
}

/// Documentation from a docstring and attached comments.
///
/// The summary is the docstring's first line and the description the rest;
/// without a docstring body, attached non-doc comments form the description.
pub fn documentation(docstring: Option<&str>, comments: &[CommentInfo]) -> Option<Documentation> {
    if docstring.is_none() && comments.is_empty() {
        return None;
    }

    let mut doc = Documentation::default();
    if let Some(text) = docstring {
        let mut lines = text.trim().lines();
        doc.summary = lines.next().map(|l| l.trim().to_string());
        let rest = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        if !rest.is_empty() {
            doc.description = Some(rest);
        }
    }

    if doc.description.is_none() {
        let text: Vec<&str> = comments
            .iter()
            .map(|c| c.content.as_str())
            .collect();
        if !text.is_empty() {
            doc.description = Some(text.join("\n"));
        }
    }

    // Doc comments stand in for a missing docstring summary.
    if doc.summary.is_none() {
        doc.summary = comments
            .iter()
            .find(|c| c.comment_type == CommentKind::Doc)
            .map(|c| c.content.clone());
    }

    Some(doc)
}
