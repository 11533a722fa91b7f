//! Grammar-backed extraction over tree-sitter parse trees.
//!
//! One walker serves every bound language: node kinds and field names come
//! from the [`LanguageProfile`], so the traversal itself has no per-language
//! branches. The walk is iterative and carries the enclosing class name;
//! entering a function clears it, so nested functions are never methods.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::anyhow;
use tree_sitter::{Node, Parser, Tree};

use crate::ir::{module_name_for, ClassInfo, CommentInfo, FileIr, FunctionInfo, ModuleInfo};
use crate::language::Language;

use super::comments::{leading_comments, scan_comments, shebang};
use super::profile::{profile_for, LanguageProfile, VisibilityRule};
use super::{Strategy, StructuralExtractor};

/// Keyword tokens that act as modifiers when they appear as direct children.
const MODIFIER_KEYWORDS: &[&str] = &[
    "static", "async", "abstract", "public", "private", "protected", "internal", "final",
    "override", "readonly", "virtual", "const",
];

const VISIBILITY_WORDS: &[&str] = &["public", "private", "protected", "internal"];

/// Composite names taken whole in heritage clauses (`abc.ABC`, `React.Component`).
const QUALIFIED_NAME_KINDS: &[&str] = &[
    "attribute",
    "member_expression",
    "scoped_identifier",
    "scoped_type_identifier",
    "nested_identifier",
    "nested_type_identifier",
    "qualified_identifier",
];

/// Never descended into when collecting parent names.
const HERITAGE_SKIP_KINDS: &[&str] = &[
    "keyword_argument",
    "type_arguments",
    "type_parameters",
    "arguments",
    "comment",
    "access_specifier",
];

/// Fields holding a parameter's default value across grammars.
const DEFAULT_VALUE_FIELDS: &[&str] = &["value", "right", "default_value"];

/// Parameters whose spelling carries meaning (`*args`, `...rest`).
const SPREAD_KINDS: &[&str] = &[
    "list_splat_pattern",
    "dictionary_splat_pattern",
    "rest_pattern",
    "variadic_parameter",
];

const MAX_NAME_DEPTH: usize = 6;

/// Grammar for a language, if one is bound. `.tsx` files use the TSX dialect.
pub fn grammar_for(language: Language, path: &Path) -> Option<tree_sitter::Language> {
    let grammar: tree_sitter::Language = match language {
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => {
            let tsx = path
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("tsx"));
            if tsx {
                tree_sitter_typescript::LANGUAGE_TSX.into()
            } else {
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
            }
        }
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::C => tree_sitter_c::LANGUAGE.into(),
        Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        Language::Go => tree_sitter_go::LANGUAGE.into(),
        Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        Language::Scala => tree_sitter_scala::LANGUAGE.into(),
        Language::Swift => tree_sitter_swift::LANGUAGE.into(),
        _ => return None,
    };
    Some(grammar)
}

pub struct GrammarExtractor {
    grammar: tree_sitter::Language,
    profile: &'static LanguageProfile,
}

impl GrammarExtractor {
    /// Extractor for `language`, or `None` when no grammar is bound.
    pub fn for_path(path: &Path, language: Language) -> Option<Self> {
        Some(Self {
            grammar: grammar_for(language, path)?,
            profile: profile_for(language),
        })
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.grammar)?;
        Ok(parser)
    }

    fn parse(&self, content: &str) -> anyhow::Result<Tree> {
        let mut parser = self.create_parser()?;
        parser
            .parse(content, None)
            .ok_or_else(|| anyhow!("parser produced no tree"))
    }
}

impl StructuralExtractor for GrammarExtractor {
    fn strategy(&self) -> Strategy {
        Strategy::Grammar
    }

    fn language(&self) -> Language {
        self.profile.language
    }

    fn extract(&self, file_path: &str, content: &str) -> anyhow::Result<Option<FileIr>> {
        let tree = self.parse(content)?;
        let root = tree.root_node();
        let comments = scan_comments(content, file_path, self.profile);

        let mut walk = Walk {
            profile: self.profile,
            source: content.as_bytes(),
            file_path,
            comments: &comments,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            impl_traits: Vec::new(),
        };
        walk.run(root);

        let docstring = walk.leading_string(root);
        let Walk {
            functions,
            mut classes,
            imports,
            exports,
            impl_traits,
            ..
        } = walk;

        attach_detached_members(&mut classes, &functions, &impl_traits);

        let module = ModuleInfo {
            name: module_name_for(file_path),
            file_path: file_path.to_string(),
            imports,
            exports,
            functions: functions.iter().map(|f| f.name.clone()).collect(),
            classes: classes.iter().map(|c| c.name.clone()).collect(),
            language: self.profile.language,
            comments,
            docstring,
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

/// Methods declared outside their type (Go receivers, Rust impls) and
/// implemented traits are folded back into the class records.
fn attach_detached_members(
    classes: &mut [ClassInfo],
    functions: &[FunctionInfo],
    impl_traits: &[(String, String)],
) {
    for class in classes.iter_mut() {
        for func in functions {
            if func.class_name.as_deref() == Some(class.name.as_str())
                && !class.methods.contains(&func.name)
            {
                class.methods.push(func.name.clone());
            }
        }
        for (ty, trait_name) in impl_traits {
            if *ty == class.name && !class.parent_classes.contains(trait_name) {
                class.parent_classes.push(trait_name.clone());
            }
        }
    }
}

/// Reduce a type expression to its bare name: `*pkg.Server[T]` -> `Server`.
fn bare_type_name(text: &str) -> String {
    let trimmed = text
        .trim()
        .trim_start_matches(|c: char| c == '&' || c == '*')
        .trim_start_matches("mut ")
        .trim();
    let head = trimmed
        .split(|c: char| c == '<' || c == '[' || c == '(')
        .next()
        .unwrap_or("")
        .trim();
    let last = head.rsplit("::").next().unwrap_or(head);
    last.rsplit('.').next().unwrap_or(last).to_string()
}

/// Strip annotation punctuation: `: string` -> `string`, `-> i32` -> `i32`.
fn clean_type(text: &str) -> String {
    let t = text.trim();
    let t = t.strip_prefix("->").unwrap_or(t);
    let t = t.strip_prefix(':').unwrap_or(t);
    t.trim().to_string()
}

/// Unquote a string literal, including prefixed and triple-quoted forms.
fn unquote(text: &str) -> String {
    let t = text
        .trim()
        .trim_start_matches(|c: char| "rRbBuUfF".contains(c));
    for quote in ["\"\"\"", "'''", "\"", "'", "`"] {
        if let Some(inner) = t.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return inner.trim().to_string();
        }
    }
    t.to_string()
}

struct Walk<'a> {
    profile: &'static LanguageProfile,
    source: &'a [u8],
    file_path: &'a str,
    comments: &'a [CommentInfo],
    functions: Vec<FunctionInfo>,
    classes: Vec<ClassInfo>,
    imports: Vec<String>,
    exports: Vec<String>,
    /// (implementing type, trait) pairs from impl blocks.
    impl_traits: Vec<(String, String)>,
}

impl<'a> Walk<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn run(&mut self, root: Node) {
        let profile = self.profile;
        let mut stack: Vec<(Node, Option<String>)> = vec![(root, None)];

        while let Some((node, class_ctx)) = stack.pop() {
            let kind = node.kind();
            let mut child_ctx = class_ctx.clone();

            if profile.is_function(kind) {
                let info = self.function_info(node, class_ctx.as_deref());
                self.functions.push(info);
                child_ctx = None;
            } else if profile.is_class(kind) && self.counts_as_class(node) {
                if let Some(info) = self.class_info(node) {
                    child_ctx = Some(info.name.clone());
                    self.classes.push(info);
                }
            } else if profile.impl_kinds.contains(&kind) {
                if let Some(ty) = node.child_by_field_name("type") {
                    let ty = bare_type_name(self.text(ty));
                    if let Some(trait_node) = node.child_by_field_name("trait") {
                        let trait_name = bare_type_name(self.text(trait_node));
                        self.impl_traits.push((ty.clone(), trait_name));
                    }
                    child_ctx = Some(ty);
                }
            } else if profile.is_import(kind) {
                self.imports.push(self.text(node).trim().to_string());
            } else if profile.export_kinds.contains(&kind) {
                let names = self.export_names(node);
                self.exports.extend(names);
            }

            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, child_ctx.clone()));
            }
        }
    }

    fn counts_as_class(&self, node: Node) -> bool {
        if self.profile.class_requires_body && node.child_by_field_name("body").is_none() {
            return false;
        }
        if self.profile.class_type_kinds.is_empty() {
            return true;
        }
        node.child_by_field_name("type")
            .map_or(false, |t| self.profile.class_type_kinds.contains(&t.kind()))
    }

    /// Name reached through the profile's name fields, descending through
    /// declarators until an identifier-kind node is found.
    fn declared_name(&self, node: Node, depth: usize) -> Option<String> {
        if depth > MAX_NAME_DEPTH {
            return None;
        }
        if self.profile.is_identifier(node.kind()) {
            return Some(self.text(node).to_string());
        }
        for field in self.profile.name_fields {
            if let Some(child) = node.child_by_field_name(*field) {
                if let Some(name) = self.declared_name(child, depth + 1) {
                    return Some(name);
                }
            }
        }
        let mut cursor = node.walk();
        let ident = node
            .named_children(&mut cursor)
            .find(|c| self.profile.is_identifier(c.kind()));
        ident.map(|c| self.text(c).to_string())
    }

    fn entity_name(&self, node: Node) -> Option<String> {
        for field in self.profile.name_fields {
            if let Some(child) = node.child_by_field_name(*field) {
                if let Some(name) = self.declared_name(child, 1) {
                    return Some(name);
                }
            }
        }

        // A lone arrow-function parameter is not a name.
        let param = node.child_by_field_name("parameter").map(|p| p.id());
        let mut cursor = node.walk();
        let ident = node
            .named_children(&mut cursor)
            .find(|c| self.profile.is_identifier(c.kind()) && Some(c.id()) != param);
        if let Some(ident) = ident {
            return Some(self.text(ident).to_string());
        }

        let kind = node.kind();
        if let Some((_, name)) = self.profile.implicit_names.iter().find(|(k, _)| *k == kind) {
            return Some(name.to_string());
        }

        let parent = node.parent()?;
        if self.profile.name_parent_kinds.contains(&parent.kind()) {
            for field in ["name", "key", "left"] {
                if let Some(child) = parent.child_by_field_name(field) {
                    if let Some(name) = self.declared_name(child, 1) {
                        return Some(name);
                    }
                }
            }
        }
        None
    }

    /// Line used to find leading comments: the decorator wrapper's when present.
    fn anchor_line(&self, node: Node) -> usize {
        let anchor = node
            .parent()
            .filter(|p| self.profile.decorator_wrapper_kinds.contains(&p.kind()))
            .unwrap_or(node);
        anchor.start_position().row + 1
    }

    fn function_info(&self, node: Node, class_ctx: Option<&str>) -> FunctionInfo {
        let profile = self.profile;
        let mut name = self
            .entity_name(node)
            .unwrap_or_else(|| "anonymous".to_string());
        let mut class_name = class_ctx.map(str::to_string);

        // Out-of-line definitions: `void Dog::bark() {}`.
        if let Some((owner, last)) = name.rsplit_once("::") {
            if class_name.is_none() && !owner.is_empty() {
                class_name = Some(bare_type_name(owner));
            }
            name = last.to_string();
        }
        if class_name.is_none() {
            if let Some(receiver) = profile.receiver_field.and_then(|f| node.child_by_field_name(f)) {
                class_name = self.receiver_type(receiver);
            }
        }

        let mut info = FunctionInfo::new(
            name,
            self.file_path,
            profile.language,
            node.start_position().row + 1,
        );
        info.end_line = node.end_position().row + 1;
        info.class_name = class_name;

        let (parameters, annotations) = self.parameters(node);
        info.parameters = parameters;
        info.type_annotations = annotations;
        info.return_type = self.return_type(node);
        info.calls = self.calls(node);

        let modifiers = self.modifier_words(node);
        info.decorators = self.decorators(node);
        info.is_async = self.has_child_kind(node, "async") || modifiers.iter().any(|m| m == "async");
        info.is_static = modifiers.iter().any(|m| m == "static")
            || info.decorators.iter().any(|d| d.contains("staticmethod"));
        info.visibility = self.visibility(&info.name, &modifiers);
        info.docstring = self.docstring(node);
        info.comments = leading_comments(self.comments, self.anchor_line(node));
        info
    }

    fn class_info(&self, node: Node) -> Option<ClassInfo> {
        let profile = self.profile;
        let name = self.entity_name(node)?;
        let kind = node.kind();

        let mut info = ClassInfo::new(
            name,
            self.file_path,
            profile.language,
            node.start_position().row + 1,
        );
        info.end_line = node.end_position().row + 1;
        info.methods = self.member_names(node);
        info.parent_classes = self.heritage(node);
        info.decorators = self.decorators(node);
        info.is_interface = profile.interface_kinds.contains(&kind)
            || node
                .child_by_field_name("type")
                .map_or(false, |t| t.kind() == "interface_type");

        let modifiers = self.modifier_words(node);
        info.is_abstract = kind.contains("abstract")
            || modifiers.iter().any(|m| m == "abstract")
            || info.parent_classes.iter().any(|p| p == "ABC" || p == "abc.ABC");
        info.docstring = self.docstring(node);
        info.comments = leading_comments(self.comments, self.anchor_line(node));
        Some(info)
    }

    fn member_names(&self, node: Node) -> Vec<String> {
        let profile = self.profile;
        let container = node
            .child_by_field_name("body")
            .or_else(|| node.child_by_field_name("type"))
            .unwrap_or(node);

        let mut cursor = container.walk();
        let members: Vec<Node> = container.named_children(&mut cursor).collect();

        let mut names = Vec::new();
        for child in members {
            let member = if profile.decorator_wrapper_kinds.contains(&child.kind()) {
                child.child_by_field_name("definition").unwrap_or(child)
            } else {
                child
            };
            if profile.method_kinds.contains(&member.kind()) {
                names.push(
                    self.entity_name(member)
                        .unwrap_or_else(|| "anonymous".to_string()),
                );
            }
        }
        names
    }

    fn heritage(&self, node: Node) -> Vec<String> {
        let profile = self.profile;
        let mut roots = Vec::new();
        for field in profile.heritage_fields {
            if let Some(h) = node.child_by_field_name(*field) {
                roots.push(h);
            }
        }
        let mut cursor = node.walk();
        roots.extend(
            node.named_children(&mut cursor)
                .filter(|c| profile.heritage_kinds.contains(&c.kind())),
        );

        let mut parents = Vec::new();
        for root in roots {
            self.collect_type_names(root, &mut parents, 0);
        }
        let mut seen = std::collections::HashSet::new();
        parents.retain(|p| seen.insert(p.clone()));
        parents
    }

    fn collect_type_names(&self, node: Node, out: &mut Vec<String>, depth: usize) {
        if depth > MAX_NAME_DEPTH {
            return;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            let kind = child.kind();
            if HERITAGE_SKIP_KINDS.contains(&kind) {
                continue;
            }
            if self.profile.is_identifier(kind) || QUALIFIED_NAME_KINDS.contains(&kind) {
                out.push(self.text(child).trim().to_string());
            } else {
                self.collect_type_names(child, out, depth + 1);
            }
        }
    }

    fn receiver_type(&self, receiver: Node) -> Option<String> {
        let mut cursor = receiver.walk();
        let param = receiver.named_children(&mut cursor).next()?;
        let ty = param.child_by_field_name("type").unwrap_or(param);
        let name = bare_type_name(self.text(ty));
        (!name.is_empty()).then_some(name)
    }

    fn parameter_holder<'t>(&self, node: Node<'t>, depth: usize) -> Option<Node<'t>> {
        for field in self.profile.parameter_fields {
            if let Some(holder) = node.child_by_field_name(*field) {
                return Some(holder);
            }
        }
        if depth < MAX_NAME_DEPTH {
            if let Some(declarator) = node.child_by_field_name("declarator") {
                return self.parameter_holder(declarator, depth + 1);
            }
        }
        None
    }

    fn parameters(&self, node: Node) -> (Vec<String>, BTreeMap<String, String>) {
        let profile = self.profile;
        let items: Vec<Node> = if let Some(single) = node.child_by_field_name("parameter") {
            vec![single]
        } else if let Some(holder) = self.parameter_holder(node, 0) {
            let mut cursor = holder.walk();
            let items: Vec<Node> = holder.named_children(&mut cursor).collect();
            items
        } else {
            let mut cursor = node.walk();
            let items: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|c| profile.parameter_kinds.contains(&c.kind()))
                .collect();
            items
        };

        let mut names = Vec::new();
        let mut annotations = BTreeMap::new();
        for item in items {
            let kind = item.kind();
            if !profile.parameter_kinds.contains(&kind) && !profile.is_identifier(kind) {
                continue;
            }
            let Some(name) = self.parameter_name(item) else {
                continue;
            };
            if let Some(ty) = item.child_by_field_name("type") {
                let key = name.trim_start_matches(|c: char| c == '*' || c == '&' || c == '.');
                annotations.insert(key.to_string(), clean_type(self.text(ty)));
            }
            names.push(self.parameter_text(item, name));
        }
        (names, annotations)
    }

    /// Parameter text as carried in the IR: `name=default` when a default
    /// is present, `name?` for TypeScript optional parameters.
    fn parameter_text(&self, item: Node, name: String) -> String {
        let default = DEFAULT_VALUE_FIELDS
            .iter()
            .find_map(|field| item.child_by_field_name(*field))
            .map(|value| self.text(value).trim().to_string())
            .filter(|value| !value.is_empty());
        match default {
            Some(value) => format!("{}={}", name, value),
            None if item.kind() == "optional_parameter" => format!("{}?", name),
            None => name,
        }
    }

    fn parameter_name(&self, item: Node) -> Option<String> {
        let kind = item.kind();
        if self.profile.is_identifier(kind) || SPREAD_KINDS.contains(&kind) {
            return Some(self.text(item).trim().to_string());
        }
        for field in ["name", "pattern", "left", "declarator"] {
            if let Some(child) = item.child_by_field_name(field) {
                if SPREAD_KINDS.contains(&child.kind()) {
                    return Some(self.text(child).trim().to_string());
                }
                if let Some(name) = self.declared_name(child, 1) {
                    return Some(name);
                }
            }
        }
        let mut cursor = item.walk();
        let ident = item
            .named_children(&mut cursor)
            .find(|c| self.profile.is_identifier(c.kind()));
        if let Some(ident) = ident {
            return Some(self.text(ident).to_string());
        }
        // A typed parameter with no name (`void`, `int` in C prototypes).
        if item.child_by_field_name("type").is_some() {
            return None;
        }
        let text = self.text(item);
        let name = text
            .split(|c: char| c == ':' || c == '=')
            .next()
            .unwrap_or("")
            .trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn return_type(&self, node: Node) -> Option<String> {
        self.profile
            .return_type_fields
            .iter()
            .filter_map(|field| node.child_by_field_name(*field))
            .map(|t| clean_type(self.text(t)))
            .find(|t| !t.is_empty())
    }

    /// Raw callee texts of every call under `node`, in source order.
    fn calls(&self, node: Node) -> Vec<String> {
        let profile = self.profile;
        let mut calls = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            if profile.call_kinds.contains(&current.kind()) {
                if let Some(callee) = self.callee(current) {
                    calls.push(callee);
                }
            }
            let mut cursor = current.walk();
            let children: Vec<Node> = current.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        calls
    }

    fn callee(&self, call: Node) -> Option<String> {
        let raw = if let Some(function) = call.child_by_field_name("function") {
            self.text(function).to_string()
        } else if let Some(name) = call.child_by_field_name("name") {
            match call.child_by_field_name("object") {
                Some(object) => format!("{}.{}", self.text(object), self.text(name)),
                None => self.text(name).to_string(),
            }
        } else {
            let mut cursor = call.walk();
            let first = call.named_children(&mut cursor).next()?;
            self.text(first).to_string()
        };

        let callee: String = raw.split_whitespace().collect();
        (!callee.is_empty()).then_some(callee)
    }

    fn has_child_kind(&self, node: Node, kind: &str) -> bool {
        let mut cursor = node.walk();
        let found = node.children(&mut cursor).any(|c| c.kind() == kind);
        found
    }

    /// Modifier words on a declaration, from modifier nodes and keyword tokens.
    fn modifier_words(&self, node: Node) -> Vec<String> {
        let mut words = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let kind = child.kind();
            if self.profile.modifier_kinds.contains(&kind) {
                words.extend(self.text(child).split_whitespace().map(str::to_string));
            } else if kind == "visibility_modifier" {
                words.push(self.text(child).trim().to_string());
            } else if MODIFIER_KEYWORDS.contains(&kind) {
                words.push(kind.to_string());
            }
        }
        words
    }

    fn decorators(&self, node: Node) -> Vec<String> {
        let profile = self.profile;
        let mut holders = Vec::new();
        if let Some(parent) = node
            .parent()
            .filter(|p| profile.decorator_wrapper_kinds.contains(&p.kind()))
        {
            holders.push(parent);
        }
        holders.push(node);

        let mut cursor = node.walk();
        holders.extend(
            node.named_children(&mut cursor)
                .filter(|c| profile.modifier_kinds.contains(&c.kind())),
        );

        let mut decorators = Vec::new();
        for holder in holders {
            let mut cursor = holder.walk();
            for child in holder.named_children(&mut cursor) {
                if profile.decorator_kinds.contains(&child.kind()) {
                    decorators.push(self.text(child).trim().to_string());
                }
            }
        }
        decorators
    }

    fn visibility(&self, name: &str, modifiers: &[String]) -> String {
        let visibility = match self.profile.visibility {
            VisibilityRule::Underscore => {
                if name.starts_with("__") && name.ends_with("__") {
                    "public"
                } else if name.starts_with("__") {
                    "private"
                } else if name.starts_with('_') {
                    "protected"
                } else {
                    "public"
                }
            }
            VisibilityRule::RustPub => {
                if modifiers.iter().any(|m| m.starts_with("pub")) {
                    "public"
                } else {
                    "private"
                }
            }
            VisibilityRule::Capitalized => {
                if name.chars().next().map_or(false, char::is_uppercase) {
                    "public"
                } else {
                    "private"
                }
            }
            VisibilityRule::Modifiers { default } => modifiers
                .iter()
                .map(String::as_str)
                .find(|m| VISIBILITY_WORDS.contains(m))
                .unwrap_or(default),
        };
        visibility.to_string()
    }

    fn docstring(&self, node: Node) -> Option<String> {
        let body = node.child_by_field_name("body")?;
        self.leading_string(body)
    }

    /// Leading string-literal statement of a block, for languages with docstrings.
    fn leading_string(&self, block: Node) -> Option<String> {
        if !self.profile.body_docstrings {
            return None;
        }
        let mut cursor = block.walk();
        let first = block
            .named_children(&mut cursor)
            .find(|c| c.kind() != "comment")?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let mut cursor = first.walk();
        let literal = first.named_children(&mut cursor).next()?;
        if literal.kind() != "string" {
            return None;
        }
        let doc = unquote(self.text(literal));
        (!doc.is_empty()).then_some(doc)
    }

    fn export_names(&self, node: Node) -> Vec<String> {
        if let Some(decl) = node.child_by_field_name("declaration") {
            if let Some(name) = self.entity_name(decl) {
                return vec![name];
            }
            let mut cursor = decl.walk();
            let declarators: Vec<Node> = decl
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "variable_declarator")
                .collect();
            return declarators
                .into_iter()
                .filter_map(|d| d.child_by_field_name("name"))
                .map(|n| self.text(n).to_string())
                .collect();
        }

        let mut names = Vec::new();
        let mut cursor = node.walk();
        let clauses: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "export_clause")
            .collect();
        for clause in clauses {
            let mut cursor = clause.walk();
            for spec in clause.named_children(&mut cursor) {
                let exported = spec
                    .child_by_field_name("alias")
                    .or_else(|| spec.child_by_field_name("name"));
                if let Some(n) = exported {
                    names.push(self.text(n).to_string());
                }
            }
        }
        if names.is_empty() && node.child_by_field_name("value").is_some() {
            names.push("default".to_string());
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(path: &str, src: &str) -> FileIr {
        let language = crate::language::classify(path).unwrap();
        GrammarExtractor::for_path(Path::new(path), language)
            .unwrap()
            .extract(path, src)
            .unwrap()
            .unwrap()
    }

    fn function<'a>(ir: &'a FileIr, name: &str) -> &'a FunctionInfo {
        ir.functions.iter().find(|f| f.name == name).unwrap()
    }

    fn class<'a>(ir: &'a FileIr, name: &str) -> &'a ClassInfo {
        ir.classes.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_helpers() {
        assert_eq!(bare_type_name("*Server"), "Server");
        assert_eq!(bare_type_name("&mut pkg::Stack<T>"), "Stack");
        assert_eq!(bare_type_name("models.User"), "User");
        assert_eq!(clean_type(": string"), "string");
        assert_eq!(clean_type("-> i32"), "i32");
        assert_eq!(unquote("\"\"\"Doc here.\"\"\""), "Doc here.");
        assert_eq!(unquote("r'raw'"), "raw");
    }

    #[test]
    fn test_no_grammar_for_pattern_languages() {
        assert!(grammar_for(Language::Ruby, Path::new("a.rb")).is_none());
        assert!(grammar_for(Language::TypeScript, Path::new("a.tsx")).is_some());
    }

    #[test]
    fn test_python_classes_and_methods() {
        let src = r#"import os
from .utils import helper

class Animal:
    """Base animal."""
    def speak(self):
        pass

class Dog(Animal):
    @staticmethod
    def create(name: str = "rex"):
        return Dog(name)

    def _bark(self, times, *args, **kwargs):
        helper(times)
        print("woof")
"#;
        let ir = extract("zoo/sample.py", src);

        assert_eq!(ir.module.name, "sample");
        assert_eq!(ir.module.imports, vec!["import os", "from .utils import helper"]);

        let animal = class(&ir, "Animal");
        assert_eq!(animal.docstring.as_deref(), Some("Base animal."));
        assert_eq!(animal.methods, vec!["speak"]);

        let dog = class(&ir, "Dog");
        assert_eq!(dog.parent_classes, vec!["Animal"]);
        assert_eq!(dog.methods, vec!["create", "_bark"]);

        let speak = function(&ir, "speak");
        assert_eq!(speak.class_name.as_deref(), Some("Animal"));
        assert_eq!(speak.parameters, vec!["self"]);

        let create = function(&ir, "create");
        assert!(create.is_static);
        assert_eq!(create.decorators, vec!["@staticmethod"]);
        assert_eq!(create.parameters, vec![r#"name="rex""#]);
        assert_eq!(create.type_annotations.get("name").map(String::as_str), Some("str"));
        assert_eq!(create.calls, vec!["Dog"]);

        let bark = function(&ir, "_bark");
        assert_eq!(bark.class_name.as_deref(), Some("Dog"));
        assert_eq!(bark.visibility, "protected");
        assert_eq!(bark.parameters, vec!["self", "times", "*args", "**kwargs"]);
        assert_eq!(bark.calls, vec!["helper", "print"]);
        assert_eq!(bark.start_line, 14);
    }

    #[test]
    fn test_python_nested_function_is_not_method() {
        let src = "class Outer:\n    def method(self):\n        def inner():\n            return 1\n        return inner()\n";
        let ir = extract("nest.py", src);
        assert_eq!(function(&ir, "method").class_name.as_deref(), Some("Outer"));
        assert_eq!(function(&ir, "inner").class_name, None);
    }

    #[test]
    fn test_python_leading_comments_and_async() {
        let src = "# Fetches a page.\n# Retries once.\nasync def fetch(url):\n    return await get(url)\n";
        let ir = extract("net.py", src);
        let fetch = function(&ir, "fetch");
        assert!(fetch.is_async);
        let texts: Vec<_> = fetch.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["Fetches a page.", "Retries once."]);
    }

    #[test]
    fn test_javascript_classes_and_arrows() {
        let src = r#"import { helper } from './lib/helper.js';

export class Greeter extends Base {
  constructor(name) {
    super();
    this.name = name;
  }

  greet() {
    return helper(this.name);
  }
}

export const shout = (msg) => console.log(msg.toUpperCase());
"#;
        let ir = extract("web/greeter.js", src);

        let greeter = class(&ir, "Greeter");
        assert_eq!(greeter.parent_classes, vec!["Base"]);
        assert_eq!(greeter.methods, vec!["constructor", "greet"]);

        let greet = function(&ir, "greet");
        assert_eq!(greet.class_name.as_deref(), Some("Greeter"));
        assert_eq!(greet.calls, vec!["helper"]);

        let shout = function(&ir, "shout");
        assert_eq!(shout.class_name, None);
        assert_eq!(shout.parameters, vec!["msg"]);
        assert_eq!(shout.calls, vec!["console.log", "msg.toUpperCase"]);

        assert!(ir.module.exports.contains(&"Greeter".to_string()));
        assert!(ir.module.exports.contains(&"shout".to_string()));
        assert_eq!(ir.module.imports.len(), 1);
    }

    #[test]
    fn test_parameter_defaults_and_optionals() {
        let ir = extract("py/make.py", "def create(name: str = \"rex\", *args, retries=3):\n    pass\n");
        let create = function(&ir, "create");
        assert_eq!(create.parameters, vec![r#"name="rex""#, "*args", "retries=3"]);
        assert_eq!(create.type_annotations.get("name").map(String::as_str), Some("str"));

        let ir = extract("ts/f.ts", "function f(a: number, b?: string, c = 2) {}\n");
        let f = function(&ir, "f");
        assert_eq!(f.parameters, vec!["a", "b?", "c=2"]);
        assert_eq!(f.type_annotations.get("b").map(String::as_str), Some("string"));

        let ir = extract("js/g.js", "function g(x, y = 5) {}\n");
        assert_eq!(function(&ir, "g").parameters, vec!["x", "y=5"]);
    }

    #[test]
    fn test_typescript_interfaces_and_modifiers() {
        let src = r#"interface Shape {
  area(): number;
}

abstract class Base implements Shape {
  private describe(label: string): string {
    return label;
  }
}
"#;
        let ir = extract("geo/shape.ts", src);

        let shape = class(&ir, "Shape");
        assert!(shape.is_interface);
        assert_eq!(shape.methods, vec!["area"]);

        let base = class(&ir, "Base");
        assert!(base.is_abstract);
        assert_eq!(base.parent_classes, vec!["Shape"]);

        let describe = function(&ir, "describe");
        assert_eq!(describe.visibility, "private");
        assert_eq!(describe.parameters, vec!["label"]);
        assert_eq!(describe.type_annotations.get("label").map(String::as_str), Some("string"));
        assert_eq!(describe.return_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_go_receivers_attach_to_types() {
        let src = r#"package main

import "fmt"

type Server struct {
	addr string
}

func (s *Server) Start(port int) error {
	fmt.Println("start")
	return nil
}

func helper() {}
"#;
        let ir = extract("cmd/main.go", src);

        let server = class(&ir, "Server");
        assert_eq!(server.methods, vec!["Start"]);

        let start = function(&ir, "Start");
        assert_eq!(start.class_name.as_deref(), Some("Server"));
        assert_eq!(start.visibility, "public");
        assert_eq!(start.parameters, vec!["port"]);
        assert_eq!(start.return_type.as_deref(), Some("error"));
        assert_eq!(start.calls, vec!["fmt.Println"]);

        assert_eq!(function(&ir, "helper").visibility, "private");
        assert_eq!(ir.module.imports, vec!["\"fmt\""]);
    }

    #[test]
    fn test_rust_impls_and_traits() {
        let src = r#"use std::collections::HashMap;

/// A counter.
pub struct Counter {
    hits: HashMap<String, u32>,
}

impl Counter {
    pub fn new() -> Self {
        Counter { hits: HashMap::new() }
    }

    async fn record(&mut self, key: &str) {
        self.bump(key);
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}
"#;
        let ir = extract("src/counter.rs", src);

        let counter = class(&ir, "Counter");
        assert_eq!(counter.parent_classes, vec!["Default"]);
        assert_eq!(counter.methods, vec!["new", "record", "default"]);
        assert_eq!(counter.comments.len(), 1);
        assert_eq!(counter.comments[0].content, "A counter.");

        let new = function(&ir, "new");
        assert_eq!(new.class_name.as_deref(), Some("Counter"));
        assert_eq!(new.visibility, "public");
        assert_eq!(new.return_type.as_deref(), Some("Self"));
        assert_eq!(new.calls, vec!["HashMap::new"]);

        let record = function(&ir, "record");
        assert!(record.is_async);
        assert_eq!(record.visibility, "private");
        assert_eq!(record.parameters, vec!["&mut self", "key"]);
        assert_eq!(record.type_annotations.get("key").map(String::as_str), Some("&str"));
        assert_eq!(record.calls, vec!["self.bump"]);

        assert_eq!(function(&ir, "default").calls, vec!["Self::new"]);
        assert_eq!(ir.module.imports, vec!["use std::collections::HashMap;"]);
    }

    #[test]
    fn test_java_members() {
        let src = r#"package zoo;

import java.util.List;

public class Dog extends Animal implements Pet {
    private String name;

    public Dog(String name) {
        this.name = name;
    }

    @Override
    public static void bark(int times) {
        System.out.println("woof");
    }
}
"#;
        let ir = extract("zoo/Dog.java", src);

        let dog = class(&ir, "Dog");
        assert_eq!(dog.parent_classes, vec!["Animal", "Pet"]);
        assert_eq!(dog.methods, vec!["Dog", "bark"]);

        let ctor = ir.functions.iter().find(|f| f.name == "Dog").unwrap();
        assert_eq!(ctor.class_name.as_deref(), Some("Dog"));
        assert_eq!(ctor.parameters, vec!["name"]);
        assert_eq!(ctor.type_annotations.get("name").map(String::as_str), Some("String"));

        let bark = function(&ir, "bark");
        assert!(bark.is_static);
        assert_eq!(bark.visibility, "public");
        assert_eq!(bark.decorators, vec!["@Override"]);
        assert_eq!(bark.return_type.as_deref(), Some("void"));
        assert_eq!(bark.calls, vec!["System.out.println"]);

        assert_eq!(ir.module.imports, vec!["import java.util.List;"]);
    }

    #[test]
    fn test_c_declarator_names() {
        let src = r#"#include <stdio.h>

static int add(int a, int b) {
    return a + b;
}

int main(void) {
    printf("%d\n", add(1, 2));
    return 0;
}
"#;
        let ir = extract("src/calc.c", src);

        let add = function(&ir, "add");
        assert!(add.is_static);
        assert_eq!(add.parameters, vec!["a", "b"]);
        assert_eq!(add.return_type.as_deref(), Some("int"));

        let main = function(&ir, "main");
        assert!(main.parameters.is_empty());
        assert_eq!(main.calls, vec!["printf", "add"]);
        assert_eq!(ir.module.imports, vec!["#include <stdio.h>"]);
    }

    #[test]
    fn test_comment_only_file_has_no_declarations() {
        let ir = extract("notes.py", "# just a note\n# and another one\n");
        assert!(ir.has_no_declarations());
        assert_eq!(ir.module.comments.len(), 2);
    }
}
