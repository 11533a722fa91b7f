//! Per-language profiles.
//!
//! A [`LanguageProfile`] bundles every language-specific table the extractors
//! and the CCM builder need: grammar node kinds, field names, comment
//! patterns, fallback regexes, primitive type names and naming conventions.
//! Profiles are built once and looked up by [`Language`] tag through
//! [`profile_for`]; adding a language means adding one constructor here.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::CommentKind;
use crate::language::Language;

/// How a declaration's visibility is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRule {
    /// Keywords in modifier nodes (`public`, `private`, ...), else the default.
    Modifiers { default: &'static str },
    /// `_name` is protected, `__name` is private, dunders are public.
    Underscore,
    /// A `pub` visibility modifier makes it public, otherwise private.
    RustPub,
    /// Exported when the first letter is uppercase.
    Capitalized,
}

/// How constructors are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorRule {
    /// Any function with one of these names.
    Names(&'static [&'static str]),
    /// A method named like its owning class.
    ClassName,
}

/// Regexes for the pattern-fallback extractor.
#[derive(Debug, Default)]
pub struct FallbackPatterns {
    pub functions: Vec<Regex>,
    pub classes: Vec<Regex>,
    pub imports: Vec<Regex>,
}

impl FallbackPatterns {
    fn compile(functions: &[&str], classes: &[&str], imports: &[&str]) -> Self {
        Self {
            functions: functions.iter().map(|p| multiline(p)).collect(),
            classes: classes.iter().map(|p| multiline(p)).collect(),
            imports: imports.iter().map(|p| multiline(p)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.imports.is_empty()
    }
}

/// A compiled comment pattern. Group 1 holds the comment text.
#[derive(Debug)]
pub struct CommentPattern {
    pub regex: Regex,
    pub kind: CommentKind,
}

/// Everything language-specific, in one record.
#[derive(Debug)]
pub struct LanguageProfile {
    pub language: Language,

    // Grammar node kinds.
    pub function_kinds: &'static [&'static str],
    pub class_kinds: &'static [&'static str],
    pub interface_kinds: &'static [&'static str],
    pub import_kinds: &'static [&'static str],
    pub export_kinds: &'static [&'static str],
    pub method_kinds: &'static [&'static str],
    pub call_kinds: &'static [&'static str],
    /// Blocks that attach methods to a type without declaring it (`impl`).
    pub impl_kinds: &'static [&'static str],
    pub identifier_kinds: &'static [&'static str],
    pub parameter_kinds: &'static [&'static str],
    pub modifier_kinds: &'static [&'static str],
    pub decorator_kinds: &'static [&'static str],
    pub decorator_wrapper_kinds: &'static [&'static str],
    pub heritage_kinds: &'static [&'static str],
    /// Parents whose name field names an anonymous function (`const f = () => {}`).
    pub name_parent_kinds: &'static [&'static str],
    /// Names for declarations the grammar leaves unnamed, by node kind.
    pub implicit_names: &'static [(&'static str, &'static str)],
    /// When non-empty, a class-like node only counts if its `type` field is one of these.
    pub class_type_kinds: &'static [&'static str],
    /// Forward declarations without a `body` field are not classes.
    pub class_requires_body: bool,

    // Field names, in priority order.
    pub name_fields: &'static [&'static str],
    pub parameter_fields: &'static [&'static str],
    pub heritage_fields: &'static [&'static str],
    pub return_type_fields: &'static [&'static str],
    pub receiver_field: Option<&'static str>,

    pub comment_patterns: Vec<CommentPattern>,
    pub fallback: FallbackPatterns,
    pub primitive_types: &'static [&'static str],
    pub constructor: ConstructorRule,
    pub visibility: VisibilityRule,
    /// Leading string literal in a body is the docstring.
    pub body_docstrings: bool,
}

impl LanguageProfile {
    /// A profile with no grammar tables, `#` comments and default conventions.
    fn base(language: Language) -> Self {
        Self {
            language,
            function_kinds: &[],
            class_kinds: &[],
            interface_kinds: &[],
            import_kinds: &[],
            export_kinds: &[],
            method_kinds: &[],
            call_kinds: &["call", "call_expression", "function_call"],
            impl_kinds: &[],
            identifier_kinds: &["identifier"],
            parameter_kinds: &["identifier", "parameter", "parameter_declaration"],
            modifier_kinds: &["modifiers"],
            decorator_kinds: &[],
            decorator_wrapper_kinds: &[],
            heritage_kinds: &[],
            name_parent_kinds: &[],
            implicit_names: &[],
            class_type_kinds: &[],
            class_requires_body: false,
            name_fields: &["name"],
            parameter_fields: &["parameters", "parameter_list", "args"],
            heritage_fields: &[],
            return_type_fields: &[],
            receiver_field: None,
            comment_patterns: comments(HASH_COMMENTS),
            fallback: FallbackPatterns::default(),
            primitive_types: &[],
            constructor: ConstructorRule::Names(&["__init__", "constructor", "init"]),
            visibility: VisibilityRule::Modifiers { default: "public" },
            body_docstrings: false,
        }
    }

    pub fn is_function(&self, kind: &str) -> bool {
        self.function_kinds.contains(&kind)
    }

    pub fn is_class(&self, kind: &str) -> bool {
        self.class_kinds.contains(&kind) || self.interface_kinds.contains(&kind)
    }

    pub fn is_import(&self, kind: &str) -> bool {
        self.import_kinds.contains(&kind)
    }

    pub fn is_identifier(&self, kind: &str) -> bool {
        self.identifier_kinds.contains(&kind)
    }

    pub fn is_primitive(&self, type_name: &str) -> bool {
        self.primitive_types.contains(&type_name)
    }

    /// Whether `name` is a constructor under this language's convention.
    pub fn is_constructor(&self, name: &str, class_name: Option<&str>) -> bool {
        match self.constructor {
            ConstructorRule::Names(names) => names.contains(&name),
            ConstructorRule::ClassName => class_name == Some(name),
        }
    }
}

fn multiline(pattern: &str) -> Regex {
    Regex::new(&format!("(?m){}", pattern)).unwrap()
}

fn comments(patterns: &[(&str, CommentKind)]) -> Vec<CommentPattern> {
    patterns
        .iter()
        .map(|(pattern, kind)| CommentPattern {
            regex: Regex::new(pattern).unwrap(),
            kind: *kind,
        })
        .collect()
}

const HASH_COMMENTS: &[(&str, CommentKind)] = &[(r"#\s*(.*)", CommentKind::Line)];

const C_STYLE_COMMENTS: &[(&str, CommentKind)] = &[
    (r"///\s*(.*)", CommentKind::Doc),
    (r"/\*\*\s*(.*?)\s*\*/", CommentKind::Doc),
    (r"//\s*(.*)", CommentKind::Line),
    (r"/\*\s*(.*?)\s*\*/", CommentKind::Block),
];

const PHP_COMMENTS: &[(&str, CommentKind)] = &[
    (r"//\s*(.*)", CommentKind::Line),
    (r"#\s*(.*)", CommentKind::Line),
    (r"/\*\s*(.*?)\s*\*/", CommentKind::Block),
];

const SQL_COMMENTS: &[(&str, CommentKind)] = &[
    (r"--\s*(.*)", CommentKind::Line),
    (r"/\*\s*(.*?)\s*\*/", CommentKind::Block),
];

const CSS_COMMENTS: &[(&str, CommentKind)] = &[(r"/\*\s*(.*?)\s*\*/", CommentKind::Block)];

const HTML_COMMENTS: &[(&str, CommentKind)] = &[(r"<!--\s*(.*?)\s*-->", CommentKind::Block)];

const JS_FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "arrow_function",
    "method_definition",
];

const JS_NAME_PARENTS: &[&str] = &[
    "variable_declarator",
    "public_field_definition",
    "field_definition",
    "pair",
];

const JS_PRIMITIVES: &[&str] = &["number", "string", "boolean", "undefined", "null"];

fn python() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["function_definition"],
        class_kinds: &["class_definition"],
        import_kinds: &["import_statement", "import_from_statement"],
        method_kinds: &["function_definition"],
        call_kinds: &["call"],
        parameter_kinds: &[
            "identifier",
            "typed_parameter",
            "default_parameter",
            "typed_default_parameter",
            "list_splat_pattern",
            "dictionary_splat_pattern",
        ],
        decorator_kinds: &["decorator"],
        decorator_wrapper_kinds: &["decorated_definition"],
        heritage_fields: &["superclasses"],
        return_type_fields: &["return_type"],
        fallback: FallbackPatterns::compile(
            &[r"^\s*(?:async\s+)?def\s+(\w+)"],
            &[r"^\s*class\s+(\w+)"],
            &[r"^\s*(?:from\s+[\w.]+\s+import\s+.+|import\s+[\w.]+.*)$"],
        ),
        primitive_types: &["int", "float", "str", "bool", "bytes", "None"],
        constructor: ConstructorRule::Names(&["__init__"]),
        visibility: VisibilityRule::Underscore,
        body_docstrings: true,
        ..LanguageProfile::base(Language::Python)
    }
}

fn javascript() -> LanguageProfile {
    LanguageProfile {
        function_kinds: JS_FUNCTION_KINDS,
        class_kinds: &["class_declaration", "class"],
        import_kinds: &["import_statement"],
        export_kinds: &["export_statement"],
        method_kinds: &["method_definition"],
        call_kinds: &["call_expression"],
        identifier_kinds: &["identifier", "property_identifier", "private_property_identifier"],
        parameter_kinds: &[
            "identifier",
            "assignment_pattern",
            "rest_pattern",
            "object_pattern",
            "array_pattern",
        ],
        decorator_kinds: &["decorator"],
        heritage_kinds: &["class_heritage"],
        name_parent_kinds: JS_NAME_PARENTS,
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"function\s*\*?\s*(\w+)\s*\("],
            &[r"class\s+(\w+)"],
            &[r"^\s*import\s+.+$", r#"require\(\s*['"][^'"]+['"]\s*\)"#],
        ),
        primitive_types: JS_PRIMITIVES,
        constructor: ConstructorRule::Names(&["constructor"]),
        ..LanguageProfile::base(Language::JavaScript)
    }
}

fn typescript() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &[
            "function_declaration",
            "generator_function_declaration",
            "function_expression",
            "arrow_function",
            "method_definition",
            "abstract_method_signature",
        ],
        class_kinds: &["class_declaration", "abstract_class_declaration", "class"],
        interface_kinds: &["interface_declaration"],
        import_kinds: &["import_statement"],
        export_kinds: &["export_statement"],
        method_kinds: &["method_definition", "method_signature", "abstract_method_signature"],
        call_kinds: &["call_expression"],
        identifier_kinds: &[
            "identifier",
            "property_identifier",
            "private_property_identifier",
            "type_identifier",
        ],
        parameter_kinds: &["required_parameter", "optional_parameter", "identifier", "rest_pattern"],
        modifier_kinds: &["accessibility_modifier"],
        decorator_kinds: &["decorator"],
        heritage_kinds: &["class_heritage", "extends_type_clause"],
        name_parent_kinds: JS_NAME_PARENTS,
        name_fields: &["name"],
        return_type_fields: &["return_type"],
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"function\s*\*?\s*(\w+)\s*[<(]"],
            &[r"(?:class|interface)\s+(\w+)"],
            &[r"^\s*import\s+.+$"],
        ),
        primitive_types: &["number", "string", "boolean", "undefined", "null", "void"],
        constructor: ConstructorRule::Names(&["constructor"]),
        ..LanguageProfile::base(Language::TypeScript)
    }
}

fn java() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["method_declaration", "constructor_declaration"],
        class_kinds: &["class_declaration", "enum_declaration", "record_declaration"],
        interface_kinds: &["interface_declaration"],
        import_kinds: &["import_declaration"],
        method_kinds: &["method_declaration", "constructor_declaration"],
        call_kinds: &["method_invocation"],
        identifier_kinds: &["identifier", "type_identifier"],
        parameter_kinds: &["formal_parameter", "spread_parameter"],
        decorator_kinds: &["marker_annotation", "annotation"],
        heritage_kinds: &["extends_interfaces"],
        heritage_fields: &["superclass", "interfaces"],
        return_type_fields: &["type"],
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"(?:public|private|protected|static|\s)*\s+\w+\s+(\w+)\s*\([^)]*\)\s*\{"],
            &[r"(?:public|private|protected|\s)*\s*class\s+(\w+)"],
            &[r"^\s*import\s+[\w.*]+\s*;"],
        ),
        primitive_types: &[
            "int", "long", "float", "double", "boolean", "char", "byte", "short", "void",
        ],
        constructor: ConstructorRule::ClassName,
        visibility: VisibilityRule::Modifiers { default: "package" },
        ..LanguageProfile::base(Language::Java)
    }
}

fn c() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["function_definition"],
        class_kinds: &["struct_specifier"],
        import_kinds: &["preproc_include"],
        method_kinds: &["function_definition"],
        call_kinds: &["call_expression"],
        identifier_kinds: &["identifier", "type_identifier", "field_identifier"],
        parameter_kinds: &["parameter_declaration", "variadic_parameter"],
        modifier_kinds: &["storage_class_specifier"],
        class_requires_body: true,
        name_fields: &["name", "declarator"],
        return_type_fields: &["type"],
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"\w+\s+(\w+)\s*\([^)]*\)\s*\{"],
            &[r"typedef\s+struct\s+(\w+)"],
            &[r#"^\s*#\s*include\s*[<"][^>"]+[>"]"#],
        ),
        primitive_types: &["int", "long", "float", "double", "char", "void"],
        constructor: ConstructorRule::Names(&[]),
        ..LanguageProfile::base(Language::C)
    }
}

fn cpp() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["function_definition"],
        class_kinds: &["class_specifier", "struct_specifier"],
        import_kinds: &["preproc_include"],
        method_kinds: &["function_definition"],
        call_kinds: &["call_expression"],
        identifier_kinds: &[
            "identifier",
            "type_identifier",
            "field_identifier",
            "qualified_identifier",
            "destructor_name",
            "operator_name",
        ],
        parameter_kinds: &[
            "parameter_declaration",
            "optional_parameter_declaration",
            "variadic_parameter_declaration",
        ],
        modifier_kinds: &["storage_class_specifier", "virtual"],
        heritage_kinds: &["base_class_clause"],
        class_requires_body: true,
        name_fields: &["name", "declarator"],
        return_type_fields: &["type"],
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"\w+\s+(\w+)\s*\([^)]*\)\s*\{", r"(\w+)::\w+\s*\([^)]*\)\s*\{"],
            &[r"class\s+(\w+)"],
            &[r#"^\s*#\s*include\s*[<"][^>"]+[>"]"#],
        ),
        primitive_types: &["int", "long", "float", "double", "char", "bool", "void"],
        constructor: ConstructorRule::ClassName,
        ..LanguageProfile::base(Language::Cpp)
    }
}

fn go() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["function_declaration", "method_declaration", "func_literal"],
        class_kinds: &["type_spec"],
        import_kinds: &["import_spec"],
        method_kinds: &["method_elem", "method_spec"],
        call_kinds: &["call_expression"],
        identifier_kinds: &["identifier", "type_identifier", "field_identifier"],
        parameter_kinds: &["parameter_declaration", "variadic_parameter_declaration"],
        class_type_kinds: &["struct_type", "interface_type"],
        return_type_fields: &["result"],
        receiver_field: Some("receiver"),
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"func\s+(\w+)\s*\([^)]*\)"],
            &[r"type\s+(\w+)\s+struct"],
            &[r#"^\s*import\s+(?:\w+\s+)?"[^"]+""#],
        ),
        primitive_types: &["int", "int32", "int64", "float32", "float64", "string", "bool"],
        constructor: ConstructorRule::Names(&[]),
        visibility: VisibilityRule::Capitalized,
        ..LanguageProfile::base(Language::Go)
    }
}

fn rust() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["function_item", "function_signature_item"],
        class_kinds: &["struct_item", "enum_item", "union_item"],
        interface_kinds: &["trait_item"],
        import_kinds: &["use_declaration"],
        method_kinds: &["function_item", "function_signature_item"],
        call_kinds: &["call_expression"],
        impl_kinds: &["impl_item"],
        identifier_kinds: &["identifier", "type_identifier"],
        parameter_kinds: &["parameter", "self_parameter", "variadic_parameter"],
        modifier_kinds: &["function_modifiers"],
        decorator_kinds: &["attribute_item"],
        return_type_fields: &["return_type"],
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"fn\s+(\w+)\s*(?:<[^>]*>)?\s*\("],
            &[r"struct\s+(\w+)", r"enum\s+(\w+)"],
            &[r"^\s*(?:pub\s+)?use\s+[^;]+;"],
        ),
        primitive_types: &[
            "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "usize", "isize", "f32", "f64",
            "bool", "char", "str",
        ],
        constructor: ConstructorRule::Names(&["new"]),
        visibility: VisibilityRule::RustPub,
        ..LanguageProfile::base(Language::Rust)
    }
}

fn scala() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["function_definition", "function_declaration"],
        class_kinds: &["class_definition", "object_definition"],
        interface_kinds: &["trait_definition"],
        import_kinds: &["import_declaration"],
        method_kinds: &["function_definition", "function_declaration"],
        call_kinds: &["call_expression"],
        identifier_kinds: &["identifier", "type_identifier"],
        parameter_kinds: &["parameter", "class_parameter"],
        modifier_kinds: &["modifiers", "access_modifier"],
        decorator_kinds: &["annotation"],
        heritage_kinds: &["extends_clause"],
        heritage_fields: &["extend"],
        return_type_fields: &["return_type"],
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"def\s+(\w+)"],
            &[r"(?:class|object|trait)\s+(\w+)"],
            &[r"^\s*import\s+[\w.{}_, ]+"],
        ),
        primitive_types: &["Int", "Long", "Double", "Float", "Boolean", "Char", "String", "Unit"],
        constructor: ConstructorRule::Names(&[]),
        ..LanguageProfile::base(Language::Scala)
    }
}

fn swift() -> LanguageProfile {
    LanguageProfile {
        function_kinds: &["function_declaration", "init_declaration", "deinit_declaration"],
        class_kinds: &["class_declaration"],
        interface_kinds: &["protocol_declaration"],
        import_kinds: &["import_declaration"],
        method_kinds: &["function_declaration", "init_declaration", "protocol_function_declaration"],
        call_kinds: &["call_expression"],
        identifier_kinds: &["simple_identifier", "type_identifier"],
        parameter_kinds: &["parameter"],
        modifier_kinds: &["modifiers"],
        decorator_kinds: &["attribute"],
        heritage_kinds: &["inheritance_specifier"],
        implicit_names: &[("init_declaration", "init"), ("deinit_declaration", "deinit")],
        return_type_fields: &["return_type"],
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"func\s+(\w+)"],
            &[r"(?:class|struct|protocol|enum)\s+(\w+)"],
            &[r"^\s*import\s+\w+"],
        ),
        primitive_types: &["Int", "Double", "Float", "Bool", "String", "Character", "Void"],
        constructor: ConstructorRule::Names(&["init"]),
        visibility: VisibilityRule::Modifiers { default: "internal" },
        ..LanguageProfile::base(Language::Swift)
    }
}

fn kotlin() -> LanguageProfile {
    LanguageProfile {
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"fun\s+(?:<[^>]*>\s*)?(?:\w+\.)?(\w+)\s*\("],
            &[r"(?:class|interface|object)\s+(\w+)"],
            &[r"^\s*import\s+[\w.*]+"],
        ),
        primitive_types: &["Int", "Long", "Double", "Float", "Boolean", "Char", "String", "Unit"],
        constructor: ConstructorRule::Names(&["init"]),
        ..LanguageProfile::base(Language::Kotlin)
    }
}

fn csharp() -> LanguageProfile {
    LanguageProfile {
        comment_patterns: comments(C_STYLE_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"(?:public|private|protected|internal|static|virtual|override|async|\s)*\s+[\w<>\[\]]+\s+(\w+)\s*\([^)]*\)\s*\{"],
            &[r"(?:class|interface|struct)\s+(\w+)"],
            &[r"^\s*using\s+[\w.]+\s*;"],
        ),
        primitive_types: &["int", "long", "float", "double", "bool", "char", "string", "void"],
        constructor: ConstructorRule::ClassName,
        visibility: VisibilityRule::Modifiers { default: "private" },
        ..LanguageProfile::base(Language::CSharp)
    }
}

fn ruby() -> LanguageProfile {
    LanguageProfile {
        fallback: FallbackPatterns::compile(
            &[r"def\s+(\w+)"],
            &[r"class\s+(\w+)"],
            &[r#"^\s*require(?:_relative)?\s+['"][^'"]+['"]"#],
        ),
        constructor: ConstructorRule::Names(&["initialize"]),
        ..LanguageProfile::base(Language::Ruby)
    }
}

fn php() -> LanguageProfile {
    LanguageProfile {
        comment_patterns: comments(PHP_COMMENTS),
        fallback: FallbackPatterns::compile(
            &[r"function\s+(\w+)\s*\("],
            &[r"class\s+(\w+)"],
            &[
                r"^\s*use\s+[\w\\]+\s*;",
                r#"^\s*(?:require|include)(?:_once)?\s*\(?\s*['"][^'"]+['"]"#,
            ],
        ),
        constructor: ConstructorRule::Names(&["__construct"]),
        ..LanguageProfile::base(Language::Php)
    }
}

fn bash() -> LanguageProfile {
    LanguageProfile {
        fallback: FallbackPatterns::compile(
            &[
                r"^\s*(?:function\s+)?([A-Za-z_][\w-]*)\s*\(\)",
                r"^\s*function\s+([A-Za-z_][\w-]*)\s*\{",
            ],
            &[],
            &[r"^\s*(?:source|\.)\s+\S+"],
        ),
        ..LanguageProfile::base(Language::Bash)
    }
}

fn build(language: Language) -> LanguageProfile {
    match language {
        Language::Python => python(),
        Language::JavaScript => javascript(),
        Language::TypeScript => typescript(),
        Language::Java => java(),
        Language::C => c(),
        Language::Cpp => cpp(),
        Language::Go => go(),
        Language::Rust => rust(),
        Language::Scala => scala(),
        Language::Swift => swift(),
        Language::Kotlin => kotlin(),
        Language::CSharp => csharp(),
        Language::Ruby => ruby(),
        Language::Php => php(),
        Language::Bash => bash(),
        Language::Sql => LanguageProfile {
            comment_patterns: comments(SQL_COMMENTS),
            ..LanguageProfile::base(language)
        },
        Language::Css => LanguageProfile {
            comment_patterns: comments(CSS_COMMENTS),
            ..LanguageProfile::base(language)
        },
        Language::Html | Language::Xml | Language::Markdown => LanguageProfile {
            comment_patterns: comments(HTML_COMMENTS),
            ..LanguageProfile::base(language)
        },
        _ => LanguageProfile::base(language),
    }
}

static PROFILES: Lazy<HashMap<Language, LanguageProfile>> = Lazy::new(|| {
    Language::ALL
        .iter()
        .map(|lang| (*lang, build(*lang)))
        .collect()
});

/// Look up the profile for a language. Every language has one.
pub fn profile_for(language: Language) -> &'static LanguageProfile {
    // Every tag in Language::ALL is inserted above.
    &PROFILES[&language]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_profile() {
        for lang in Language::ALL {
            assert_eq!(profile_for(*lang).language, *lang);
        }
    }

    #[test]
    fn test_kind_membership() {
        let py = profile_for(Language::Python);
        assert!(py.is_function("function_definition"));
        assert!(py.is_class("class_definition"));
        assert!(py.is_import("import_from_statement"));
        assert!(!py.is_function("class_definition"));

        let ts = profile_for(Language::TypeScript);
        assert!(ts.is_class("interface_declaration"));
    }

    #[test]
    fn test_constructor_rules() {
        assert!(profile_for(Language::Python).is_constructor("__init__", Some("Dog")));
        assert!(!profile_for(Language::Python).is_constructor("init", Some("Dog")));
        assert!(profile_for(Language::Java).is_constructor("Dog", Some("Dog")));
        assert!(!profile_for(Language::Java).is_constructor("Dog", None));
        // Languages without a specific convention use the shared names.
        assert!(profile_for(Language::Json).is_constructor("constructor", None));
    }

    #[test]
    fn test_fallback_patterns_compile() {
        assert!(profile_for(Language::Ruby).fallback.functions[0].is_match("def greet"));
        assert!(profile_for(Language::Go).fallback.classes[0].is_match("type Config struct {"));
        assert!(profile_for(Language::Html).fallback.is_empty());
    }

    #[test]
    fn test_comment_pattern_order_prefers_doc() {
        let rust = profile_for(Language::Rust);
        let first = rust
            .comment_patterns
            .iter()
            .find(|p| p.regex.is_match("/// Docs here"))
            .unwrap();
        assert_eq!(first.kind, CommentKind::Doc);
    }
}
