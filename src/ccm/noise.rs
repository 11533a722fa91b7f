//! Builtin and noise call filtering.
//!
//! Calls to language builtins and common container methods would never
//! resolve to a repository node, so they are dropped before resolution and
//! do not count against the resolution rate.

use phf::phf_set;

/// Cross-language builtins, matched against the whole callee and its last
/// dotted segment.
static BUILTINS: phf::Set<&'static str> = phf_set! {
    // Python
    "print", "len", "range", "str", "int", "float", "bool", "list", "dict", "set", "tuple",
    "abs", "all", "any", "bin", "chr", "dir", "divmod", "enumerate", "eval", "exec",
    "filter", "format", "getattr", "hasattr", "hash", "hex", "id", "input", "isinstance",
    "issubclass", "iter", "map", "max", "min", "next", "oct", "open", "ord", "pow",
    "repr", "reversed", "round", "setattr", "sorted", "sum", "type", "vars", "zip",
    // JavaScript
    "console.log", "parseInt", "parseFloat", "isNaN", "isFinite", "encodeURI", "decodeURI",
    "setTimeout", "setInterval", "clearTimeout", "clearInterval",
    // Container and string methods
    "append", "extend", "insert", "remove", "pop", "clear", "index", "count",
    "sort", "reverse", "copy", "get", "keys", "values", "items", "update",
    "add", "discard", "union", "intersection", "difference",
    "split", "join", "strip", "replace", "find", "startswith", "endswith",
    "upper", "lower", "capitalize", "title",
};

/// Method names that are noise only when called on a receiver (`xs.push`).
static COMMON_METHODS: phf::Set<&'static str> = phf_set! {
    "append", "extend", "insert", "remove", "pop", "clear",
    "get", "set", "add", "delete", "update", "keys", "values",
    "push", "shift", "unshift", "slice", "splice", "concat",
    "toString", "valueOf", "hasOwnProperty",
};

/// Characters that mark a callee as an expression rather than a name.
const EXPRESSION_CHARS: &[char] = &['(', ')', '[', ']', '{', '}', '+', '-', '*', '/', '='];

/// True when `callee` is a builtin, a common method call, an expression,
/// or too short to be a meaningful name.
pub fn is_noise_call(callee: &str) -> bool {
    if BUILTINS.contains(callee) {
        return true;
    }

    if let Some((_, method)) = callee.rsplit_once('.') {
        if BUILTINS.contains(method) || COMMON_METHODS.contains(method) {
            return true;
        }
    }

    if callee.contains(EXPRESSION_CHARS) {
        return true;
    }

    callee.chars().count() <= 2
}
