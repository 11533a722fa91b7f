//! Name lookup for relationship resolution.
//!
//! Every entity is registered under several keys: its bare name, a
//! kind-prefixed form, and qualified forms. A key registered twice keeps the
//! later id. Resolution walks a fixed candidate list, most global first, and
//! returns the first hit.

use std::collections::HashMap;
use std::fmt;

/// Namespace of a lookup key. `Bare` keys carry no prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Bare,
    Module,
    Class,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    pub kind: KeyKind,
    pub name: String,
}

impl SymbolKey {
    pub fn new(kind: KeyKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            KeyKind::Bare => write!(f, "{}", self.name),
            KeyKind::Module => write!(f, "module:{}", self.name),
            KeyKind::Class => write!(f, "class:{}", self.name),
            KeyKind::Function => write!(f, "function:{}", self.name),
        }
    }
}

/// Where a reference occurs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    pub module: Option<&'a str>,
    pub class: Option<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn module(module: &'a str) -> Self {
        Self {
            module: Some(module),
            class: None,
        }
    }

    pub fn member(module: &'a str, class: Option<&'a str>) -> Self {
        Self {
            module: Some(module),
            class,
        }
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<SymbolKey, String>,
    collisions: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key`. An existing entry is overwritten.
    pub fn insert(&mut self, key: SymbolKey, id: &str) {
        if let Some(previous) = self.entries.insert(key, id.to_string()) {
            if previous != id {
                self.collisions += 1;
            }
        }
    }

    pub fn get(&self, key: &SymbolKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys overwritten with a different id.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    pub fn register_module(&mut self, name: &str, id: &str) {
        self.insert(SymbolKey::new(KeyKind::Bare, name), id);
        self.insert(SymbolKey::new(KeyKind::Module, name), id);
    }

    pub fn register_class(&mut self, module: &str, name: &str, id: &str) {
        let qualified = format!("{}.{}", module, name);
        self.insert(SymbolKey::new(KeyKind::Bare, name), id);
        self.insert(SymbolKey::new(KeyKind::Class, name), id);
        self.insert(SymbolKey::new(KeyKind::Bare, qualified.as_str()), id);
        self.insert(SymbolKey::new(KeyKind::Class, qualified), id);
    }

    /// `full_name` is `module.Class.name` for methods, `module.name` otherwise.
    pub fn register_function(
        &mut self,
        module: &str,
        class: Option<&str>,
        name: &str,
        full_name: &str,
        id: &str,
    ) {
        self.insert(SymbolKey::new(KeyKind::Bare, name), id);
        self.insert(SymbolKey::new(KeyKind::Function, name), id);
        self.insert(SymbolKey::new(KeyKind::Bare, full_name), id);
        self.insert(SymbolKey::new(KeyKind::Function, full_name), id);

        if let Some(class) = class {
            let in_class = format!("{}.{}", class, name);
            self.insert(SymbolKey::new(KeyKind::Bare, in_class.as_str()), id);
            self.insert(SymbolKey::new(KeyKind::Function, in_class), id);
        }

        let in_module = format!("{}.{}", module, name);
        self.insert(SymbolKey::new(KeyKind::Bare, in_module.as_str()), id);
        self.insert(SymbolKey::new(KeyKind::Function, in_module), id);
    }

    /// Candidate keys for `target` in `scope`, in lookup order.
    pub fn candidates(target: &str, scope: Scope<'_>) -> Vec<SymbolKey> {
        let mut keys = vec![
            SymbolKey::new(KeyKind::Bare, target),
            SymbolKey::new(KeyKind::Function, target),
            SymbolKey::new(KeyKind::Class, target),
            SymbolKey::new(KeyKind::Module, target),
        ];

        if let Some(module) = scope.module {
            let qualified = format!("{}.{}", module, target);
            keys.push(SymbolKey::new(KeyKind::Bare, qualified.as_str()));
            keys.push(SymbolKey::new(KeyKind::Function, qualified.as_str()));
            keys.push(SymbolKey::new(KeyKind::Class, qualified));
        }

        if let Some(class) = scope.class {
            let qualified = format!("{}.{}", class, target);
            keys.push(SymbolKey::new(KeyKind::Bare, qualified.as_str()));
            keys.push(SymbolKey::new(KeyKind::Function, qualified));
        }

        if let (Some(module), Some(class)) = (scope.module, scope.class) {
            let qualified = format!("{}.{}.{}", module, class, target);
            keys.push(SymbolKey::new(KeyKind::Bare, qualified.as_str()));
            keys.push(SymbolKey::new(KeyKind::Function, qualified));
        }

        keys
    }

    /// Resolve `target` to a node id, trying candidates in order.
    pub fn resolve(&self, target: &str, scope: Scope<'_>) -> Option<&str> {
        Self::candidates(target, scope)
            .iter()
            .find_map(|key| self.get(key))
    }
}
