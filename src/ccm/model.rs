//! Canonical Code Model types.
//!
//! These serialize directly into the primary artifact. Optional fields are
//! omitted from the JSON when empty, so a comment node carries no parent,
//! children, parameters or relationships keys at all.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::language::Language;

/// Version string written into every document.
pub const CCM_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Module,
    Class,
    Interface,
    Function,
    Method,
    Constructor,
    Property,
    Variable,
    Parameter,
    Comment,
    Import,
    Export,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Module => "module",
            NodeType::Class => "class",
            NodeType::Interface => "interface",
            NodeType::Function => "function",
            NodeType::Method => "method",
            NodeType::Constructor => "constructor",
            NodeType::Property => "property",
            NodeType::Variable => "variable",
            NodeType::Parameter => "parameter",
            NodeType::Comment => "comment",
            NodeType::Import => "import",
            NodeType::Export => "export",
        }
    }

    /// Prefix used in node ids. Function-like and class-like kinds share one.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeType::Class | NodeType::Interface => "class",
            NodeType::Function | NodeType::Method | NodeType::Constructor => "function",
            other => other.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Internal,
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Static,
    Abstract,
    Final,
    Async,
    Virtual,
    Override,
    Readonly,
    Const,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Imports,
    Inherits,
    Calls,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Imports => "imports",
            RelationshipType::Inherits => "inherits",
            RelationshipType::Calls => "calls",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl Location {
    pub fn lines(file_path: &str, start_line: usize, end_line: usize) -> Self {
        Self {
            file_path: file_path.to_string(),
            start_line,
            end_line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub is_primitive: bool,
    pub is_array: bool,
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_parameters: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_info: Option<TypeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub is_optional: bool,
    pub is_variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub target_id: String,
    pub target_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcmNode {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub location: Location,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<Modifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_info: Option<TypeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, serde_json::Value>>,
}

impl CcmNode {
    /// A bare node; every optional attribute starts empty.
    pub fn new(
        id: String,
        name: impl Into<String>,
        node_type: NodeType,
        location: Location,
        language: Language,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            node_type,
            location,
            language,
            visibility: None,
            modifiers: None,
            type_info: None,
            parameters: None,
            return_type: None,
            parent_id: None,
            children_ids: None,
            relationships: None,
            documentation: None,
            raw_content: None,
            annotations: None,
        }
    }

    pub fn add_child(&mut self, child_id: &str) {
        self.children_ids
            .get_or_insert_with(Vec::new)
            .push(child_id.to_string());
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships
            .get_or_insert_with(Vec::new)
            .push(relationship);
    }

    pub fn children(&self) -> &[String] {
        self.children_ids.as_deref().unwrap_or(&[])
    }

    pub fn relationships(&self) -> &[Relationship] {
        self.relationships.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcmProject {
    pub name: String,
    pub root_path: String,
    pub project_type: String,
    pub languages: Vec<Language>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcmMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_timestamp: Option<String>,
    pub analyzer_version: String,
    pub total_nodes: usize,
    pub total_relationships: usize,
    pub resolved_relationships: usize,
    pub unresolved_relationships: usize,
    /// Percentage of candidate relationships that resolved, one decimal.
    pub resolution_rate: f64,
    pub node_type_counts: BTreeMap<String, usize>,
    pub language_distribution: BTreeMap<String, usize>,
    pub relationship_type_counts: BTreeMap<String, usize>,
    pub lookup_table_size: usize,
    /// Lookup keys registered more than once with different ids.
    pub lookup_collisions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_stats: Option<serde_json::Value>,
}

/// The assembled graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcmAnalysisResult {
    pub ccm_version: String,
    pub project: CcmProject,
    pub nodes: Vec<CcmNode>,
    /// Every relationship in the graph, in creation order.
    #[serde(rename = "global_relationships")]
    pub relationships: Vec<Relationship>,
    pub metadata: CcmMetadata,
}

impl CcmAnalysisResult {
    pub fn node(&self, id: &str) -> Option<&CcmNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &CcmNode> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted() {
        let node = CcmNode::new(
            "comment_000001".to_string(),
            "comment_3",
            NodeType::Comment,
            Location::lines("a.py", 3, 3),
            Language::Python,
        );
        let value = serde_json::to_value(&node).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("parent_id"));
        assert!(!obj.contains_key("children_ids"));
        assert!(!obj.contains_key("relationships"));
        assert!(!obj.contains_key("parameters"));
        assert_eq!(obj["node_type"], "comment");
        assert_eq!(obj["language"], "python");
    }

    #[test]
    fn test_id_prefixes() {
        assert_eq!(NodeType::Method.id_prefix(), "function");
        assert_eq!(NodeType::Constructor.id_prefix(), "function");
        assert_eq!(NodeType::Interface.id_prefix(), "class");
        assert_eq!(NodeType::Comment.id_prefix(), "comment");
    }

    #[test]
    fn test_relationship_type_key() {
        let rel = Relationship {
            kind: RelationshipType::Calls,
            target_id: "function_000002".to_string(),
            target_name: "helper".to_string(),
            metadata: None,
        };
        let value = serde_json::to_value(&rel).unwrap();
        assert_eq!(value["type"], "calls");
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_child_and_relationship_accumulate() {
        let mut node = CcmNode::new(
            "class_000001".to_string(),
            "Dog",
            NodeType::Class,
            Location::lines("a.py", 1, 9),
            Language::Python,
        );
        assert!(node.children().is_empty());
        node.add_child("method_000002");
        node.add_child("method_000003");
        assert_eq!(node.children(), ["method_000002", "method_000003"]);
    }
}
