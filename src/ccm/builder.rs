//! Two-phase CCM assembly.
//!
//! Phase 1 turns every IR record into a node, in the order modules, classes,
//! functions, comments, and registers the lookup keys of each entity. Phase 2
//! walks the raw imports, parent classes and calls of those same records and
//! binds them to node ids through the symbol table.

use std::collections::{BTreeMap, HashMap};

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::extract::profile_for;
use crate::ir::{CommentInfo, IrBatch, ModuleInfo};
use crate::language::Language;

use super::convert;
use super::imports::import_target;
use super::model::{
    CcmAnalysisResult, CcmMetadata, CcmNode, CcmProject, Location, NodeType, Relationship,
    RelationshipType, CCM_VERSION,
};
use super::noise::is_noise_call;
use super::symbols::{Scope, SymbolTable};

/// Version recorded in every document's metadata.
pub const ANALYZER_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-ccm-two-phase");

/// Project-level facts the builder copies into the document.
#[derive(Debug, Clone, Default)]
pub struct ProjectInfo {
    pub name: String,
    pub root_path: String,
    pub project_type: String,
    pub languages: Vec<Language>,
    /// RFC 3339 time of the run.
    pub timestamp: Option<String>,
    /// Extraction statistics carried through as `original_stats`.
    pub stats: Option<Value>,
}

/// Node ids of the Phase 1 records, index-aligned with the batch vectors.
struct Materialized {
    modules: Vec<String>,
    classes: Vec<String>,
    functions: Vec<String>,
}

#[derive(Default)]
struct Resolution {
    relationships: Vec<Relationship>,
    resolved: usize,
    unresolved: usize,
}

#[derive(Default)]
pub struct CcmBuilder {
    counter: usize,
    nodes: Vec<CcmNode>,
    positions: HashMap<String, usize>,
    symbols: SymbolTable,
}

impl CcmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for `batch`.
    pub fn build(mut self, batch: &IrBatch, project: ProjectInfo) -> CcmAnalysisResult {
        let materialized = self.materialize(batch);
        info!(
            nodes = self.nodes.len(),
            lookup_entries = self.symbols.len(),
            collisions = self.symbols.collisions(),
            "phase 1 complete"
        );

        let resolution = self.resolve(batch, &materialized);
        info!(
            relationships = resolution.relationships.len(),
            resolved = resolution.resolved,
            unresolved = resolution.unresolved,
            "phase 2 complete"
        );

        let metadata = self.metadata(&resolution, &project);
        CcmAnalysisResult {
            ccm_version: CCM_VERSION.to_string(),
            project: CcmProject {
                name: project.name,
                root_path: project.root_path,
                project_type: project.project_type,
                languages: project.languages,
            },
            nodes: self.nodes,
            relationships: resolution.relationships,
            metadata,
        }
    }

    fn next_id(&mut self, node_type: NodeType) -> String {
        self.counter += 1;
        format!("{}_{:06}", node_type.id_prefix(), self.counter)
    }

    fn push(&mut self, node: CcmNode) {
        self.positions.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn attach(&mut self, parent_id: &str, child_id: &str) {
        if let Some(&pos) = self.positions.get(parent_id) {
            self.nodes[pos].add_child(child_id);
        }
    }

    /// Phase 1.
    fn materialize(&mut self, batch: &IrBatch) -> Materialized {
        let mut module_by_path: HashMap<&str, String> = HashMap::new();
        let mut modules = Vec::with_capacity(batch.modules.len());
        for module in &batch.modules {
            let id = self.next_id(NodeType::Module);
            let mut node = CcmNode::new(
                id.clone(),
                &module.name,
                NodeType::Module,
                Location::lines(&module.file_path, 1, module.line_count.max(1)),
                module.language,
            );
            node.children_ids = Some(Vec::new());
            node.relationships = Some(Vec::new());
            node.documentation =
                convert::documentation(module.docstring.as_deref(), header_comments(module));
            self.push(node);

            self.symbols.register_module(&module.name, &id);
            module_by_path.insert(module.file_path.as_str(), id.clone());
            modules.push(id);
        }

        let mut class_by_path: HashMap<(&str, &str), String> = HashMap::new();
        let mut classes = Vec::with_capacity(batch.classes.len());
        for class in &batch.classes {
            let node_type = if class.is_interface {
                NodeType::Interface
            } else {
                NodeType::Class
            };
            let id = self.next_id(node_type);
            let parent = module_by_path.get(class.file_path.as_str()).cloned();

            let mut node = CcmNode::new(
                id.clone(),
                &class.name,
                node_type,
                Location::lines(&class.file_path, class.start_line, class.end_line),
                class.language,
            );
            node.visibility = Some(convert::visibility("public"));
            node.modifiers = Some(convert::class_modifiers(class));
            node.parent_id = parent.clone();
            node.children_ids = Some(Vec::new());
            node.relationships = Some(Vec::new());
            node.documentation = convert::documentation(class.docstring.as_deref(), &class.comments);
            self.push(node);

            if let Some(parent) = parent {
                self.attach(&parent, &id);
            }
            self.symbols.register_class(&class.module_name, &class.name, &id);
            class_by_path.insert((class.file_path.as_str(), class.name.as_str()), id.clone());
            classes.push(id);
        }

        let mut functions = Vec::with_capacity(batch.functions.len());
        for func in &batch.functions {
            let profile = profile_for(func.language);
            let node_type = if profile.is_constructor(&func.name, func.class_name.as_deref()) {
                NodeType::Constructor
            } else if func.class_name.is_some() {
                NodeType::Method
            } else {
                NodeType::Function
            };
            let id = self.next_id(node_type);

            let owner_class = func
                .class_name
                .as_deref()
                .and_then(|class| class_by_path.get(&(func.file_path.as_str(), class)));
            let parent = owner_class
                .or_else(|| module_by_path.get(func.file_path.as_str()))
                .cloned();

            let mut node = CcmNode::new(
                id.clone(),
                &func.name,
                node_type,
                Location::lines(&func.file_path, func.start_line, func.end_line),
                func.language,
            );
            node.visibility = Some(convert::visibility(&func.visibility));
            node.modifiers = Some(convert::function_modifiers(func));
            node.parameters = Some(convert::parameters(
                &func.parameters,
                &func.type_annotations,
                func.language,
            ));
            node.return_type = func
                .return_type
                .as_deref()
                .and_then(|t| convert::type_info(t, func.language));
            node.parent_id = parent.clone();
            node.children_ids = Some(Vec::new());
            node.relationships = Some(Vec::new());
            node.documentation = convert::documentation(func.docstring.as_deref(), &func.comments);
            self.push(node);

            if let Some(parent) = parent {
                self.attach(&parent, &id);
            }
            self.symbols.register_function(
                &func.module_name,
                func.class_name.as_deref(),
                &func.name,
                &func.qualified_name(),
                &id,
            );
            functions.push(id);
        }

        for comment in &batch.comments {
            let id = self.next_id(NodeType::Comment);
            let node = comment_node(id, comment);
            self.push(node);
        }

        Materialized {
            modules,
            classes,
            functions,
        }
    }

    /// Phase 2.
    fn resolve(&mut self, batch: &IrBatch, ids: &Materialized) -> Resolution {
        let mut resolution = Resolution::default();

        for (module, source) in batch.modules.iter().zip(&ids.modules) {
            for statement in &module.imports {
                let Some(target) = import_target(statement) else {
                    debug!(statement = %statement, "import has no target name");
                    continue;
                };
                let target_id = self
                    .symbols
                    .resolve(&target, Scope::global())
                    .map(str::to_string);
                let mut metadata = BTreeMap::new();
                metadata.insert("statement".to_string(), json!(statement));
                self.link(
                    source,
                    RelationshipType::Imports,
                    target,
                    target_id,
                    Some(metadata),
                    &mut resolution,
                );
            }
        }

        for (class, source) in batch.classes.iter().zip(&ids.classes) {
            for parent in &class.parent_classes {
                let target_id = self
                    .symbols
                    .resolve(parent, Scope::module(&class.module_name))
                    .map(str::to_string);
                self.link(
                    source,
                    RelationshipType::Inherits,
                    parent.clone(),
                    target_id,
                    None,
                    &mut resolution,
                );
            }
        }

        for (func, source) in batch.functions.iter().zip(&ids.functions) {
            let scope = Scope::member(&func.module_name, func.class_name.as_deref());
            for call in &func.calls {
                if is_noise_call(call) {
                    continue;
                }
                // Unresolved calls are dropped without counting.
                if let Some(target_id) = self.symbols.resolve(call, scope).map(str::to_string) {
                    self.link(
                        source,
                        RelationshipType::Calls,
                        call.clone(),
                        Some(target_id),
                        None,
                        &mut resolution,
                    );
                }
            }
        }

        resolution
    }

    fn link(
        &mut self,
        source_id: &str,
        kind: RelationshipType,
        target_name: String,
        target_id: Option<String>,
        metadata: Option<BTreeMap<String, Value>>,
        resolution: &mut Resolution,
    ) {
        if target_id.is_some() {
            resolution.resolved += 1;
        } else {
            resolution.unresolved += 1;
        }
        let relationship = Relationship {
            kind,
            target_id: target_id.unwrap_or_default(),
            target_name,
            metadata,
        };
        if let Some(&pos) = self.positions.get(source_id) {
            self.nodes[pos].add_relationship(relationship.clone());
        }
        resolution.relationships.push(relationship);
    }

    fn metadata(&self, resolution: &Resolution, project: &ProjectInfo) -> CcmMetadata {
        let mut node_type_counts = BTreeMap::new();
        let mut language_distribution = BTreeMap::new();
        for node in &self.nodes {
            *node_type_counts
                .entry(node.node_type.as_str().to_string())
                .or_insert(0) += 1;
            *language_distribution
                .entry(node.language.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut relationship_type_counts = BTreeMap::new();
        for rel in &resolution.relationships {
            *relationship_type_counts
                .entry(rel.kind.as_str().to_string())
                .or_insert(0) += 1;
        }

        CcmMetadata {
            analysis_timestamp: project.timestamp.clone(),
            analyzer_version: ANALYZER_VERSION.to_string(),
            total_nodes: self.nodes.len(),
            total_relationships: resolution.relationships.len(),
            resolved_relationships: resolution.resolved,
            unresolved_relationships: resolution.unresolved,
            resolution_rate: resolution_rate(resolution.resolved, resolution.unresolved),
            node_type_counts,
            language_distribution,
            relationship_type_counts,
            lookup_table_size: self.symbols.len(),
            lookup_collisions: self.symbols.collisions(),
            original_stats: project.stats.clone(),
        }
    }
}

/// Build a CCM document from a whole-repository IR batch.
pub fn build_ccm(batch: &IrBatch, project: ProjectInfo) -> CcmAnalysisResult {
    CcmBuilder::new().build(batch, project)
}

/// Resolved share of all counted relationships as a percentage, rounded to
/// one decimal. Zero when nothing was counted.
pub fn resolution_rate(resolved: usize, unresolved: usize) -> f64 {
    let total = resolved + unresolved;
    if total == 0 {
        return 0.0;
    }
    (resolved as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Comments forming the file header: the contiguous run starting on line 1,
/// or on line 2 below an interpreter line.
fn header_comments(module: &ModuleInfo) -> &[CommentInfo] {
    let first = if module.shebang.is_some() { 2 } else { 1 };
    let len = module
        .comments
        .iter()
        .enumerate()
        .take_while(|(i, c)| c.line_number == first + i)
        .count();
    &module.comments[..len]
}

fn comment_node(id: String, comment: &CommentInfo) -> CcmNode {
    let mut node = CcmNode::new(
        id,
        format!("comment_{}", comment.line_number),
        NodeType::Comment,
        Location::lines(&comment.file_path, comment.line_number, comment.line_number),
        comment.language,
    );
    node.raw_content = Some(comment.content.clone());
    let mut annotations = BTreeMap::new();
    annotations.insert(
        "comment_type".to_string(),
        json!(comment.comment_type.as_str()),
    );
    node.annotations = Some(annotations);
    node
}
