//! End-to-end runs over the sample repository and small temp repositories.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ccm_analyzer::{
    AnalysisOutcome, Analyzer, CcmAnalysisResult, Config, NodeType, RelationshipType, Strategy,
};
use tempfile::TempDir;

fn sample_repo() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("sample_repo")
}

fn analyze(root: &Path) -> AnalysisOutcome {
    ccm_analyzer::init();
    Analyzer::new(root, Config::default())
        .run()
        .expect("analysis should succeed")
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn node_named<'a>(ccm: &'a CcmAnalysisResult, name: &str, node_type: NodeType) -> &'a ccm_analyzer::CcmNode {
    ccm.nodes
        .iter()
        .find(|n| n.name == name && n.node_type == node_type)
        .unwrap_or_else(|| panic!("no {:?} node named {}", node_type, name))
}

// =============================================================================
// Graph invariants
// =============================================================================

#[test]
fn test_sample_repo_structure() {
    let outcome = analyze(&sample_repo());

    assert_eq!(outcome.stats.project_type, "python");
    assert_eq!(outcome.stats.total_files, 6);
    assert_eq!(outcome.stats.files_failed, 0);

    let paths: Vec<&str> = outcome
        .batch
        .modules
        .iter()
        .map(|m| m.file_path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec![
            "core/store.rs",
            "scripts/greeter.rb",
            "server/main.go",
            "web/client.js",
            "zoo/animals.py",
            "zoo/app.py",
        ]
    );

    let ccm = &outcome.ccm;
    assert_eq!(ccm.ccm_version, "1.0");
    assert_eq!(ccm.project.project_type, "python");
    assert_eq!(ccm.nodes_of_type(NodeType::Module).count(), 6);
    assert_eq!(ccm.metadata.total_nodes, ccm.nodes.len());
    assert_eq!(ccm.metadata.total_relationships, ccm.relationships.len());
    assert!(ccm.metadata.analysis_timestamp.is_some());
    assert!(ccm.metadata.original_stats.is_some());
}

#[test]
fn test_graph_invariants_hold() {
    let outcome = analyze(&sample_repo());
    let ccm = &outcome.ccm;

    let ids: HashSet<&str> = ccm.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), ccm.nodes.len(), "node ids must be unique");

    for node in &ccm.nodes {
        if node.node_type == NodeType::Comment {
            assert!(node.parent_id.is_none());
            assert!(node.children().is_empty());
            assert!(node.parameters.is_none());
            assert!(node.relationships().is_empty());
            assert!(node.raw_content.is_some());
        }
        if let Some(parent_id) = &node.parent_id {
            let parent = ccm.node(parent_id).expect("parent exists");
            assert!(parent.children().iter().any(|c| c == &node.id));
        }
        for child in node.children() {
            assert_eq!(ccm.node(child).unwrap().parent_id.as_deref(), Some(node.id.as_str()));
        }
    }

    for rel in &ccm.relationships {
        assert!(!rel.target_name.is_empty());
        if rel.kind == RelationshipType::Calls {
            assert!(!rel.target_id.is_empty(), "unresolved calls are never emitted");
        }
        if !rel.target_id.is_empty() {
            assert!(ids.contains(rel.target_id.as_str()));
        }
    }

    let unresolved = ccm
        .relationships
        .iter()
        .filter(|r| r.target_id.is_empty())
        .count();
    assert_eq!(ccm.metadata.unresolved_relationships, unresolved);
    assert_eq!(
        ccm.metadata.resolved_relationships + ccm.metadata.unresolved_relationships,
        ccm.relationships.len()
    );
}

#[test]
fn test_rerun_is_structurally_identical() {
    let first = analyze(&sample_repo());
    let second = analyze(&sample_repo());

    assert_eq!(first.ccm.nodes, second.ccm.nodes);
    assert_eq!(first.ccm.relationships, second.ccm.relationships);
    assert_eq!(
        first.ccm.metadata.resolution_rate,
        second.ccm.metadata.resolution_rate
    );
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = analyze(&sample_repo());
    let config = Config {
        parallel: true,
        ..Config::default()
    };
    let parallel = Analyzer::new(sample_repo(), config).run().unwrap();

    assert_eq!(sequential.batch, parallel.batch);
    assert_eq!(sequential.ccm.nodes, parallel.ccm.nodes);
    assert_eq!(sequential.ccm.relationships, parallel.ccm.relationships);
}

#[test]
fn test_pattern_fallback_languages() {
    let outcome = analyze(&sample_repo());
    let ccm = &outcome.ccm;

    // Ruby has no grammar and goes through the patterns.
    let greet = node_named(ccm, "greet", NodeType::Function);
    assert_eq!(greet.location.file_path, "scripts/greeter.rb");
    node_named(ccm, "Greeter", NodeType::Class);

    let greeter = node_named(ccm, "greeter", NodeType::Module);
    let import = greeter
        .relationships()
        .iter()
        .find(|r| r.kind == RelationshipType::Imports)
        .expect("require recovered");
    assert_eq!(import.target_name, "json");
    assert_eq!(import.target_id, "");

    assert!(outcome.stats.strategy_count(Strategy::Pattern) >= 1);
}

#[test]
fn test_unknown_import_is_kept_unresolved() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "service.py",
        "import requests\n\n\ndef fetch(url):\n    return requests.get(url)\n",
    );

    let outcome = analyze(dir.path());
    let ccm = &outcome.ccm;
    let imports: Vec<_> = ccm
        .relationships
        .iter()
        .filter(|r| r.kind == RelationshipType::Imports)
        .collect();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].target_name, "requests");
    assert_eq!(imports[0].target_id, "");
    assert_eq!(ccm.metadata.unresolved_relationships, 1);
    assert_eq!(ccm.metadata.resolution_rate, 0.0);
}

#[test]
fn test_excluded_paths_from_config_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ccm.yaml", "exclude_paths:\n  - \"vendored/**\"\n");
    write(dir.path(), "app.py", "def run():\n    return 1\n");
    write(dir.path(), "vendored/lib.py", "def other():\n    return 2\n");

    let config = Config::load(dir.path(), None).unwrap();
    let outcome = Analyzer::new(dir.path(), config).run().unwrap();
    let paths: Vec<_> = outcome.batch.modules.iter().map(|m| m.file_path.as_str()).collect();
    assert_eq!(paths, vec!["app.py"]);
    // The excluded file and the config file itself.
    assert_eq!(outcome.stats.files_ignored, 2);
}

#[test]
fn test_test_files_opt_in() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "calc.py", "def add(a, b):\n    return a + b\n");
    write(dir.path(), "test_calc.py", "def test_add():\n    assert add(1, 2) == 3\n");

    assert_eq!(analyze(dir.path()).stats.total_files, 1);

    let config = Config {
        include_test_files: true,
        ..Config::default()
    };
    let outcome = Analyzer::new(dir.path(), config).run().unwrap();
    assert_eq!(outcome.stats.total_files, 2);
}

// =============================================================================
// Resolution over grammar-extracted IR
// =============================================================================

#[test]
#[cfg(feature = "tree-sitter")]
fn test_cross_module_call_resolution() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.py", "def helper():\n    return 42\n");
    write(dir.path(), "b.py", "def main():\n    print(helper())\n");

    let outcome = analyze(dir.path());
    let ccm = &outcome.ccm;
    assert_eq!(ccm.nodes_of_type(NodeType::Module).count(), 2);
    assert_eq!(ccm.nodes_of_type(NodeType::Function).count(), 2);

    let helper = node_named(ccm, "helper", NodeType::Function);
    let calls: Vec<_> = ccm
        .relationships
        .iter()
        .filter(|r| r.kind == RelationshipType::Calls)
        .collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target_id, helper.id);
    assert_eq!(calls[0].target_name, "helper");
    assert_eq!(ccm.metadata.resolved_relationships, 1);
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_sample_repo_relationships() {
    let outcome = analyze(&sample_repo());
    let ccm = &outcome.ccm;

    // Inheritance: one internal parent, two external ones.
    let dog = node_named(ccm, "Dog", NodeType::Class);
    let animal = node_named(ccm, "Animal", NodeType::Class);
    let dog_parent = dog
        .relationships()
        .iter()
        .find(|r| r.kind == RelationshipType::Inherits)
        .unwrap();
    assert_eq!(dog_parent.target_id, animal.id);

    let robot = node_named(ccm, "Robot", NodeType::Class);
    let robot_parent = &robot.relationships()[0];
    assert_eq!(robot_parent.target_name, "Machine");
    assert_eq!(robot_parent.target_id, "");

    let client = node_named(ccm, "Client", NodeType::Class);
    assert_eq!(client.relationships()[0].target_name, "Base");

    // Imports resolve against module names.
    let app = node_named(ccm, "app", NodeType::Module);
    let animals_module = node_named(ccm, "animals", NodeType::Module);
    let targets: Vec<(&str, &str)> = app
        .relationships()
        .iter()
        .map(|r| (r.target_name.as_str(), r.target_id.as_str()))
        .collect();
    assert!(targets.contains(&("animals", animals_module.id.as_str())));
    assert!(targets.contains(&("os", "")));

    // Calls.
    let main_py = ccm
        .nodes
        .iter()
        .find(|n| n.name == "main" && n.location.file_path == "zoo/app.py")
        .unwrap();
    let called: HashSet<&str> = main_py
        .relationships()
        .iter()
        .map(|r| r.target_name.as_str())
        .collect();
    assert!(called.contains("Dog"));
    assert!(called.contains("describe_all"));
    assert!(!called.contains("print"));

    let load = node_named(ccm, "load", NodeType::Method);
    let fetch_item = node_named(ccm, "fetchItem", NodeType::Function);
    assert_eq!(load.relationships()[0].target_id, fetch_item.id);
    assert_eq!(load.parent_id.as_deref(), Some(client.id.as_str()));
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_default_and_optional_parameters() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "make.py",
        "def create(name: str = \"rex\", *args, retries=3):\n    return name\n",
    );
    write(
        dir.path(),
        "f.ts",
        "export function f(a: number, b?: string, c = 2) {\n  return a;\n}\n",
    );

    let outcome = analyze(dir.path());
    let ccm = &outcome.ccm;

    let create = node_named(ccm, "create", NodeType::Function);
    let params = create.parameters.as_ref().unwrap();
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["name", "args", "retries"]);
    assert!(params[0].is_optional);
    assert_eq!(params[0].default_value.as_deref(), Some("\"rex\""));
    assert_eq!(params[0].type_info.as_ref().unwrap().name, "str");
    assert!(params[1].is_variadic);
    assert!(params[2].is_optional);
    assert_eq!(params[2].default_value.as_deref(), Some("3"));

    let f = node_named(ccm, "f", NodeType::Function);
    let params = f.parameters.as_ref().unwrap();
    assert!(!params[0].is_optional);
    assert_eq!(params[1].name, "b");
    assert!(params[1].is_optional);
    assert_eq!(params[1].default_value, None);
    assert_eq!(params[2].default_value.as_deref(), Some("2"));
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_methods_from_receivers_and_impls() {
    let outcome = analyze(&sample_repo());
    let ccm = &outcome.ccm;

    let server = node_named(ccm, "Server", NodeType::Class);
    let start = node_named(ccm, "Start", NodeType::Method);
    assert_eq!(start.parent_id.as_deref(), Some(server.id.as_str()));

    let store = node_named(ccm, "Store", NodeType::Class);
    let new = node_named(ccm, "new", NodeType::Constructor);
    assert_eq!(new.parent_id.as_deref(), Some(store.id.as_str()));
    let put = node_named(ccm, "put", NodeType::Method);
    assert_eq!(put.parameters.as_ref().unwrap().len(), 3);

    let init = node_named(ccm, "__init__", NodeType::Constructor);
    let animal = node_named(ccm, "Animal", NodeType::Class);
    assert_eq!(init.parent_id.as_deref(), Some(animal.id.as_str()));

    let store_doc = store.documentation.as_ref().unwrap();
    assert_eq!(store_doc.summary.as_deref(), Some("A key-value store."));
}
