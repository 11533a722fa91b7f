//! Canonical Code Model: the language-neutral graph built from the IR.

pub mod builder;
pub mod convert;
pub mod imports;
pub mod model;
pub mod noise;
pub mod symbols;

pub use builder::{build_ccm, CcmBuilder, ProjectInfo, ANALYZER_VERSION};
pub use model::{
    CcmAnalysisResult, CcmMetadata, CcmNode, CcmProject, NodeType, Relationship, RelationshipType,
};
