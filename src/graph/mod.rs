//! Affected-module analysis over the project dependency graph
//!
//! Built on petgraph for direct control and minimal abstraction. The
//! pipeline is: changed paths → classifier → affected-set computation,
//! fronted by the detector facade.

pub mod affected;
pub mod classifier;
pub mod dependency_graph;
pub mod detector;

pub use affected::ProjectSubset;
pub use dependency_graph::{DependencyGraph, ModuleDescriptor};
pub use detector::{AffectedModuleDetector, AffectedReport, DetectorOptions};
