//! Configuration tree model, JSONC parsing, merging and diffing
//!
//! Editor configuration files are parsed into a [`Node`] tree, a tagged
//! union of scalars, mappings and sequences. Layers are combined with
//! [`merge`] and compared with [`SemanticDiff`].

pub mod diff;
pub mod error;
pub mod jsonc;
pub mod merge;
pub mod tree;

pub use diff::{SemanticChange, SemanticDiff};
pub use error::{Error, Result};
pub use merge::{dedupe_preserving_order, merge, merge_all, merge_node};
pub use tree::{Mapping, Node, Scalar};
