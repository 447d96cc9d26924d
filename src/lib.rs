//! yamlscout — structural YAML queries.
//!
//! Compile a path expression once with [`yamlpath::Path::parse`], then
//! evaluate it against any number of documents. Matches come back either
//! as node references or as index routes that support in-place edits of
//! the tree, so callers can rewrite exactly the subtrees they mean to
//! without string-replacing in the serialized form.
//!
//! ```
//! use yamlscout::document::parser::from_str;
//! use yamlscout::yamlpath::Path;
//!
//! let mut doc = from_str("containers:\n- image: nginx\n- image: redis\n").unwrap();
//! let path = Path::parse("$.containers[*].image").unwrap();
//!
//! for route in path.find_routes(&doc) {
//!     let image = doc.descend_mut(&route).unwrap();
//!     image.set_value(format!("registry.local/{}", image.value()));
//! }
//! assert_eq!(doc.descend(&[0, 1, 0, 1]).unwrap().value(), "registry.local/nginx");
//! ```

pub mod document;
pub mod yamlpath;

pub use document::node::{Node, NodeKind};
pub use yamlpath::{Path, PathError};
