//! Compiled path steps.

use crate::yamlpath::filter::FilterExpr;
use crate::yamlpath::slice::Subscript;

/// One step of a compiled path. A path is a chain of segments; evaluating
/// a segment maps each candidate node to zero or more result nodes.
#[derive(Debug, Clone)]
pub enum Segment {
    /// `$`: unwrap a document to its root value.
    Root,
    /// `.name`: the value of the first matching key of a mapping.
    Child(String),
    /// `.*`: every mapping value or sequence element.
    AllChildren,
    /// `['a','b']`: values of every matching key, name order first.
    BracketChildren(Vec<String>),
    /// `[0]`, `[1:2]`, `[*]`, unions: selected sequence elements, or all
    /// mapping values for `[*]`.
    Subscript(Subscript),
    /// `..`: the node and its transitive descendants, children first.
    Recurse,
    /// `[?(...)]`: keep matching elements of a sequence, or guard any
    /// other node.
    Filter(FilterExpr),
    /// `..[?(...)]`: guard each node itself during recursive descent.
    RecursiveFilter(FilterExpr),
    /// `.name~`: the first matching key node of a mapping.
    Key(String),
    /// `['a','b']~`: every matching key node, name order first.
    Keys(Vec<String>),
    /// `[...]~`: key nodes selected by subscript; only `[*]~` on a
    /// mapping yields anything.
    KeySubscript(Subscript),
}
