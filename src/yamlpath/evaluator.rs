//! Path evaluation over the node tree.
//!
//! Candidates flow through the segment chain as `(route, node)` pairs,
//! where the route is the list of content indices from the starting node.
//! Each segment fans a candidate out to zero or more results; incompatible
//! node kinds contribute nothing. Duplicates are preserved.

use crate::document::node::{Node, NodeKind};
use crate::yamlpath::filter;
use crate::yamlpath::segment::Segment;

/// A match with the route that reaches it.
pub(crate) type Located<'a> = (Vec<usize>, &'a Node);

/// Runs the segment chain starting at `node`, with `root` anchoring `$`
/// sub-paths inside filters.
pub(crate) fn select<'a>(segments: &[Segment], node: &'a Node, root: &'a Node) -> Vec<Located<'a>> {
    let mut current: Vec<Located<'a>> = vec![(Vec::new(), node)];
    for segment in segments {
        let mut next = Vec::new();
        for (route, node) in &current {
            apply(segment, route, node, root, &mut next);
        }
        current = next;
    }
    current
}

fn apply<'a>(
    segment: &Segment,
    route: &[usize],
    node: &'a Node,
    root: &'a Node,
    out: &mut Vec<Located<'a>>,
) {
    match segment {
        Segment::Root => {
            if node.kind() == NodeKind::Document {
                if let Some(value) = node.content().first() {
                    out.push((extend(route, 0), value));
                }
            } else {
                out.push((route.to_vec(), node));
            }
        }
        Segment::Child(name) => {
            if node.kind() != NodeKind::Mapping {
                return;
            }
            for (i, pair) in node.content().chunks_exact(2).enumerate() {
                if pair[0].value() == name {
                    out.push((extend(route, i * 2 + 1), &pair[1]));
                    return;
                }
            }
        }
        Segment::AllChildren => all_children(route, node, out),
        Segment::BracketChildren(names) => {
            if node.kind() != NodeKind::Mapping {
                return;
            }
            for name in names {
                for (i, pair) in node.content().chunks_exact(2).enumerate() {
                    if pair[0].value() == name {
                        out.push((extend(route, i * 2 + 1), &pair[1]));
                    }
                }
            }
        }
        Segment::Subscript(subscript) => match node.kind() {
            NodeKind::Mapping if subscript.is_star() => all_children(route, node, out),
            NodeKind::Sequence => {
                let content = node.content();
                for position in subscript.positions(content.len()) {
                    out.push((extend(route, position), &content[position]));
                }
            }
            _ => {}
        },
        Segment::Recurse => recurse(route, node, out),
        Segment::Filter(expr) => {
            if node.kind() == NodeKind::Sequence {
                for (i, element) in node.content().iter().enumerate() {
                    if filter::matches(expr, element, root) {
                        out.push((extend(route, i), element));
                    }
                }
            } else if filter::matches(expr, node, root) {
                out.push((route.to_vec(), node));
            }
        }
        Segment::RecursiveFilter(expr) => {
            if filter::matches(expr, node, root) {
                out.push((route.to_vec(), node));
            }
        }
        Segment::Key(name) => {
            if node.kind() != NodeKind::Mapping {
                return;
            }
            for (i, pair) in node.content().chunks_exact(2).enumerate() {
                if pair[0].value() == name {
                    out.push((extend(route, i * 2), &pair[0]));
                    return;
                }
            }
        }
        Segment::Keys(names) => {
            if node.kind() != NodeKind::Mapping {
                return;
            }
            for name in names {
                for (i, pair) in node.content().chunks_exact(2).enumerate() {
                    if pair[0].value() == name {
                        out.push((extend(route, i * 2), &pair[0]));
                    }
                }
            }
        }
        Segment::KeySubscript(subscript) => {
            if node.kind() == NodeKind::Mapping && subscript.is_star() {
                for (i, pair) in node.content().chunks_exact(2).enumerate() {
                    out.push((extend(route, i * 2), &pair[0]));
                }
            }
        }
    }
}

/// Mapping values, sequence elements, nothing for other kinds.
fn all_children<'a>(route: &[usize], node: &'a Node, out: &mut Vec<Located<'a>>) {
    match node.kind() {
        NodeKind::Mapping => {
            for (i, pair) in node.content().chunks_exact(2).enumerate() {
                out.push((extend(route, i * 2 + 1), &pair[1]));
            }
        }
        NodeKind::Sequence => {
            for (i, element) in node.content().iter().enumerate() {
                out.push((extend(route, i), element));
            }
        }
        _ => {}
    }
}

/// Emits every node of the subtree, children before parents, the node
/// itself after its descendants.
fn recurse<'a>(route: &[usize], node: &'a Node, out: &mut Vec<Located<'a>>) {
    for (i, child) in node.content().iter().enumerate() {
        recurse(&extend(route, i), child, out);
    }
    out.push((route.to_vec(), node));
}

fn extend(route: &[usize], step: usize) -> Vec<usize> {
    let mut extended = Vec::with_capacity(route.len() + 1);
    extended.extend_from_slice(route);
    extended.push(step);
    extended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::Node;
    use crate::yamlpath::slice::Subscript;

    fn config() -> Node {
        Node::mapping(vec![
            (Node::string("name"), Node::string("demo")),
            (
                Node::string("hosts"),
                Node::sequence(vec![Node::string("a"), Node::string("b"), Node::string("c")]),
            ),
            (Node::string("name"), Node::string("shadow")),
        ])
    }

    fn values(results: &[Located<'_>]) -> Vec<String> {
        results.iter().map(|(_, n)| n.value().to_string()).collect()
    }

    #[test]
    fn test_child_takes_first_match() {
        let node = config();
        let results = select(&[Segment::Child("name".into())], &node, &node);
        assert_eq!(values(&results), vec!["demo"]);
        assert_eq!(results[0].0, vec![1]);
    }

    #[test]
    fn test_bracket_children_take_every_match() {
        let node = config();
        let results = select(&[Segment::BracketChildren(vec!["name".into()])], &node, &node);
        assert_eq!(values(&results), vec!["demo", "shadow"]);
    }

    #[test]
    fn test_bracket_children_follow_name_order() {
        let node = config();
        let segments = [Segment::BracketChildren(vec!["hosts".into(), "name".into()])];
        let results = select(&segments, &node, &node);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1.kind(), NodeKind::Sequence);
        assert_eq!(results[1].1.value(), "demo");
    }

    #[test]
    fn test_all_children_on_scalar_is_empty() {
        let node = Node::int(1);
        assert!(select(&[Segment::AllChildren], &node, &node).is_empty());
    }

    #[test]
    fn test_subscript_star_on_mapping_yields_values() {
        let node = config();
        let results = select(&[Segment::Subscript(Subscript::Star)], &node, &node);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1.value(), "demo");
    }

    #[test]
    fn test_subscript_on_mapping_non_star_is_empty() {
        let node = config();
        let subscript = Subscript::parse("0").unwrap();
        assert!(select(&[Segment::Subscript(subscript)], &node, &node).is_empty());
    }

    #[test]
    fn test_recurse_emits_children_before_parents() {
        let node = Node::sequence(vec![Node::int(1), Node::sequence(vec![Node::int(2)])]);
        let results = select(&[Segment::Recurse], &node, &node);
        let kinds: Vec<NodeKind> = results.iter().map(|(_, n)| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Scalar, NodeKind::Scalar, NodeKind::Sequence, NodeKind::Sequence]
        );
        // the last entry is the starting node itself
        assert_eq!(results.last().unwrap().0, Vec::<usize>::new());
    }

    #[test]
    fn test_recurse_visits_mapping_keys() {
        let node = config();
        let results = select(&[Segment::Recurse], &node, &node);
        assert!(results.iter().any(|(_, n)| n.value() == "hosts"));
    }

    #[test]
    fn test_key_segment_emits_key_node() {
        let node = config();
        let results = select(&[Segment::Key("hosts".into())], &node, &node);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, vec![2]);
        assert_eq!(results[0].1.value(), "hosts");
    }

    #[test]
    fn test_key_subscript_star_emits_all_keys() {
        let node = config();
        let results = select(&[Segment::KeySubscript(Subscript::Star)], &node, &node);
        assert_eq!(values(&results), vec!["name", "hosts", "name"]);
    }

    #[test]
    fn test_key_subscript_on_sequence_is_empty() {
        let node = Node::sequence(vec![Node::int(1)]);
        assert!(select(&[Segment::KeySubscript(Subscript::Star)], &node, &node).is_empty());
    }

    #[test]
    fn test_routes_descend_to_results() {
        let node = config();
        let segments = [Segment::Child("hosts".into()), Segment::AllChildren];
        for (route, found) in select(&segments, &node, &node) {
            assert_eq!(node.descend(&route).unwrap(), found);
        }
    }
}
