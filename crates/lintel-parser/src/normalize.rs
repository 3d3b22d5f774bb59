//! HTML void-element normalization.
//!
//! In HTML mode, elements like `<br>` never have children: a Start node
//! for a void name is rewritten to Empty, and every void-element End
//! node is dropped, wherever it appears. XML mode skips this pass
//! entirely.
//!
//! The pass is a single forward scan producing a new sequence; running
//! it again is a no-op, since it emits no void Start or End node.

use lintel_core::syntax_tree::{NodeKind, SyntaxNode};

/// Element names that cannot have children in HTML.
///
/// Matching is case-sensitive: markup is expected lowercase, matching
/// the names here.
const VOID_ELEMENTS: [&str; 18] = [
    "area", "base", "br", "col", "embed", "hr", "iframe", "img", "input", "link", "meta", "param",
    "source", "track", "wbr", "command", "keygen", "menuitem",
];

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Rewrite void-element Start nodes to Empty and drop void-element End
/// nodes.
pub(crate) fn collapse_void_elements(nodes: Vec<SyntaxNode<'_>>) -> Vec<SyntaxNode<'_>> {
    let mut result = Vec::with_capacity(nodes.len());
    let mut rewritten = 0usize;
    let mut dropped = 0usize;

    for node in nodes {
        match node {
            SyntaxNode::Element(mut element) if is_void_element(element.key) => {
                match element.kind {
                    NodeKind::Start => {
                        element.kind = NodeKind::Empty;
                        rewritten += 1;
                        result.push(SyntaxNode::Element(element));
                    }
                    NodeKind::End => dropped += 1,
                    NodeKind::Empty => result.push(SyntaxNode::Element(element)),
                }
            }
            other => result.push(other),
        }
    }

    if rewritten > 0 || dropped > 0 {
        log::debug!("normalized {rewritten} void elements, dropped {dropped} end tags");
    }
    result
}

#[cfg(test)]
mod tests {
    use lintel_core::{Location, syntax_tree::ElementNode};

    use super::*;

    fn element(key: &str, kind: NodeKind) -> SyntaxNode<'_> {
        SyntaxNode::Element(ElementNode {
            key,
            kind,
            bindings: Vec::new(),
            location: Location::default(),
        })
    }

    fn kinds<'s>(nodes: &[SyntaxNode<'s>]) -> Vec<(&'s str, NodeKind)> {
        nodes
            .iter()
            .map(|n| {
                let e = n.as_element().expect("element");
                (e.key, e.kind)
            })
            .collect()
    }

    #[test]
    fn test_void_start_becomes_empty() {
        let nodes = collapse_void_elements(vec![element("br", NodeKind::Start)]);
        assert_eq!(kinds(&nodes), vec![("br", NodeKind::Empty)]);
    }

    #[test]
    fn test_void_start_end_pair_collapses_to_one() {
        let nodes = collapse_void_elements(vec![
            element("br", NodeKind::Start),
            element("br", NodeKind::End),
        ]);
        assert_eq!(kinds(&nodes), vec![("br", NodeKind::Empty)]);
    }

    #[test]
    fn test_non_void_elements_untouched() {
        let input = vec![element("div", NodeKind::Start), element("div", NodeKind::End)];
        let nodes = collapse_void_elements(input.clone());
        assert_eq!(nodes, input);
    }

    #[test]
    fn test_end_tag_dropped_wherever_it_appears() {
        let nodes = collapse_void_elements(vec![
            element("br", NodeKind::Start),
            element("div", NodeKind::Start),
            element("div", NodeKind::End),
            element("br", NodeKind::End),
        ]);
        assert_eq!(
            kinds(&nodes),
            vec![
                ("br", NodeKind::Empty),
                ("div", NodeKind::Start),
                ("div", NodeKind::End),
            ]
        );
    }

    #[test]
    fn test_lone_end_tag_dropped() {
        let nodes = collapse_void_elements(vec![element("hr", NodeKind::End)]);
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_no_void_end_node_survives() {
        let nodes = collapse_void_elements(vec![
            element("img", NodeKind::End),
            element("br", NodeKind::Start),
            element("span", NodeKind::Start),
            element("br", NodeKind::End),
            element("span", NodeKind::End),
        ]);
        assert!(!nodes.iter().any(|n| {
            let e = n.as_element().expect("element");
            e.kind.is_end() && is_void_element(e.key)
        }));
    }

    #[test]
    fn test_already_empty_nodes_untouched() {
        let input = vec![element("br", NodeKind::Empty)];
        let nodes = collapse_void_elements(input.clone());
        assert_eq!(nodes, input);
    }

    #[test]
    fn test_case_sensitive_matching() {
        let nodes = collapse_void_elements(vec![element("BR", NodeKind::Start)]);
        assert_eq!(kinds(&nodes), vec![("BR", NodeKind::Start)]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            element("br", NodeKind::Start),
            element("br", NodeKind::End),
            element("input", NodeKind::Start),
            element("div", NodeKind::Start),
            element("div", NodeKind::End),
        ];
        let once = collapse_void_elements(input);
        let twice = collapse_void_elements(once.clone());
        assert_eq!(once, twice);
    }
}
