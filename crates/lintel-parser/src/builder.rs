//! Node construction for the grammar.
//!
//! The grammar never constructs tree nodes directly; it calls into a
//! [`SyntaxFactory`], which also owns the attribute-name policy deciding
//! which attributes carry binding expressions.

use lintel_core::{
    Location,
    syntax_tree::{
        BindingData, ChildContextNode, ContextAssignmentNode, DiagNode, ElementNode,
        IdentifierNode, ImportNode, ImportSymbol, NamedContextNode, NodeKind, SyntaxNode,
        TypeReferenceNode,
    },
};

/// The attribute name always treated as a binding expression.
pub const DEFAULT_BINDING_ATTRIBUTE: &str = "data-bind";

/// Builds syntax nodes for the grammar and classifies binding attributes.
///
/// The configured names are extended with [`DEFAULT_BINDING_ATTRIBUTE`],
/// which is always recognized.
#[derive(Debug, Clone)]
pub struct SyntaxFactory {
    binding_names: Vec<String>,
}

impl SyntaxFactory {
    pub fn new(binding_names: &[&str]) -> Self {
        let mut names: Vec<String> = binding_names.iter().map(|s| (*s).to_string()).collect();
        if !names.iter().any(|n| n == DEFAULT_BINDING_ATTRIBUTE) {
            names.push(DEFAULT_BINDING_ATTRIBUTE.to_string());
        }
        Self {
            binding_names: names,
        }
    }

    /// All attribute names treated as binding expressions.
    pub fn binding_names(&self) -> &[String] {
        &self.binding_names
    }

    /// Whether an attribute name carries a binding expression.
    pub fn is_binding_attribute(&self, name: &str) -> bool {
        self.binding_names.iter().any(|n| n == name)
    }

    pub fn start_node<'s>(&self, location: Location, key: &'s str) -> ElementNode<'s> {
        self.element(location, key, NodeKind::Start)
    }

    pub fn end_node<'s>(&self, location: Location, key: &'s str) -> ElementNode<'s> {
        self.element(location, key, NodeKind::End)
    }

    pub fn empty_node<'s>(&self, location: Location, key: &'s str) -> ElementNode<'s> {
        self.element(location, key, NodeKind::Empty)
    }

    pub fn ident<T>(&self, location: Location, value: T) -> IdentifierNode<T> {
        IdentifierNode::new(value, location)
    }

    pub fn binding_data<'s>(&self, location: Location, data: &'s str) -> BindingData<'s> {
        BindingData { data, location }
    }

    pub fn type_reference<'s>(
        &self,
        location: Location,
        identifier: IdentifierNode<&'s str>,
        is_type: bool,
    ) -> TypeReferenceNode<'s> {
        TypeReferenceNode {
            identifier,
            is_type,
            location,
        }
    }

    pub fn child_context<'s>(
        &self,
        location: Location,
        context_ref: TypeReferenceNode<'s>,
    ) -> SyntaxNode<'s> {
        SyntaxNode::ChildContext(ChildContextNode {
            context_ref,
            location,
        })
    }

    pub fn named_context<'s>(
        &self,
        location: Location,
        identifier: IdentifierNode<&'s str>,
    ) -> SyntaxNode<'s> {
        SyntaxNode::NamedContext(NamedContextNode {
            identifier,
            location,
        })
    }

    pub fn context_assignment<'s>(
        &self,
        location: Location,
        identifier: IdentifierNode<&'s str>,
        value: Option<&'s str>,
    ) -> SyntaxNode<'s> {
        SyntaxNode::ContextAssignment(ContextAssignmentNode {
            identifier,
            value,
            location,
        })
    }

    pub fn import<'s>(
        &self,
        location: Location,
        symbols: Vec<ImportSymbol<'s>>,
        module_path: IdentifierNode<&'s str>,
    ) -> SyntaxNode<'s> {
        SyntaxNode::Import(ImportNode {
            symbols,
            module_path,
            location,
        })
    }

    pub fn diag<'s>(&self, location: Location, keys: Vec<&'s str>, enable: bool) -> SyntaxNode<'s> {
        SyntaxNode::Diag(DiagNode {
            keys,
            enable,
            location,
        })
    }

    fn element<'s>(&self, location: Location, key: &'s str, kind: NodeKind) -> ElementNode<'s> {
        ElementNode {
            key,
            kind,
            bindings: Vec::new(),
            location,
        }
    }
}

impl Default for SyntaxFactory {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binding_attribute_always_present() {
        let factory = SyntaxFactory::new(&[]);
        assert!(factory.is_binding_attribute("data-bind"));
        assert!(!factory.is_binding_attribute("class"));
    }

    #[test]
    fn test_configured_binding_names_extend_default() {
        let factory = SyntaxFactory::new(&["params", "data-sly-use"]);
        assert!(factory.is_binding_attribute("params"));
        assert!(factory.is_binding_attribute("data-sly-use"));
        assert!(factory.is_binding_attribute("data-bind"));
        assert_eq!(factory.binding_names().len(), 3);
    }

    #[test]
    fn test_default_name_not_duplicated() {
        let factory = SyntaxFactory::new(&["data-bind"]);
        assert_eq!(factory.binding_names().len(), 1);
    }

    #[test]
    fn test_element_factories_set_kind() {
        let factory = SyntaxFactory::default();
        let location = Location::default();

        assert!(factory.start_node(location, "div").kind.is_start());
        assert!(factory.end_node(location, "div").kind.is_end());
        assert!(factory.empty_node(location, "br").kind.is_empty());
    }

    #[test]
    fn test_elements_start_without_bindings() {
        let factory = SyntaxFactory::default();
        let node = factory.start_node(Location::default(), "div");
        assert!(node.bindings.is_empty());
    }
}
