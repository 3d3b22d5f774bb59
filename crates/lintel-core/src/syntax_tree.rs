//! The syntax tree produced by the document parser.
//!
//! The tree is a flat, ordered `Vec<SyntaxNode>`; element nesting is
//! implied by Start/End pairing rather than parent/child links. Nodes
//! borrow their text from the parsed document and are allocated exactly
//! once during parsing — the only post-construction mutation is the
//! self-closing normalizer rewriting a [`NodeKind::Start`] into a
//! [`NodeKind::Empty`].

use serde::Serialize;

use crate::location::Location;

/// Structural role of an element node in the flat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// Opens an element scope (`<div>` or a virtual `<!-- ko ... -->`).
    Start,
    /// Closes an element scope (`</div>` or `<!-- /ko -->`).
    End,
    /// A childless element (`<br/>`, or a void element after
    /// normalization).
    Empty,
}

impl NodeKind {
    pub fn is_start(&self) -> bool {
        matches!(self, NodeKind::Start)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, NodeKind::End)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NodeKind::Empty)
    }
}

/// A value paired with the location it was written at.
///
/// Used for tag names, binding-handler names, and module symbols.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifierNode<T> {
    pub value: T,
    pub location: Location,
}

impl<T> IdentifierNode<T> {
    pub fn new(value: T, location: Location) -> Self {
        Self { value, location }
    }
}

/// Raw binding-expression text attached to a Start or Empty element.
///
/// The expression is not parsed or validated at this layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingData<'s> {
    pub data: &'s str,
    pub location: Location,
}

/// A generic structural element: a real markup tag or a comment-based
/// virtual element, identified by `key` (tag or binding-handler name).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementNode<'s> {
    pub key: &'s str,
    pub kind: NodeKind,
    pub bindings: Vec<BindingData<'s>>,
    pub location: Location,
}

/// A reference to an identifier, distinguishing type from value usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeReferenceNode<'s> {
    pub identifier: IdentifierNode<&'s str>,
    /// `true` when the identifier names a type, `false` when it names a
    /// runtime value whose type should be taken (`typeof x`).
    pub is_type: bool,
    pub location: Location,
}

/// Declares an anonymous nested binding scope tied to a type reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildContextNode<'s> {
    pub context_ref: TypeReferenceNode<'s>,
    pub location: Location,
}

/// Declares a named binding scope bound to an identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedContextNode<'s> {
    pub identifier: IdentifierNode<&'s str>,
    pub location: Location,
}

/// Assigns an expression value into a named context variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextAssignmentNode<'s> {
    pub identifier: IdentifierNode<&'s str>,
    pub value: Option<&'s str>,
    pub location: Location,
}

/// One `name as alias` pair in an import directive.
///
/// When no alias is written, `alias` repeats `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSymbol<'s> {
    pub name: IdentifierNode<&'s str>,
    pub alias: IdentifierNode<&'s str>,
}

/// One or more symbols imported from a module path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportNode<'s> {
    pub symbols: Vec<ImportSymbol<'s>>,
    pub module_path: IdentifierNode<&'s str>,
    pub location: Location,
}

/// A scoped directive enabling or disabling diagnostic rule keys from
/// its location onward. An empty key list addresses all rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagNode<'s> {
    pub keys: Vec<&'s str>,
    pub enable: bool,
    pub location: Location,
}

/// One entry in the ordered node sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SyntaxNode<'s> {
    Element(ElementNode<'s>),
    ChildContext(ChildContextNode<'s>),
    NamedContext(NamedContextNode<'s>),
    ContextAssignment(ContextAssignmentNode<'s>),
    Import(ImportNode<'s>),
    Diag(DiagNode<'s>),
}

impl<'s> SyntaxNode<'s> {
    /// The source location of this node.
    pub fn location(&self) -> Location {
        match self {
            SyntaxNode::Element(n) => n.location,
            SyntaxNode::ChildContext(n) => n.location,
            SyntaxNode::NamedContext(n) => n.location,
            SyntaxNode::ContextAssignment(n) => n.location,
            SyntaxNode::Import(n) => n.location,
            SyntaxNode::Diag(n) => n.location,
        }
    }

    /// The element node, when this is an element.
    pub fn as_element(&self) -> Option<&ElementNode<'s>> {
        match self {
            SyntaxNode::Element(n) => Some(n),
            _ => None,
        }
    }
}
