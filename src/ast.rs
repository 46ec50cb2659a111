use crate::symbols::SymbolId;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub node_type: Type,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Binary(BinaryOp, Box<Node>, Box<Node>),
    /// Statement sequencing: everything before, then the next statement.
    Glue(Box<Node>, Box<Node>),
    If {
        condition: Box<Node>,
        then: Option<Box<Node>>,
        els: Option<Box<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Option<Box<Node>>,
    },
    Function {
        id: SymbolId,
        body: Option<Box<Node>>,
    },
    IntLiteral(i64),
    Ident(SymbolId),
    LvalueIdent(SymbolId),
    /// Value first, then the [`NodeKind::LvalueIdent`] it is stored into.
    Assign(Box<Node>, Box<Node>),
    Print(Box<Node>),
    Widen(Box<Node>),
    /// Value returned from the given function.
    Return(SymbolId, Box<Node>),
    /// Call with at most one argument, passed in `%rdi`.
    FunctionCall(SymbolId, Option<Box<Node>>),
    AddressOf(SymbolId),
    Deref(Box<Node>),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Substract,
    Multiply,
    Divide,
    IsEqual,
    IsNotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::IsEqual
                | Self::IsNotEqual
                | Self::LessThan
                | Self::LessOrEqual
                | Self::GreaterThan
                | Self::GreaterOrEqual
        )
    }
}

impl Node {
    pub fn new(node_type: Type, kind: NodeKind) -> Self {
        Self { node_type, kind }
    }

    pub fn binary(op: BinaryOp, node_type: Type, left: Node, right: Node) -> Self {
        Self::new(node_type, NodeKind::Binary(op, Box::new(left), Box::new(right)))
    }

    pub fn glue(left: Node, right: Node) -> Self {
        Self::new(Type::None, NodeKind::Glue(Box::new(left), Box::new(right)))
    }

    pub fn int_literal(value: i64) -> Self {
        let node_type = if (0..256).contains(&value) {
            Type::Char
        } else {
            Type::Int
        };
        Self::new(node_type, NodeKind::IntLiteral(value))
    }

    /// Wrap `self` so that it yields a value of `to`.
    #[must_use]
    pub fn widen(self, to: Type) -> Self {
        Self::new(to, NodeKind::Widen(Box::new(self)))
    }

    pub fn is_comparison(&self) -> bool {
        matches!(&self.kind, NodeKind::Binary(op, ..) if op.is_comparison())
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, NodeKind::Return(..))
    }

    /// The statement a `;` must follow.
    pub fn needs_semicolon(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Print(_)
                | NodeKind::Assign(..)
                | NodeKind::Return(..)
                | NodeKind::FunctionCall(..)
        )
    }

    /// Last statement of a glued statement sequence.
    pub fn last_statement(&self) -> &Node {
        match &self.kind {
            NodeKind::Glue(_, right) => right,
            _ => self,
        }
    }
}

/// Fold two optional statements into one.
pub fn glue(left: Option<Node>, right: Option<Node>) -> Option<Node> {
    match (left, right) {
        (Some(left), Some(right)) => Some(Node::glue(left, right)),
        (left, None) => left,
        (None, right) => right,
    }
}
