// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax tree node types.
//!
//! The node set mirrors the shape of a modern Ruby syntax tree: every node
//! owns its [`Location`], composite nodes own their children, and optional
//! syntax (receivers, call operators, parentheses) is recorded as optional
//! locations so consumers can tell `foo bar` from `foo(bar)` structurally.
//!
//! Nodes are immutable once the parser has produced them.

use crate::location::{Location, Source};

/// Any node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program(ProgramNode),
    Statements(StatementsNode),
    Array(ArrayNode),
    Call(CallNode),
    Block(BlockNode),
    Parentheses(ParenthesesNode),
    Range(RangeNode),
    And(AndNode),
    Or(OrNode),
    Integer(IntegerNode),
    Float(FloatNode),
    Rational(RationalNode),
    Imaginary(ImaginaryNode),
    LocalVariableRead(LocalVariableReadNode),
    LocalVariableWrite(LocalVariableWriteNode),
    Nil(NilNode),
    True(TrueNode),
    False(FalseNode),
    SelfNode(SelfNode),
}

impl Node {
    /// The source span of this node.
    pub fn location(&self) -> Location {
        match self {
            Node::Program(n) => n.location,
            Node::Statements(n) => n.location,
            Node::Array(n) => n.location,
            Node::Call(n) => n.location,
            Node::Block(n) => n.location,
            Node::Parentheses(n) => n.location,
            Node::Range(n) => n.location,
            Node::And(n) => n.location,
            Node::Or(n) => n.location,
            Node::Integer(n) => n.location,
            Node::Float(n) => n.location,
            Node::Rational(n) => n.location,
            Node::Imaginary(n) => n.location,
            Node::LocalVariableRead(n) => n.location,
            Node::LocalVariableWrite(n) => n.location,
            Node::Nil(n) => n.location,
            Node::True(n) => n.location,
            Node::False(n) => n.location,
            Node::SelfNode(n) => n.location,
        }
    }

    /// A short, stable name for the node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Program(_) => "program",
            Node::Statements(_) => "statements",
            Node::Array(_) => "array",
            Node::Call(_) => "call",
            Node::Block(_) => "block",
            Node::Parentheses(_) => "parentheses",
            Node::Range(_) => "range",
            Node::And(_) => "and",
            Node::Or(_) => "or",
            Node::Integer(_) => "integer",
            Node::Float(_) => "float",
            Node::Rational(_) => "rational",
            Node::Imaginary(_) => "imaginary",
            Node::LocalVariableRead(_) => "local variable read",
            Node::LocalVariableWrite(_) => "local variable write",
            Node::Nil(_) => "nil",
            Node::True(_) => "true",
            Node::False(_) => "false",
            Node::SelfNode(_) => "self",
        }
    }
}

/// The root of a parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramNode {
    pub location: Location,
    pub statements: StatementsNode,
}

/// A sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementsNode {
    pub location: Location,
    pub body: Vec<Node>,
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub location: Location,
    pub elements: Vec<Node>,
    pub opening_loc: Location,
    pub closing_loc: Location,
}

/// The argument list of a call, without its delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentsNode {
    pub location: Location,
    pub arguments: Vec<Node>,
}

impl ArgumentsNode {
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// A method call in any of its surface forms.
///
/// Operators are calls too: `a + b` is a call of `+` on `a` with one
/// argument, and `-a` is a call of `-@` on `a` with none.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub location: Location,
    pub receiver: Option<Box<Node>>,
    /// `.`, `&.` or `::` between receiver and message.
    pub call_operator_loc: Option<Location>,
    /// The method name (`foo`, `+`, `-@`).
    pub name: String,
    /// Where the method name is spelled in the source.
    pub message_loc: Option<Location>,
    pub opening_loc: Option<Location>,
    pub arguments: Option<ArgumentsNode>,
    pub closing_loc: Option<Location>,
    /// A [`Node::Block`] attached to the call.
    pub block: Option<Box<Node>>,
    pub flags: CallFlags,
}

/// Flags recorded by the parser on a [`CallNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallFlags {
    /// A bare identifier that could have been a local variable (`foo`).
    pub variable_call: bool,
    /// Called with `&.`.
    pub safe_navigation: bool,
}

impl CallNode {
    /// The method name as written in the source, if it is written at all.
    pub fn message<'s>(&self, source: &'s Source) -> Option<&'s str> {
        self.message_loc.map(|loc| source.slice(loc))
    }

    /// The call operator as written in the source.
    pub fn call_operator<'s>(&self, source: &'s Source) -> Option<&'s str> {
        self.call_operator_loc.map(|loc| source.slice(loc))
    }

    pub fn is_variable_call(&self) -> bool {
        self.flags.variable_call
    }

    pub fn is_safe_navigation(&self) -> bool {
        self.flags.safe_navigation
    }

    /// The arguments as a slice; empty when the call has none.
    pub fn argument_list(&self) -> &[Node] {
        self.arguments
            .as_ref()
            .map(|args| args.arguments.as_slice())
            .unwrap_or(&[])
    }
}

/// `{ |x| ... }` or `do |x| ... end`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub location: Location,
    pub parameters: Option<BlockParametersNode>,
    /// A [`Node::Statements`] when the body is not empty.
    pub body: Option<Box<Node>>,
    pub opening_loc: Location,
    pub closing_loc: Location,
}

impl BlockNode {
    /// Whether the block was written with braces rather than `do ... end`.
    pub fn is_brace(&self, source: &Source) -> bool {
        source.slice(self.opening_loc) == "{"
    }
}

/// `|a, b|`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockParametersNode {
    pub location: Location,
    pub requireds: Vec<RequiredParameterNode>,
}

/// A required positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredParameterNode {
    pub location: Location,
    pub name: String,
}

/// `( ... )`
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesesNode {
    pub location: Location,
    /// A [`Node::Statements`] when the parentheses are not empty.
    pub body: Option<Box<Node>>,
    pub opening_loc: Location,
    pub closing_loc: Location,
}

/// `a..b` or `a...b`; either end may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeNode {
    pub location: Location,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    pub operator_loc: Location,
    pub exclude_end: bool,
}

/// `a && b` or `a and b`
#[derive(Debug, Clone, PartialEq)]
pub struct AndNode {
    pub location: Location,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub operator_loc: Location,
}

/// `a || b` or `a or b`
#[derive(Debug, Clone, PartialEq)]
pub struct OrNode {
    pub location: Location,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub operator_loc: Location,
}

/// An integer literal. A leading `-` is part of the literal's span.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerNode {
    pub location: Location,
}

/// A float literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatNode {
    pub location: Location,
}

/// A rational literal (`3r`, `1.5r`).
#[derive(Debug, Clone, PartialEq)]
pub struct RationalNode {
    pub location: Location,
}

/// An imaginary literal (`2i`, `3ri`).
#[derive(Debug, Clone, PartialEq)]
pub struct ImaginaryNode {
    pub location: Location,
}

/// A read of a local variable or block parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableReadNode {
    pub location: Location,
    pub name: String,
    /// How many block scopes up the variable was declared.
    pub depth: u32,
}

/// `name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableWriteNode {
    pub location: Location,
    pub name: String,
    pub name_loc: Location,
    pub value: Box<Node>,
    pub operator_loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NilNode {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrueNode {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FalseNode {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfNode {
    pub location: Location,
}

/// A recognized leading directive comment such as
/// `# frozen_string_literal: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicComment {
    pub key: String,
    pub value: String,
    pub key_loc: Location,
    pub value_loc: Location,
}
