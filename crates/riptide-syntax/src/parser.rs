// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent parser for the supported Ruby subset.
//!
//! # Supported Syntax
//!
//! - Numeric literals (integer, float, rational, imaginary), including a
//!   leading `-` written directly against the digits
//! - `nil`, `true`, `false`, `self`
//! - Local variables (`x = 1`, `x`) and block parameters
//! - Arrays, parentheses, ranges (`..`, `...`, beginless and endless)
//! - `&&`/`and`, `||`/`or`, binary and unary operators
//! - Method calls: bare (`foo`), parenthesized (`foo(1)`), commands
//!   (`foo 1, 2`), with a receiver (`a.b`, `a&.b`, `a::b`, `a.b(1)`, `a.b 1`)
//! - Blocks: `{ |x| ... }` and `do |x| ... end`
//!
//! Anything else is reported as a [`ParseError`]. Top-level statements
//! recover at the next newline or `;`, so one input can yield several
//! diagnostics.
//!
//! # Precedence (lowest first)
//!
//! `and`/`or`, assignment, ranges, `||`, `&&`, equality, comparison, `|`/`^`,
//! `&`, shifts, additive, multiplicative, unary minus, `**`, `!`/`~`/unary
//! plus, method calls.

use crate::ast::*;
use crate::errors::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::location::{Location, Source};

type PResult<T> = Result<T, ParseError>;

/// How deep arrays, parentheses, blocks, argument lists and unary operators
/// may nest before the parser gives up.
pub(crate) const MAX_NESTING: usize = 64;

pub(crate) struct Parser<'a> {
    source: &'a Source,
    tokens: Vec<Token>,
    pos: usize,
    /// Local variable scopes; blocks push a scope that sees the outer ones.
    scopes: Vec<Vec<String>>,
    /// Set while parsing paren-free command arguments: a `do` there belongs
    /// to the command, not to the last argument.
    no_do_block: bool,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a Source, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            scopes: vec![Vec::new()],
            no_do_block: false,
            depth: 0,
        }
    }

    /// Parses the whole token stream, recovering at statement boundaries.
    pub(crate) fn parse_program(mut self) -> (ProgramNode, Vec<ParseError>) {
        let mut errors = Vec::new();
        let mut body = Vec::new();

        loop {
            self.skip_terminators();
            if self.at(TokenKind::Eof) {
                break;
            }
            match self.statement_with_terminator(&[]) {
                Ok(statement) => body.push(statement),
                Err(error) => {
                    errors.push(error);
                    self.recover();
                }
            }
        }

        let statements = self.statements_node(body);
        let program = ProgramNode {
            location: statements.location,
            statements,
        };
        (program, errors)
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn current(&self) -> Token {
        self.peek(0)
    }

    fn peek(&self, ahead: usize) -> Token {
        let index = (self.pos + ahead).min(self.tokens.len().saturating_sub(1));
        self.tokens.get(index).copied().unwrap_or(Token {
            kind: TokenKind::Eof,
            location: Location::empty(self.source.text().len()),
            space_before: false,
        })
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            let token = self.current();
            Err(ParseError::new(
                format!("{message}; found {}", self.describe(token)),
                token.location,
            ))
        }
    }

    fn text(&self, token: Token) -> &'a str {
        self.source.slice(token.location)
    }

    fn describe(&self, token: Token) -> String {
        match token.kind {
            TokenKind::Eof => "end-of-input".to_string(),
            TokenKind::Newline => "newline".to_string(),
            _ => format!("'{}'", self.text(token)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::new(
            format!("unexpected {}; expected {expected}", self.describe(token)),
            token.location,
        )
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    fn skip_terminators(&mut self) {
        while self.at(TokenKind::Newline) || self.at(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Skips to the next statement boundary and resets nested state.
    fn recover(&mut self) {
        while !matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        ) {
            self.advance();
        }
        self.scopes.truncate(1);
        self.no_do_block = false;
    }

    /// Runs `parse` one nesting level deeper, failing at [`MAX_NESTING`].
    fn nested<T>(
        &mut self,
        at: Location,
        parse: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new("nesting too deep", at));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Locals
    // ========================================================================

    fn declare(&mut self, name: &str) {
        if self.local_depth(name).is_none() {
            if let Some(scope) = self.scopes.last_mut() {
                scope.push(name.to_string());
            }
        }
    }

    fn local_depth(&self, name: &str) -> Option<u32> {
        self.scopes
            .iter()
            .rev()
            .position(|scope| scope.iter().any(|local| local == name))
            .map(|depth| depth as u32)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement_with_terminator(&mut self, closers: &[TokenKind]) -> PResult<Node> {
        let statement = self.expression()?;
        let kind = self.current().kind;
        let terminated = matches!(
            kind,
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        ) || closers.contains(&kind);
        if terminated {
            Ok(statement)
        } else {
            Err(self.unexpected("a newline or ';' after the statement"))
        }
    }

    /// Parses statements up to (not including) one of `closers`.
    fn statements(&mut self, closers: &[TokenKind]) -> PResult<StatementsNode> {
        let mut body = Vec::new();
        loop {
            self.skip_terminators();
            let kind = self.current().kind;
            if kind == TokenKind::Eof || closers.contains(&kind) {
                break;
            }
            body.push(self.statement_with_terminator(closers)?);
        }
        Ok(self.statements_node(body))
    }

    fn statements_node(&self, body: Vec<Node>) -> StatementsNode {
        let location = match (body.first(), body.last()) {
            (Some(first), Some(last)) => first.location().join(last.location()),
            _ => Location::empty(self.current().location.start),
        };
        StatementsNode { location, body }
    }

    /// Wraps non-empty statements as an optional body node.
    fn body_node(statements: StatementsNode) -> Option<Box<Node>> {
        if statements.body.is_empty() {
            None
        } else {
            Some(Box::new(Node::Statements(statements)))
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// `and` / `or`, left associative with equal precedence.
    fn expression(&mut self) -> PResult<Node> {
        let mut left = self.assignment()?;
        loop {
            let kind = self.current().kind;
            if !matches!(kind, TokenKind::KeywordAnd | TokenKind::KeywordOr) {
                break;
            }
            let operator = self.advance();
            self.skip_newlines();
            let right = self.assignment()?;
            left = logical(kind == TokenKind::KeywordAnd, left, operator, right);
        }
        Ok(left)
    }

    fn assignment(&mut self) -> PResult<Node> {
        if self.at(TokenKind::Identifier) && self.peek(1).kind == TokenKind::Equal {
            let name_token = self.advance();
            let operator = self.advance();
            self.skip_newlines();
            let name = self.text(name_token);
            self.declare(name);
            let value = self.nested(operator.location, Self::assignment)?;
            return Ok(Node::LocalVariableWrite(LocalVariableWriteNode {
                location: name_token.location.join(value.location()),
                name: name.to_string(),
                name_loc: name_token.location,
                value: Box::new(value),
                operator_loc: operator.location,
            }));
        }
        self.range()
    }

    fn range(&mut self) -> PResult<Node> {
        let left = if self.at_range_operator() {
            None
        } else {
            Some(self.or_or()?)
        };
        if !self.at_range_operator() {
            return left.ok_or_else(|| self.unexpected("an expression"));
        }
        let operator = self.advance();
        let right = if self.can_start_expression() {
            Some(self.or_or()?)
        } else {
            None
        };
        let start = left
            .as_ref()
            .map_or(operator.location, |node| node.location());
        let end = right
            .as_ref()
            .map_or(operator.location, |node| node.location());
        Ok(Node::Range(RangeNode {
            location: start.join(end),
            left: left.map(Box::new),
            right: right.map(Box::new),
            operator_loc: operator.location,
            exclude_end: operator.kind == TokenKind::DotDotDot,
        }))
    }

    fn at_range_operator(&self) -> bool {
        matches!(self.current().kind, TokenKind::DotDot | TokenKind::DotDotDot)
    }

    fn or_or(&mut self) -> PResult<Node> {
        let mut left = self.and_and()?;
        while self.at(TokenKind::PipePipe) {
            let operator = self.advance();
            self.skip_newlines();
            let right = self.and_and()?;
            left = logical(false, left, operator, right);
        }
        Ok(left)
    }

    fn and_and(&mut self) -> PResult<Node> {
        let mut left = self.equality()?;
        while self.at(TokenKind::AmpersandAmpersand) {
            let operator = self.advance();
            self.skip_newlines();
            let right = self.equality()?;
            left = logical(true, left, operator, right);
        }
        Ok(left)
    }

    /// Non-associative: `a == b == c` is an error.
    fn equality(&mut self) -> PResult<Node> {
        let left = self.comparison()?;
        if matches!(
            self.current().kind,
            TokenKind::EqualEqual
                | TokenKind::EqualEqualEqual
                | TokenKind::BangEqual
                | TokenKind::EqualTilde
                | TokenKind::BangTilde
                | TokenKind::Spaceship
        ) {
            let operator = self.advance();
            self.skip_newlines();
            let right = self.comparison()?;
            return Ok(self.binary(left, operator, right));
        }
        Ok(left)
    }

    fn comparison(&mut self) -> PResult<Node> {
        self.left_assoc(
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
            Self::bit_or,
        )
    }

    fn bit_or(&mut self) -> PResult<Node> {
        self.left_assoc(&[TokenKind::Pipe, TokenKind::Caret], Self::bit_and)
    }

    fn bit_and(&mut self) -> PResult<Node> {
        self.left_assoc(&[TokenKind::Ampersand], Self::shift)
    }

    fn shift(&mut self) -> PResult<Node> {
        self.left_assoc(
            &[TokenKind::LessLess, TokenKind::GreaterGreater],
            Self::additive,
        )
    }

    fn additive(&mut self) -> PResult<Node> {
        self.left_assoc(&[TokenKind::Plus, TokenKind::Minus], Self::multiplicative)
    }

    fn multiplicative(&mut self) -> PResult<Node> {
        self.left_assoc(
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
            Self::unary_minus,
        )
    }

    fn left_assoc(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> PResult<Node>,
    ) -> PResult<Node> {
        let mut left = operand(self)?;
        while operators.contains(&self.current().kind) {
            let operator = self.advance();
            self.skip_newlines();
            let right = operand(self)?;
            left = self.binary(left, operator, right);
        }
        Ok(left)
    }

    /// Unary minus. A `-` written directly against a numeric literal is part
    /// of the literal, except under `**`, where `-2 ** 2` means `-(2 ** 2)`.
    fn unary_minus(&mut self) -> PResult<Node> {
        if !self.at(TokenKind::Minus) {
            return self.power();
        }
        let minus = self.advance();
        let next = self.current();
        let folds = next.kind.is_numeric()
            && !next.space_before
            && self.peek(1).kind != TokenKind::StarStar;
        if folds {
            self.advance();
            let literal = numeric(next.kind, minus.location.join(next.location));
            let receiver = self.postfix_from(literal)?;
            return self.power_from(receiver);
        }
        let operand = self.nested(minus.location, Self::unary_minus)?;
        Ok(self.unary(minus, "-@", operand))
    }

    /// `**` is right associative and binds tighter than unary minus on its
    /// left, but accepts a negative operand on its right.
    fn power(&mut self) -> PResult<Node> {
        let left = self.unary_bang()?;
        self.power_from(left)
    }

    fn power_from(&mut self, left: Node) -> PResult<Node> {
        if self.at(TokenKind::StarStar) {
            let operator = self.advance();
            self.skip_newlines();
            let right = self.nested(operator.location, Self::unary_minus)?;
            return Ok(self.binary(left, operator, right));
        }
        Ok(left)
    }

    fn unary_bang(&mut self) -> PResult<Node> {
        let name = match self.current().kind {
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Plus => "+@",
            _ => return self.postfix(),
        };
        let operator = self.advance();
        let operand = self.nested(operator.location, Self::unary_bang)?;
        Ok(self.unary(operator, name, operand))
    }

    /// Method calls chained with `.`, `&.` or `::`.
    fn postfix(&mut self) -> PResult<Node> {
        let node = self.primary()?;
        self.postfix_from(node)
    }

    fn postfix_from(&mut self, mut node: Node) -> PResult<Node> {
        while matches!(
            self.current().kind,
            TokenKind::Dot | TokenKind::AmpersandDot | TokenKind::ColonColon
        ) {
            node = self.method_call(node)?;
        }
        Ok(node)
    }

    fn method_call(&mut self, receiver: Node) -> PResult<Node> {
        let operator = self.advance();
        self.skip_newlines();
        let message = self.expect(
            TokenKind::Identifier,
            "expected a method name after the call operator",
        )?;

        let mut call = CallNode {
            location: receiver.location().join(message.location),
            receiver: Some(Box::new(receiver)),
            call_operator_loc: Some(operator.location),
            name: self.text(message).to_string(),
            message_loc: Some(message.location),
            opening_loc: None,
            arguments: None,
            closing_loc: None,
            block: None,
            flags: CallFlags {
                variable_call: false,
                safe_navigation: operator.kind == TokenKind::AmpersandDot,
            },
        };

        if self.at(TokenKind::ParenLeft) && !self.current().space_before {
            self.nested_arguments(&mut call, Self::paren_arguments)?;
            self.attach_block(&mut call)?;
        } else if self.starts_command_argument() {
            self.nested_arguments(&mut call, Self::command_arguments)?;
        } else {
            self.attach_block(&mut call)?;
        }
        Ok(Node::Call(call))
    }

    // ========================================================================
    // Primaries
    // ========================================================================

    fn primary(&mut self) -> PResult<Node> {
        let token = self.current();
        match token.kind {
            kind if kind.is_numeric() => {
                self.advance();
                Ok(numeric(kind, token.location))
            }
            TokenKind::KeywordNil => {
                self.advance();
                Ok(Node::Nil(NilNode {
                    location: token.location,
                }))
            }
            TokenKind::KeywordTrue => {
                self.advance();
                Ok(Node::True(TrueNode {
                    location: token.location,
                }))
            }
            TokenKind::KeywordFalse => {
                self.advance();
                Ok(Node::False(FalseNode {
                    location: token.location,
                }))
            }
            TokenKind::KeywordSelf => {
                self.advance();
                Ok(Node::SelfNode(SelfNode {
                    location: token.location,
                }))
            }
            TokenKind::Identifier => self.identifier(),
            TokenKind::ParenLeft => self.nested(token.location, Self::parentheses),
            TokenKind::BracketLeft => self.nested(token.location, Self::array),
            TokenKind::Constant => Err(ParseError::new(
                format!("unsupported constant reference '{}'", self.text(token)),
                token.location,
            )),
            TokenKind::KeywordOther => Err(ParseError::new(
                format!("unsupported keyword '{}'", self.text(token)),
                token.location,
            )),
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// A local variable read or one of the receiver-less call forms.
    fn identifier(&mut self) -> PResult<Node> {
        let token = self.advance();
        let name = self.text(token);
        let paren_follows = self.at(TokenKind::ParenLeft) && !self.current().space_before;

        if let Some(depth) = self.local_depth(name) {
            if !paren_follows {
                return Ok(Node::LocalVariableRead(LocalVariableReadNode {
                    location: token.location,
                    name: name.to_string(),
                    depth,
                }));
            }
        }

        let mut call = CallNode {
            location: token.location,
            receiver: None,
            call_operator_loc: None,
            name: name.to_string(),
            message_loc: Some(token.location),
            opening_loc: None,
            arguments: None,
            closing_loc: None,
            block: None,
            flags: CallFlags::default(),
        };

        if paren_follows {
            self.nested_arguments(&mut call, Self::paren_arguments)?;
            self.attach_block(&mut call)?;
        } else if self.starts_command_argument() {
            self.nested_arguments(&mut call, Self::command_arguments)?;
        } else {
            self.attach_block(&mut call)?;
            let bare = call.block.is_none();
            let can_be_local = !name.ends_with(['?', '!']);
            call.flags.variable_call = bare && can_be_local;
        }
        Ok(Node::Call(call))
    }

    /// Whether the current token begins the first argument of a paren-free
    /// command (`foo 1`, `foo -1`, `foo [1]`), as opposed to continuing a
    /// binary expression (`foo - 1`).
    fn starts_command_argument(&self) -> bool {
        let token = self.current();
        if !token.space_before {
            return false;
        }
        match token.kind {
            kind if kind.is_numeric() => true,
            TokenKind::Identifier
            | TokenKind::Constant
            | TokenKind::KeywordNil
            | TokenKind::KeywordTrue
            | TokenKind::KeywordFalse
            | TokenKind::KeywordSelf
            | TokenKind::BracketLeft
            | TokenKind::ParenLeft
            | TokenKind::Bang
            | TokenKind::Tilde => true,
            TokenKind::Minus | TokenKind::Plus => !self.peek(1).space_before,
            _ => false,
        }
    }

    fn can_start_expression(&self) -> bool {
        let kind = self.current().kind;
        kind.is_numeric()
            || matches!(
                kind,
                TokenKind::Identifier
                    | TokenKind::Constant
                    | TokenKind::KeywordNil
                    | TokenKind::KeywordTrue
                    | TokenKind::KeywordFalse
                    | TokenKind::KeywordSelf
                    | TokenKind::ParenLeft
                    | TokenKind::BracketLeft
                    | TokenKind::Bang
                    | TokenKind::Tilde
                    | TokenKind::Minus
                    | TokenKind::Plus
            )
    }

    fn nested_arguments(
        &mut self,
        call: &mut CallNode,
        arguments: fn(&mut Self, &mut CallNode) -> PResult<()>,
    ) -> PResult<()> {
        let at = self.current().location;
        self.nested(at, |parser| arguments(parser, call))
    }

    /// `(a, b)` directly after a method name.
    fn paren_arguments(&mut self, call: &mut CallNode) -> PResult<()> {
        let opening = self.advance();
        let saved = std::mem::replace(&mut self.no_do_block, false);
        self.skip_newlines();

        let mut arguments = Vec::new();
        while !self.at(TokenKind::ParenRight) {
            arguments.push(self.assignment()?);
            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
            } else {
                break;
            }
        }
        let closing = self.expect(TokenKind::ParenRight, "expected a matching `)`")?;
        self.no_do_block = saved;

        if !arguments.is_empty() {
            call.arguments = Some(arguments_node(arguments));
        }
        call.opening_loc = Some(opening.location);
        call.closing_loc = Some(closing.location);
        call.location = call.location.join(closing.location);
        Ok(())
    }

    /// `foo a, b` / `recv.foo a, b`, optionally followed by a `do` block.
    fn command_arguments(&mut self, call: &mut CallNode) -> PResult<()> {
        let saved = std::mem::replace(&mut self.no_do_block, true);
        let mut arguments = vec![self.assignment()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            self.skip_newlines();
            arguments.push(self.assignment()?);
        }
        self.no_do_block = saved;

        let node = arguments_node(arguments);
        call.location = call.location.join(node.location);
        call.arguments = Some(node);

        if self.at(TokenKind::KeywordDo) && !self.no_do_block {
            let at = self.current().location;
            let block = self.nested(at, Self::block)?;
            call.location = call.location.join(block.location());
            call.block = Some(Box::new(block));
        }
        Ok(())
    }

    /// Attaches a `{ ... }` block, or a `do ... end` block when allowed.
    fn attach_block(&mut self, call: &mut CallNode) -> PResult<()> {
        let takes_block = self.at(TokenKind::BraceLeft)
            || (self.at(TokenKind::KeywordDo) && !self.no_do_block);
        if takes_block {
            let at = self.current().location;
            let block = self.nested(at, Self::block)?;
            call.location = call.location.join(block.location());
            call.block = Some(Box::new(block));
        }
        Ok(())
    }

    fn block(&mut self) -> PResult<Node> {
        let opening = self.advance();
        let brace = opening.kind == TokenKind::BraceLeft;
        let (closer, message) = if brace {
            (TokenKind::BraceRight, "expected a `}` to close the block")
        } else {
            (
                TokenKind::KeywordEnd,
                "expected an `end` to close the `do` block",
            )
        };

        self.scopes.push(Vec::new());
        let saved = std::mem::replace(&mut self.no_do_block, false);
        self.skip_newlines();

        let parameters = match self.current().kind {
            TokenKind::Pipe => Some(self.block_parameters()?),
            TokenKind::PipePipe => {
                let token = self.advance();
                Some(BlockParametersNode {
                    location: token.location,
                    requireds: Vec::new(),
                })
            }
            _ => None,
        };
        let statements = self.statements(&[closer])?;
        let closing = self.expect(closer, message)?;

        self.no_do_block = saved;
        self.scopes.pop();

        Ok(Node::Block(BlockNode {
            location: opening.location.join(closing.location),
            parameters,
            body: Self::body_node(statements),
            opening_loc: opening.location,
            closing_loc: closing.location,
        }))
    }

    /// `|a, b|`
    fn block_parameters(&mut self) -> PResult<BlockParametersNode> {
        let opening = self.advance();
        let mut requireds = Vec::new();
        while !self.at(TokenKind::Pipe) {
            let token =
                self.expect(TokenKind::Identifier, "expected a block parameter name")?;
            let name = self.text(token);
            self.declare(name);
            requireds.push(RequiredParameterNode {
                location: token.location,
                name: name.to_string(),
            });
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let closing = self.expect(
            TokenKind::Pipe,
            "expected a `|` to close the block parameters",
        )?;
        Ok(BlockParametersNode {
            location: opening.location.join(closing.location),
            requireds,
        })
    }

    fn parentheses(&mut self) -> PResult<Node> {
        let opening = self.advance();
        let saved = std::mem::replace(&mut self.no_do_block, false);
        let statements = self.statements(&[TokenKind::ParenRight])?;
        let closing = self.expect(TokenKind::ParenRight, "expected a matching `)`")?;
        self.no_do_block = saved;

        Ok(Node::Parentheses(ParenthesesNode {
            location: opening.location.join(closing.location),
            body: Self::body_node(statements),
            opening_loc: opening.location,
            closing_loc: closing.location,
        }))
    }

    fn array(&mut self) -> PResult<Node> {
        let opening = self.advance();
        let saved = std::mem::replace(&mut self.no_do_block, false);
        self.skip_newlines();

        let mut elements = Vec::new();
        while !self.at(TokenKind::BracketRight) {
            elements.push(self.assignment()?);
            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
            } else {
                break;
            }
        }
        let closing =
            self.expect(TokenKind::BracketRight, "expected a `]` to close the array")?;
        self.no_do_block = saved;

        Ok(Node::Array(ArrayNode {
            location: opening.location.join(closing.location),
            elements,
            opening_loc: opening.location,
            closing_loc: closing.location,
        }))
    }

    // ========================================================================
    // Node builders
    // ========================================================================

    fn binary(&self, left: Node, operator: Token, right: Node) -> Node {
        let location = left.location().join(right.location());
        Node::Call(CallNode {
            location,
            receiver: Some(Box::new(left)),
            call_operator_loc: None,
            name: self.text(operator).to_string(),
            message_loc: Some(operator.location),
            opening_loc: None,
            arguments: Some(arguments_node(vec![right])),
            closing_loc: None,
            block: None,
            flags: CallFlags::default(),
        })
    }

    fn unary(&self, operator: Token, name: &str, operand: Node) -> Node {
        Node::Call(CallNode {
            location: operator.location.join(operand.location()),
            receiver: Some(Box::new(operand)),
            call_operator_loc: None,
            name: name.to_string(),
            message_loc: Some(operator.location),
            opening_loc: None,
            arguments: None,
            closing_loc: None,
            block: None,
            flags: CallFlags::default(),
        })
    }
}

fn arguments_node(arguments: Vec<Node>) -> ArgumentsNode {
    let location = match (arguments.first(), arguments.last()) {
        (Some(first), Some(last)) => first.location().join(last.location()),
        _ => Location::default(),
    };
    ArgumentsNode {
        location,
        arguments,
    }
}

fn logical(and: bool, left: Node, operator: Token, right: Node) -> Node {
    let location = left.location().join(right.location());
    let (left, right) = (Box::new(left), Box::new(right));
    if and {
        Node::And(AndNode {
            location,
            left,
            right,
            operator_loc: operator.location,
        })
    } else {
        Node::Or(OrNode {
            location,
            left,
            right,
            operator_loc: operator.location,
        })
    }
}

fn numeric(kind: TokenKind, location: Location) -> Node {
    match kind {
        TokenKind::Float => Node::Float(FloatNode { location }),
        TokenKind::Rational => Node::Rational(RationalNode { location }),
        TokenKind::Imaginary => Node::Imaginary(ImaginaryNode { location }),
        _ => Node::Integer(IntegerNode { location }),
    }
}
