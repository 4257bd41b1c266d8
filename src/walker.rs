//! Tree walker: one translation rule per node shape.
//!
//! Rules visit their children first and emit their own event last, so a
//! composite event always follows the events of everything it contains.
//! Token events are emitted in source order, each right after the position
//! tracker has been moved to the token's span.

use riptide_syntax::{
    ArrayNode, BlockNode, BlockParametersNode, CallNode, Location, Node, ParenthesesNode,
    ProgramNode, RangeNode, Source, StatementsNode,
};

use crate::dispatch::DispatchTable;
use crate::error::AdapterError;
use crate::position::PositionTracker;
use crate::sink::EventSink;
use crate::value::Value;

type WalkResult = Result<Value, AdapterError>;

pub(crate) struct Walker<'a, S: EventSink + ?Sized> {
    source: &'a Source,
    sink: &'a mut S,
    table: &'a DispatchTable,
    position: &'a mut PositionTracker,
    unary_minus: &'static str,
}

impl<'a, S: EventSink + ?Sized> Walker<'a, S> {
    pub(crate) fn new(
        source: &'a Source,
        sink: &'a mut S,
        table: &'a DispatchTable,
        position: &'a mut PositionTracker,
        unary_minus: &'static str,
    ) -> Self {
        Self {
            source,
            sink,
            table,
            position,
            unary_minus,
        }
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Emits `event` at the current position.
    fn on(&mut self, event: &str, args: Vec<Value>) -> WalkResult {
        let position = self.position.current();
        self.table.dispatch(&mut *self.sink, event, args, position)
    }

    /// Moves to `location` and emits a scanner event for its text.
    fn token(&mut self, event: &str, location: Location) -> WalkResult {
        self.bounds(location);
        let text = Value::string(self.source.slice(location));
        self.on(event, vec![text])
    }

    fn bounds(&mut self, location: Location) {
        self.position.bounds(self.source, location);
    }

    fn unsupported(&self, construct: impl Into<String>, location: Location) -> AdapterError {
        let (line, column) = self.source.position(location.start);
        AdapterError::unsupported(construct, line, column)
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    pub(crate) fn visit_program(&mut self, program: &ProgramNode) -> WalkResult {
        let statements = if program.statements.body.is_empty() {
            self.void_statements()?
        } else {
            self.visit_statements(&program.statements)?
        };
        self.bounds(program.location);
        self.on("program", vec![statements])
    }

    fn visit(&mut self, node: &Node) -> WalkResult {
        match node {
            Node::Program(program) => self.visit_program(program),
            Node::Statements(statements) => self.visit_statements(statements),
            Node::Array(array) => self.visit_array(array),
            Node::Call(call) => self.visit_call(call),
            Node::Block(block) => self.visit_block(block),
            Node::Parentheses(parens) => self.visit_parentheses(parens),
            Node::Range(range) => self.visit_range(range),
            Node::And(and) => {
                self.visit_logical(&and.left, and.operator_loc, &and.right, and.location)
            }
            Node::Or(or) => {
                self.visit_logical(&or.left, or.operator_loc, &or.right, or.location)
            }
            Node::Integer(n) => self.visit_number("int", n.location),
            Node::Float(n) => self.visit_number("float", n.location),
            Node::Rational(n) => self.visit_number("rational", n.location),
            Node::Imaginary(n) => self.visit_number("imaginary", n.location),
            Node::LocalVariableRead(read) => {
                let ident = self.token("ident", read.location)?;
                self.on("var_ref", vec![ident])
            }
            Node::LocalVariableWrite(write) => {
                let ident = self.token("ident", write.name_loc)?;
                let field = self.on("var_field", vec![ident])?;
                let value = self.visit(&write.value)?;
                self.bounds(write.location);
                self.on("assign", vec![field, value])
            }
            Node::Nil(n) => self.visit_keyword(n.location),
            Node::True(n) => self.visit_keyword(n.location),
            Node::False(n) => self.visit_keyword(n.location),
            Node::SelfNode(n) => self.visit_keyword(n.location),
        }
    }

    fn visit_optional(&mut self, node: Option<&Node>) -> WalkResult {
        node.map_or(Ok(Value::Nil), |node| self.visit(node))
    }

    /// `stmts_new`, then one `stmts_add` per statement.
    fn visit_statements(&mut self, statements: &StatementsNode) -> WalkResult {
        self.bounds(statements.location);
        let mut list = self.on("stmts_new", vec![])?;
        for statement in &statements.body {
            let value = self.visit(statement)?;
            list = self.on("stmts_add", vec![list, value])?;
        }
        Ok(list)
    }

    /// The statement list of an empty body: one void statement.
    fn void_statements(&mut self) -> WalkResult {
        let list = self.on("stmts_new", vec![])?;
        let void = self.on("void_stmt", vec![])?;
        self.on("stmts_add", vec![list, void])
    }

    fn visit_body(&mut self, body: Option<&Node>) -> WalkResult {
        match body {
            Some(body) => self.visit(body),
            None => self.void_statements(),
        }
    }

    /// `args_new`, then one `args_add` per element.
    fn visit_elements(&mut self, elements: &[Node]) -> WalkResult {
        if let Some(first) = elements.first() {
            self.bounds(first.location());
        }
        let mut list = self.on("args_new", vec![])?;
        for element in elements {
            let value = self.visit(element)?;
            list = self.on("args_add", vec![list, value])?;
        }
        Ok(list)
    }

    fn visit_array(&mut self, array: &ArrayNode) -> WalkResult {
        let elements = if array.elements.is_empty() {
            Value::Nil
        } else {
            self.visit_elements(&array.elements)?
        };
        self.bounds(array.location);
        self.on("array", vec![elements])
    }

    fn visit_parentheses(&mut self, parens: &ParenthesesNode) -> WalkResult {
        let body = self.visit_body(parens.body.as_deref())?;
        self.bounds(parens.location);
        self.on("paren", vec![body])
    }

    fn visit_range(&mut self, range: &RangeNode) -> WalkResult {
        let left = self.visit_optional(range.left.as_deref())?;
        let right = self.visit_optional(range.right.as_deref())?;
        self.bounds(range.location);
        let event = if range.exclude_end { "dot3" } else { "dot2" };
        self.on(event, vec![left, right])
    }

    /// `and`/`or`/`&&`/`||` become `binary` tagged with the operator text.
    fn visit_logical(
        &mut self,
        left: &Node,
        operator_loc: Location,
        right: &Node,
        location: Location,
    ) -> WalkResult {
        let left = self.visit(left)?;
        let right = self.visit(right)?;
        let operator = Value::symbol(self.source.slice(operator_loc));
        self.bounds(location);
        self.on("binary", vec![left, operator, right])
    }

    /// A numeric literal. A leading `-` splits into the unsigned literal,
    /// reported one column to the right, wrapped in a unary minus reported
    /// at the literal itself.
    fn visit_number(&mut self, event: &str, location: Location) -> WalkResult {
        let source = self.source;
        match source.slice(location).strip_prefix('-') {
            Some(digits) => {
                let (line, column) = source.position(location.start);
                self.position.bounds_values(line, column + 1);
                let operand = self.on(event, vec![Value::string(digits)])?;
                self.bounds(location);
                self.on("unary", vec![Value::symbol(self.unary_minus), operand])
            }
            None => self.token(event, location),
        }
    }

    fn visit_keyword(&mut self, location: Location) -> WalkResult {
        let kw = self.token("kw", location)?;
        self.on("var_ref", vec![kw])
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    fn visit_block(&mut self, block: &BlockNode) -> WalkResult {
        let parameters = match &block.parameters {
            Some(parameters) => self.visit_block_parameters(parameters)?,
            None => Value::Nil,
        };
        let body = self.visit_body(block.body.as_deref())?;
        self.bounds(block.location);
        if block.is_brace(self.source) {
            self.on("brace_block", vec![parameters, body])
        } else {
            let bodystmt = self.on("bodystmt", vec![body, Value::Nil, Value::Nil, Value::Nil])?;
            self.on("do_block", vec![parameters, bodystmt])
        }
    }

    fn visit_block_parameters(&mut self, parameters: &BlockParametersNode) -> WalkResult {
        let requireds = if parameters.requireds.is_empty() {
            Value::Nil
        } else {
            let mut names = Vec::with_capacity(parameters.requireds.len());
            for required in &parameters.requireds {
                names.push(self.token("ident", required.location)?);
            }
            Value::Array(names)
        };
        self.bounds(parameters.location);
        let mut params = vec![requireds];
        params.resize(7, Value::Nil);
        let params = self.on("params", params)?;
        self.on("block_var", vec![params, Value::Bool(false)])
    }

    /// Wraps `call` with its block, if it has one.
    fn with_block(&mut self, call: Value, node: &CallNode) -> WalkResult {
        match node.block.as_deref() {
            Some(block) => {
                let block = self.visit(block)?;
                self.bounds(node.location);
                self.on("method_add_block", vec![call, block])
            }
            None => Ok(call),
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn visit_call(&mut self, call: &CallNode) -> WalkResult {
        if call.is_variable_call() {
            return self.visit_variable_call(call);
        }
        if call.opening_loc.is_some() {
            return self.visit_paren_call(call);
        }
        if call.name.starts_with(|c: char| c.is_ascii_punctuation() && c != '_') {
            return self.visit_operator_call(call);
        }
        match call.call_operator_loc {
            None => self.visit_command(call),
            Some(operator_loc) => self.visit_method_call(call, operator_loc),
        }
    }

    fn message_loc(&self, call: &CallNode) -> Result<Location, AdapterError> {
        call.message_loc
            .ok_or_else(|| self.unsupported("call without a method name", call.location))
    }

    fn args_add_block(&mut self, arguments: &[Node]) -> WalkResult {
        let list = self.visit_elements(arguments)?;
        self.on("args_add_block", vec![list, Value::Bool(false)])
    }

    /// `foo`
    fn visit_variable_call(&mut self, call: &CallNode) -> WalkResult {
        let name_is_identifier = call.name.starts_with(|c: char| c.is_alphabetic() || c == '_');
        if call.receiver.is_some() || !name_is_identifier {
            return Err(self.unsupported(
                format!("variable call `{}` with a receiver or operator name", call.name),
                call.location,
            ));
        }
        let ident = self.token("ident", self.message_loc(call)?)?;
        self.on("vcall", vec![ident])
    }

    /// Receiver and call operator, emitted as `recv`, `@period`/`@op`.
    fn receiver_and_operator(
        &mut self,
        call: &CallNode,
        operator_loc: Location,
    ) -> Result<(Value, Value), AdapterError> {
        let source = self.source;
        let operator = source.slice(operator_loc);
        let event = match operator {
            "." => "period",
            "&." => "op",
            other => {
                return Err(self.unsupported(
                    format!("operator other than . or &. for call: {other:?}"),
                    operator_loc,
                ))
            }
        };
        let receiver = match call.receiver.as_deref() {
            Some(receiver) => self.visit(receiver)?,
            None => {
                return Err(self.unsupported(
                    format!("call operator {operator:?} without a receiver"),
                    operator_loc,
                ))
            }
        };
        let operator = self.token(event, operator_loc)?;
        Ok((receiver, operator))
    }

    /// `foo(a)`, `recv.foo(a)`
    fn visit_paren_call(&mut self, call: &CallNode) -> WalkResult {
        let callee = match (call.receiver.is_some(), call.call_operator_loc) {
            (false, _) => {
                let ident = self.token("ident", self.message_loc(call)?)?;
                self.on("fcall", vec![ident])?
            }
            (true, Some(operator_loc)) => {
                let (receiver, operator) = self.receiver_and_operator(call, operator_loc)?;
                let ident = self.token("ident", self.message_loc(call)?)?;
                self.on("call", vec![receiver, operator, ident])?
            }
            (true, None) => {
                return Err(self.unsupported(
                    format!("parenthesized call `{}` without a call operator", call.name),
                    call.location,
                ))
            }
        };

        let arguments = match call.arguments.as_ref().filter(|args| !args.is_empty()) {
            Some(arguments) => self.args_add_block(&arguments.arguments)?,
            None => Value::Nil,
        };
        self.bounds(call.location);
        let paren = self.on("arg_paren", vec![arguments])?;
        let call_value = self.on("method_add_arg", vec![callee, paren])?;
        self.with_block(call_value, call)
    }

    /// `a + b`, `-a`, `!a`
    fn visit_operator_call(&mut self, call: &CallNode) -> WalkResult {
        let Some(receiver) = call.receiver.as_deref() else {
            return Err(self.unsupported(
                format!("operator `{}` without a receiver", call.name),
                call.location,
            ));
        };
        let operator = Value::symbol(call.name.as_str());
        match call.argument_list() {
            [] => {
                let operand = self.visit(receiver)?;
                self.bounds(call.location);
                self.on("unary", vec![operator, operand])
            }
            [argument] => {
                let left = self.visit(receiver)?;
                let right = self.visit(argument)?;
                self.bounds(call.location);
                self.on("binary", vec![left, operator, right])
            }
            _ => Err(self.unsupported(
                format!("more than one argument for operator `{}`", call.name),
                call.location,
            )),
        }
    }

    /// `foo a, b`, `foo { }`, `foo?`
    fn visit_command(&mut self, call: &CallNode) -> WalkResult {
        if call.receiver.is_some() {
            return Err(self.unsupported(
                format!("call `{}` with a receiver but no call operator", call.name),
                call.location,
            ));
        }
        let ident = self.token("ident", self.message_loc(call)?)?;
        let command = match call.arguments.as_ref().filter(|args| !args.is_empty()) {
            Some(arguments) => {
                let arguments = self.args_add_block(&arguments.arguments)?;
                self.bounds(call.location);
                self.on("command", vec![ident, arguments])?
            }
            None => {
                let fcall = self.on("fcall", vec![ident])?;
                let arguments = self.on("args_new", vec![])?;
                self.bounds(call.location);
                self.on("method_add_arg", vec![fcall, arguments])?
            }
        };
        self.with_block(command, call)
    }

    /// `recv.foo`, `recv&.foo a`
    fn visit_method_call(&mut self, call: &CallNode, operator_loc: Location) -> WalkResult {
        let (receiver, operator) = self.receiver_and_operator(call, operator_loc)?;
        let ident = self.token("ident", self.message_loc(call)?)?;
        let call_value = match call.arguments.as_ref().filter(|args| !args.is_empty()) {
            Some(arguments) => {
                let arguments = self.args_add_block(&arguments.arguments)?;
                self.bounds(call.location);
                self.on("command_call", vec![receiver, operator, ident, arguments])?
            }
            None => {
                self.bounds(call.location);
                self.on("call", vec![receiver, operator, ident])?
            }
        };
        self.with_block(call_value, call)
    }
}
