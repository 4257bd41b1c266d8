//! Output strategies.
//!
//! An [`EventSink`] decides what each event in the vocabulary produces. The
//! dispatch table asks the sink once per event name which [`Handler`] to
//! install, then routes every emission through the matching primitive.
//!
//! - [`RawSink`] builds `[:event, args...]` tuples and
//!   `[:@token, "text", [line, column]]` token tuples.
//! - [`AccumulatingSink`] builds the same tuples, except that `*_new`
//!   events start a plain array and `*_add` events push onto it, so list
//!   chains come out flattened.
//! - [`Inert`] binds every event to a stub and produces `nil` throughout.

use crate::dispatch::Handler;
use crate::events::EventSpec;
use crate::position::Position;
use crate::value::Value;

/// Receives events and builds the output structure.
pub trait EventSink {
    /// The handler to install for `spec`.
    fn bind(&self, _spec: &EventSpec) -> Handler {
        Handler::Stub
    }

    /// A composite event: `[:event, args...]`.
    fn composite(&mut self, event: &str, args: Vec<Value>) -> Value {
        let mut items = Vec::with_capacity(args.len() + 1);
        items.push(Value::symbol(event));
        items.extend(args);
        Value::Array(items)
    }

    /// A token event: `[:@event, text, [line, column]]`.
    fn token(&mut self, event: &str, text: Value, position: Position) -> Value {
        Value::Array(vec![
            Value::symbol(format!("@{event}")),
            text,
            Value::Array(vec![position.line.into(), position.column.into()]),
        ])
    }

    /// Starts an empty list.
    fn begin_collection(&mut self, _event: &str) -> Value {
        Value::Array(Vec::new())
    }

    /// Appends `item` to `list` and returns the list.
    fn extend_collection(&mut self, event: &str, list: Value, item: Value) -> Value {
        match list {
            Value::Array(mut items) => {
                items.push(item);
                Value::Array(items)
            }
            other => self.composite(event, vec![other, item]),
        }
    }

    /// Records a syntax error message.
    fn parse_error(&mut self, _message: &str) {}

    /// Forgets state from a previous run.
    fn reset(&mut self) {}

    /// Messages recorded by [`parse_error`](Self::parse_error), in order.
    fn errors(&self) -> &[String] {
        &[]
    }
}

// ============================================================================
// Inert
// ============================================================================

/// Produces `nil` for every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl EventSink for Inert {}

// ============================================================================
// Raw
// ============================================================================

/// Tuple-of-tuples output, the shape of `Ripper.sexp_raw`.
#[derive(Debug, Clone, Default)]
pub struct RawSink {
    errors: Vec<String>,
}

impl RawSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RawSink {
    fn bind(&self, spec: &EventSpec) -> Handler {
        match spec.name {
            "parse_error" => Handler::ParseError,
            _ if spec.is_scanner() => Handler::Token,
            _ => Handler::Composite,
        }
    }

    fn parse_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn reset(&mut self) {
        self.errors.clear();
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

// ============================================================================
// Accumulating
// ============================================================================

/// Flattened-list output, the shape of `Ripper.sexp`.
#[derive(Debug, Clone, Default)]
pub struct AccumulatingSink {
    raw: RawSink,
}

impl AccumulatingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for AccumulatingSink {
    fn bind(&self, spec: &EventSpec) -> Handler {
        if spec.is_scanner() {
            return Handler::Token;
        }
        if spec.name.ends_with("_new") && spec.arity == 0 {
            Handler::BeginCollection
        } else if spec.name.ends_with("_add") && spec.arity == 2 {
            Handler::ExtendCollection
        } else {
            self.raw.bind(spec)
        }
    }

    fn parse_error(&mut self, message: &str) {
        self.raw.parse_error(message);
    }

    fn reset(&mut self) {
        self.raw.reset();
    }

    fn errors(&self) -> &[String] {
        self.raw.errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::vocabulary;

    fn spec(name: &str) -> EventSpec {
        vocabulary()
            .find(|spec| spec.name == name)
            .expect("event in vocabulary")
    }

    #[test]
    fn test_inert_binds_stubs() {
        assert!(vocabulary().all(|s| Inert.bind(&s) == Handler::Stub));
    }

    #[test]
    fn test_raw_bindings() {
        let sink = RawSink::new();
        assert_eq!(sink.bind(&spec("program")), Handler::Composite);
        assert_eq!(sink.bind(&spec("args_new")), Handler::Composite);
        assert_eq!(sink.bind(&spec("int")), Handler::Token);
        assert_eq!(sink.bind(&spec("parse_error")), Handler::ParseError);
        assert_eq!(sink.bind(&spec("magic_comment")), Handler::Composite);
    }

    #[test]
    fn test_accumulating_bindings() {
        let sink = AccumulatingSink::new();
        assert_eq!(sink.bind(&spec("stmts_new")), Handler::BeginCollection);
        assert_eq!(sink.bind(&spec("args_add")), Handler::ExtendCollection);
        assert_eq!(sink.bind(&spec("args_add_block")), Handler::Composite);
        assert_eq!(sink.bind(&spec("mrhs_new_from_args")), Handler::Composite);
        assert_eq!(sink.bind(&spec("ident")), Handler::Token);
        assert_eq!(sink.bind(&spec("parse_error")), Handler::ParseError);
    }

    #[test]
    fn test_token_shape() {
        let mut sink = RawSink::new();
        let token = sink.token("ident", Value::string("foo"), Position { line: 2, column: 4 });
        assert_eq!(token.to_string(), r#"[:@ident, "foo", [2, 4]]"#);
    }

    #[test]
    fn test_extend_collection_pushes() {
        let mut sink = AccumulatingSink::new();
        let list = sink.begin_collection("args_new");
        let list = sink.extend_collection("args_add", list, Value::Integer(1));
        let list = sink.extend_collection("args_add", list, Value::Integer(2));
        assert_eq!(list.to_string(), "[1, 2]");
    }

    #[test]
    fn test_parse_errors_are_recorded_and_reset() {
        let mut sink = AccumulatingSink::new();
        sink.parse_error("first");
        sink.parse_error("second");
        assert_eq!(sink.errors(), ["first", "second"]);
        sink.reset();
        assert!(sink.errors().is_empty());
    }
}
