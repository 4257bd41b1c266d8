//! Event name to handler binding.
//!
//! The table is built once per adapter by walking the whole vocabulary and
//! asking the sink for a [`Handler`] per name. Every name is bound, so any
//! event the legacy API defines can be dispatched; names the sink does not
//! care about fall through to [`Handler::Stub`], which checks the arity and
//! yields `nil`.

use std::collections::HashMap;

use tracing::trace;

use crate::error::AdapterError;
use crate::events::{vocabulary, EventSpec};
use crate::position::Position;
use crate::sink::EventSink;
use crate::value::Value;

/// What an event does when dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Accept the declared arity and yield `nil`.
    Stub,
    /// [`EventSink::composite`]
    Composite,
    /// [`EventSink::token`] at the current position.
    Token,
    /// [`EventSink::begin_collection`]
    BeginCollection,
    /// [`EventSink::extend_collection`]
    ExtendCollection,
    /// [`EventSink::parse_error`], yielding `nil`.
    ParseError,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    spec: EventSpec,
    handler: Handler,
}

/// A total mapping from event names to handlers.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    bindings: HashMap<&'static str, Binding>,
}

impl DispatchTable {
    /// Binds every event in the vocabulary for `sink`.
    pub fn bind<S: EventSink + ?Sized>(sink: &S) -> Self {
        let bindings = vocabulary()
            .map(|spec| {
                let handler = sink.bind(&spec);
                (spec.name, Binding { spec, handler })
            })
            .collect();
        Self { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn spec(&self, event: &str) -> Option<EventSpec> {
        self.bindings.get(event).map(|binding| binding.spec)
    }

    /// Emits `event` with `args`.
    ///
    /// # Errors
    ///
    /// [`AdapterError::UnknownEvent`] for names outside the vocabulary and
    /// [`AdapterError::ArityMismatch`] when `args` does not match the
    /// declared arity.
    pub fn dispatch<S: EventSink + ?Sized>(
        &self,
        sink: &mut S,
        event: &str,
        args: Vec<Value>,
        position: Position,
    ) -> Result<Value, AdapterError> {
        let binding = self
            .bindings
            .get(event)
            .ok_or_else(|| AdapterError::UnknownEvent {
                event: event.to_string(),
            })?;
        let spec = binding.spec;
        if args.len() != spec.arity {
            return Err(AdapterError::ArityMismatch {
                event: event.to_string(),
                expected: spec.arity,
                actual: args.len(),
            });
        }

        trace!(
            event = spec.name,
            handler = ?binding.handler,
            line = position.line,
            column = position.column,
            "dispatch"
        );

        let value = match binding.handler {
            Handler::Stub => Value::Nil,
            Handler::Composite => sink.composite(spec.name, args),
            Handler::Token => {
                let [text] = exactly::<1>(spec, args)?;
                sink.token(spec.name, text, position)
            }
            Handler::BeginCollection => sink.begin_collection(spec.name),
            Handler::ExtendCollection => {
                let [list, item] = exactly::<2>(spec, args)?;
                sink.extend_collection(spec.name, list, item)
            }
            Handler::ParseError => {
                let [message] = exactly::<1>(spec, args)?;
                match &message {
                    Value::String(text) => sink.parse_error(text),
                    other => sink.parse_error(&other.to_string()),
                }
                Value::Nil
            }
        };
        Ok(value)
    }
}

/// Moves `args` into a fixed-size array for handlers with a fixed shape.
fn exactly<const N: usize>(spec: EventSpec, args: Vec<Value>) -> Result<[Value; N], AdapterError> {
    <[Value; N]>::try_from(args).map_err(|args| AdapterError::ArityMismatch {
        event: spec.name.to_string(),
        expected: N,
        actual: args.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PARSER_EVENTS, SCANNER_EVENTS};
    use crate::sink::{AccumulatingSink, Inert, RawSink};

    const AT: Position = Position { line: 1, column: 0 };

    #[test]
    fn test_table_is_total() {
        let table = DispatchTable::bind(&Inert);
        assert_eq!(table.len(), PARSER_EVENTS.len() + SCANNER_EVENTS.len());
        for (name, arity) in PARSER_EVENTS {
            assert_eq!(table.spec(name).map(|s| s.arity), Some(*arity));
        }
    }

    #[test]
    fn test_stubs_yield_nil_for_every_arity() {
        let table = DispatchTable::bind(&Inert);
        let mut sink = Inert;
        for &(name, arity) in PARSER_EVENTS {
            let args = vec![Value::Nil; arity];
            let value = table.dispatch(&mut sink, name, args, AT).unwrap();
            assert!(value.is_nil(), "{name} produced {value}");
        }
    }

    #[test]
    fn test_arity_mismatch_is_reported() {
        let table = DispatchTable::bind(&Inert);
        let error = table
            .dispatch(&mut Inert, "binary", vec![Value::Nil, Value::Nil], AT)
            .unwrap_err();
        assert_eq!(
            error,
            AdapterError::ArityMismatch {
                event: "binary".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_unknown_event_is_reported() {
        let table = DispatchTable::bind(&Inert);
        let error = table
            .dispatch(&mut Inert, "frobnicate", vec![], AT)
            .unwrap_err();
        assert!(matches!(error, AdapterError::UnknownEvent { .. }));
    }

    #[test]
    fn test_raw_composite_and_token() {
        let mut sink = RawSink::new();
        let table = DispatchTable::bind(&sink);
        let ident = table
            .dispatch(&mut sink, "ident", vec![Value::string("foo")], Position { line: 1, column: 4 })
            .unwrap();
        let vcall = table.dispatch(&mut sink, "vcall", vec![ident], AT).unwrap();
        assert_eq!(vcall.to_string(), r#"[:vcall, [:@ident, "foo", [1, 4]]]"#);
    }

    #[test]
    fn test_raw_keeps_list_events_as_tuples() {
        let mut sink = RawSink::new();
        let table = DispatchTable::bind(&sink);
        let list = table.dispatch(&mut sink, "args_new", vec![], AT).unwrap();
        let list = table
            .dispatch(&mut sink, "args_add", vec![list, Value::Integer(1)], AT)
            .unwrap();
        assert_eq!(list.to_string(), "[:args_add, [:args_new], 1]");
    }

    #[test]
    fn test_accumulating_flattens_list_events() {
        let mut sink = AccumulatingSink::new();
        let table = DispatchTable::bind(&sink);
        let list = table.dispatch(&mut sink, "stmts_new", vec![], AT).unwrap();
        let list = table
            .dispatch(&mut sink, "stmts_add", vec![list, Value::Integer(1)], AT)
            .unwrap();
        let program = table.dispatch(&mut sink, "program", vec![list], AT).unwrap();
        assert_eq!(program.to_string(), "[:program, [1]]");
    }

    #[test]
    fn test_parse_error_is_recorded_not_returned() {
        let mut sink = RawSink::new();
        let table = DispatchTable::bind(&sink);
        let value = table
            .dispatch(&mut sink, "parse_error", vec![Value::string("oops")], AT)
            .unwrap();
        assert!(value.is_nil());
        assert_eq!(sink.errors(), ["oops"]);
    }
}
