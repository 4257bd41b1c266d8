//! The adapter: upstream parse in, legacy event stream out.

use std::cell::OnceCell;

use riptide_syntax::ParseResult;
use tracing::debug;

use crate::dispatch::DispatchTable;
use crate::error::AdapterError;
use crate::options::AdapterOptions;
use crate::position::PositionTracker;
use crate::sink::EventSink;
use crate::value::Value;
use crate::walker::Walker;

/// Produces a syntax tree for a source text.
///
/// Implemented for any `Fn(&str) -> ParseResult`, so a closure or
/// [`riptide_syntax::parse`] itself can be plugged in.
pub trait UpstreamParser {
    fn parse(&self, source: &str) -> ParseResult;
}

impl<F> UpstreamParser for F
where
    F: Fn(&str) -> ParseResult,
{
    fn parse(&self, source: &str) -> ParseResult {
        self(source)
    }
}

/// The default upstream parser.
pub type DefaultParser = fn(&str) -> ParseResult;

/// Replays the upstream parse of one source text through an [`EventSink`].
///
/// The upstream parse runs at most once per adapter and is reused by every
/// call to [`parse`](Self::parse).
///
/// # Example
///
/// ```
/// use riptide::{Adapter, RawSink};
///
/// let mut adapter = Adapter::new("foo(1)", RawSink::new());
/// let sexp = adapter.parse().unwrap().unwrap();
/// assert!(sexp.to_string().starts_with("[:program"));
/// assert!(!adapter.is_error());
/// ```
pub struct Adapter<S, P = DefaultParser> {
    source: String,
    sink: S,
    table: DispatchTable,
    position: PositionTracker,
    options: AdapterOptions,
    parser: P,
    result: OnceCell<ParseResult>,
}

impl<S: EventSink> Adapter<S> {
    pub fn new(source: impl Into<String>, sink: S) -> Self {
        Self::with_options(source, sink, AdapterOptions::default())
    }

    pub fn with_options(source: impl Into<String>, sink: S, options: AdapterOptions) -> Self {
        Adapter::with_parser(source, sink, options, riptide_syntax::parse as DefaultParser)
    }
}

impl<S: EventSink, P: UpstreamParser> Adapter<S, P> {
    /// An adapter that takes its tree from `parser` instead of the bundled
    /// frontend.
    pub fn with_parser(
        source: impl Into<String>,
        sink: S,
        options: AdapterOptions,
        parser: P,
    ) -> Self {
        let table = DispatchTable::bind(&sink);
        debug!(events = table.len(), engine = %options.engine, "bound dispatch table");
        Self {
            source: source.into(),
            sink,
            table,
            position: PositionTracker::new(),
            options,
            parser,
            result: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> AdapterOptions {
        self.options
    }

    /// The upstream parse, computed on first access.
    pub fn result(&self) -> &ParseResult {
        self.result.get_or_init(|| self.parser.parse(&self.source))
    }

    /// Replays the parse through the sink.
    ///
    /// Magic comments are replayed first, as `magic_comment(key, value)`.
    /// If the upstream parse failed, each diagnostic is replayed as
    /// `parse_error(message)` and the result is `Ok(None)`; otherwise the
    /// tree is walked and its `program` value returned.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Unsupported`] when the tree contains a shape with no
    /// legacy translation.
    pub fn parse(&mut self) -> Result<Option<Value>, AdapterError> {
        let Self {
            source,
            sink,
            table,
            position,
            options,
            parser,
            result,
        } = self;
        let result = result.get_or_init(|| parser.parse(source));

        debug!(
            engine = %options.engine,
            errors = result.errors.len(),
            magic_comments = result.magic_comments.len(),
            "replaying parse"
        );

        sink.reset();
        *position = PositionTracker::new();

        for magic in &result.magic_comments {
            position.bounds(&result.source, magic.key_loc);
            let args = vec![Value::string(&magic.key), Value::string(&magic.value)];
            table.dispatch(sink, "magic_comment", args, position.current())?;
        }

        if result.is_failure() {
            for error in &result.errors {
                debug!(message = %error.message, location = %error.location, "syntax error");
                position.bounds(&result.source, error.location);
                let args = vec![Value::string(&error.message)];
                table.dispatch(sink, "parse_error", args, position.current())?;
            }
            return Ok(None);
        }

        let unary_minus = options.engine.unary_minus();
        Walker::new(&result.source, sink, table, position, unary_minus)
            .visit_program(&result.value)
            .map(Some)
    }

    /// Whether the upstream parse reported syntax errors.
    pub fn is_error(&self) -> bool {
        self.result().is_failure()
    }

    /// The last syntax error replayed into the sink.
    pub fn error(&self) -> Option<&str> {
        self.sink.errors().last().map(String::as_str)
    }

    /// Every syntax error replayed into the sink, in order.
    pub fn errors(&self) -> &[String] {
        self.sink.errors()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use riptide_syntax::{
        ArgumentsNode, CallFlags, CallNode, IntegerNode, Location, Node, ProgramNode, Source,
        StatementsNode,
    };

    use super::*;
    use crate::dispatch::Handler;
    use crate::events::EventSpec;
    use crate::options::Engine;
    use crate::position::Position;
    use crate::sink::{AccumulatingSink, Inert, RawSink};

    /// Raw output plus the name and rendering of every event, in emission
    /// order.
    #[derive(Default)]
    struct RecordingSink {
        raw: RawSink,
        events: Vec<(String, String)>,
    }

    impl RecordingSink {
        fn names(&self) -> Vec<&str> {
            self.events.iter().map(|(name, _)| name.as_str()).collect()
        }
    }

    impl EventSink for RecordingSink {
        fn bind(&self, spec: &EventSpec) -> Handler {
            self.raw.bind(spec)
        }

        fn composite(&mut self, event: &str, args: Vec<Value>) -> Value {
            let value = self.raw.composite(event, args);
            self.events.push((event.to_string(), value.to_string()));
            value
        }

        fn token(&mut self, event: &str, text: Value, position: Position) -> Value {
            let value = self.raw.token(event, text, position);
            self.events.push((format!("@{event}"), value.to_string()));
            value
        }

        fn parse_error(&mut self, message: &str) {
            self.events
                .push(("parse_error".to_string(), message.to_string()));
            self.raw.parse_error(message);
        }

        fn reset(&mut self) {
            self.events.clear();
            self.raw.reset();
        }

        fn errors(&self) -> &[String] {
            self.raw.errors()
        }
    }

    /// A parse result holding `node` as the only statement of `text`.
    fn result_with(text: &str, node: Node) -> ParseResult {
        let location = Location::new(0, text.len());
        ParseResult {
            value: ProgramNode {
                location,
                statements: StatementsNode {
                    location,
                    body: vec![node],
                },
            },
            errors: Vec::new(),
            magic_comments: Vec::new(),
            source: Source::new(text),
        }
    }

    fn integer(start: usize, end: usize) -> Node {
        Node::Integer(IntegerNode {
            location: Location::new(start, end),
        })
    }

    #[test]
    fn test_parse_is_idempotent() {
        let mut adapter = Adapter::new("foo bar", RawSink::new());
        let first = adapter.parse().unwrap();
        let second = adapter.parse().unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_upstream_parse_runs_once() {
        let calls = Cell::new(0);
        let parser = |text: &str| {
            calls.set(calls.get() + 1);
            riptide_syntax::parse(text)
        };
        let mut adapter =
            Adapter::with_parser("1", RawSink::new(), AdapterOptions::default(), parser);
        adapter.parse().unwrap();
        adapter.parse().unwrap();
        assert!(!adapter.is_error());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_syntax_errors_replay_and_return_none() {
        let mut adapter = Adapter::new("foo(\n1 2", RawSink::new());
        assert_eq!(adapter.parse().unwrap(), None);
        assert!(adapter.is_error());
        let expected: Vec<String> = adapter
            .result()
            .errors
            .iter()
            .map(|error| error.message.clone())
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(adapter.errors(), expected.as_slice());
        assert_eq!(adapter.error(), expected.last().map(String::as_str));
    }

    #[test]
    fn test_errors_do_not_accumulate_across_calls() {
        let mut adapter = Adapter::new(")", AccumulatingSink::new());
        adapter.parse().unwrap();
        adapter.parse().unwrap();
        assert_eq!(adapter.errors().len(), 1);
    }

    #[test]
    fn test_magic_comments_replay_before_the_tree() {
        let text = "# frozen_string_literal: true\n# warn_indent: false\n1\n";
        let mut adapter = Adapter::new(text, RecordingSink::default());
        adapter.parse().unwrap();
        let sink = adapter.sink();
        assert_eq!(
            sink.names(),
            ["magic_comment", "magic_comment", "stmts_new", "@int", "stmts_add", "program"]
        );
        assert_eq!(
            sink.events[0].1,
            r#"[:magic_comment, "frozen_string_literal", "true"]"#
        );
        assert_eq!(sink.events[1].1, r#"[:magic_comment, "warn_indent", "false"]"#);
    }

    #[test]
    fn test_syntax_error_emits_no_tree_events() {
        let text = "# frozen_string_literal: true\nfoo(\n1 2\n)\n)";
        let mut adapter = Adapter::new(text, RecordingSink::default());
        assert_eq!(adapter.parse().unwrap(), None);
        let names = adapter.sink().names();
        assert_eq!(names[0], "magic_comment");
        assert!(names.len() > 1);
        assert!(names[1..].iter().all(|name| *name == "parse_error"), "{names:?}");
        assert_eq!(names.len() - 1, adapter.errors().len());
    }

    #[test]
    fn test_deep_nesting_replays_as_syntax_error() {
        let text = format!("{}1{}", "[".repeat(10_000), "]".repeat(10_000));
        let mut adapter = Adapter::new(text, RecordingSink::default());
        assert_eq!(adapter.parse().unwrap(), None);
        assert_eq!(adapter.sink().names(), ["parse_error"]);
        assert_eq!(adapter.error(), Some("nesting too deep"));
    }

    #[test]
    fn test_inert_sink_produces_nil_program() {
        let mut adapter = Adapter::new("foo(1, [2])", Inert);
        assert_eq!(adapter.parse().unwrap(), Some(Value::Nil));
    }

    #[test]
    fn test_engine_selects_unary_minus_spelling() {
        let options = AdapterOptions::new().with_engine(Engine::JRuby);
        let mut adapter = Adapter::with_options("-5", RawSink::new(), options);
        let sexp = adapter.parse().unwrap().unwrap().to_string();
        assert!(sexp.contains(r#"[:unary, :-, [:@int, "5", [1, 1]]]"#), "{sexp}");
    }

    #[test]
    fn test_operator_call_with_two_arguments_is_unsupported() {
        let text = "1 + 2 3";
        let call = Node::Call(CallNode {
            location: Location::new(0, 7),
            receiver: Some(Box::new(integer(0, 1))),
            call_operator_loc: None,
            name: "+".to_string(),
            message_loc: Some(Location::new(2, 3)),
            opening_loc: None,
            arguments: Some(ArgumentsNode {
                location: Location::new(4, 7),
                arguments: vec![integer(4, 5), integer(6, 7)],
            }),
            closing_loc: None,
            block: None,
            flags: CallFlags::default(),
        });
        let parsed = result_with(text, call);
        let mut adapter = Adapter::with_parser(
            text,
            RawSink::new(),
            AdapterOptions::default(),
            move |_: &str| parsed.clone(),
        );
        let error = adapter.parse().unwrap_err();
        assert!(matches!(error, AdapterError::Unsupported { line: 1, column: 0, .. }));
    }

    #[test]
    fn test_unknown_call_operator_is_unsupported() {
        let text = "1::abs";
        let call = Node::Call(CallNode {
            location: Location::new(0, 6),
            receiver: Some(Box::new(integer(0, 1))),
            call_operator_loc: Some(Location::new(1, 3)),
            name: "abs".to_string(),
            message_loc: Some(Location::new(3, 6)),
            opening_loc: None,
            arguments: None,
            closing_loc: None,
            block: None,
            flags: CallFlags::default(),
        });
        let parsed = result_with(text, call);
        let mut adapter = Adapter::with_parser(
            text,
            RawSink::new(),
            AdapterOptions::default(),
            move |_: &str| parsed.clone(),
        );
        match adapter.parse() {
            Err(AdapterError::Unsupported { construct, column, .. }) => {
                assert!(construct.contains("\"::\""), "{construct}");
                assert_eq!(column, 1);
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }
}
