//! The output structure of the adapter.
//!
//! [`Value`] models the handful of Ruby objects that appear in legacy sexp
//! trees. `Display` renders Ruby `inspect` notation, so a rendered value can
//! be compared character for character with what the legacy API prints:
//!
//! ```
//! use riptide::Value;
//!
//! let token = Value::Array(vec![
//!     Value::symbol("@int"),
//!     Value::string("5"),
//!     Value::Array(vec![Value::Integer(1), Value::Integer(1)]),
//! ]);
//! assert_eq!(token.to_string(), r#"[:@int, "5", [1, 1]]"#);
//! ```

use std::fmt::{self, Write as _};

use serde::ser::{Serialize, SerializeSeq, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    String(String),
    Symbol(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

// ============================================================================
// Ruby inspect rendering
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::String(s) => write_string_literal(f, s),
            Value::Symbol(name) => {
                f.write_char(':')?;
                if is_bare_symbol(name) {
                    f.write_str(name)
                } else {
                    write_string_literal(f, name)
                }
            }
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
        }
    }
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_char('"')?;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\x1b' => f.write_str("\\e")?,
            // `#{`, `#$` and `#@` would interpolate inside a Ruby string literal.
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => f.write_str("\\#")?,
            c if c.is_control() => write!(f, "\\x{:02X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

const OPERATOR_SYMBOLS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "!=", "===", "=~", "!~", "<", "<=", ">", ">=", "<=>",
    "<<", ">>", "!", "~", "+@", "-@", "~@", "!@", "[]", "[]=", "&", "|", "^", "`",
];

/// Whether Ruby prints `:name` without quotes.
fn is_bare_symbol(name: &str) -> bool {
    if OPERATOR_SYMBOLS.contains(&name) {
        return true;
    }

    let (prefixed, rest) = if let Some(rest) = name.strip_prefix("@@") {
        (true, rest)
    } else if let Some(rest) = name.strip_prefix(['@', '$']) {
        (true, rest)
    } else {
        (false, name)
    };

    let rest = if prefixed {
        rest
    } else {
        rest.strip_suffix(['?', '!', '='])
            .filter(|stem| !stem.ends_with(['?', '!', '=']))
            .unwrap_or(rest)
    };

    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii())
}

// ============================================================================
// JSON
// ============================================================================

/// Symbols serialize as `":name"` strings so they stay distinguishable from
/// string payloads.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Symbol(name) => serializer.serialize_str(&format!(":{name}")),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(Value::string("a\"b\\c").to_string(), r#""a\"b\\c""#);
        assert_eq!(Value::string("x\n").to_string(), r#""x\n""#);
        assert_eq!(Value::string("#{x}").to_string(), r##""\#{x}""##);
        assert_eq!(Value::string("#1").to_string(), r##""#1""##);
    }

    #[test]
    fn test_bare_symbols() {
        for name in ["program", "@int", "@@cvar", "$stdout", "-@", "<=>", "foo?", "bar=", "[]="] {
            assert_eq!(Value::symbol(name).to_string(), format!(":{name}"));
        }
    }

    #[test]
    fn test_quoted_symbols() {
        assert_eq!(Value::symbol("&&").to_string(), r#":"&&""#);
        assert_eq!(Value::symbol("and").to_string(), ":and");
        assert_eq!(Value::symbol("foo?=").to_string(), r#":"foo?=""#);
        assert_eq!(Value::symbol("@foo?").to_string(), r#":"@foo?""#);
        assert_eq!(Value::symbol("").to_string(), r#":"""#);
    }

    #[test]
    fn test_nested_arrays() {
        let value = Value::Array(vec![
            Value::symbol("args_add_block"),
            Value::Array(vec![]),
            Value::Bool(false),
        ]);
        assert_eq!(value.to_string(), "[:args_add_block, [], false]");
    }

    #[test]
    fn test_json_serialization() {
        let value = Value::Array(vec![
            Value::symbol("vcall"),
            Value::Nil,
            Value::string("foo"),
            Value::Integer(1),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"[":vcall",null,"foo",1]"#);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<Value>), Value::Nil);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }
}
