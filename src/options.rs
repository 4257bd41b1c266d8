//! Adapter configuration.
//!
//! The only observable difference between legacy runtimes that the adapter
//! models is how the unary minus operator is named in `unary` events. It is
//! resolved once, when the adapter is constructed.

use std::fmt;

/// The legacy runtime whose output is reproduced.
///
/// # Example
///
/// ```
/// use riptide::{AdapterOptions, Engine};
///
/// let options = AdapterOptions::new().with_engine(Engine::JRuby);
/// assert_eq!(options.engine.unary_minus(), "-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Engine {
    /// The reference interpreter. Unary minus is `:-@`.
    #[default]
    CRuby,
    /// Unary minus is `:-`.
    JRuby,
}

impl Engine {
    /// The symbol name used for unary minus in `unary` events.
    #[must_use]
    pub fn unary_minus(self) -> &'static str {
        match self {
            Engine::CRuby => "-@",
            Engine::JRuby => "-",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::CRuby => write!(f, "cruby"),
            Engine::JRuby => write!(f, "jruby"),
        }
    }
}

/// Options for constructing an [`Adapter`](crate::Adapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterOptions {
    pub engine: Engine,
}

impl AdapterOptions {
    /// Options with every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_is_cruby() {
        assert_eq!(AdapterOptions::default().engine, Engine::CRuby);
        assert_eq!(Engine::default().unary_minus(), "-@");
    }

    #[test]
    fn test_jruby_spells_unary_minus_without_at() {
        let options = AdapterOptions::new().with_engine(Engine::JRuby);
        assert_eq!(options.engine.unary_minus(), "-");
    }

    #[test]
    fn test_engine_display() {
        assert_eq!(Engine::CRuby.to_string(), "cruby");
        assert_eq!(Engine::JRuby.to_string(), "jruby");
    }
}
