//! Variable resolution engine
//!
//! Resolves `$(variable)` references against a [`GlobalTable`].

use std::borrow::Cow;
use std::collections::HashMap;

use chartpatch_domain::{GlobalTable, Value};
use tracing::trace;

use super::parser::{first_variable, has_variables, parse_variables};

/// Upper bound, in bytes, on the text produced by resolving one value.
pub const MAX_EXPANDED_LEN: usize = 1 << 20;

/// Errors that can occur during variable resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A referenced variable is absent from the global table or bound to `null`.
    #[error("undefined global variable: $({0})")]
    UndefinedVariable(String),

    /// A global's text references itself, directly or through other globals.
    #[error("global variable $({0}) expands recursively")]
    RecursiveReference(String),

    /// Splicing a global grew the text past [`MAX_EXPANDED_LEN`].
    #[error("expansion of $({0}) exceeds {limit} bytes", limit = MAX_EXPANDED_LEN)]
    ExpansionTooLarge(String),
}

/// Fully expanded text of each global seen during one call.
type Expansions = HashMap<String, String>;

/// The variable resolution engine.
///
/// Pure over its table: resolving never changes state, so one resolver can be
/// shared by every chart of a run.
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver<'a> {
    globals: &'a GlobalTable,
}

impl<'a> VariableResolver<'a> {
    /// Creates a new resolver over `globals`.
    #[must_use]
    pub const fn new(globals: &'a GlobalTable) -> Self {
        Self { globals }
    }

    /// Returns the table this resolver reads from.
    #[must_use]
    pub const fn globals(&self) -> &'a GlobalTable {
        self.globals
    }

    /// Resolves all references in the textual form of `value`.
    ///
    /// - Text without references returns `value` unchanged, whatever its type.
    /// - Text that is exactly one reference yields the global as-is, so
    ///   integers and maps keep their type.
    /// - Otherwise every reference is replaced by the textual form of its
    ///   global, itself fully expanded, and the result is a string.
    ///
    /// Lists and maps are scanned through their compact JSON form, so a
    /// reference anywhere inside them turns the whole value into a string.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UndefinedVariable`] for the first reference
    /// that has no value, [`ResolveError::RecursiveReference`] if a global
    /// expands into itself, and [`ResolveError::ExpansionTooLarge`] if the
    /// text outgrows [`MAX_EXPANDED_LEN`].
    pub fn resolve(&self, value: &Value) -> Result<Value, ResolveError> {
        let text = match value {
            Value::String(text) => Cow::Borrowed(text.as_str()),
            other => Cow::Owned(other.to_string()),
        };
        Ok(self.resolve_str(&text)?.unwrap_or_else(|| value.clone()))
    }

    /// Resolves references in a string.
    ///
    /// Returns `Ok(None)` when `input` holds no reference at all.
    ///
    /// # Errors
    ///
    /// See [`VariableResolver::resolve`].
    pub fn resolve_str(&self, input: &str) -> Result<Option<Value>, ResolveError> {
        if !has_variables(input) {
            return Ok(None);
        }

        if let Some(reference) = first_variable(input).filter(|r| r.spans_whole(input)) {
            trace!(variable = %reference.name, "resolved whole-value reference");
            return self.lookup(&reference.name).cloned().map(Some);
        }

        let expanded = self.expand(input, &mut Vec::new(), &mut Expansions::new())?;
        trace!(%expanded, "substituted references");
        Ok(Some(Value::String(expanded)))
    }

    /// Resolves just the value of a single variable by name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UndefinedVariable`] if `name` has no value.
    pub fn lookup(&self, name: &str) -> Result<&'a Value, ResolveError> {
        self.globals
            .lookup(name)
            .ok_or_else(|| ResolveError::UndefinedVariable(name.to_string()))
    }

    /// Splices the expansion of every reference in `text`, left to right.
    ///
    /// `chain` holds the globals currently being expanded.
    fn expand(
        &self,
        text: &str,
        chain: &mut Vec<String>,
        expansions: &mut Expansions,
    ) -> Result<String, ResolveError> {
        let mut expanded = String::with_capacity(text.len());
        let mut rest = 0;

        for reference in parse_variables(text) {
            expanded.push_str(&text[rest..reference.span.start]);
            expanded.push_str(&self.expand_variable(&reference.name, chain, expansions)?);
            if expanded.len() > MAX_EXPANDED_LEN {
                return Err(ResolveError::ExpansionTooLarge(reference.name));
            }
            rest = reference.span.end;
        }
        expanded.push_str(&text[rest..]);
        Ok(expanded)
    }

    fn expand_variable(
        &self,
        name: &str,
        chain: &mut Vec<String>,
        expansions: &mut Expansions,
    ) -> Result<String, ResolveError> {
        if let Some(done) = expansions.get(name) {
            return Ok(done.clone());
        }
        if chain.iter().any(|ancestor| ancestor == name) {
            return Err(ResolveError::RecursiveReference(name.to_string()));
        }

        let text = self.lookup(name)?.to_string();
        chain.push(name.to_string());
        let expanded = self.expand(&text, chain, expansions);
        chain.pop();

        let expanded = expanded?;
        trace!(variable = %name, %expanded, "expanded global");
        expansions.insert(name.to_string(), expanded.clone());
        Ok(expanded)
    }
}
