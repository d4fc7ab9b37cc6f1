//! Variable parser for `$(variable)` syntax
//!
//! Finds global variable references with their positions. A name is one or
//! more characters other than `(` and `)`, so names cannot nest and cannot
//! contain a literal `$(`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)]
static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(([^()]+)\)").unwrap());

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without `$(` `)`).
    pub name: String,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Returns the literal token, e.g. `$(env)`.
    #[must_use]
    pub fn token(&self) -> String {
        format!("$({})", self.name)
    }

    /// Returns true if this reference covers all of `input`.
    #[must_use]
    pub const fn spans_whole(&self, input: &str) -> bool {
        self.span.start == 0 && self.span.end == input.len()
    }
}

/// Parses a string and extracts all variable references, left to right.
///
/// # Examples
///
/// ```
/// use chartpatch_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("repo/$(env)-chart:$(tag)");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "env");
/// assert_eq!(refs[1].name, "tag");
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    REFERENCE_REGEX
        .captures_iter(input)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let name = captures.get(1)?;
            Some(VariableReference::new(name.as_str(), whole.range()))
        })
        .collect()
}

/// Returns the leftmost variable reference, if any.
#[must_use]
pub fn first_variable(input: &str) -> Option<VariableReference> {
    let captures = REFERENCE_REGEX.captures(input)?;
    let whole = captures.get(0)?;
    let name = captures.get(1)?;
    Some(VariableReference::new(name.as_str(), whole.range()))
}

/// Returns true if the input string contains any variable references.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    REFERENCE_REGEX.is_match(input)
}
