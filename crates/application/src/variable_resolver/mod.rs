//! Variable resolution module
//!
//! Provides parsing and resolution of `$(variable)` syntax against the
//! global table of a transformer configuration.
//!
//! # Usage
//!
//! ```
//! use chartpatch_application::variable_resolver::VariableResolver;
//! use chartpatch_domain::{GlobalTable, Value};
//!
//! let globals = GlobalTable::from_iter([("region", "us-east")]);
//! let resolver = VariableResolver::new(&globals);
//!
//! let resolved = resolver.resolve(&Value::from("bucket-$(region)-1")).unwrap();
//! assert_eq!(resolved, Value::from("bucket-us-east-1"));
//! ```

pub mod engine;
pub mod parser;

pub use engine::{MAX_EXPANDED_LEN, ResolveError, VariableResolver};
pub use parser::{VariableReference, first_variable, has_variables, parse_variables};
