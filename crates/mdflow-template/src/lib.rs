//! The template engine (spec §4.8): a Liquid-grammar variable subsystem
//! layered over the body text — extraction of `_`-prefixed variables,
//! strict/lenient substitution, and interactive recovery of anything
//! still missing.

pub mod engine;
pub mod extract;
pub mod filters;
pub mod prompt;
pub mod substitute;

pub use extract::extract_variables;
pub use prompt::recover_missing_variables;
pub use substitute::substitute;
