//! Request model: verbs, argument masks and argument sets.
//!
//! # Key Types
//!
//! - [`Verb`] - The six protocol verbs plus an unrecognized state
//! - [`ArgumentSet`] - Immutable arguments of one request
//! - [`ArgumentMask`] - Arguments a verb accepts

mod arguments;
mod verb;

pub use arguments::ArgumentSet;
pub use verb::{Argument, ArgumentMask, Verb};
