//! Verb handlers.
//!
//! One handler per verb (list verbs share one). Each handler validates its
//! arguments, queries the repositories and returns the verb payload element.

pub mod formats;
pub mod identify;
pub mod records;
pub mod sets;
