//! Built-in rules
//!
//! Each rule module declares its descriptor and check; the registry picks
//! descriptors up from here, and the engine routes subscribed node kinds to
//! the checks.

pub mod braces;
