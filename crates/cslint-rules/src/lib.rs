//! cslint rules
//!
//! Built-in rules and the rule dispatch engine for the cslint C# style
//! analyzer. The registry declares rule metadata (id, default severity,
//! category, fixability) as process-wide immutable statics; the engine
//! resolves configuration against it and drives analysis and fixes.

pub mod builtin;
pub mod engine;
pub mod registry;

pub use builtin::braces;
pub use engine::LintEngine;
pub use registry::{
    BUILTIN_RULES, ResolvedRule, RuleCategory, RuleDescriptor, RuleRegistry, find_rule,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
