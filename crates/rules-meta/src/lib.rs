//! Rule model, rule-file schema and validation for rules-adapter.
//!
//! - [`RuleRecord`], [`RuleGroup`] and [`RuleSet`] are the typed model the
//!   reconciliation engine compares.
//! - [`schema`] holds the serde shapes of the persisted YAML rule file and of
//!   the JSON records published to the remote store.
//! - [`loader`] converts between the two.

pub mod duration;
pub mod error;
pub mod loader;
pub mod model;
pub mod schema;
pub mod validation;

pub use error::{Error, Result};
pub use loader::{parse_rule_file, render_rule_file};
pub use model::{GroupNaming, RuleGroup, RuleKind, RuleRecord, RuleSet};
pub use schema::RemoteRecord;
pub use validation::{ExpressionValidator, PromqlSyntax, ValidationError};
