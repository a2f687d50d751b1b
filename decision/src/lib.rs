//! Pure rule-table decision engine (spec §4.4): rules are data, not
//! `Box<dyn Fn>`, so the whole table is serializable and printable.

pub mod bundle;
pub mod engine;
pub mod risk;
pub mod rule;
pub mod rules_table;

pub use bundle::{AppliedRule, Constraint, ConstraintValue, DecisionBundle, DecisionContext};
pub use engine::decide;
pub use risk::{weighted_confidence, RiskScores};
pub use rule::{Condition, Effect, Rule};
pub use rules_table::RULES;
