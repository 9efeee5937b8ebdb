//! Rule-based triage over pipeline run metrics.
//!
//! This crate provides:
//! - Metric aggregation (mean / p95 / last per tracked metric)
//! - A fixed, data-driven threshold rule table producing severity and findings
//! - Action recommendation merged with the baseline playbook
//! - Ticket payload formatting
//! - `run_triage`, composing the stages above

pub mod actions;
pub mod aggregate;
pub mod scoring;
pub mod ticket;
pub mod triage;

pub use actions::{recommend, BASE_PLAYBOOK};
pub use aggregate::{aggregate, AggregateSet, Stat};
pub use scoring::{score, ThresholdRule, RULES};
pub use ticket::{build_ticket, build_ticket_from_label};
pub use triage::{run_triage, TriageReport};
