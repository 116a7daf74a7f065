//! Signal and care-case model for Guardian.
//!
//! This crate holds the data model of the triage pipeline and the two
//! operations on it that must be deterministic:
//!
//! - [`synthesize`](synthesize::synthesize) maps a validated signal to a
//!   care-case (policy gate, recommended action, constraints, stable
//!   identity).
//! - [`CaseStore`](store::CaseStore) persists care-cases as addressable JSON
//!   records and enumerates them in a stable order.
//!
//! The JSON Schema contracts for both document kinds are bundled under
//! `interfaces/` and exposed via [`contracts`].

pub mod contracts;
pub mod error;
pub mod model;
pub mod store;
pub mod synthesize;

pub use error::CaseError;
pub use model::{
    CareCase, CaseStatus, PolicyGate, ProposedTransition, RecommendedAction, Reversibility,
    Severity, Signal, SignalRef, SystemRef,
};
pub use store::CaseStore;
