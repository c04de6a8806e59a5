//! # beacon-core
//!
//! Deterministic decision logic for Knowledge Beacon conformance validation.
//!
//! This crate decides, from sequences of beacon responses, whether the
//! service behaves correctly:
//! - Is paging a stable, order-preserving slicing of one ordering?
//! - Does a semantic group filter only return records of that group?
//! - How do individual check results roll up into a run verdict?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same responses always produce the same outcome
//! 2. **No I/O**: Querying the beacon is the runtime crate's job
//! 3. **Traceable**: Every failure names the ids and values involved
//!
//! ## Example
//!
//! ```rust
//! use beacon_core::{compare_slices, slice_size, Concept};
//!
//! let full: Vec<Concept> = ["A", "B", "C", "D"]
//!     .iter()
//!     .map(|id| Concept::new(*id, "GENE"))
//!     .collect();
//! let n = slice_size(full.len()).unwrap();
//!
//! let summary = compare_slices(&full, &full[..n], &full[n..2 * n]).unwrap();
//! assert_eq!(summary.slice_size, 2);
//! ```

pub mod filter;
pub mod outcome;
pub mod paging;
pub mod patterns;
pub mod query;
pub mod report;
pub mod semantic;
pub mod suite;
pub mod types;

// Re-export main types at crate root
pub use filter::{first_concept_violation, linked_concept_violation, FilterTally, ProbeResult};
pub use outcome::{
    BrokenCause, CheckKind, CheckResult, Outcome, OutcomeKind, Violation, Warning,
    WorkflowBroken, WorkflowStep,
};
pub use paging::{compare_slices, slice_size, PagingSummary};
pub use patterns::is_curie;
pub use query::{
    ConceptQuery, EvidenceQuery, GatewayError, GatewayErrorKind, Query, StatementQuery,
};
pub use report::{ReportBuilder, ValidationReport};
pub use semantic::{SemanticGroup, UnknownSemanticGroup};
pub use suite::{SuiteConfig, SuiteError};
pub use types::{
    Concept, ConceptDetail, ConceptDetails, ConceptRef, Evidence, ExactMatchSet,
    IdentifiedEntity, PredicateRef, SeedContext, Statement,
};
