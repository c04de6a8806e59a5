//! The three validators a run is made of.
//!
//! All of them talk to a [`QueryGateway`](crate::gateway::QueryGateway) and
//! hand their observations to the decision logic in `beacon-core`.

mod paging;
mod semantic;
mod workflow;

pub use paging::PagingValidator;
pub use semantic::SemanticFilterValidator;
pub use workflow::{WorkflowAbort, WorkflowOutcome, WorkflowValidator};
