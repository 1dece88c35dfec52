//! Domain layer: pure engines with no collaborator dependencies.
//!
//! Everything here is deterministic and side-effect free; time is always an
//! explicit parameter and storage never appears below this line.

pub mod attestation;
pub mod ballot;
pub mod form;
pub mod model;
pub mod phase;
pub mod tally;

pub use model::*;
pub use phase::{RoundPhase, RoundSchedule};
