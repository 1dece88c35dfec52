//! Ballot engines: allocation budgets, delegated signatures, row ingestion.

pub mod rows;
pub mod signature;
pub mod validation;

pub use rows::{ingest_rows, SheetRow};
pub use signature::{ballot_signing_digest, hash_allocations, sign_ballot, verify_ballot_signature, BallotSigningScope};
pub use validation::validate_allocations;
