//! Infrastructure layer: I/O and external integrations.

pub mod audit;
pub mod cache;
pub mod content;
pub mod ledger;
pub mod logging;
pub mod storage;
