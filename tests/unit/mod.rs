//! Domain-layer unit tests.

mod phase_resolution;
mod sheet_ingestion;
mod tally_scenarios;
