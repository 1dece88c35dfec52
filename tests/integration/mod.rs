//! Cross-layer integration tests.
//!
//! Cargo only discovers integration tests that are direct children of `tests/`.
//! We keep the prescriptive `tests/integration/*.rs` structure and wire it up
//! via an explicit `[[test]]` target in `Cargo.toml`.

mod results_flow;
