#![allow(dead_code)]

pub const TEST_ROUND_ID: &str = "round-1";
pub const TEST_ADMIN_ID: &str = "admin-1";
pub const TEST_VOTER_ID: &str = "voter-1";
pub const TEST_SUBMITTER_ID: &str = "submitter-1";

// Schedule boundaries in unix millis. Phases are half-open on the left
// boundary: `now == APP_START` is already `intake`.
pub const APP_START: u64 = 1_000_000;
pub const APP_END: u64 = 2_000_000;
pub const VOTING_START: u64 = 3_000_000;
pub const VOTING_END: u64 = 4_000_000;
pub const RESULTS_START: u64 = 5_000_000;

pub const IN_INTAKE: u64 = 1_500_000;
pub const IN_PENDING_VOTING: u64 = 2_500_000;
pub const IN_VOTING: u64 = 3_500_000;
pub const IN_PENDING_RESULTS: u64 = 4_500_000;
pub const IN_RESULTS: u64 = 5_500_000;
