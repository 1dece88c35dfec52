use crate::foundation::{ApplicationId, RoundError};
use std::collections::BTreeMap;

/// One already-parsed spreadsheet row (`ID` / `Allocation` columns).
///
/// File format concerns live outside this core; callers hand over cell text.
#[derive(Clone, Debug)]
pub struct SheetRow {
    pub application_id: String,
    /// Raw allocation cell; `None` or empty means "no vote".
    pub allocation: Option<String>,
}

impl SheetRow {
    pub fn new(application_id: impl Into<String>, allocation: Option<&str>) -> Self {
        Self { application_id: application_id.into(), allocation: allocation.map(|s| s.to_string()) }
    }
}

/// Builds an allocation map from uploaded rows.
///
/// Row numbers in errors are 1-based and count the header row, so the first
/// data row reports as row 2. Empty cells are omitted, zero values are
/// dropped after parsing, and a repeated application id is rejected outright
/// rather than silently overwritten.
pub fn ingest_rows(rows: &[SheetRow]) -> Result<BTreeMap<ApplicationId, u64>, RoundError> {
    let mut allocations = BTreeMap::new();
    let mut seen = std::collections::BTreeSet::new();
    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 2;
        let cell = match row.allocation.as_deref().map(str::trim) {
            None | Some("") => continue,
            Some(cell) => cell,
        };
        let allocation: u64 = cell
            .parse()
            .map_err(|_| RoundError::RowParseError { row: row_number, value: cell.to_string() })?;
        if !seen.insert(row.application_id.clone()) {
            return Err(RoundError::DuplicateRow { row: row_number, application_id: row.application_id.clone() });
        }
        if allocation == 0 {
            continue;
        }
        allocations.insert(ApplicationId::from(row.application_id.as_str()), allocation);
    }
    Ok(allocations)
}
