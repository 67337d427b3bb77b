// ---------------------------------------------------------------------------
// Burn-in predicate: which rows of a chain are kept
// ---------------------------------------------------------------------------

/// Name of the column holding the sampler step of each row.
pub const STEP_COLUMN: &str = "step";

/// Return indices of rows whose step lies strictly after the burn-in cut.
///
/// A row passes when `step > burn_in`. Rows with a `NaN` step never pass.
pub fn retained_rows(steps: &[f64], burn_in: i64) -> Vec<usize> {
    let cut = burn_in as f64;
    steps
        .iter()
        .enumerate()
        .filter(|(_, &step)| step > cut)
        .map(|(i, _)| i)
        .collect()
}
