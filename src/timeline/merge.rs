use crate::foundation::core::{TIME_EPSILON, TimeInterval};
use crate::foundation::error::{ClipmillError, ClipmillResult};
use crate::timeline::model::AssetAssignment;

/// Normalize an assignment sequence into gap-free, fully-assigned coverage.
///
/// Input must be ordered by start, non-overlapping, and contiguous. Each
/// unassigned window is absorbed by a neighbor:
///
/// - an assigned predecessor extends forward over the gap (forward
///   preference: when both neighbors exist, the predecessor always wins, so
///   the running clip continues instead of jump-cutting backward);
/// - a leading unassigned run is absorbed by the first assigned window,
///   whose start extends backward;
/// - a sequence with no assigned window at all cannot be filled and yields a
///   coverage error.
///
/// An empty input has nothing to merge and yields an empty output, which is
/// distinct from the uncoverable case above. Pure: no side effects,
/// idempotent on fully-assigned input.
pub fn merge_unassigned(assignments: &[AssetAssignment]) -> ClipmillResult<Vec<AssetAssignment>> {
    if assignments.is_empty() {
        return Ok(Vec::new());
    }
    validate_contiguous(assignments)?;

    let mut merged: Vec<AssetAssignment> = Vec::with_capacity(assignments.len());
    let mut leading_gap_start: Option<f64> = None;

    for assignment in assignments {
        match &assignment.asset {
            Some(_) => {
                let mut entry = assignment.clone();
                if let Some(gap_start) = leading_gap_start.take() {
                    entry.interval = TimeInterval::new(gap_start, entry.interval.end)?;
                }
                merged.push(entry);
            }
            None => match merged.last_mut() {
                Some(prev) => {
                    prev.interval =
                        TimeInterval::new(prev.interval.start, assignment.interval.end)?;
                }
                None => {
                    if leading_gap_start.is_none() {
                        leading_gap_start = Some(assignment.interval.start);
                    }
                }
            },
        }
    }

    if merged.is_empty() {
        return Err(ClipmillError::coverage(
            "no assigned interval available to cover the timeline",
        ));
    }
    Ok(merged)
}

/// Reject out-of-order, overlapping, or gapped input, naming the first
/// offending window.
fn validate_contiguous(assignments: &[AssetAssignment]) -> ClipmillResult<()> {
    for pair in assignments.windows(2) {
        let (prev, next) = (&pair[0].interval, &pair[1].interval);
        if (prev.end - next.start).abs() > TIME_EPSILON {
            return Err(ClipmillError::coverage(format!(
                "assignments must be contiguous: [{}, {}) is followed by [{}, {})",
                prev.start, prev.end, next.start, next.end
            )));
        }
    }
    Ok(())
}
