/*!
 * Merging of per-chunk results.
 */

use super::model::{ChunkResult, MergedResult};

/// Joins successful chunk outputs
pub const RESULT_JOIN: &str = "\n\n";

/// Error reported when no chunk produced output
pub const ALL_FAILED_MESSAGE: &str = "all chunks failed";

/// Fold chunk results, in chunk order, into one corrected text and one summary
///
/// The merge succeeds when at least one chunk did. Failed chunks and
/// absent fields are left out rather than replaced by placeholders.
pub fn merge(results: &[ChunkResult]) -> MergedResult {
    let mut corrected = Vec::new();
    let mut summaries = Vec::new();
    let mut succeeded = 0;
    let mut failed = 0;

    for result in results {
        match result {
            ChunkResult::Success {
                corrected_text,
                summary,
                ..
            } => {
                succeeded += 1;
                corrected.extend(corrected_text.as_deref());
                summaries.extend(summary.as_deref());
            }
            ChunkResult::Failure { .. } => failed += 1,
        }
    }

    if succeeded == 0 {
        return MergedResult {
            ok: false,
            corrected_text: String::new(),
            summary: String::new(),
            error: Some(ALL_FAILED_MESSAGE.to_string()),
            succeeded,
            failed,
        };
    }

    MergedResult {
        ok: true,
        corrected_text: corrected.join(RESULT_JOIN),
        summary: summaries.join(RESULT_JOIN),
        error: None,
        succeeded,
        failed,
    }
}
