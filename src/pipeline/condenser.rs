/*!
 * Final size check on the merged summary.
 *
 * A merged summary longer than one chunk is sent back to the provider once
 * to be merged into a single summary. If that call fails the summary is cut
 * to size and a notice is appended. The condenser never runs on its own
 * output.
 */

use std::time::Duration;

use log::{info, warn};

use super::model::CondenseStatus;
use crate::transform::{TransformContext, Transformer, invoke_with_timeout};

/// Appended to a summary that had to be cut
pub const TRUNCATION_NOTICE: &str = "...\n(summary truncated: part of the content was omitted for length)";

/// What the condenser did with the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CondenseOutcome {
    /// Within bounds, returned as is
    Unchanged(String),
    /// Re-summarized by the provider
    Condensed(String),
    /// Cut to size with `TRUNCATION_NOTICE`
    Truncated(String),
}

impl CondenseOutcome {
    pub fn status(&self) -> CondenseStatus {
        match self {
            Self::Unchanged(_) => CondenseStatus::Unchanged,
            Self::Condensed(_) => CondenseStatus::Condensed,
            Self::Truncated(_) => CondenseStatus::Truncated,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Unchanged(text) | Self::Condensed(text) | Self::Truncated(text) => text,
        }
    }
}

/// The first `max_chars` characters of `summary` followed by the notice
pub fn truncate_with_notice(summary: &str, max_chars: usize) -> String {
    let mut truncated: String = summary.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_NOTICE);
    truncated
}

/// Bring `summary` within `max_chars`, calling `transformer` at most once
pub async fn condense(
    summary: String,
    max_chars: usize,
    transformer: &dyn Transformer,
    context: &TransformContext,
    call_timeout: Duration,
) -> CondenseOutcome {
    let length = summary.chars().count();
    if length <= max_chars {
        return CondenseOutcome::Unchanged(summary);
    }

    info!("Merged summary has {} chars (limit {}), condensing", length, max_chars);
    match invoke_with_timeout(transformer, &summary, context, call_timeout).await {
        Ok(output) => match output.summary {
            Some(condensed) if !condensed.trim().is_empty() => {
                info!("Condensed summary to {} chars", condensed.chars().count());
                CondenseOutcome::Condensed(condensed)
            }
            _ => {
                warn!("Condense call returned no summary, truncating");
                CondenseOutcome::Truncated(truncate_with_notice(&summary, max_chars))
            }
        },
        Err(e) => {
            warn!("Condense call failed ({}), truncating", e);
            CondenseOutcome::Truncated(truncate_with_notice(&summary, max_chars))
        }
    }
}
