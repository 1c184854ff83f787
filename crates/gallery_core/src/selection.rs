use serde::Serialize;

/// Number of verified images shown when no other limit is configured.
pub const DEFAULT_MAX_DISPLAY: usize = 12;

/// Outcome of choosing which verified images to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum DisplaySelection {
    /// The feed had no candidates, so nothing was probed.
    EmptyInput,
    /// Every candidate was probed and none loaded.
    AllFailed { candidates: usize },
    Ready {
        shown: Vec<String>,
        verified: usize,
        /// Fewer images loaded than wanted even though the feed had enough candidates.
        low_supply: bool,
    },
}

impl DisplaySelection {
    pub fn shown(&self) -> &[String] {
        match self {
            DisplaySelection::Ready { shown, .. } => shown,
            DisplaySelection::EmptyInput | DisplaySelection::AllFailed { .. } => &[],
        }
    }

    pub fn is_low_supply(&self) -> bool {
        matches!(self, DisplaySelection::Ready { low_supply: true, .. })
    }
}

/// Keep the first `max_display` verified URLs and classify the result.
///
/// `verified` must already be in feed order. A `max_display` of zero is treated as one.
pub fn select_for_display(
    candidate_count: usize,
    mut verified: Vec<String>,
    max_display: usize,
) -> DisplaySelection {
    let max_display = max_display.max(1);
    if verified.is_empty() {
        return if candidate_count == 0 {
            DisplaySelection::EmptyInput
        } else {
            DisplaySelection::AllFailed {
                candidates: candidate_count,
            }
        };
    }

    let verified_count = verified.len();
    let low_supply = verified_count < max_display && candidate_count >= max_display;
    verified.truncate(max_display);
    DisplaySelection::Ready {
        shown: verified,
        verified: verified_count,
        low_supply,
    }
}
