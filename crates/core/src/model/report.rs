use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rounded percentage of `correct` out of `total`, halves rounded up.
///
/// Returns 0 when `total` is 0.
#[must_use]
pub fn percentage(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

//
// ─── SCORE BAND ────────────────────────────────────────────────────────────────
//

/// Qualitative label for a percentage. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Passed,
    NeedsImprovement,
}

impl ScoreBand {
    pub const EXCELLENT_FROM: u8 = 85;
    pub const PASSED_FROM: u8 = 70;

    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= Self::EXCELLENT_FROM {
            Self::Excellent
        } else if percentage >= Self::PASSED_FROM {
            Self::Passed
        } else {
            Self::NeedsImprovement
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Passed => "Passed",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── SUBJECT SCORE ─────────────────────────────────────────────────────────────
//

/// Correct/total counts for one subject within a paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub correct: u32,
    pub total: u32,
}

impl SubjectScore {
    #[must_use]
    pub fn percentage(&self) -> u8 {
        percentage(self.correct, self.total)
    }
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Derived scoring summary of a paper and its answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub by_subject: BTreeMap<String, SubjectScore>,
}

impl Report {
    #[must_use]
    pub fn percentage(&self) -> u8 {
        percentage(self.correct, self.total)
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage())
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.total.saturating_sub(self.answered)
    }
}
