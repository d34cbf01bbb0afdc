use exam_core::model::{ExamResult, Report, ScoreBand, SubjectScore, SubmitReason};
use services::ExamResultListItem;
use services::exams::ExamResultId;

use crate::vm::time_fmt::{format_datetime, format_elapsed};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectRowVm {
    pub subject: String,
    pub label: String,
    pub percentage: u8,
}

impl SubjectRowVm {
    fn new(subject: &str, score: SubjectScore) -> Self {
        let percentage = score.percentage();
        Self {
            subject: subject.to_string(),
            label: format!("{}/{} ({percentage}%)", score.correct, score.total),
            percentage,
        }
    }
}

/// Score panel shared by the finished exam and the stored result page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportVm {
    pub score_label: String,
    pub percentage_label: String,
    pub band_label: &'static str,
    pub band_class: &'static str,
    pub answered_label: String,
    pub subjects: Vec<SubjectRowVm>,
}

impl ReportVm {
    fn build<'a>(
        correct: u32,
        answered: u32,
        total: u32,
        percentage: u8,
        band: ScoreBand,
        by_subject: impl Iterator<Item = (&'a String, &'a SubjectScore)>,
    ) -> Self {
        Self {
            score_label: format!("Your Score: {correct}/{total}"),
            percentage_label: format!("Percentage: {percentage}%"),
            band_label: band.label(),
            band_class: band_class(band),
            answered_label: format!(
                "Answered: {answered} | Unanswered: {}",
                total.saturating_sub(answered)
            ),
            subjects: by_subject
                .map(|(subject, score)| SubjectRowVm::new(subject, *score))
                .collect(),
        }
    }
}

impl From<&Report> for ReportVm {
    fn from(report: &Report) -> Self {
        Self::build(
            report.correct,
            report.answered,
            report.total,
            report.percentage(),
            report.band(),
            report.by_subject.iter(),
        )
    }
}

impl From<&ExamResult> for ReportVm {
    fn from(result: &ExamResult) -> Self {
        Self::build(
            result.correct(),
            result.answered(),
            result.total(),
            result.percentage(),
            result.band(),
            result.by_subject().iter(),
        )
    }
}

fn band_class(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Excellent => "band band--excellent",
        ScoreBand::Passed => "band band--passed",
        ScoreBand::NeedsImprovement => "band band--needs-improvement",
    }
}

fn reason_label(reason: SubmitReason) -> &'static str {
    match reason {
        SubmitReason::Manual => "Submitted",
        SubmitReason::TimedOut => "Time expired",
    }
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamResultCardVm {
    pub id: ExamResultId,
    pub completed_at_str: String,
    pub reason_str: &'static str,
    pub score_str: String,
    pub band_label: &'static str,
    pub elapsed_str: String,
}

impl From<&ExamResultListItem> for ExamResultCardVm {
    fn from(item: &ExamResultListItem) -> Self {
        Self {
            id: item.id,
            completed_at_str: format_datetime(item.completed_at),
            reason_str: reason_label(item.reason),
            score_str: format!("{}/{} ({}%)", item.correct, item.total, item.percentage),
            band_label: item.band.label(),
            elapsed_str: format_elapsed(item.elapsed_secs),
        }
    }
}

#[must_use]
pub fn map_result_cards(items: &[ExamResultListItem]) -> Vec<ExamResultCardVm> {
    items.iter().map(ExamResultCardVm::from).collect()
}

/// Header line for a stored result page.
#[must_use]
pub fn result_meta_label(result: &ExamResult) -> String {
    format!(
        "{} on {} after {}",
        reason_label(result.reason()),
        format_datetime(result.completed_at()),
        format_elapsed(result.elapsed_secs()),
    )
}
