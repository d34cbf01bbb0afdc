use std::collections::BTreeMap;

use crate::model::{Question, Report, SubjectScore};

/// Sparse mapping from paper position to the chosen option index.
pub type AnswerSheet = BTreeMap<usize, usize>;

/// Score a paper against the recorded answers.
///
/// A position is correct only when an answer is recorded for it and equals the
/// question's correct option. Answers at positions outside the paper are ignored.
#[must_use]
pub fn score(paper: &[Question], answers: &AnswerSheet) -> Report {
    let mut correct = 0_u32;
    let mut answered = 0_u32;
    let mut by_subject: BTreeMap<String, SubjectScore> = BTreeMap::new();

    for (position, question) in paper.iter().enumerate() {
        let entry = by_subject.entry(question.subject().to_string()).or_default();
        entry.total = entry.total.saturating_add(1);

        let Some(&chosen) = answers.get(&position) else {
            continue;
        };
        answered = answered.saturating_add(1);
        if question.is_correct(chosen) {
            correct = correct.saturating_add(1);
            entry.correct = entry.correct.saturating_add(1);
        }
    }

    Report {
        total: u32::try_from(paper.len()).unwrap_or(u32::MAX),
        answered,
        correct,
        by_subject,
    }
}
