use exam_core::countdown::format_clock;
use exam_core::model::{Difficulty, SubjectFilter};
use services::ExamSession;

/// User actions dispatched from the exam page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExamIntent {
    ToggleSubject(String),
    Start,
    Select(usize),
    Clear,
    Previous,
    Next,
    Jump(usize),
    Submit,
    Retake,
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectOptionVm {
    pub name: String,
    pub selected: bool,
}

#[must_use]
pub fn map_subject_options(subjects: &[String], filter: &SubjectFilter) -> Vec<SubjectOptionVm> {
    subjects
        .iter()
        .map(|name| SubjectOptionVm {
            name: name.clone(),
            selected: filter.contains(name),
        })
        .collect()
}

/// Label for the "Selected:" line of the selection screen.
#[must_use]
pub fn selection_label(filter: &SubjectFilter) -> String {
    if filter.is_empty() {
        "All subjects".to_string()
    } else {
        filter.iter().collect::<Vec<_>>().join(", ")
    }
}

//
// ─── IN PROGRESS ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub heading: String,
    pub subject: String,
    pub difficulty: &'static str,
    pub difficulty_class: &'static str,
    pub prompt: String,
    pub options: Vec<OptionVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigatorCellVm {
    pub position: usize,
    pub number: usize,
    pub answered: bool,
    pub current: bool,
}

impl NavigatorCellVm {
    #[must_use]
    pub fn class(self) -> &'static str {
        match (self.current, self.answered) {
            (true, _) => "nav-cell nav-cell--current",
            (false, true) => "nav-cell nav-cell--answered",
            (false, false) => "nav-cell",
        }
    }
}

/// Render-ready snapshot of a running attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamVm {
    pub timer_label: String,
    pub low_time: bool,
    pub question: QuestionVm,
    pub navigator: Vec<NavigatorCellVm>,
    pub progress_label: String,
    pub is_first: bool,
    pub is_last: bool,
    pub has_answer: bool,
}

impl ExamVm {
    /// Seconds at or below which the timer is highlighted.
    pub const LOW_TIME_SECS: u32 = 300;

    /// Build the snapshot; `None` unless the session is running.
    #[must_use]
    pub fn from_session(session: &ExamSession) -> Option<Self> {
        if !session.is_in_progress() {
            return None;
        }
        let question = session.current_question()?;
        let progress = session.progress();
        let cursor = progress.cursor;
        let selected = session.answer_at(cursor);

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, label)| OptionVm {
                index,
                label: label.clone(),
                selected: selected == Some(index),
            })
            .collect();

        let navigator = (0..progress.total)
            .map(|position| NavigatorCellVm {
                position,
                number: position + 1,
                answered: session.answer_at(position).is_some(),
                current: position == cursor,
            })
            .collect();

        let remaining = session.remaining_secs();
        Some(Self {
            timer_label: format!("Time Remaining: {}", format_clock(remaining)),
            low_time: remaining <= Self::LOW_TIME_SECS,
            question: QuestionVm {
                heading: format!("Question {} of {}", cursor + 1, progress.total),
                subject: question.subject().to_string(),
                difficulty: question.difficulty().as_str(),
                difficulty_class: difficulty_class(question.difficulty()),
                prompt: question.prompt().to_string(),
                options,
            },
            navigator,
            progress_label: format!(
                "Answered: {} | Remaining: {}",
                progress.answered, progress.remaining
            ),
            is_first: cursor == 0,
            is_last: progress.is_last,
            has_answer: selected.is_some(),
        })
    }
}

fn difficulty_class(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "badge badge--easy",
        Difficulty::Medium => "badge badge--medium",
        Difficulty::Hard => "badge badge--hard",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{ExamSettings, Question, QuestionId};
    use exam_core::time::fixed_now;

    fn question(id: u64, subject: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            subject,
            Difficulty::Medium,
            format!("Prompt {id}"),
            vec!["a".into(), "b".into(), "c".into()],
            0,
        )
        .unwrap()
    }

    fn running_session() -> ExamSession {
        let mut session = ExamSession::new(ExamSettings::reference());
        let paper = vec![question(1, "Physics"), question(2, "History")];
        session.start_with_paper(paper, fixed_now()).unwrap();
        session
    }

    #[test]
    fn idle_session_has_no_vm() {
        let session = ExamSession::new(ExamSettings::reference());
        assert!(ExamVm::from_session(&session).is_none());
    }

    #[test]
    fn vm_reflects_cursor_answers_and_timer() {
        let mut session = running_session();
        session.select_answer(0, 2).unwrap();

        let vm = ExamVm::from_session(&session).unwrap();
        assert_eq!(vm.timer_label, "Time Remaining: 60:00");
        assert!(!vm.low_time);
        assert_eq!(vm.question.heading, "Question 1 of 2");
        assert_eq!(vm.question.subject, "Physics");
        assert!(vm.question.options[2].selected);
        assert!(!vm.question.options[0].selected);
        assert_eq!(vm.progress_label, "Answered: 1 | Remaining: 1");
        assert!(vm.is_first);
        assert!(!vm.is_last);
        assert_eq!(vm.navigator[0].class(), "nav-cell nav-cell--current");
        assert_eq!(vm.navigator[1].class(), "nav-cell");
    }

    #[test]
    fn last_question_marks_answered_cells() {
        let mut session = running_session();
        session.select_answer(0, 1).unwrap();
        session.next().unwrap();

        let vm = ExamVm::from_session(&session).unwrap();
        assert!(vm.is_last);
        assert!(!vm.has_answer);
        assert_eq!(vm.navigator[0].class(), "nav-cell nav-cell--answered");
    }

    #[test]
    fn subject_options_follow_filter() {
        let subjects = vec!["History".to_string(), "Physics".to_string()];
        let filter = SubjectFilter::from_subjects(["Physics"]);
        let options = map_subject_options(&subjects, &filter);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(selection_label(&filter), "Physics");
        assert_eq!(selection_label(&SubjectFilter::all()), "All subjects");
    }
}
