use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use exam_core::model::{ExamSettings, Question, SubjectFilter};

/// Builds an exam paper by filtering the bank on subject and drawing a
/// uniformly shuffled subset.
pub struct PaperBuilder<'a> {
    filter: &'a SubjectFilter,
    max_len: usize,
}

impl<'a> PaperBuilder<'a> {
    #[must_use]
    pub fn new(filter: &'a SubjectFilter, settings: &ExamSettings) -> Self {
        Self {
            filter,
            max_len: settings.max_paper_len(),
        }
    }

    /// Override the maximum paper length.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Build a paper using the thread-local RNG.
    #[must_use]
    pub fn build(self, bank: &[Question]) -> Vec<Question> {
        let mut rng = rng();
        self.build_with_rng(bank, &mut rng)
    }

    /// Build a paper with an injected RNG.
    ///
    /// - Questions whose id was already seen are dropped (first occurrence wins).
    /// - The pool is every question the filter matches; an empty filter keeps the whole bank.
    /// - The pool is shuffled and the first `min(max_len, pool.len())` questions are kept.
    pub fn build_with_rng<R: Rng + ?Sized>(self, bank: &[Question], rng: &mut R) -> Vec<Question> {
        let mut pool = candidate_pool(bank, self.filter);
        pool.as_mut_slice().shuffle(rng);
        pool.truncate(self.max_len);
        pool
    }
}

/// Number of questions a paper would contain for this filter.
///
/// Uses the same matching and de-duplication as `PaperBuilder`.
#[must_use]
pub fn estimate_paper_size(bank: &[Question], filter: &SubjectFilter, max_len: usize) -> usize {
    candidate_pool(bank, filter).len().min(max_len)
}

fn candidate_pool(bank: &[Question], filter: &SubjectFilter) -> Vec<Question> {
    let mut seen = HashSet::new();
    bank.iter()
        .filter(|q| filter.matches(q.subject()))
        .filter(|q| seen.insert(q.id()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Difficulty, QuestionId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_question(id: u64, subject: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            subject,
            Difficulty::Medium,
            format!("Question {id}"),
            vec!["a".into(), "b".into(), "c".into()],
            0,
        )
        .unwrap()
    }

    fn bank(n: u64) -> Vec<Question> {
        let subjects = ["Mathematics", "Science", "History"];
        (1..=n)
            .map(|id| build_question(id, subjects[(id % 3) as usize]))
            .collect()
    }

    #[test]
    fn paper_is_capped_by_settings() {
        let filter = SubjectFilter::all();
        let settings = ExamSettings::reference();
        let mut rng = StdRng::seed_from_u64(7);

        let paper = PaperBuilder::new(&filter, &settings).build_with_rng(&bank(50), &mut rng);
        assert_eq!(paper.len(), 20);
    }

    #[test]
    fn small_pool_is_returned_whole() {
        let filter = SubjectFilter::all();
        let settings = ExamSettings::reference();
        let mut rng = StdRng::seed_from_u64(7);

        let paper = PaperBuilder::new(&filter, &settings).build_with_rng(&bank(5), &mut rng);
        let mut ids: Vec<u64> = paper.iter().map(|q| q.id().value()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn filter_restricts_pool() {
        let filter = SubjectFilter::from_subjects(["history"]);
        let settings = ExamSettings::reference();
        let mut rng = StdRng::seed_from_u64(1);

        let paper = PaperBuilder::new(&filter, &settings).build_with_rng(&bank(30), &mut rng);
        assert_eq!(paper.len(), 10);
        assert!(paper.iter().all(|q| q.subject() == "History"));
    }

    #[test]
    fn unmatched_filter_yields_empty_paper() {
        let filter = SubjectFilter::from_subjects(["Art"]);
        let paper = PaperBuilder::new(&filter, &ExamSettings::reference()).build(&bank(10));
        assert!(paper.is_empty());
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let mut questions = bank(3);
        questions.push(build_question(2, "Mathematics"));
        let filter = SubjectFilter::all();
        let mut rng = StdRng::seed_from_u64(3);

        let paper = PaperBuilder::new(&filter, &ExamSettings::reference())
            .build_with_rng(&questions, &mut rng);
        assert_eq!(paper.len(), 3);
        let kept = paper.iter().find(|q| q.id() == QuestionId::new(2)).unwrap();
        assert_eq!(kept.subject(), "History");
    }

    #[test]
    fn same_seed_gives_same_paper() {
        let filter = SubjectFilter::all();
        let settings = ExamSettings::reference();
        let questions = bank(40);

        let first = PaperBuilder::new(&filter, &settings)
            .build_with_rng(&questions, &mut StdRng::seed_from_u64(42));
        let second = PaperBuilder::new(&filter, &settings)
            .build_with_rng(&questions, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn estimate_matches_builder() {
        let questions = bank(30);
        let filter = SubjectFilter::from_subjects(["Science", "History"]);
        let settings = ExamSettings::reference();

        let paper = PaperBuilder::new(&filter, &settings).build(&questions);
        assert_eq!(
            estimate_paper_size(&questions, &filter, settings.max_paper_len()),
            paper.len()
        );
        assert_eq!(estimate_paper_size(&questions, &filter, 5), 5);
    }

    #[test]
    fn with_max_len_overrides_settings() {
        let filter = SubjectFilter::all();
        let paper = PaperBuilder::new(&filter, &ExamSettings::reference())
            .with_max_len(4)
            .build(&bank(10));
        assert_eq!(paper.len(), 4);
    }
}
