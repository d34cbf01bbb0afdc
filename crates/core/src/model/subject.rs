use std::collections::BTreeSet;

/// Set of subjects selected before an exam starts.
///
/// An empty filter selects every subject. A question subject matches when it
/// contains any selected subject, ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFilter {
    subjects: BTreeSet<String>,
}

impl SubjectFilter {
    /// Filter that matches every subject.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from subject names. Blank entries are ignored.
    #[must_use]
    pub fn from_subjects<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let subjects = subjects
            .into_iter()
            .filter_map(|s| normalize(s.as_ref()))
            .collect();
        Self { subjects }
    }

    /// Add the subject if absent, remove it if present.
    ///
    /// Returns whether the subject is selected afterwards. Blank input leaves
    /// the filter unchanged and returns false.
    pub fn toggle(&mut self, subject: &str) -> bool {
        let Some(subject) = normalize(subject) else {
            return false;
        };
        if self.subjects.remove(&subject) {
            false
        } else {
            self.subjects.insert(subject);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, subject: &str) -> bool {
        normalize(subject).is_some_and(|s| self.subjects.contains(&s))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Selected subjects in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(String::as_str)
    }

    /// Returns true if a question tagged `subject` belongs in the candidate pool.
    #[must_use]
    pub fn matches(&self, subject: &str) -> bool {
        if self.subjects.is_empty() {
            return true;
        }
        let haystack = subject.to_lowercase();
        self.subjects
            .iter()
            .any(|selected| haystack.contains(&selected.to_lowercase()))
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
