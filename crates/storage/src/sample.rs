//! Built-in question bank used by the `seed` command and tests.

use exam_core::model::{Difficulty, Question, QuestionError, QuestionId};

const SAMPLE: &[(u64, &str, Difficulty, &str, [&str; 4], usize)] = &[
    (1, "Mathematics", Difficulty::Easy, "What is 2 + 2?", ["3", "4", "5", "6"], 1),
    (2, "Science", Difficulty::Medium, "What is the chemical symbol for water?", ["H2O", "CO2", "NaCl", "O2"], 0),
    (3, "History", Difficulty::Hard, "In which year did World War II end?", ["1944", "1945", "1946", "1947"], 1),
    (4, "Mathematics", Difficulty::Medium, "What is the square root of 144?", ["10", "11", "12", "14"], 2),
    (5, "Mathematics", Difficulty::Hard, "What is the derivative of x^2?", ["x", "2x", "x^2", "2"], 1),
    (6, "Science", Difficulty::Easy, "Which planet is known as the Red Planet?", ["Venus", "Jupiter", "Mars", "Saturn"], 2),
    (7, "Science", Difficulty::Hard, "What is the powerhouse of the cell?", ["Nucleus", "Ribosome", "Golgi body", "Mitochondrion"], 3),
    (8, "History", Difficulty::Easy, "Who was the first President of the United States?", ["George Washington", "John Adams", "Thomas Jefferson", "Abraham Lincoln"], 0),
    (9, "History", Difficulty::Medium, "In which year did the Berlin Wall fall?", ["1987", "1988", "1989", "1991"], 2),
    (10, "English", Difficulty::Easy, "Which word is a noun?", ["quickly", "happiness", "run", "blue"], 1),
    (11, "English", Difficulty::Medium, "What is the past tense of \"go\"?", ["goed", "gone", "went", "going"], 2),
    (12, "English", Difficulty::Hard, "Which of these is an oxymoron?", ["deafening silence", "bright sun", "cold ice", "tall tower"], 0),
    (13, "Geography", Difficulty::Easy, "What is the capital of France?", ["Berlin", "Madrid", "Paris", "Rome"], 2),
    (14, "Geography", Difficulty::Medium, "Which is the longest river in the world?", ["Amazon", "Nile", "Yangtze", "Mississippi"], 1),
    (15, "Geography", Difficulty::Hard, "Which country has the most time zones?", ["Russia", "United States", "China", "France"], 3),
    (16, "Physics", Difficulty::Easy, "What is the unit of force?", ["Joule", "Newton", "Watt", "Pascal"], 1),
    (17, "Physics", Difficulty::Medium, "What is the speed of light in vacuum (approx.)?", ["300,000 km/s", "150,000 km/s", "30,000 km/s", "3,000 km/s"], 0),
    (18, "Physics", Difficulty::Hard, "Which particle has no electric charge?", ["Proton", "Electron", "Neutron", "Positron"], 2),
];

/// Sample questions covering Mathematics, Science, History, English, Geography and Physics.
///
/// # Errors
///
/// Returns `QuestionError` if a built-in entry fails validation.
pub fn sample_bank() -> Result<Vec<Question>, QuestionError> {
    SAMPLE
        .iter()
        .map(|(id, subject, difficulty, prompt, options, correct)| {
            Question::new(
                QuestionId::new(*id),
                *subject,
                *difficulty,
                *prompt,
                options.iter().map(|o| (*o).to_string()).collect(),
                *correct,
            )
        })
        .collect()
}
