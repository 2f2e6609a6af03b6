use crate::content::quiz::Quiz;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerState {
    pub selected: Option<String>,
    pub submitted: bool,
}

/// Answers for one chapter's quizzes. A selection can change until the
/// quiz is submitted; after that the quiz is locked until `reset`.
pub struct QuizSession {
    quizzes: Vec<Quiz>,
    answers: Vec<AnswerState>,
}

impl QuizSession {
    pub fn new(quizzes: Vec<Quiz>) -> Self {
        let answers = vec![AnswerState::default(); quizzes.len()];
        Self { quizzes, answers }
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    pub fn answer(&self, index: usize) -> Option<&AnswerState> {
        self.answers.get(index)
    }

    /// Returns false when the quiz is already submitted or the option
    /// does not belong to it.
    pub fn select(&mut self, index: usize, option_id: &str) -> bool {
        let (Some(quiz), Some(answer)) = (self.quizzes.get(index), self.answers.get_mut(index))
        else {
            return false;
        };
        if answer.submitted || quiz.option(option_id).is_none() {
            return false;
        }
        answer.selected = Some(option_id.to_string());
        true
    }

    /// Locks in the current selection. `Some(correct)` on the first
    /// submit; `None` without a selection or when already submitted.
    pub fn submit(&mut self, index: usize) -> Option<bool> {
        let quiz = self.quizzes.get(index)?;
        let answer = self.answers.get_mut(index)?;
        if answer.submitted {
            return None;
        }
        let selected = answer.selected.as_deref()?;
        let correct = quiz.is_correct(selected);
        answer.submitted = true;
        Some(correct)
    }

    pub fn reset(&mut self, index: usize) {
        if let Some(answer) = self.answers.get_mut(index) {
            *answer = AnswerState::default();
        }
    }

    pub fn reset_all(&mut self) {
        self.answers.fill(AnswerState::default());
    }

    /// Correctness of a submitted quiz.
    pub fn result(&self, index: usize) -> Option<bool> {
        let quiz = self.quizzes.get(index)?;
        let answer = self.answers.get(index)?;
        if !answer.submitted {
            return None;
        }
        answer.selected.as_deref().map(|id| quiz.is_correct(id))
    }

    /// Select and submit one answer per quiz, in order. Extra answers are
    /// ignored; blank ones leave their quiz unanswered.
    pub fn grade_all<S: AsRef<str>>(&mut self, answers: &[S]) {
        for (index, option_id) in answers.iter().enumerate().take(self.len()) {
            let option_id = option_id.as_ref().trim();
            if option_id.is_empty() {
                continue;
            }
            if self.select(index, option_id) {
                self.submit(index);
            }
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.submitted).count()
    }

    pub fn correct_count(&self) -> usize {
        (0..self.len())
            .filter(|&i| self.result(i) == Some(true))
            .count()
    }

    pub fn is_finished(&self) -> bool {
        self.answered_count() == self.len()
    }

    pub fn all_correct(&self) -> bool {
        self.is_finished() && self.correct_count() == self.len()
    }
}
