use serde::Serialize;

use crate::model::options::{Difficulty, ListId, QuizMode};

/// Choices made on the start screen for one play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    pub student_name: String,
    pub student_class: String,
    pub list: ListId,
    pub mode: QuizMode,
    pub difficulty: Difficulty,
}

impl SessionSetup {
    #[must_use]
    pub fn new(
        student_name: impl Into<String>,
        student_class: impl Into<String>,
        list: ListId,
        mode: QuizMode,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            student_class: student_class.into(),
            list,
            mode,
            difficulty,
        }
    }
}

/// Snapshot of a finished session, handed once to the result reporter.
///
/// Serialises with the field names the results spreadsheet expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    student_name: String,
    student_class: String,
    score: u32,
    #[serde(rename = "timer")]
    elapsed_seconds: u32,
    #[serde(rename = "selectedList")]
    list: ListId,
    difficulty: Difficulty,
    mode: QuizMode,
}

impl SessionSummary {
    #[must_use]
    pub fn new(setup: &SessionSetup, score: u32, elapsed_seconds: u32) -> Self {
        Self {
            student_name: setup.student_name.clone(),
            student_class: setup.student_class.clone(),
            score,
            elapsed_seconds,
            list: setup.list,
            difficulty: setup.difficulty,
            mode: setup.mode,
        }
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn student_class(&self) -> &str {
        &self.student_class
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn list(&self) -> ListId {
        self.list
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }
}
