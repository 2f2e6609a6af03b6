use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/quizzes/"]
struct QuizAssets;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_option_id: String,
    pub explanation: String,
}

impl Quiz {
    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn is_correct(&self, option_id: &str) -> bool {
        self.correct_option_id == option_id
    }
}

#[derive(Deserialize)]
struct QuizFile {
    #[serde(default)]
    quizzes: Vec<Quiz>,
}

pub fn parse_quizzes(content: &str) -> Result<Vec<Quiz>, toml::de::Error> {
    toml::from_str::<QuizFile>(content).map(|f| f.quizzes)
}

/// Quizzes bundled for `chapter_id`, in file order. Chapters without a quiz
/// file get an empty list.
pub fn quizzes_for_chapter(chapter_id: &str) -> Vec<Quiz> {
    let filename = format!("{chapter_id}.toml");
    let Some(file) = QuizAssets::get(&filename) else {
        return Vec::new();
    };
    let Ok(content) = std::str::from_utf8(file.data.as_ref()) else {
        tracing::warn!(%filename, "quiz asset is not valid UTF-8");
        return Vec::new();
    };
    match parse_quizzes(content) {
        Ok(quizzes) => quizzes,
        Err(err) => {
            tracing::warn!(%filename, %err, "quiz asset failed to parse");
            Vec::new()
        }
    }
}

/// Chapter ids that have a bundled quiz file.
pub fn chapters_with_quizzes() -> Vec<String> {
    let mut ids: Vec<String> = QuizAssets::iter()
        .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
        .collect();
    ids.sort();
    ids
}
