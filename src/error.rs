use thiserror::Error;

/// Conditions the application layer reports to the user. The catalog and
/// the stores never produce these themselves; lookups there return `None`.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("invalid id {0:?}: only lowercase letters, digits and hyphens are allowed")]
    InvalidId(String),
    #[error("chapter not found: {0}")]
    ChapterNotFound(String),
    #[error("section not found: {chapter_id}/{section_id}")]
    SectionNotFound {
        chapter_id: String,
        section_id: String,
    },
    #[error("no section has been visited yet")]
    NothingVisited,
    #[error("unsupported export version: {found} (expected {expected})")]
    UnsupportedExportVersion { found: u32, expected: u32 },
    #[error("refusing to reset progress without --yes")]
    ResetNotConfirmed,
}
