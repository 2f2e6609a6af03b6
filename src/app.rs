use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::content::quiz::quizzes_for_chapter;
use crate::content::{Catalog, Chapter, Section, SectionRef, is_valid_id, parse_full_id};
use crate::engine::progress::{LearningEntry, ProgressState, ProgressStore};
use crate::engine::search::{SearchHit, SearchIndex};
use crate::engine::stats::{self, LearningStats};
use crate::error::TutorError;
use crate::session::quiz::QuizSession;
use crate::store::json_store::JsonStore;
use crate::store::schema::ExportData;
use crate::store::{self, Storage};
use crate::ui::theme::{ColorSchemeProvider, EnvColorScheme, ThemePreference, ThemeStore};

/// A section resolved against the catalog.
#[derive(Clone, Copy, Debug)]
pub struct Located {
    pub chapter: &'static Chapter,
    pub section: &'static Section,
}

impl Located {
    pub fn full_id(&self) -> String {
        crate::content::section_full_id(self.chapter.id, self.section.id)
    }
}

#[derive(Debug)]
pub struct SectionView {
    pub at: Located,
    pub prev: Option<Located>,
    pub next: Option<Located>,
    pub completed: bool,
    pub bookmarked: bool,
}

#[derive(Debug)]
pub struct ChapterView {
    pub chapter: &'static Chapter,
    pub progress: u8,
    /// `(section, completed, bookmarked)` in curriculum order.
    pub sections: Vec<(&'static Section, bool, bool)>,
    pub quiz_count: usize,
}

#[derive(Debug)]
pub struct Dashboard {
    pub total_progress: u8,
    pub completed_count: usize,
    pub total_sections: usize,
    pub stats: LearningStats,
    pub today: NaiveDate,
    pub chapters: Vec<(&'static Chapter, u8)>,
    pub last_visited: Option<Located>,
    pub recent: Vec<(LearningEntry, Option<Located>)>,
}

pub struct App {
    pub config: Config,
    pub catalog: Catalog,
    pub progress: ProgressStore,
    pub theme: ThemeStore,
    pub search: SearchIndex,
    storage: Rc<dyn Storage>,
    clock: Rc<dyn Clock>,
}

impl App {
    pub fn new(
        config: Config,
        storage: Rc<dyn Storage>,
        clock: Rc<dyn Clock>,
        scheme: Rc<dyn ColorSchemeProvider>,
    ) -> Self {
        let catalog = Catalog::builtin();
        let progress = ProgressStore::new(storage.clone(), clock.clone())
            .with_history_limit(config.history_limit);
        let theme = ThemeStore::new(storage.clone(), scheme);
        let search = SearchIndex::build(&catalog, config.search_options());
        Self {
            config,
            catalog,
            progress,
            theme,
            search,
            storage,
            clock,
        }
    }

    /// File-backed app under `config.data_dir`, real clock, environment
    /// colour scheme.
    pub fn open(config: Config) -> Result<Self> {
        let data_dir = config.data_path();
        let json_store = JsonStore::with_base_dir(data_dir.clone())
            .with_context(|| format!("open data dir {}", data_dir.display()))?;
        Ok(Self::new(
            config,
            Rc::new(json_store),
            Rc::new(SystemClock),
            Rc::new(EnvColorScheme),
        ))
    }

    pub fn chapter(&self, chapter_id: &str) -> Result<&'static Chapter> {
        check_id(chapter_id)?;
        self.catalog
            .chapter_by_id(chapter_id)
            .ok_or_else(|| TutorError::ChapterNotFound(chapter_id.to_string()).into())
    }

    pub fn section(&self, chapter_id: &str, section_id: &str) -> Result<Located> {
        let chapter = self.chapter(chapter_id)?;
        check_id(section_id)?;
        let section = chapter
            .section(section_id)
            .ok_or_else(|| TutorError::SectionNotFound {
                chapter_id: chapter_id.to_string(),
                section_id: section_id.to_string(),
            })?;
        Ok(Located { chapter, section })
    }

    /// Resolve a stored full id. Ids that no longer exist give `None`.
    pub fn locate(&self, full_id: &str) -> Option<Located> {
        let (chapter_id, section_id) = parse_full_id(full_id)?;
        let (chapter, section) = self.catalog.find_section(chapter_id, section_id)?;
        Some(Located { chapter, section })
    }

    fn locate_ref(&self, at: Option<SectionRef>) -> Option<Located> {
        let at = at?;
        let (chapter, section) = self.catalog.find_section(at.chapter_id, at.section_id)?;
        Some(Located { chapter, section })
    }

    pub fn chapter_progress(&self, chapter: &Chapter) -> u8 {
        self.progress.chapter_progress(chapter.id, &chapter.full_ids())
    }

    pub fn total_progress(&self) -> u8 {
        self.progress
            .total_progress(self.catalog.total_section_count())
    }

    pub fn chapter_view(&self, chapter_id: &str) -> Result<ChapterView> {
        let chapter = self.chapter(chapter_id)?;
        let sections = chapter
            .sections
            .iter()
            .map(|s| {
                let full_id = crate::content::section_full_id(chapter.id, s.id);
                (
                    s,
                    self.progress.is_completed(&full_id),
                    self.progress.is_bookmarked(&full_id),
                )
            })
            .collect();
        Ok(ChapterView {
            chapter,
            progress: self.chapter_progress(chapter),
            sections,
            quiz_count: quizzes_for_chapter(chapter.id).len(),
        })
    }

    pub fn section_view(&self, chapter_id: &str, section_id: &str) -> Result<SectionView> {
        let at = self.section(chapter_id, section_id)?;
        let full_id = at.full_id();
        Ok(SectionView {
            at,
            prev: self.locate_ref(self.catalog.prev_section(at.chapter.id, at.section.id)),
            next: self.locate_ref(self.catalog.next_section(at.chapter.id, at.section.id)),
            completed: self.progress.is_completed(&full_id),
            bookmarked: self.progress.is_bookmarked(&full_id),
        })
    }

    /// Open a section: records the visit, then describes it.
    pub fn visit(&mut self, chapter_id: &str, section_id: &str) -> Result<SectionView> {
        let at = self.section(chapter_id, section_id)?;
        self.progress.set_last_visited(&at.full_id());
        self.section_view(chapter_id, section_id)
    }

    pub fn complete(&mut self, chapter_id: &str, section_id: &str) -> Result<SectionView> {
        let at = self.section(chapter_id, section_id)?;
        self.progress.mark_as_completed(&at.full_id());
        self.section_view(chapter_id, section_id)
    }

    pub fn uncomplete(&mut self, chapter_id: &str, section_id: &str) -> Result<SectionView> {
        let at = self.section(chapter_id, section_id)?;
        self.progress.mark_as_incomplete(&at.full_id());
        self.section_view(chapter_id, section_id)
    }

    /// Returns whether the section is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, chapter_id: &str, section_id: &str) -> Result<bool> {
        let full_id = self.section(chapter_id, section_id)?.full_id();
        self.progress.toggle_bookmark(&full_id);
        Ok(self.progress.is_bookmarked(&full_id))
    }

    /// Bookmarks in the order they were added. Ids missing from the catalog
    /// are skipped.
    pub fn bookmarks(&self) -> Vec<Located> {
        self.progress
            .state()
            .bookmarks
            .iter()
            .filter_map(|id| {
                let found = self.locate(id);
                if found.is_none() {
                    tracing::debug!(id, "bookmark not in catalog");
                }
                found
            })
            .collect()
    }

    /// Last visited section, with its next section.
    pub fn continue_reading(&self) -> Result<SectionView> {
        let last = self
            .progress
            .state()
            .last_visited
            .as_deref()
            .ok_or(TutorError::NothingVisited)?;
        let at = self.locate(last).ok_or_else(|| {
            let (chapter_id, section_id) = parse_full_id(last).unwrap_or((last, ""));
            TutorError::SectionNotFound {
                chapter_id: chapter_id.to_string(),
                section_id: section_id.to_string(),
            }
        })?;
        self.section_view(at.chapter.id, at.section.id)
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        self.search.search(query)
    }

    pub fn dashboard(&self) -> Dashboard {
        let now = self.clock.now_ms();
        let state = self.progress.state();
        Dashboard {
            total_progress: self.total_progress(),
            completed_count: state.completed_sections.len(),
            total_sections: self.catalog.total_section_count(),
            stats: self.progress.learning_stats(),
            today: stats::date_of(now).unwrap_or_default(),
            chapters: self
                .catalog
                .chapters()
                .iter()
                .map(|c| (c, self.chapter_progress(c)))
                .collect(),
            last_visited: state.last_visited.as_deref().and_then(|id| self.locate(id)),
            recent: self
                .progress
                .recent_history(self.config.recent_activity)
                .map(|e| (e.clone(), self.locate(&e.section_id)))
                .collect(),
        }
    }

    pub fn quiz_session(&self, chapter_id: &str) -> Result<QuizSession> {
        let chapter = self.chapter(chapter_id)?;
        Ok(QuizSession::new(quizzes_for_chapter(chapter.id)))
    }

    pub fn set_theme(&mut self, theme: ThemePreference) {
        self.theme.set_theme(theme);
    }

    pub fn reset(&mut self, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(TutorError::ResetNotConfirmed.into());
        }
        self.progress.reset_progress();
        Ok(())
    }

    pub fn export_to(&self, path: &Path) -> Result<ExportData> {
        let data = store::export_all(self.storage.as_ref(), self.clock.now_ms());
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json).with_context(|| format!("write export {}", path.display()))?;
        tracing::info!(path = %path.display(), "progress exported");
        Ok(data)
    }

    /// Replace progress and theme with a previously exported bundle.
    pub fn import_from(&mut self, path: &Path) -> Result<ExportData> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read export {}", path.display()))?;
        let data: ExportData = serde_json::from_str(&content)
            .with_context(|| format!("parse export {}", path.display()))?;
        check_progress_ids(&data.progress)?;
        store::import_all(self.storage.as_ref(), &data)?;
        self.progress.replace_state(data.progress.clone());
        self.theme.reload();
        Ok(data)
    }
}

fn check_id(id: &str) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(TutorError::InvalidId(id.to_string()).into())
    }
}

fn check_full_id(full_id: &str) -> Result<()> {
    match parse_full_id(full_id) {
        Some((chapter_id, section_id)) if is_valid_id(chapter_id) && is_valid_id(section_id) => {
            Ok(())
        }
        _ => Err(TutorError::InvalidId(full_id.to_string()).into()),
    }
}

/// Every id in an imported state must be a well-formed full id. Ids that
/// are well-formed but unknown to the catalog are kept.
fn check_progress_ids(state: &ProgressState) -> Result<()> {
    state
        .completed_sections
        .iter()
        .chain(&state.bookmarks)
        .chain(state.last_visited.iter())
        .chain(state.learning_history.iter().map(|e| &e.section_id))
        .try_for_each(|id| check_full_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{DAY_MS, ManualClock};
    use crate::store::MemoryStorage;
    use crate::ui::theme::StaticColorScheme;
    use tempfile::TempDir;

    const T0: i64 = 1_710_504_000_000; // 2024-03-15T12:00:00Z

    fn app_with(storage: Rc<dyn Storage>, clock: Rc<ManualClock>) -> App {
        App::new(
            Config::default(),
            storage,
            clock,
            Rc::new(StaticColorScheme::new(false)),
        )
    }

    fn app() -> (App, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(T0));
        (app_with(Rc::new(MemoryStorage::new()), clock.clone()), clock)
    }

    fn tutor_error(err: anyhow::Error) -> TutorError {
        err.downcast::<TutorError>().unwrap()
    }

    #[test]
    fn test_invalid_and_unknown_ids() {
        let (mut app, _) = app();
        assert!(matches!(
            tutor_error(app.visit("../x", "section-01").unwrap_err()),
            TutorError::InvalidId(_)
        ));
        assert!(matches!(
            tutor_error(app.visit("chapter-01", "Section-01").unwrap_err()),
            TutorError::InvalidId(_)
        ));
        assert!(matches!(
            tutor_error(app.visit("chapter-42", "section-01").unwrap_err()),
            TutorError::ChapterNotFound(_)
        ));
        assert!(matches!(
            tutor_error(app.complete("chapter-01", "section-42").unwrap_err()),
            TutorError::SectionNotFound { .. }
        ));
        assert!(app.progress.state().learning_history.is_empty());
    }

    #[test]
    fn test_visit_records_and_links_neighbours() {
        let (mut app, _) = app();
        let view = app.visit("chapter-02", "section-01").unwrap();
        assert_eq!(view.prev.unwrap().full_id(), "chapter-01/section-06");
        assert_eq!(view.next.unwrap().full_id(), "chapter-02/section-02");
        assert_eq!(
            app.progress.state().last_visited.as_deref(),
            Some("chapter-02/section-01")
        );

        let cont = app.continue_reading().unwrap();
        assert_eq!(cont.at.full_id(), "chapter-02/section-01");
    }

    #[test]
    fn test_continue_without_visit() {
        let (app, _) = app();
        assert!(matches!(
            tutor_error(app.continue_reading().unwrap_err()),
            TutorError::NothingVisited
        ));
    }

    #[test]
    fn test_chapter_view_and_progress() {
        let (mut app, _) = app();
        app.complete("chapter-09", "section-01").unwrap();
        app.complete("chapter-09", "section-02").unwrap();
        app.toggle_bookmark("chapter-09", "section-05").unwrap();
        let view = app.chapter_view("chapter-09").unwrap();
        assert_eq!(view.progress, 40);
        assert!(view.sections[0].1);
        assert!(view.sections[4].2);
        assert_eq!(view.quiz_count, 0);
        assert_eq!(app.chapter_view("chapter-01").unwrap().quiz_count, 2);
        assert_eq!(app.total_progress(), 3);
    }

    #[test]
    fn test_bookmarks_keep_insertion_order() {
        let (mut app, _) = app();
        assert!(app.toggle_bookmark("chapter-03", "section-02").unwrap());
        assert!(app.toggle_bookmark("chapter-01", "section-01").unwrap());
        let ids: Vec<String> = app.bookmarks().iter().map(Located::full_id).collect();
        assert_eq!(ids, vec!["chapter-03/section-02", "chapter-01/section-01"]);
        assert!(!app.toggle_bookmark("chapter-03", "section-02").unwrap());
        assert_eq!(app.bookmarks().len(), 1);
    }

    #[test]
    fn test_dashboard() {
        let (mut app, clock) = app();
        app.visit("chapter-01", "section-01").unwrap();
        app.complete("chapter-01", "section-01").unwrap();
        clock.advance(DAY_MS);
        app.complete("chapter-01", "section-02").unwrap();

        let dash = app.dashboard();
        assert_eq!(dash.completed_count, 2);
        assert_eq!(dash.total_sections, 69);
        assert_eq!(dash.total_progress, 3);
        assert_eq!(dash.stats.streak, 2);
        assert_eq!(dash.stats.completions_today, 1);
        assert_eq!(dash.chapters[0].1, 33);
        assert_eq!(dash.last_visited.unwrap().full_id(), "chapter-01/section-01");
        assert_eq!(dash.recent.len(), 3);
        assert_eq!(dash.recent[0].0.section_id, "chapter-01/section-02");
        assert_eq!(dash.today.to_string(), "2024-03-16");
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let (mut app, _) = app();
        app.complete("chapter-01", "section-01").unwrap();
        assert!(matches!(
            tutor_error(app.reset(false).unwrap_err()),
            TutorError::ResetNotConfirmed
        ));
        assert_eq!(app.progress.state().completed_sections.len(), 1);
        app.reset(true).unwrap();
        assert_eq!(app.progress.state(), &ProgressState::default());
    }

    #[test]
    fn test_quiz_session_for_chapter() {
        let (app, _) = app();
        assert_eq!(app.quiz_session("chapter-02").unwrap().len(), 2);
        assert!(app.quiz_session("chapter-07").unwrap().is_empty());
        assert!(app.quiz_session("chapter-77").is_err());
    }

    #[test]
    fn test_export_then_import_into_fresh_app() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");

        let (mut source, _) = app();
        source.visit("chapter-04", "section-01").unwrap();
        source.complete("chapter-04", "section-01").unwrap();
        source.toggle_bookmark("chapter-04", "section-02").unwrap();
        source.set_theme(ThemePreference::Dark);
        source.export_to(&path).unwrap();

        let (mut target, _) = app();
        let data = target.import_from(&path).unwrap();
        assert_eq!(data.docktutor_export_version, 1);
        assert_eq!(data.exported_at.timestamp_millis(), T0);
        assert_eq!(target.progress.state(), source.progress.state());
        assert_eq!(target.theme.preference(), ThemePreference::Dark);
        assert!(target.theme.is_dark_applied());
    }

    #[test]
    fn test_import_rejects_bad_ids_and_versions() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app();
        app.complete("chapter-01", "section-01").unwrap();
        let before = app.progress.state().clone();

        let bad_id = dir.path().join("bad-id.json");
        fs::write(
            &bad_id,
            r#"{"docktutor_export_version":1,"exported_at":"2024-03-15T12:00:00Z",
               "progress":{"completedSections":["../../etc"]},"theme":{"theme":"light"}}"#,
        )
        .unwrap();
        assert!(matches!(
            tutor_error(app.import_from(&bad_id).unwrap_err()),
            TutorError::InvalidId(_)
        ));

        let bad_version = dir.path().join("bad-version.json");
        fs::write(
            &bad_version,
            r#"{"docktutor_export_version":9,"exported_at":"2024-03-15T12:00:00Z",
               "progress":{},"theme":{"theme":"light"}}"#,
        )
        .unwrap();
        assert!(matches!(
            tutor_error(app.import_from(&bad_version).unwrap_err()),
            TutorError::UnsupportedExportVersion { found: 9, .. }
        ));

        assert_eq!(app.progress.state(), &before);
        assert_eq!(app.theme.preference(), ThemePreference::System);
    }

    #[test]
    fn test_state_survives_reopen() {
        let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
        let clock = Rc::new(ManualClock::new(T0));
        let mut first = app_with(storage.clone(), clock.clone());
        first.visit("chapter-05", "section-03").unwrap();
        first.set_theme(ThemePreference::Light);

        let second = app_with(storage, clock);
        assert_eq!(second.progress.state(), first.progress.state());
        assert_eq!(second.theme.preference(), ThemePreference::Light);
    }
}
