use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Days, NaiveDate};
use crossterm::style::{Color, Stylize};
use rust_i18n::t;

use crate::app::{App, ChapterView, Dashboard, Located, SectionView};
use crate::content::Level;
use crate::engine::progress::LearningAction;
use crate::engine::search::SearchHit;
use crate::engine::stats::date_key;
use crate::session::quiz::QuizSession;
use crate::store::schema::ExportData;
use crate::ui::theme::{PaletteColors, ThemeStore};

const BAR_WIDTH: usize = 20;
const ACTIVITY_DAYS: u64 = 14;

/// Colours text with the active palette, or passes it through unchanged.
pub struct Painter {
    colors: Option<PaletteColors>,
}

impl Painter {
    pub fn new(theme: &ThemeStore, enabled: bool) -> Self {
        Self {
            colors: enabled.then(|| theme.palette().colors),
        }
    }

    pub fn plain() -> Self {
        Self { colors: None }
    }

    fn paint(&self, text: &str, pick: fn(&PaletteColors) -> Color) -> String {
        match &self.colors {
            Some(colors) => text.with(pick(colors)).to_string(),
            None => text.to_string(),
        }
    }

    pub fn heading(&self, text: &str) -> String {
        match &self.colors {
            Some(colors) => text.with(colors.heading()).bold().to_string(),
            None => text.to_string(),
        }
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(text, PaletteColors::accent)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, PaletteColors::success)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, PaletteColors::warning)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, PaletteColors::error)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, PaletteColors::muted)
    }

    pub fn bar(&self, percent: u8) -> String {
        let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
        let full = "█".repeat(filled);
        let empty = "░".repeat(BAR_WIDTH - filled);
        format!(
            "{}{}",
            self.paint(&full, PaletteColors::bar_filled),
            self.paint(&empty, PaletteColors::bar_empty)
        )
    }
}

pub fn level_label(level: Level) -> String {
    match level {
        Level::Beginner => t!("level.beginner"),
        Level::Intermediate => t!("level.intermediate"),
        Level::Advanced => t!("level.advanced"),
        Level::Reference => t!("level.reference"),
    }
    .to_string()
}

fn located_title(at: &Located) -> String {
    format!("{}. {}", at.chapter.number, at.section.title)
}

fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn chapters(app: &App, p: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.heading(&t!("chapters.heading")));
    for chapter in app.catalog.chapters() {
        let percent = app.chapter_progress(chapter);
        let _ = writeln!(
            out,
            "{:>2}. {} {} {} {:>3}%",
            chapter.number,
            chapter.title,
            p.muted(&format!("[{}]", level_label(chapter.level))),
            p.bar(percent),
            percent
        );
    }
    let _ = writeln!(
        out,
        "\n{}",
        t!(
            "chapters.total",
            percent = app.total_progress(),
            done = app.progress.state().completed_sections.len(),
            total = app.catalog.total_section_count()
        )
    );
    out
}

pub fn chapter(view: &ChapterView, p: &Painter) -> String {
    let mut out = String::new();
    let chapter = view.chapter;
    let _ = writeln!(
        out,
        "{}",
        p.heading(&format!("{}. {}", chapter.number, chapter.title))
    );
    let _ = writeln!(out, "{}", p.muted(chapter.description));
    let _ = writeln!(
        out,
        "{} {} {}%\n",
        p.muted(&format!("[{}]", level_label(chapter.level))),
        p.bar(view.progress),
        view.progress
    );
    let _ = writeln!(out, "{}", t!("chapter.sections"));
    for (section, completed, bookmarked) in &view.sections {
        let mark = if *completed {
            p.success("✓")
        } else {
            p.muted("·")
        };
        let star = if *bookmarked { p.warning(" ★") } else { String::new() };
        let _ = writeln!(
            out,
            "  {mark} {} {}{star}",
            p.accent(section.id),
            section.title
        );
    }
    let quizzes = if view.quiz_count > 0 {
        t!("chapter.quizzes", count = view.quiz_count)
    } else {
        t!("chapter.no_quizzes")
    };
    let _ = writeln!(out, "\n{quizzes}");
    out
}

pub fn section(view: &SectionView, p: &Painter) -> String {
    let mut out = String::new();
    let at = &view.at;
    let _ = writeln!(
        out,
        "{}",
        p.muted(&t!(
            "section.chapter",
            number = at.chapter.number,
            title = at.chapter.title
        ))
    );
    let _ = writeln!(out, "{}", p.heading(at.section.title));
    let status = if view.completed {
        p.success(&t!("section.completed"))
    } else {
        p.muted(&t!("section.not_completed"))
    };
    let star = if view.bookmarked {
        format!("  {}", p.warning(&format!("★ {}", t!("section.bookmarked"))))
    } else {
        String::new()
    };
    let _ = writeln!(out, "{status}{star}\n");

    match &view.prev {
        Some(prev) => {
            let _ = writeln!(out, "{}", t!("section.prev", title = located_title(prev)));
            let _ = writeln!(out, "  {}", p.muted(&command_for(prev)));
        }
        None => {
            let _ = writeln!(out, "{}", p.muted(&t!("section.first")));
        }
    }
    match &view.next {
        Some(next) => {
            let _ = writeln!(out, "{}", t!("section.next", title = located_title(next)));
            let _ = writeln!(out, "  {}", p.muted(&command_for(next)));
        }
        None => {
            let _ = writeln!(out, "{}", p.muted(&t!("section.last")));
        }
    }
    out
}

fn command_for(at: &Located) -> String {
    format!("docktutor read {} {}", at.chapter.id, at.section.id)
}

pub fn completion(view: &SectionView, p: &Painter) -> String {
    let message = if view.completed {
        p.success(&t!("section.marked_complete", title = view.at.section.title))
    } else {
        p.muted(&t!("section.marked_incomplete", title = view.at.section.title))
    };
    format!("{message}\n")
}

pub fn bookmark_toggled(at: &Located, bookmarked: bool, p: &Painter) -> String {
    let message = if bookmarked {
        p.warning(&t!("bookmark.added", title = at.section.title))
    } else {
        p.muted(&t!("bookmark.removed", title = at.section.title))
    };
    format!("{message}\n")
}

pub fn bookmarks(list: &[Located], p: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.heading(&t!("bookmarks.heading")));
    if list.is_empty() {
        let _ = writeln!(out, "{}", p.muted(&t!("bookmarks.empty")));
        return out;
    }
    for at in list {
        let _ = writeln!(
            out,
            "  {} {}  {}",
            p.warning("★"),
            located_title(at),
            p.muted(&at.full_id())
        );
    }
    out
}

pub fn continue_reading(view: &SectionView, p: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.heading(&t!("continue.heading")));
    let _ = writeln!(
        out,
        "{}",
        t!("stats.last_visited", title = located_title(&view.at))
    );
    let _ = writeln!(out, "  {}", p.muted(&command_for(&view.at)));
    if let Some(next) = &view.next {
        let _ = writeln!(out, "{}", t!("section.next", title = located_title(next)));
        let _ = writeln!(out, "  {}", p.muted(&command_for(next)));
    }
    out
}

pub fn search_results(query: &str, hits: &[SearchHit<'_>], p: &Painter) -> String {
    let mut out = String::new();
    if query.trim().is_empty() {
        let _ = writeln!(out, "{}", p.muted(&t!("search.blank")));
        return out;
    }
    if hits.is_empty() {
        let _ = writeln!(out, "{}", p.muted(&t!("search.empty", query = query)));
        return out;
    }
    let _ = writeln!(out, "{}", p.heading(&t!("search.heading", query = query)));
    for hit in hits {
        let r = hit.record;
        let _ = writeln!(
            out,
            "  {} {}  {}",
            p.accent(&format!("{}/{}", r.chapter_id, r.section_id)),
            r.section_title,
            p.muted(&format!("({}. {})", r.chapter_number, r.chapter_title))
        );
    }
    out
}

/// One cell per day, oldest first, ending today.
pub fn activity_strip(by_date: &BTreeMap<String, u32>, today: NaiveDate, days: u64) -> String {
    (0..days)
        .rev()
        .map(|back| {
            let count = today
                .checked_sub_days(Days::new(back))
                .and_then(|day| by_date.get(&date_key(day)).copied())
                .unwrap_or(0);
            match count {
                0 => '·',
                1 => '▂',
                2 => '▄',
                3 | 4 => '▆',
                _ => '█',
            }
        })
        .collect()
}

pub fn dashboard(dash: &Dashboard, p: &Painter) -> String {
    let mut out = String::new();
    let s = &dash.stats;
    let _ = writeln!(out, "{}", p.heading(&t!("stats.heading")));
    let _ = writeln!(
        out,
        "{} {} {}%",
        t!("stats.total"),
        p.bar(dash.total_progress),
        dash.total_progress
    );
    let _ = writeln!(
        out,
        "{}",
        p.muted(&t!(
            "stats.sections",
            done = dash.completed_count,
            total = dash.total_sections
        ))
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", p.accent(&t!("stats.streak", days = s.streak)));
    let _ = writeln!(out, "{}", t!("stats.best_streak", days = s.best_streak));
    let _ = writeln!(out, "{}", t!("stats.today", count = s.completions_today));
    let _ = writeln!(out, "{}", t!("stats.days", days = s.total_days));
    let _ = writeln!(out, "{}", t!("stats.visits", count = s.total_visits));

    let _ = writeln!(out, "\n{}", p.heading(&t!("stats.activity", days = ACTIVITY_DAYS)));
    let _ = writeln!(
        out,
        "  {}",
        p.success(&activity_strip(&s.completions_by_date, dash.today, ACTIVITY_DAYS))
    );

    let _ = writeln!(out, "\n{}", p.heading(&t!("stats.chapters")));
    for (chapter, percent) in &dash.chapters {
        let _ = writeln!(
            out,
            "  {:>2}. {} {:>3}%  {}",
            chapter.number,
            p.bar(*percent),
            percent,
            chapter.title
        );
    }

    let _ = writeln!(out);
    match &dash.last_visited {
        Some(at) => {
            let _ = writeln!(out, "{}", t!("stats.last_visited", title = located_title(at)));
        }
        None => {
            let _ = writeln!(out, "{}", p.muted(&t!("stats.never_visited")));
        }
    }

    let _ = writeln!(out, "\n{}", p.heading(&t!("stats.recent")));
    if dash.recent.is_empty() {
        let _ = writeln!(out, "  {}", p.muted(&t!("stats.no_recent")));
    }
    for (entry, at) in &dash.recent {
        let action = match entry.action {
            LearningAction::Visit => t!("stats.action_visit"),
            LearningAction::Complete => t!("stats.action_complete"),
        };
        let title = at.as_ref().map_or_else(|| entry.section_id.clone(), located_title);
        let _ = writeln!(
            out,
            "  {}  {:<10} {}",
            p.muted(&format_timestamp(entry.timestamp)),
            action,
            title
        );
    }
    out
}

pub fn quiz_questions(chapter_id: &str, title: &str, session: &QuizSession, p: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.heading(&t!("quiz.heading", title = title)));
    if session.is_empty() {
        let _ = writeln!(out, "{}", p.muted(&t!("quiz.none")));
        return out;
    }
    for (i, quiz) in session.quizzes().iter().enumerate() {
        let _ = writeln!(out, "\n{} {}", p.accent(&format!("Q{}.", i + 1)), quiz.question);
        for option in &quiz.options {
            let _ = writeln!(out, "   {}) {}", option.id, option.text);
        }
    }
    let _ = writeln!(out, "\n{}", p.muted(&t!("quiz.hint", chapter = chapter_id)));
    out
}

pub fn quiz_results(title: &str, session: &QuizSession, p: &Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.heading(&t!("quiz.heading", title = title)));
    for (i, quiz) in session.quizzes().iter().enumerate() {
        let _ = writeln!(out, "\n{} {}", p.accent(&format!("Q{}.", i + 1)), quiz.question);
        let verdict = match session.result(i) {
            Some(true) => p.success(&format!("✓ {}", t!("quiz.correct"))),
            Some(false) => {
                let answer = quiz
                    .option(&quiz.correct_option_id)
                    .map_or(quiz.correct_option_id.as_str(), |o| o.text.as_str());
                p.error(&format!("✗ {}", t!("quiz.incorrect", answer = answer)))
            }
            None => p.muted(&t!("quiz.unanswered")),
        };
        let _ = writeln!(out, "   {verdict}");
        let _ = writeln!(
            out,
            "   {}",
            p.muted(&t!("quiz.explanation", text = quiz.explanation))
        );
    }
    let _ = writeln!(
        out,
        "\n{}",
        t!(
            "quiz.score",
            correct = session.correct_count(),
            total = session.len()
        )
    );
    if session.all_correct() && !session.is_empty() {
        let _ = writeln!(out, "{}", p.success(&t!("quiz.perfect")));
    }
    out
}

pub fn theme(theme: &ThemeStore, p: &Painter) -> String {
    format!(
        "{}\n",
        p.accent(&t!(
            "theme.current",
            preference = theme.preference().as_str(),
            resolved = theme.resolved_theme().as_str()
        ))
    )
}

pub fn theme_set(theme: &ThemeStore, p: &Painter) -> String {
    format!(
        "{}\n",
        p.success(&t!("theme.set", preference = theme.preference().as_str()))
    )
}

pub fn reset_done(p: &Painter) -> String {
    format!("{}\n", p.warning(&t!("reset.done")))
}

pub fn exported(path: &str, p: &Painter) -> String {
    format!("{}\n", p.success(&t!("export.done", path = path)))
}

pub fn imported(path: &str, data: &ExportData, p: &Painter) -> String {
    format!(
        "{}\n",
        p.success(&t!(
            "import.done",
            path = path,
            date = data.exported_at.format("%Y-%m-%d %H:%M")
        ))
    )
}

pub fn error_line(err: &anyhow::Error) -> String {
    format!("{}: {err:#}", t!("error.prefix"))
}
