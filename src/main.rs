use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::tty::IsTty;

use docktutor::app::App;
use docktutor::config::Config;
use docktutor::ui::render::{self, Painter};
use docktutor::ui::theme::ThemePreference;

#[derive(Parser)]
#[command(
    name = "docktutor",
    version,
    about = "Docker tutorial in the terminal with progress tracking, quizzes and search"
)]
struct Cli {
    #[arg(long, global = true, help = "Config file (default: <config dir>/docktutor/config.toml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory for saved progress and theme")]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Message language (en, ja)")]
    locale: Option<String>,

    #[arg(long, global = true, help = "Disable coloured output")]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List chapters with level and progress
    Chapters,
    /// Show one chapter and its sections
    Chapter { chapter: String },
    /// Open a section and record the visit
    Read { chapter: String, section: String },
    /// Show the last visited section and what comes next
    Continue,
    /// Mark a section as completed
    Complete { chapter: String, section: String },
    /// Mark a section as not completed
    Uncomplete { chapter: String, section: String },
    /// Add or remove a bookmark
    Bookmark { chapter: String, section: String },
    /// List bookmarks
    Bookmarks,
    /// Fuzzy search over chapter and section titles
    Search { query: Vec<String> },
    /// Learning dashboard
    Stats,
    /// Print a chapter's quizzes, or grade answers
    Quiz {
        chapter: String,
        #[arg(long, value_delimiter = ',', help = "Option ids in question order, e.g. a,c")]
        answers: Option<Vec<String>>,
    },
    /// Show or set the colour theme
    Theme { preference: Option<ThemePreference> },
    /// Clear all progress
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Write progress and theme to a JSON file
    Export { file: PathBuf },
    /// Restore progress and theme from an exported JSON file
    Import { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = docktutor::logging::init() {
        eprintln!("{err:#}");
    }

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render::error_line(&err));
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if cli.no_color {
        config.color = false;
    }
    config.validate();
    rust_i18n::set_locale(&config.locale);
    tracing::debug!(command = ?cli.command, data_dir = %config.data_dir, "parsed command");

    let color = config.color && std::io::stdout().is_tty();
    let mut app = App::open(config)?;
    let p = Painter::new(&app.theme, color);

    let out = match cli.command {
        Command::Chapters => render::chapters(&app, &p),
        Command::Chapter { chapter } => render::chapter(&app.chapter_view(&chapter)?, &p),
        Command::Read { chapter, section } => render::section(&app.visit(&chapter, &section)?, &p),
        Command::Continue => render::continue_reading(&app.continue_reading()?, &p),
        Command::Complete { chapter, section } => {
            render::completion(&app.complete(&chapter, &section)?, &p)
        }
        Command::Uncomplete { chapter, section } => {
            render::completion(&app.uncomplete(&chapter, &section)?, &p)
        }
        Command::Bookmark { chapter, section } => {
            let bookmarked = app.toggle_bookmark(&chapter, &section)?;
            render::bookmark_toggled(&app.section(&chapter, &section)?, bookmarked, &p)
        }
        Command::Bookmarks => render::bookmarks(&app.bookmarks(), &p),
        Command::Search { query } => {
            let query = query.join(" ");
            render::search_results(&query, &app.search(&query), &p)
        }
        Command::Stats => render::dashboard(&app.dashboard(), &p),
        Command::Quiz { chapter, answers } => {
            let found = app.chapter(&chapter)?;
            let mut session = app.quiz_session(&chapter)?;
            match answers {
                Some(answers) => {
                    session.grade_all(&answers);
                    render::quiz_results(found.title, &session, &p)
                }
                None => render::quiz_questions(found.id, found.title, &session, &p),
            }
        }
        Command::Theme { preference } => match preference {
            Some(preference) => {
                app.set_theme(preference);
                render::theme_set(&app.theme, &Painter::new(&app.theme, color))
            }
            None => render::theme(&app.theme, &p),
        },
        Command::Reset { yes } => {
            app.reset(yes)?;
            render::reset_done(&p)
        }
        Command::Export { file } => {
            app.export_to(&file)?;
            render::exported(&file.display().to_string(), &p)
        }
        Command::Import { file } => {
            let data = app.import_from(&file)?;
            render::imported(&file.display().to_string(), &data, &p)
        }
    };

    print!("{out}");
    Ok(())
}
