//! evap-results CLI: renders and exports course evaluation results.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use evap_results_core::model::{CourseId, SemesterId, UserId, Viewer};

mod commands;

#[derive(Parser)]
#[command(
    name = "evap-results",
    version,
    about = "Course evaluation results and exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the data comes from and how output is rendered.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Snapshot JSON of the data layer
    #[arg(long, default_value = "snapshot.json")]
    pub snapshot: PathBuf,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// The user the page is rendered for.
#[derive(Args, Clone)]
pub struct ViewerArgs {
    /// User id of the viewer
    #[arg(long, default_value = "0")]
    pub viewer: u64,

    /// The viewer is a reviewer
    #[arg(long)]
    pub reviewer: bool,

    /// The viewer is staff
    #[arg(long)]
    pub staff: bool,

    /// The viewer is an external user
    #[arg(long)]
    pub external: bool,

    /// Users who delegated to the viewer (comma-separated ids)
    #[arg(long, value_delimiter = ',')]
    pub delegators: Vec<u64>,

    /// The viewer may download grade files
    #[arg(long)]
    pub can_download_grades: bool,
}

impl ViewerArgs {
    pub fn to_viewer(&self) -> Viewer {
        Viewer {
            id: UserId(self.viewer),
            is_reviewer: self.reviewer,
            is_staff: self.staff,
            is_internal: !self.external,
            delegators: self.delegators.iter().copied().map(UserId).collect(),
            can_download_grades: self.can_download_grades,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List semesters with published results
    Index {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the courses of a semester, grouped by degree
    Semester {
        #[arg(long)]
        semester: u64,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Show the results of a course
    Course {
        #[arg(long)]
        semester: u64,

        #[arg(long)]
        course: u64,

        /// Raw public view toggle: "true" or "false"
        #[arg(long)]
        public_view: Option<String>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Export every course of a semester as CSV (staff only)
    ExportRaw {
        #[arg(long)]
        semester: u64,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Export a spreadsheet with one sheet per course-type selection (staff only)
    Export {
        #[arg(long)]
        semester: u64,

        /// Course types of one sheet (comma-separated, repeat per sheet)
        #[arg(long = "sheet")]
        sheets: Vec<String>,

        /// Include courses without enough answers
        #[arg(long)]
        include_not_enough_answers: bool,

        /// Include unpublished courses
        #[arg(long)]
        include_unpublished: bool,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Create a starter config and an example snapshot
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "evap_results=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index { source } => commands::index::execute(&source),
        Commands::Semester {
            semester,
            source,
            viewer,
        } => commands::semester::execute(&source, &viewer.to_viewer(), SemesterId(semester)),
        Commands::Course {
            semester,
            course,
            public_view,
            source,
            viewer,
        } => commands::course::execute(
            &source,
            &viewer.to_viewer(),
            SemesterId(semester),
            CourseId(course),
            public_view.as_deref(),
        ),
        Commands::ExportRaw {
            semester,
            output,
            source,
            viewer,
        } => commands::export_raw::execute(
            &source,
            &viewer.to_viewer(),
            SemesterId(semester),
            output,
        ),
        Commands::Export {
            semester,
            sheets,
            include_not_enough_answers,
            include_unpublished,
            output,
            source,
            viewer,
        } => commands::export::execute(
            &source,
            &viewer.to_viewer(),
            SemesterId(semester),
            commands::export::selection_from_args(
                &sheets,
                include_not_enough_answers,
                include_unpublished,
            ),
            output,
        ),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
