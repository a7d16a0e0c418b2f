//! Portfolio CLI - manage the portfolio backend from the terminal
//!
//! Builds the single API client for the process from the environment (or a
//! TOML file) and runs one command against it.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use portfolio_api_client::endpoints::projects::ProjectUpdate;
use portfolio_api_client::{ApiService, ClientConfig};
use portfolio_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;

use commands::{analytics, auth, contact, projects, skills};
use output::OutputFormat;

/// Manage the portfolio backend
#[derive(Parser)]
#[command(name = "portfolio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Client configuration file (TOML); environment variables are used otherwise
    #[arg(long, global = true, env = "PORTFOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as the site admin and remember the session
    Login {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin password
        #[arg(short, long, env = "PORTFOLIO_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the admin the saved session belongs to
    Whoami,

    /// Contact form submissions
    Contact {
        #[command(subcommand)]
        action: ContactAction,
    },

    /// Portfolio projects
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },

    /// Skills
    Skills {
        #[command(subcommand)]
        action: SkillsAction,
    },

    /// Visitor analytics
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },
}

#[derive(Subcommand)]
enum ContactAction {
    /// Send a message through the public contact form
    Send {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        message: String,
    },

    /// List received messages (admin)
    List {
        /// Only show unread messages
        #[arg(short, long)]
        unread: bool,
    },

    /// Mark a message as read (admin)
    Read {
        /// Message id
        id: String,
    },
}

#[derive(Subcommand)]
enum ProjectsAction {
    /// List projects in display order
    List,

    /// Show one project
    Get {
        /// Project id
        id: String,
    },

    /// Add a project (admin)
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,

        /// Technology used; repeat for several
        #[arg(long = "tech")]
        tech_stack: Vec<String>,

        #[arg(long)]
        github: Option<String>,

        #[arg(long)]
        live: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },

    /// Change fields of a project (admin)
    Update {
        /// Project id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Replace the technology list; repeat for several
        #[arg(long = "tech")]
        tech_stack: Option<Vec<String>>,

        #[arg(long)]
        github: Option<String>,

        #[arg(long)]
        live: Option<String>,

        #[arg(long)]
        image: Option<String>,

        /// Display position, lower first
        #[arg(long)]
        order: Option<i64>,
    },

    /// Remove a project (admin)
    Delete {
        /// Project id
        id: String,
    },
}

#[derive(Subcommand)]
enum SkillsAction {
    /// List skills, grouped by category unless --flat
    List {
        #[arg(long)]
        flat: bool,
    },

    /// Add a skill (admin)
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        category: String,

        /// Beginner, Intermediate, Advanced or Expert
        #[arg(short, long)]
        level: String,
    },

    /// Remove a skill (admin)
    Delete {
        /// Skill id
        id: String,
    },

    /// Insert skills from a JSON array file (admin)
    Batch {
        /// Path to a JSON array of {name, category, proficiency}
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum AnalyticsAction {
    /// Aggregate stats
    Dashboard {
        /// Number of days covered
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Most recent events
    Events {
        /// Maximum number of events
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Record a page view
    Track {
        /// Page name
        page: String,
    },
}

fn build_client(cli: &Cli) -> anyhow::Result<ApiService> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(ref url) = cli.api_url {
        config = config.with_base_url(url.as_str());
    }
    Ok(ApiService::with_config(config)?)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let api = build_client(&cli)?;
    let format = cli.format;

    match cli.command {
        Commands::Login { username, password } => {
            auth::login(&api, &username, &password, format).await
        }
        Commands::Logout => auth::logout(&api, format),
        Commands::Whoami => auth::whoami(&api, format).await,

        Commands::Contact { action } => match action {
            ContactAction::Send {
                name,
                email,
                message,
            } => contact::send(&api, name, email, message, format).await,
            ContactAction::List { unread } => contact::list(&api, unread, format).await,
            ContactAction::Read { id } => contact::mark_read(&api, &id, format).await,
        },

        Commands::Projects { action } => match action {
            ProjectsAction::List => projects::list(&api, format).await,
            ProjectsAction::Get { id } => projects::get(&api, &id, format).await,
            ProjectsAction::Create {
                title,
                description,
                tech_stack,
                github,
                live,
                image,
            } => {
                let draft = projects::draft(title, description, tech_stack, github, live, image);
                projects::create(&api, &draft, format).await
            }
            ProjectsAction::Update {
                id,
                title,
                description,
                tech_stack,
                github,
                live,
                image,
                order,
            } => {
                let changes = ProjectUpdate {
                    title,
                    description,
                    tech_stack,
                    github_link: github,
                    live_link: live,
                    image_url: image,
                    order,
                };
                projects::update(&api, &id, &changes, format).await
            }
            ProjectsAction::Delete { id } => projects::delete(&api, &id, format).await,
        },

        Commands::Skills { action } => match action {
            SkillsAction::List { flat } => skills::list(&api, !flat, format).await,
            SkillsAction::Add {
                name,
                category,
                level,
            } => skills::add(&api, name, category, &level, format).await,
            SkillsAction::Delete { id } => skills::delete(&api, &id, format).await,
            SkillsAction::Batch { file } => skills::batch(&api, &file, format).await,
        },

        Commands::Analytics { action } => match action {
            AnalyticsAction::Dashboard { days } => analytics::dashboard(&api, days, format).await,
            AnalyticsAction::Events { limit } => analytics::events(&api, limit, format).await,
            AnalyticsAction::Track { page } => analytics::track(&api, &page, format).await,
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose(["portfolio", "portfolio-api-client", "portfolio-telemetry"])
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = portfolio_telemetry::init_with_config(&telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
