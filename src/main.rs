//! gallery - terminal client for image gallery collections.

mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use gallery::config::Config;
use gallery::i18n::Locale;

use commands::Session;
use commands::edit::EditArgs;
use commands::upload::UploadArgs;

#[derive(Parser)]
#[command(name = "gallery", version, about = "Browse and manage an image gallery")]
struct Cli {
    /// Config file (default: ./gallery.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL, overriding the config file
    #[arg(long, global = true)]
    server: Option<String>,

    /// Display language (he, en)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every image in the gallery
    List {
        /// Print the rendered HTML cards instead of a table
        #[arg(long)]
        html: bool,
    },
    /// Show one image's details
    View { id: String },
    /// Print one record exactly as the server returns it
    Inspect { id: String },
    /// Upload a new image
    Upload {
        file: PathBuf,
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Edit an image's metadata (an empty value clears the field)
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete an image
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "gallery=debug,info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(server) = &cli.server {
        config.server.base_url.clone_from(server);
    }
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }

    let validation = config.validate()?;
    for warning in &validation.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "gallery", &mut io::stdout());
        return Ok(());
    }

    init_tracing(cli.verbose, cli.log_json);
    let config = load_config(&cli)?;
    let assume_yes = matches!(cli.command, Commands::Delete { yes: true, .. });
    let session = Session::new(&config, assume_yes)?;

    match &cli.command {
        Commands::List { html } => commands::list::execute(&session, *html).await,
        Commands::View { id } => commands::view::execute(&session, id).await,
        Commands::Inspect { id } => commands::inspect::execute(&session, id).await,
        Commands::Upload {
            file,
            title,
            description,
            tags,
        } => {
            let args = UploadArgs {
                file,
                title,
                description: description.as_deref(),
                tags: tags.as_deref(),
            };
            commands::upload::execute(&session, args).await
        },
        Commands::Edit {
            id,
            title,
            description,
            tags,
        } => {
            let args = EditArgs {
                id,
                title: title.as_deref(),
                description: description.as_deref(),
                tags: tags.as_deref(),
            };
            commands::edit::execute(&session, args).await
        },
        Commands::Delete { id, .. } => commands::delete::execute(&session, id).await,
        Commands::Completions { .. } => Ok(()),
    }
}
