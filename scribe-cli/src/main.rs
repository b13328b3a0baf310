//! scribe - Sensory Scribe command-line client
//!
//! Talks to a running scribe-api instance. Drafts and the usage quota live
//! in `<root>/client`, one JSON file per storage key.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use scribe_cli::report;
use scribe_cli::ScribeClient;
use scribe_common::client_store::MAX_USAGE;
use scribe_common::config::{self, RootFolder, RootFolderResolver};
use scribe_common::export::{generate_filename, render_report, ExportFormat};
use scribe_common::models::{AnalyzeRequest, RewriteRequest};
use scribe_common::{ClientStore, Draft, FileStorage, NewDraft, Sense};

#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(about = "Sensory writing analysis from the command line")]
#[command(version)]
struct Cli {
    /// scribe-api base URL
    #[arg(long, global = true, env = "SCRIBE_SERVER_URL", default_value = scribe_cli::client::DEFAULT_SERVER_URL)]
    server: String,

    /// Root folder holding client state
    #[arg(long, global = true, env = "SCRIBE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a text file across the five senses
    Analyze {
        file: PathBuf,
        #[arg(short, long)]
        genre: String,
        /// Focus sense, or "All Senses"
        #[arg(short, long, default_value = "All Senses")]
        sense: String,
    },
    /// Rewrite sentences to strengthen one sense
    Rewrite {
        file: PathBuf,
        #[arg(short, long)]
        genre: String,
        #[arg(short, long)]
        sense: String,
        /// Current score for the sense (0-10)
        #[arg(long)]
        score: f64,
    },
    /// Keyword-based suggestions (no model call)
    Suggest { file: PathBuf },
    /// Genre-specific example sentences for a sense
    Examples {
        #[arg(short, long)]
        genre: String,
        #[arg(short, long)]
        sense: String,
    },
    /// Improvement strategies and common mistakes for a sense
    Tips {
        #[arg(short, long)]
        sense: String,
    },
    /// Genres available in the research dataset
    Genres,
    /// Fetch an analysis stored by the service
    Analysis {
        /// Record id printed after `scribe analyze`
        id: String,
    },
    /// Manage saved drafts
    Drafts {
        #[command(subcommand)]
        action: DraftAction,
    },
    /// Show or reset the analysis quota
    Usage {
        #[arg(long)]
        reset: bool,
    },
    /// Write a draft and its analysis to a report file
    Export {
        /// Draft timestamp, or "latest"
        timestamp: String,
        #[arg(short, long, default_value = "md")]
        format: String,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum DraftAction {
    /// List drafts, newest first (* = analyzed)
    List,
    /// Save a text file as a draft without analyzing it
    Save {
        file: PathBuf,
        #[arg(short, long)]
        genre: String,
        #[arg(short, long, default_value = "All Senses")]
        sense: String,
    },
    /// Print one draft
    Show { timestamp: String },
    /// Delete one draft
    Delete { timestamp: String },
    /// Delete every draft
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let toml_config = config::load_toml_config(cli.config.as_deref());
    let root_folder = RootFolder::new(
        RootFolderResolver::new(cli.root_folder.clone(), &toml_config).resolve(),
    );
    let store = ClientStore::new(FileStorage::new(root_folder.client_state_dir()));
    debug!("Client state: {}", root_folder.client_state_dir().display());

    let client = ScribeClient::new(&cli.server)?;

    match cli.command {
        Command::Analyze { file, genre, sense } => {
            analyze(&client, &store, &file, genre, sense).await
        }
        Command::Rewrite {
            file,
            genre,
            sense,
            score,
        } => {
            let request = RewriteRequest {
                original_text: read_text(&file)?,
                genre,
                target_sense: sense,
                current_score: Some(score),
            };
            let suggestion = client.rewrite(&request).await?;
            print!("{}", report::render_rewrite(&suggestion));
            Ok(())
        }
        Command::Suggest { file } => {
            let report = client.suggest(&read_text(&file)?).await?;
            print!("{}", report::render_heuristic(&report));
            Ok(())
        }
        Command::Examples { genre, sense } => {
            let examples = client.genre_examples(&genre, &sense).await?;
            print!("{}", report::render_examples(&genre, &sense, &examples));
            Ok(())
        }
        Command::Tips { sense } => {
            let parsed: Sense = sense.parse()?;
            let tips = client.improvement_tips(parsed.as_str()).await?;
            print!("{}", report::render_tips(parsed, &tips));
            Ok(())
        }
        Command::Genres => {
            for genre in client.genres().await? {
                println!("{}\n  {}", genre.name, genre.overview);
            }
            Ok(())
        }
        Command::Analysis { id } => {
            let record = client.analysis(&id).await?;
            println!("{}\n", record.created_at.to_rfc3339());
            println!("{}\n", record.text);
            print!("{}", report::render_analysis(&record.analysis));
            Ok(())
        }
        Command::Drafts { action } => drafts(&store, action),
        Command::Usage { reset } => usage(&store, reset),
        Command::Export {
            timestamp,
            format,
            out,
        } => export(&store, &timestamp, &format, &out),
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn analyze(
    client: &ScribeClient,
    store: &ClientStore<FileStorage>,
    file: &Path,
    genre: String,
    sense: String,
) -> Result<()> {
    if !store.can_proceed() {
        bail!(
            "Usage limit reached ({} analyses). Run `scribe usage --reset` to start a new session.",
            MAX_USAGE
        );
    }

    let text = read_text(file)?;
    let request = AnalyzeRequest {
        text,
        genre,
        sense,
    };
    let analysis = client.analyze(&request).await?;

    if !store.record_usage() {
        warn!("Could not record usage");
    }

    let saved = store.save_draft(NewDraft {
        text: request.text,
        genre: request.genre,
        sense: request.sense,
        analysis: Some(analysis.clone()),
    });
    if !saved {
        warn!("Could not save draft");
    }

    print!("{}", report::render_analysis(&analysis));
    println!("\nAnalyses remaining this session: {}", store.usage_remaining());
    Ok(())
}

/// Resolve "latest" or an exact timestamp
fn find_draft(store: &ClientStore<FileStorage>, timestamp: &str) -> Result<Draft> {
    let draft = if timestamp.eq_ignore_ascii_case("latest") {
        store.latest_draft()
    } else {
        store.find_draft(timestamp)
    };
    draft.ok_or_else(|| anyhow!("No draft with timestamp {}", timestamp))
}

fn drafts(store: &ClientStore<FileStorage>, action: DraftAction) -> Result<()> {
    match action {
        DraftAction::List => {
            print!("{}", report::render_draft_list(&store.list_drafts()));
        }
        DraftAction::Save { file, genre, sense } => {
            let saved = store.save_draft(NewDraft {
                text: read_text(&file)?,
                genre,
                sense,
                analysis: None,
            });
            if !saved {
                bail!("Could not save draft");
            }
            if let Some(draft) = store.latest_draft() {
                println!("Saved draft {}", draft.timestamp);
            }
        }
        DraftAction::Show { timestamp } => {
            let draft = find_draft(store, &timestamp)?;
            println!("{} | {} | {}\n", draft.timestamp, draft.genre, draft.sense);
            println!("{}", draft.text);
            if let Some(analysis) = &draft.analysis {
                println!();
                print!("{}", report::render_analysis(analysis));
            }
        }
        DraftAction::Delete { timestamp } => {
            if !store.delete_draft(&timestamp) {
                bail!("Could not delete draft");
            }
            println!("Deleted draft {}", timestamp);
        }
        DraftAction::Clear => {
            if !store.clear_all() {
                bail!("Could not clear drafts");
            }
            println!("All drafts cleared");
        }
    }
    Ok(())
}

fn usage(store: &ClientStore<FileStorage>, reset: bool) -> Result<()> {
    if reset {
        if !store.reset_usage() {
            bail!("Could not reset usage counter");
        }
        println!("Usage counter reset");
    }

    match store.usage_count() {
        Some(count) => println!(
            "{} of {} analyses used, {} remaining",
            count.min(MAX_USAGE),
            MAX_USAGE,
            store.usage_remaining()
        ),
        None => println!("Client storage unavailable; analyses are blocked"),
    }
    Ok(())
}

fn export(store: &ClientStore<FileStorage>, timestamp: &str, format: &str, out: &Path) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let draft = find_draft(store, timestamp)?;

    let filename = generate_filename(format, &draft.genre, Utc::now());
    let path = out.join(filename);
    std::fs::write(&path, render_report(&draft, format))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {}", path.display());
    Ok(())
}
