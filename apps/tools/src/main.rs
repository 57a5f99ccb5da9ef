use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::{Tutorial, TutorialId};
use storage::{Storage, TutorialRepository};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SAMPLE_TUTORIALS: [(&str, &str, i32, bool); 4] = [
    ("Spring Boot Basics", "Controllers, templates and JPA", 2, true),
    ("Spring Data JPA", "Derived queries and modifying updates", 5, true),
    ("Rust Ownership", "Moves, borrows and lifetimes", 6, true),
    ("Async Rust with Tokio", "Tasks, channels and select!", 8, false),
];

#[derive(Parser, Debug)]
#[command(about = "Maintenance commands for the tutorials database")]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/tutorials.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert a handful of sample tutorials.
    Seed,
    List {
        #[arg(long)]
        keyword: Option<String>,
    },
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = 0)]
        level: i32,
        #[arg(long)]
        unpublished: bool,
    },
    Publish {
        id: i64,
        #[arg(action = clap::ArgAction::Set)]
        published: bool,
    },
    Delete {
        id: i64,
    },
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;
    info!(database_url = %cli.database_url, "opened database");

    match cli.command {
        Command::Seed => {
            for (title, description, level, published) in SAMPLE_TUTORIALS {
                let saved = storage
                    .save(Tutorial::new(
                        title,
                        Some(description.to_string()),
                        level,
                        published,
                    ))
                    .await?;
                println!("{saved}");
            }
        }
        Command::List { keyword } => {
            let tutorials = match keyword.as_deref() {
                Some(keyword) => storage.find_by_title_containing_ignore_case(keyword).await?,
                None => storage.find_all().await?,
            };
            for tutorial in &tutorials {
                println!("{tutorial}");
            }
        }
        Command::Add {
            title,
            description,
            level,
            unpublished,
        } => {
            let tutorial = Tutorial::new(title, description, level, !unpublished);
            tutorial.validate()?;
            println!("{}", storage.save(tutorial).await?);
        }
        Command::Publish { id, published } => {
            let id = TutorialId(id);
            if !storage.exists_by_id(id).await? {
                bail!("no tutorial with id={id}");
            }
            storage.update_published_status(id, published).await?;
            println!("tutorial id={id} published={published}");
        }
        Command::Delete { id } => {
            let id = TutorialId(id);
            storage.delete_by_id(id).await?;
            println!("deleted tutorial id={id}");
        }
        Command::Count => {
            println!("{}", storage.count().await?);
        }
    }

    Ok(())
}
