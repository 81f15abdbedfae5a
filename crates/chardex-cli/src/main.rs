use std::sync::Arc;

use chardex_api::{CatalogClient, RetryConfig};
use chardex_core::models::{Character, FavoriteScope, FilterCriteria, SortField, SortOrder};
use chardex_core::{Catalog, CharacterView, Config, Error, RemoteCatalog};
use chardex_store::StateStore;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chardex")]
#[command(version, about = "Character catalog browser with favorites and comments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List the current page of the catalog
    List {
        /// Match names containing this text
        #[arg(long)]
        name: Option<String>,
        /// Match a life status (alive, dead, unknown)
        #[arg(long)]
        status: Option<String>,
        /// Match a species exactly
        #[arg(long)]
        species: Option<String>,
        /// Match a gender
        #[arg(long)]
        gender: Option<String>,
        /// Show starred characters only
        #[arg(long, conflicts_with = "others")]
        starred: bool,
        /// Show unstarred characters only
        #[arg(long)]
        others: bool,
        /// Sort field (name, status, species)
        #[arg(long)]
        sort: Option<String>,
        /// Sort direction (asc, desc)
        #[arg(long)]
        order: Option<String>,
        /// Jump to a specific page
        #[arg(long)]
        page: Option<u32>,
    },
    /// Fetch the next page
    More,
    /// Show one character in detail, with its comments
    Show {
        /// Character id
        id: String,
    },
    /// Toggle a character's star
    Fav {
        /// Character id
        id: String,
    },
    /// List starred characters
    Favs,
    /// Manage comments
    #[command(subcommand)]
    Comment(CommentCommands),
    /// Reset filters, sort and page back to defaults
    Reset,
}

#[derive(clap::Subcommand)]
enum CommentCommands {
    /// Attach a comment to a character
    Add {
        /// Character id
        id: String,
        /// Comment text
        text: String,
    },
    /// Delete a comment by its id
    Rm {
        /// Comment id
        comment_id: String,
    },
    /// List comments for a character
    List {
        /// Character id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chardex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let db_path = config.storage.database_path()?;
    tracing::debug!("Using state database at {}", db_path.display());
    let store = Arc::new(StateStore::open(db_path)?);
    let client = CatalogClient::with_config(
        config.api.base_url.clone(),
        RetryConfig {
            max_retries: config.api.max_retries,
            ..Default::default()
        },
    );
    let mut catalog = Catalog::new(Box::new(RemoteCatalog::new(client)), store);

    match cli.command {
        Commands::List {
            name,
            status,
            species,
            gender,
            starred,
            others,
            sort,
            order,
            page,
        } => {
            let filter_given = name.is_some()
                || status.is_some()
                || species.is_some()
                || gender.is_some()
                || starred
                || others;

            if filter_given {
                let scope = if starred {
                    Some(FavoriteScope::Starred)
                } else if others {
                    Some(FavoriteScope::Others)
                } else {
                    None
                };
                catalog.set_filters(FilterCriteria {
                    name,
                    status,
                    species,
                    gender,
                    scope,
                });
            }

            if sort.is_some() || order.is_some() {
                let field = sort
                    .as_deref()
                    .map(SortField::parse)
                    .unwrap_or(catalog.preferences().sort_by);
                let direction = order
                    .as_deref()
                    .map(SortOrder::parse)
                    .unwrap_or(catalog.preferences().sort_order);
                catalog.set_sort(field, direction);
            }

            if let Some(page) = page {
                catalog.set_current_page(page);
            }

            let view = catalog.request_page().await?;
            print_view(&view, catalog.preferences().current_page);
        }
        Commands::More => {
            let view = catalog.load_more().await?;
            print_view(&view, catalog.preferences().current_page);
        }
        Commands::Show { id } => match catalog.character_detail(&id).await {
            Ok(character) => print_detail(&character, &catalog),
            Err(Error::NotFound(_)) => println!("No character with id {}", id),
            Err(e) => return Err(e.into()),
        },
        Commands::Fav { id } => {
            if let Some(existing) = catalog.favorites().iter().find(|c| c.id == id).cloned() {
                catalog.toggle_favorite(&existing);
                println!("Unstarred {}", existing.name);
            } else {
                match catalog.character_detail(&id).await {
                    Ok(character) => {
                        catalog.toggle_favorite(&character);
                        println!("Starred {}", character.name);
                    }
                    Err(Error::NotFound(_)) => println!("No character with id {}", id),
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Commands::Favs => {
            if catalog.favorites().is_empty() {
                println!("Nothing starred yet. Try `chardex fav <id>`.");
            } else {
                for character in catalog.favorites() {
                    print_row(character, true);
                }
            }
        }
        Commands::Comment(CommentCommands::Add { id, text }) => {
            match catalog.add_comment(&text, &id) {
                Some(comment) => println!("Added comment {}", comment.id),
                None => println!("Empty comments are ignored."),
            }
        }
        Commands::Comment(CommentCommands::Rm { comment_id }) => {
            catalog.remove_comment(&comment_id);
            println!("Done.");
        }
        Commands::Comment(CommentCommands::List { id }) => {
            let comments = catalog.comments_for(&id);
            if comments.is_empty() {
                println!("No comments for character {}.", id);
            }
            for comment in comments {
                println!(
                    "[{}] {} - {}",
                    comment.id,
                    comment.created_at.format("%Y-%m-%d %H:%M"),
                    comment.text
                );
            }
        }
        Commands::Reset => {
            catalog.set_filters(FilterCriteria::default());
            catalog.set_sort(SortField::default(), SortOrder::default());
            catalog.set_search_term("");
            println!("Filters, sort and page are back to defaults.");
        }
    }

    Ok(())
}

fn print_view(view: &CharacterView, page: u32) {
    if !view.starred.is_empty() {
        println!("Starred ({})", view.starred.len());
        for character in &view.starred {
            print_row(character, true);
        }
        println!();
    }

    println!("Characters ({})", view.regular.len());
    for character in &view.regular {
        print_row(character, false);
    }

    println!();
    if view.has_more {
        println!(
            "Page {} of {} matching characters - `chardex more` continues.",
            page, view.total
        );
    } else {
        println!("Page {} - end of the list.", page);
    }
}

fn print_row(character: &Character, starred: bool) {
    let marker = if starred { "*" } else { " " };
    println!(
        "{} [{:>4}] {} - {}, {}",
        marker, character.id, character.name, character.species, character.status
    );
}

fn print_detail(character: &Character, catalog: &Catalog) {
    let star = if catalog.is_favorite(&character.id) {
        " *"
    } else {
        ""
    };
    println!("{}{}", character.name, star);
    println!("  id:      {}", character.id);
    println!("  status:  {}", character.status);
    println!("  species: {}", character.species);
    if !character.kind.is_empty() {
        println!("  type:    {}", character.kind);
    }
    println!("  gender:  {}", character.gender);
    if !character.origin.name.is_empty() {
        println!("  origin:  {}", character.origin.name);
    }
    if !character.location.name.is_empty() {
        println!("  last seen: {}", character.location.name);
    }
    if let Some(created) = character.created {
        println!("  in catalog since {}", created.format("%Y-%m-%d"));
    }

    let comments = catalog.comments_for(&character.id);
    if !comments.is_empty() {
        println!();
        println!("Comments ({})", comments.len());
        for comment in comments {
            println!(
                "  [{}] {} - {}",
                comment.id,
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.text
            );
        }
    }
}
