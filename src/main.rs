//! Userdash CLI
//!
//! Command-line front end for the dashboard:
//! - List, add, edit and delete posts; read their comments
//! - List, add, edit and delete users; toggle favorites
//! - Print a default configuration file
//!
//! Every change is local: it is stored in the overlay database and merged
//! onto the data source on the next run.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use userdash::config::{generate_default_config, LoggingConfig};
use userdash::view::html::render_comments;
use userdash::view::table::render_table;
use userdash::view::{CommentsView, PostCard, PostForm, Toast, UserForm, UserRow};
use userdash::{AppContext, Config, PostsPage, ToastLog, UsersPage};

#[derive(Parser)]
#[command(name = "userdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Users and posts dashboard with local-only edits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Keep local changes in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with posts
    Posts {
        #[command(subcommand)]
        action: PostsCommand,
    },

    /// Work with users
    Users {
        #[command(subcommand)]
        action: UsersCommand,
    },

    /// Print a default configuration file
    Config,
}

#[derive(Subcommand)]
pub enum PostsCommand {
    /// List merged posts
    List {
        /// Only show posts whose title or body contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a local post
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        body: String,
    },
    /// Edit a post; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Delete a post
    Delete { id: i64 },
    /// Show the comments of a post
    Comments { id: i64 },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List merged users
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Sort by column index (1 = name, 2 = email, 3 = phone, 4 = city)
        #[arg(long)]
        sort: Option<usize>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Add a local user
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        city: String,
    },
    /// Edit a user; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Delete a user
    Delete { id: i64 },
    /// Toggle a user's favorite flag
    Favorite { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let (config, config_error) = match &cli.config {
        Some(path) => (
            Config::load_with_env(path)
                .with_context(|| format!("loading config from {:?}", path))?,
            None,
        ),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::from_env(), Some(e)),
        },
    };
    init_tracing(&config.logging);

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Ignoring config file, using defaults");
    }

    tracing::debug!("Userdash v{}", env!("CARGO_PKG_VERSION"));

    let ctx = if cli.ephemeral {
        AppContext::ephemeral(config)?
    } else {
        AppContext::new(config)?
    };

    let result = match cli.command {
        Commands::Posts { action } => run_posts(&ctx, action, cli.format).await,
        Commands::Users { action } => run_users(&ctx, action, cli.format).await,
        Commands::Config => Ok(()),
    };

    print_toasts(&ctx.toasts);
    result
}

/// Registry with an env filter and a pretty or JSON layer on stderr
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("userdash={}", logging.level)));

    let json = logging.format.eq_ignore_ascii_case("json");
    let json_layer =
        json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let pretty_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();
}

async fn run_posts(ctx: &AppContext, action: PostsCommand, format: OutputFormat) -> Result<()> {
    let mut page = ctx.posts_page();
    page.refresh().await?;

    match action {
        PostsCommand::List { search } => {
            if let Some(query) = search {
                page.search(&query);
            }
            print_posts(&page, format)?;
        }
        PostsCommand::Add { title, body } => {
            let id = page.add(&title, &body).await?;
            println!("Added post {}", id);
        }
        PostsCommand::Edit { id, title, body } => {
            let current = page.open_edit(id)?;
            page.save_edit(PostForm {
                id,
                title: title.unwrap_or(current.title),
                body: body.unwrap_or(current.body),
            })
            .await?;
            println!("Updated post {}", id);
        }
        PostsCommand::Delete { id } => {
            page.delete(id).await?;
            println!("Deleted post {}", id);
        }
        PostsCommand::Comments { id } => {
            page.toggle_comments(id).await?;
            if let Some(card) = page.card(id) {
                print_comments(card, format)?;
            }
        }
    }

    Ok(())
}

async fn run_users(ctx: &AppContext, action: UsersCommand, format: OutputFormat) -> Result<()> {
    let mut page = ctx.users_page();
    page.refresh().await?;

    match action {
        UsersCommand::List { page: number, sort, desc } => {
            if let Some(column) = sort {
                if !page.table_mut().sort(column, !desc) {
                    bail!("column {} cannot be sorted", column);
                }
            }
            print_users(&page, number.saturating_sub(1), format)?;
        }
        UsersCommand::Add {
            name,
            email,
            phone,
            city,
        } => {
            let id = page
                .add(UserForm {
                    name,
                    email,
                    phone,
                    city,
                })
                .await?;
            println!("Added user {}", id);
        }
        UsersCommand::Edit {
            id,
            name,
            email,
            phone,
            city,
        } => {
            let current = page.open_edit(id)?;
            let form = UserForm {
                name: name.unwrap_or(current.name),
                email: email.unwrap_or(current.email),
                phone: phone.unwrap_or(current.phone),
                city: city.unwrap_or(current.city),
            };
            page.save_edit(id, form).await?;
            println!("Updated user {}", id);
        }
        UsersCommand::Delete { id } => {
            page.delete(id).await?;
            println!("Deleted user {}", id);
        }
        UsersCommand::Favorite { id } => {
            let favorite = page.toggle_favorite(id)?;
            println!(
                "User {} is {}a favorite",
                id,
                if favorite { "" } else { "no longer " }
            );
        }
    }

    Ok(())
}

fn print_posts(page: &PostsPage, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Html => print!("{}", page.render_html()),
        OutputFormat::Json => {
            let posts: Vec<_> = page.visible_cards().map(|c| &c.post).collect();
            println!("{}", serde_json::to_string_pretty(&posts)?);
        }
        OutputFormat::Table => {
            let cards: Vec<&PostCard> = page.visible_cards().collect();
            if cards.is_empty() {
                println!("No posts found.");
                return Ok(());
            }
            println!("{:>5}  {:>6}  {}", "ID", "Author", "Title");
            println!("{}", "-".repeat(60));
            for card in cards {
                println!(
                    "{:>5}  {:>6}  {}",
                    card.post.id, card.post.user_id, card.post.title
                );
            }
        }
    }
    Ok(())
}

fn print_comments(card: &PostCard, format: OutputFormat) -> Result<()> {
    let view = card.comments.view();
    match format {
        OutputFormat::Html => println!("{}", render_comments(view)),
        OutputFormat::Json => {
            let comments = match view {
                CommentsView::List(comments) => comments,
                _ => &[][..],
            };
            println!("{}", serde_json::to_string_pretty(comments)?);
        }
        OutputFormat::Table => match view {
            CommentsView::List(comments) => {
                for comment in comments {
                    println!("{} <{}>", comment.name, comment.email);
                    println!("  {}", comment.body);
                }
            }
            _ => println!("No comments."),
        },
    }
    Ok(())
}

fn print_users(page: &UsersPage, index: usize, format: OutputFormat) -> Result<()> {
    let table = page.table();
    let rows: &[UserRow] = table.page(index);

    match format {
        OutputFormat::Html => print!("{}", render_table(table.columns(), rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Table => {
            println!(
                "{:<2} {:>4}  {:<22} {:<32} {:<18} {}",
                "", "ID", "Name", "Email", "Phone", "City"
            );
            println!("{}", "-".repeat(96));
            for row in rows {
                println!(
                    "{:<2} {:>4}  {:<22} {:<32} {:<18} {}",
                    if row.favorite { "★" } else { "" },
                    row.id,
                    row.name,
                    row.email,
                    row.phone,
                    row.city
                );
            }
            println!(
                "Page {} of {} ({} users)",
                index + 1,
                table.page_count().max(1),
                table.rows().len()
            );
        }
    }
    Ok(())
}

fn print_toasts(toasts: &ToastLog) {
    for Toast { level, message, .. } in toasts.drain() {
        eprintln!("[{}] {}", level, message);
    }
}
