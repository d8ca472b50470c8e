use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsdesk::app::AppContext;
use newsdesk::cli::{commands, Cli, Commands};
use newsdesk::config::Config;
use newsdesk::domain::HeadlinesQuery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if cli.mock {
        config.api.mock = true;
    }
    let ctx = AppContext::new(&config)?;

    match cli.command {
        Commands::Headlines(args) => {
            commands::show_headlines(&ctx, args.into()).await?;
        }
        Commands::Search(args) => {
            commands::search(&ctx, args.into()).await?;
        }
        Commands::Category {
            name,
            country,
            page,
        } => {
            let query = HeadlinesQuery {
                country: country.unwrap_or_else(|| config.defaults.country.clone()),
                page,
                page_size: config.defaults.page_size,
                ..Default::default()
            };
            commands::show_category(&ctx, &name, query).await?;
        }
        Commands::Related { id, limit } => {
            commands::show_related(&ctx, &id, limit).await?;
        }
        Commands::Bookmark { id } => {
            commands::toggle_bookmark(&ctx, &id).await?;
        }
        Commands::Like { id } => {
            commands::toggle_like(&ctx, &id).await?;
        }
        Commands::Bookmarks => {
            commands::list_bookmarks(&ctx)?;
        }
        Commands::Likes => {
            commands::list_likes(&ctx)?;
        }
        Commands::Comment {
            article_id,
            name,
            email,
            text,
        } => {
            commands::add_comment(&ctx, &article_id, name, email, text)?;
        }
        Commands::Comments { article_id } => {
            commands::list_comments(&ctx, &article_id)?;
        }
    }

    Ok(())
}
