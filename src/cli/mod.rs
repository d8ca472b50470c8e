pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::news::{HeadlineFilters, SearchFilters};

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Browse, bookmark and discuss news headlines", long_about = None)]
pub struct Cli {
    /// Serve built-in sample articles instead of calling the API
    #[arg(long, global = true)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show top headlines
    Headlines(HeadlineArgs),
    /// Search all articles
    Search(SearchArgs),
    /// Headlines from one category, served through the request cache
    Category {
        name: String,
        #[arg(long)]
        country: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Headlines sharing a category with the given article
    Related {
        /// Article id as shown by `headlines`
        id: String,
        #[arg(short, long, default_value_t = 3)]
        limit: usize,
    },
    /// Bookmark or un-bookmark a headline
    Bookmark {
        /// Article id as shown by `headlines`
        id: String,
    },
    /// Like or unlike a headline
    Like {
        /// Article id as shown by `headlines`
        id: String,
    },
    /// List bookmarked articles
    Bookmarks,
    /// List liked articles
    Likes,
    /// Comment on an article
    Comment {
        article_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        text: String,
    },
    /// Show comments on an article
    Comments { article_id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct HeadlineArgs {
    #[arg(long)]
    pub country: Option<String>,
    #[arg(short, long)]
    pub category: Option<String>,
    #[arg(long)]
    pub sources: Option<String>,
    /// Keywords to match
    #[arg(short, long)]
    pub query: Option<String>,
    #[arg(short, long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl From<HeadlineArgs> for HeadlineFilters {
    fn from(args: HeadlineArgs) -> Self {
        HeadlineFilters {
            country: args.country,
            query: args.query,
            category: args.category,
            sources: args.sources,
            page: args.page,
            page_size: args.page_size,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    pub query: String,
    /// Restrict matching to title, description or content
    #[arg(long)]
    pub search_in: Option<String>,
    /// Oldest publication date (ISO 8601)
    #[arg(long)]
    pub from: Option<String>,
    /// Newest publication date (ISO 8601)
    #[arg(long)]
    pub to: Option<String>,
    #[arg(short, long)]
    pub language: Option<String>,
    /// relevancy, popularity or publishedAt
    #[arg(long)]
    pub sort_by: Option<String>,
    #[arg(long)]
    pub domains: Option<String>,
    #[arg(long)]
    pub exclude_domains: Option<String>,
    #[arg(short, long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl From<SearchArgs> for SearchFilters {
    fn from(args: SearchArgs) -> Self {
        SearchFilters {
            query: Some(args.query),
            search_in: args.search_in,
            from: args.from,
            to: args.to,
            language: args.language,
            sort_by: args.sort_by,
            domains: args.domains,
            exclude_domains: args.exclude_domains,
            page: args.page,
            page_size: args.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headlines_flags() {
        let cli = Cli::try_parse_from(["newsdesk", "--mock", "headlines", "-c", "sports", "-p", "2"])
            .unwrap();
        assert!(cli.mock);
        let Commands::Headlines(args) = cli.command else {
            panic!("expected headlines");
        };
        let filters = HeadlineFilters::from(args);
        assert_eq!(filters.category.as_deref(), Some("sports"));
        assert_eq!(filters.page, Some(2));
        assert!(filters.country.is_none());
    }

    #[test]
    fn test_parse_comment() {
        let cli = Cli::try_parse_from([
            "newsdesk",
            "comment",
            "42",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "Nice read",
        ])
        .unwrap();
        let Commands::Comment {
            article_id, text, ..
        } = cli.command
        else {
            panic!("expected comment");
        };
        assert_eq!(article_id, "42");
        assert_eq!(text, "Nice read");
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["newsdesk", "search"]).is_err());
    }
}
