use html_escape::decode_html_entities;

use crate::app::{AppContext, NewsError, Result};
use crate::domain::{Article, HeadlinesQuery, NewComment, SavedArticle};
use crate::news::{HeadlineFilters, SearchFilters};
use crate::store::SavedArticlesStore;

pub async fn show_headlines(ctx: &AppContext, filters: HeadlineFilters) -> Result<()> {
    ctx.news.fetch_top_headlines(filters).await;
    if let Some(message) = ctx.news.error() {
        return Err(NewsError::Other(message));
    }

    let page = ctx.news.top_headlines();
    let filters = ctx.news.filters();
    if page.articles.is_empty() {
        println!("No headlines");
        return Ok(());
    }

    for article in &page.articles {
        print_article(ctx, article);
    }
    println!(
        "Page {} of {} ({} results)",
        filters.page,
        ctx.news.total_pages(),
        page.total_results
    );
    Ok(())
}

pub async fn search(ctx: &AppContext, filters: SearchFilters) -> Result<()> {
    ctx.news.search_articles(filters).await;
    if let Some(message) = ctx.news.error() {
        return Err(NewsError::Other(message));
    }

    let page = ctx.news.search_results();
    if page.articles.is_empty() {
        println!("No articles found");
        return Ok(());
    }

    for article in &page.articles {
        print_article(ctx, article);
    }
    println!(
        "{} of {} results, {} pages",
        page.articles.len(),
        page.total_results,
        ctx.news.search_total_pages()
    );
    Ok(())
}

pub async fn show_category(ctx: &AppContext, category: &str, query: HeadlinesQuery) -> Result<()> {
    let page = ctx.cache.news_by_category(category, &query).await?;
    if page.articles.is_empty() {
        println!("No headlines in {}", category);
        return Ok(());
    }

    for article in &page.articles {
        print_article(ctx, article);
    }
    Ok(())
}

pub async fn show_related(ctx: &AppContext, id: &str, limit: usize) -> Result<()> {
    let article = find_headline(ctx, id).await?;
    let related = ctx.cache.related_articles(&article, limit).await?;

    println!("Related to: {}", decode_html_entities(article.display_title()));
    if related.is_empty() {
        println!("  nothing related");
    }
    for article in &related {
        print_article(ctx, article);
    }
    Ok(())
}

pub async fn toggle_bookmark(ctx: &AppContext, id: &str) -> Result<()> {
    let saved = toggle(ctx, &ctx.favorites, id).await?;
    println!("{}", if saved { "Bookmarked" } else { "Removed bookmark" });
    Ok(())
}

pub async fn toggle_like(ctx: &AppContext, id: &str) -> Result<()> {
    let liked = toggle(ctx, &ctx.likes, id).await?;
    println!("{}", if liked { "Liked" } else { "Unliked" });
    Ok(())
}

/// Saved articles may have dropped out of the headlines, so a saved id is
/// removed without looking it up.
async fn toggle(ctx: &AppContext, store: &SavedArticlesStore, id: &str) -> Result<bool> {
    if store.contains(id) {
        store.remove(id)?;
        return Ok(false);
    }
    let article = find_headline(ctx, id).await?;
    store.toggle(&article)
}

async fn find_headline(ctx: &AppContext, id: &str) -> Result<Article> {
    if !ctx.news.has_headlines() {
        ctx.news.fetch_top_headlines(HeadlineFilters::default()).await;
        if let Some(message) = ctx.news.error() {
            return Err(NewsError::Other(message));
        }
    }
    ctx.news
        .find(id)
        .ok_or_else(|| NewsError::ArticleNotFound(id.to_string()))
}

pub fn list_bookmarks(ctx: &AppContext) -> Result<()> {
    list_saved(&ctx.favorites.items(), "No bookmarks");
    Ok(())
}

pub fn list_likes(ctx: &AppContext) -> Result<()> {
    list_saved(&ctx.likes.items(), "No liked articles");
    Ok(())
}

fn list_saved(items: &[SavedArticle], empty: &str) {
    if items.is_empty() {
        println!("{}", empty);
        return;
    }
    for item in items {
        println!("[{}] {}", item.category, decode_html_entities(item.display_title()));
        println!("    id: {}", item.id);
        if let Some(url) = &item.url {
            println!("    {}", url);
        }
    }
}

pub fn add_comment(
    ctx: &AppContext,
    article_id: &str,
    name: String,
    email: String,
    text: String,
) -> Result<()> {
    let comment = ctx.comments.add(
        article_id,
        NewComment {
            name,
            email,
            comment: text,
            timestamp: None,
        },
    )?;
    println!("Added comment {}", comment.id);
    Ok(())
}

pub fn list_comments(ctx: &AppContext, article_id: &str) -> Result<()> {
    let comments = ctx.comments.for_article(article_id);
    if comments.is_empty() {
        println!("No comments");
        return Ok(());
    }

    for comment in &comments {
        println!(
            "{} <{}> {}",
            comment.name,
            comment.email,
            comment.timestamp.format("%Y-%m-%d %H:%M")
        );
        println!("    {}", comment.comment);
    }
    println!("{} comments", comments.len());
    Ok(())
}

fn print_article(ctx: &AppContext, article: &Article) {
    let id = article.key().unwrap_or_default();
    let mut marks = String::new();
    if ctx.favorites.contains(id) {
        marks.push('*');
    }
    if ctx.likes.contains(id) {
        marks.push('+');
    }
    let comments = ctx.comments.count_for_article(id);

    println!(
        "{:2} {} ({})",
        marks,
        decode_html_entities(article.display_title()),
        article.source_name()
    );
    if let Some(description) = article.description.as_deref().filter(|d| !d.is_empty()) {
        println!("    {}", decode_html_entities(description));
    }
    if comments > 0 {
        println!("    id: {}  [{} comments]", id, comments);
    } else {
        println!("    id: {}", id);
    }
}
