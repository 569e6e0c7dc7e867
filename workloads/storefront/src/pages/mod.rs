//! Page rendering.
//!
//! Every page is a plain `String` of HTML. [`render_layout`] wraps a page
//! body in the shared shell: header with the assistant form and wishlist
//! badge, optional notice banner, and footer.

mod assistant;
mod catalog;
mod errors;
mod product;
mod wishlist;

pub use assistant::{render_assistant, AssistantOutcome, ASSISTANT_APOLOGY};
pub use catalog::{render_catalog, CatalogView};
pub use errors::{render_not_found, render_product_not_found};
pub use product::{render_product, QuestionOutcome};
pub use wishlist::render_wishlist;

use chrono::Datelike;
use furnish_commerce::prelude::*;

/// Per-request values every page shows.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub wishlist_count: usize,
    pub assistant_query: String,
    pub notice: Option<String>,
}

pub fn render_layout(title: &str, chrome: &Chrome, content: &str) -> String {
    let badge = if chrome.wishlist_count > 0 {
        format!(
            r#"<span class="wishlist-badge">{}</span>"#,
            chrome.wishlist_count
        )
    } else {
        String::new()
    };

    let notice = chrome
        .notice
        .as_deref()
        .map(|text| format!(r#"<div class="notice" role="status">{}</div>"#, html_escape(text)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} | FurnishAI</title>
    <style>{styles}</style>
</head>
<body>
<header class="site-header">
    <a href="/" class="logo">FurnishAI</a>
    <form class="assistant-form" action="/assistant" method="get">
        <input type="search" name="q" value="{query}" placeholder="Ask AI for recommendations..." aria-label="Ask AI for recommendations">
        <button type="submit">Ask</button>
    </form>
    <a href="/wishlist" class="wishlist-link" aria-label="Wishlist">&hearts;{badge}</a>
</header>
{notice}
<main class="container">
{content}
</main>
<footer class="site-footer">
    <p>&copy; {year} FurnishAI. All rights reserved.</p>
</footer>
</body>
</html>"#,
        title = html_escape(title),
        styles = STYLES,
        query = html_escape(&chrome.assistant_query),
        badge = badge,
        notice = notice,
        content = content,
        year = chrono::Utc::now().year(),
    )
}

/// Product card linking to the detail page, with a wishlist toggle.
pub fn render_product_card(product: &Product, wishlisted: bool, return_to: &str) -> String {
    format!(
        r#"<article class="product-card" data-product-id="{id}">
    <a href="/product/{href}" class="product-image">
        <img src="{image}" alt="{name}" loading="lazy">
    </a>
    <div class="product-info">
        <a href="/product/{href}" class="product-name">{name}</a>
        <div class="product-price">{price}</div>
    </div>
    {toggle}
</article>"#,
        id = html_escape(product.id.as_str()),
        href = urlencoding::encode(product.id.as_str()),
        image = html_escape(product.image_or_placeholder()),
        name = html_escape(&product.name),
        price = product.display_price(),
        toggle = render_wishlist_toggle(&product.id, wishlisted, return_to),
    )
}

/// Heart button posting to `/wishlist/toggle`.
pub fn render_wishlist_toggle(id: &ProductId, wishlisted: bool, return_to: &str) -> String {
    let (class, label, glyph) = if wishlisted {
        ("wishlist-toggle active", "Remove from wishlist", "&hearts;")
    } else {
        ("wishlist-toggle", "Add to wishlist", "&#9825;")
    };

    format!(
        r#"<form class="wishlist-form" action="/wishlist/toggle" method="post">
        <input type="hidden" name="product_id" value="{}">
        <input type="hidden" name="return_to" value="{}">
        <button type="submit" class="{}" aria-label="{}">{}</button>
    </form>"#,
        html_escape(id.as_str()),
        html_escape(return_to),
        class,
        label,
        glyph
    )
}

pub fn render_stars(review: &Review) -> String {
    let filled = review.filled_stars();

    let mut html = String::from(r#"<span class="stars" aria-hidden="true">"#);
    for i in 0..5 {
        if i < filled {
            html.push_str(r#"<span class="star full">&#9733;</span>"#);
        } else {
            html.push_str(r#"<span class="star empty">&#9734;</span>"#);
        }
    }
    html.push_str("</span>");
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLES: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, sans-serif; color: #1f2933; background: #faf9f7; line-height: 1.5; }
a { color: inherit; text-decoration: none; }
.site-header { display: flex; gap: 1.5rem; align-items: center; padding: 1rem 2rem; background: #fff; border-bottom: 1px solid #e5e2dc; position: sticky; top: 0; }
.logo { font-size: 1.5rem; font-weight: 700; color: #7c5c3b; }
.assistant-form { flex: 1; display: flex; gap: 0.5rem; max-width: 32rem; }
.assistant-form input { flex: 1; padding: 0.5rem 0.75rem; border: 1px solid #d4cfc7; border-radius: 999px; }
button { cursor: pointer; border: none; border-radius: 6px; padding: 0.5rem 1rem; background: #7c5c3b; color: #fff; }
.wishlist-link { position: relative; font-size: 1.5rem; color: #b4232c; }
.wishlist-badge { position: absolute; top: -0.4rem; right: -0.8rem; font-size: 0.7rem; background: #b4232c; color: #fff; border-radius: 999px; padding: 0 0.4rem; }
.notice { background: #e6f4ea; color: #1e4620; padding: 0.75rem 2rem; }
.container { max-width: 72rem; margin: 0 auto; padding: 2rem; }
.hero { text-align: center; margin-bottom: 2rem; }
.hero h1 { font-size: 2.5rem; }
.hero p { color: #616e7c; }
.filters { display: flex; flex-wrap: wrap; gap: 1rem; justify-content: space-between; margin-bottom: 2rem; }
.search-form input { padding: 0.5rem 0.75rem; border: 1px solid #d4cfc7; border-radius: 6px; min-width: 16rem; }
.category-buttons { display: flex; gap: 0.5rem; }
.category-button { padding: 0.4rem 0.9rem; border: 1px solid #d4cfc7; border-radius: 999px; }
.category-button.active { background: #7c5c3b; color: #fff; border-color: #7c5c3b; }
.product-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(14rem, 1fr)); gap: 1.5rem; }
.product-card { position: relative; background: #fff; border-radius: 8px; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.product-image img { width: 100%; aspect-ratio: 4 / 3; object-fit: cover; display: block; }
.product-info { padding: 0.75rem 1rem 1rem; }
.product-name { font-weight: 600; }
.product-price { color: #7c5c3b; font-weight: 700; }
.wishlist-form { position: absolute; top: 0.5rem; right: 0.5rem; }
.wishlist-toggle { background: rgba(255,255,255,0.9); color: #b4232c; border-radius: 999px; font-size: 1.2rem; padding: 0.2rem 0.55rem; }
.empty-state { text-align: center; padding: 4rem 1rem; color: #616e7c; }
.empty-state h2 { color: #1f2933; margin-bottom: 0.5rem; }
.button-link { display: inline-block; margin-top: 1rem; padding: 0.5rem 1rem; background: #7c5c3b; color: #fff; border-radius: 6px; }
.pagination { display: flex; gap: 0.5rem; justify-content: center; align-items: center; margin-top: 2rem; }
.pagination-page { padding: 0.3rem 0.7rem; border-radius: 4px; }
.pagination-page.current { background: #7c5c3b; color: #fff; }
.disabled { color: #9aa5b1; }
.product-detail { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.product-detail img { width: 100%; border-radius: 8px; }
.category-badge { display: inline-block; font-size: 0.8rem; padding: 0.1rem 0.6rem; border-radius: 999px; background: #efe8df; }
.product-detail .wishlist-form { position: static; margin-top: 1rem; }
.advisor { margin-top: 2rem; }
.advisor textarea { width: 100%; min-height: 5rem; padding: 0.5rem; border: 1px solid #d4cfc7; border-radius: 6px; }
.advisor-answer { margin-top: 1rem; padding: 1rem; background: #fff; border-left: 4px solid #7c5c3b; white-space: pre-wrap; }
.advisor-error, .assistant-error { color: #b4232c; }
.reviews { margin-top: 3rem; }
.review { padding: 1rem 0; border-bottom: 1px solid #e5e2dc; }
.star.full { color: #e0a100; }
.star.empty { color: #c6c1b9; }
.assistant-message { white-space: pre-wrap; background: #fff; padding: 1rem; border-radius: 8px; margin-bottom: 1.5rem; }
.site-footer { text-align: center; padding: 2rem; color: #9aa5b1; }
"#;
