//! Not-found pages.

use super::html_escape;

pub fn render_not_found(path: &str) -> String {
    format!(
        r#"<div class="empty-state">
    <h2>Page not found</h2>
    <p>Nothing lives at <code>{}</code>.</p>
    <a href="/" class="button-link">Back to the catalog</a>
</div>"#,
        html_escape(path)
    )
}

pub fn render_product_not_found() -> String {
    r#"<div class="empty-state">
    <h2>Product not found</h2>
    <p>This product may have been removed from the catalog.</p>
    <a href="/" class="button-link">Start Shopping</a>
</div>"#
        .to_string()
}
