//! Wishlist page.

use furnish_commerce::prelude::*;

use super::render_product_card;

pub fn render_wishlist(products: &[Product]) -> String {
    let body = if products.is_empty() {
        r#"<div class="empty-state">
        <h2>Your wishlist is empty</h2>
        <p>Looks like you haven't added any items yet.</p>
        <a href="/" class="button-link">Start Shopping</a>
    </div>"#
            .to_string()
    } else {
        let cards: String = products
            .iter()
            .map(|p| render_product_card(p, true, "/wishlist"))
            .collect();
        format!(r#"<div class="product-grid">{}</div>"#, cards)
    };

    format!(
        r#"<section class="hero">
    <h1>Your Wishlist</h1>
    <p>Your favorite items, all in one place.</p>
</section>
<section class="wishlist" data-section="wishlist">
    {}
</section>"#,
        body
    )
}
