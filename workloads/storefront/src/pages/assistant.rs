//! Assistant recommendations page.

use furnish_commerce::prelude::*;
use furnish_storefront::AssistantReply;

use super::{html_escape, render_product_card};

pub const ASSISTANT_APOLOGY: &str =
    "Sorry, I had trouble finding recommendations. Please try again.";

pub enum AssistantOutcome {
    Reply(AssistantReply),
    Failed,
}

pub fn render_assistant(query: &str, outcome: &AssistantOutcome, wishlist: &Wishlist) -> String {
    let body = match outcome {
        AssistantOutcome::Reply(reply) => {
            let message = if reply.message.is_empty() {
                String::new()
            } else {
                format!(
                    r#"<div class="assistant-message">{}</div>"#,
                    html_escape(&reply.message)
                )
            };
            let return_to = format!("/assistant?q={}", urlencoding::encode(query));
            let cards: String = reply
                .products
                .iter()
                .map(|p| render_product_card(p, wishlist.contains(&p.id), &return_to))
                .collect();
            let grid = if cards.is_empty() {
                String::new()
            } else {
                format!(r#"<div class="product-grid">{}</div>"#, cards)
            };
            format!("{}{}", message, grid)
        }
        AssistantOutcome::Failed => {
            format!(r#"<p class="assistant-error">{}</p>"#, ASSISTANT_APOLOGY)
        }
    };

    format!(
        r#"<section class="hero">
    <h1>AI Recommendations</h1>
    <p>Here are some product ideas based on your request.</p>
</section>
<section class="assistant" data-section="assistant">
    <p class="assistant-query">You asked: <q>{}</q></p>
    {}
</section>"#,
        html_escape(query),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_shows_apology() {
        let html = render_assistant("sofa", &AssistantOutcome::Failed, &Wishlist::default());
        assert!(html.contains(ASSISTANT_APOLOGY));
        assert!(html.contains("<q>sofa</q>"));
    }

    #[test]
    fn test_reply_renders_message_and_cards() {
        let product = Product {
            id: ProductId::from("12"),
            name: "Compact Loveseat".to_string(),
            category: Category::Sofas,
            price: 499.5,
            description: String::new(),
            image_url: String::new(),
            reviews: Vec::new(),
        };
        let reply = AssistantReply {
            document_id: "doc-1".to_string(),
            message: "Try this one.".to_string(),
            products: vec![product],
            conversation: Conversation::default(),
        };
        let html = render_assistant(
            "small sofa",
            &AssistantOutcome::Reply(reply),
            &Wishlist::default(),
        );
        assert!(html.contains(r#"<div class="assistant-message">Try this one.</div>"#));
        assert!(html.contains("Compact Loveseat"));
        assert!(html.contains(r#"value="/assistant?q=small%20sofa""#));
    }
}
