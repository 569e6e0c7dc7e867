//! Product detail page with reviews and the product Q&A form.

use furnish_commerce::prelude::*;

use super::{html_escape, render_stars, render_wishlist_toggle};

/// Result of a question asked on the detail page.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionOutcome {
    Answered { question: String, answer: String },
    Failed { question: String, message: String },
}

pub fn render_product(
    product: &Product,
    wishlisted: bool,
    question: Option<&QuestionOutcome>,
) -> String {
    let return_to = format!("/product/{}", urlencoding::encode(product.id.as_str()));

    format!(
        r#"<nav class="breadcrumbs"><a href="/">Catalog</a> / {name}</nav>
<section class="product-detail" data-product-id="{id}">
    <div class="product-media">
        <img src="{image}" alt="{name}">
    </div>
    <div class="product-summary">
        <span class="category-badge">{category}</span>
        <h1>{name}</h1>
        <div class="product-price">{price}</div>
        <p class="product-description">{description}</p>
        {toggle}
    </div>
</section>
{advisor}
{reviews}"#,
        id = html_escape(product.id.as_str()),
        image = html_escape(product.image_or_placeholder()),
        name = html_escape(&product.name),
        category = html_escape(product.category.as_str()),
        price = product.display_price(),
        description = html_escape(&product.description),
        toggle = render_wishlist_toggle(&product.id, wishlisted, &return_to),
        advisor = render_advisor(&return_to, question),
        reviews = render_reviews(&product.reviews),
    )
}

fn render_advisor(action_base: &str, question: Option<&QuestionOutcome>) -> String {
    let (asked, outcome) = match question {
        Some(QuestionOutcome::Answered { question, answer }) => (
            question.as_str(),
            format!(r#"<div class="advisor-answer">{}</div>"#, html_escape(answer)),
        ),
        Some(QuestionOutcome::Failed { question, message }) => (
            question.as_str(),
            format!(r#"<p class="advisor-error">{}</p>"#, html_escape(message)),
        ),
        None => ("", String::new()),
    };

    format!(
        r#"<section class="advisor" data-section="advisor">
    <h2>Have a question?</h2>
    <form action="{}/ask" method="post">
        <textarea name="question" placeholder="Ask anything about this product..." required>{}</textarea>
        <button type="submit">Ask</button>
    </form>
    {}
</section>"#,
        action_base,
        html_escape(asked),
        outcome
    )
}

fn render_reviews(reviews: &[Review]) -> String {
    let body = if reviews.is_empty() {
        r#"<p class="no-reviews">No reviews yet.</p>"#.to_string()
    } else {
        reviews
            .iter()
            .map(|review| {
                format!(
                    r#"<article class="review" data-review-id="{}">
        <div class="review-header">
            {}
            <span class="review-author">by {}</span>
        </div>
        <p class="review-comment">{}</p>
    </article>"#,
                    review.id,
                    render_stars(review),
                    html_escape(&review.author),
                    html_escape(&review.comment)
                )
            })
            .collect()
    };

    format!(
        r#"<section class="reviews" data-section="reviews">
    <h2>Customer Reviews ({})</h2>
    {}
</section>"#,
        reviews.len(),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sofa(reviews: Vec<Review>) -> Product {
        Product {
            id: ProductId::from("12"),
            name: "Compact Loveseat".to_string(),
            category: Category::Sofas,
            price: 499.5,
            description: "Two seats & a throw".to_string(),
            image_url: "https://cdn.test/loveseat.jpg".to_string(),
            reviews,
        }
    }

    #[test]
    fn test_detail_without_reviews() {
        let html = render_product(&sofa(Vec::new()), false, None);
        assert!(html.contains("<h1>Compact Loveseat</h1>"));
        assert!(html.contains(r#"<span class="category-badge">Sofas</span>"#));
        assert!(html.contains("$499.50"));
        assert!(html.contains("Two seats &amp; a throw"));
        assert!(html.contains("Customer Reviews (0)"));
        assert!(html.contains("No reviews yet."));
        assert!(html.contains(r#"action="/product/12/ask""#));
    }

    #[test]
    fn test_reviews_render_author_and_stars() {
        let review = Review {
            id: 3,
            author: "Robin".to_string(),
            rating: 4.0,
            comment: "Comfy".to_string(),
        };
        let html = render_product(&sofa(vec![review]), true, None);
        assert!(html.contains("Customer Reviews (1)"));
        assert!(html.contains("by Robin"));
        assert_eq!(html.matches("star full").count(), 4);
        assert!(html.contains("Remove from wishlist"));
    }

    #[test]
    fn test_question_outcomes() {
        let answered = QuestionOutcome::Answered {
            question: "Is it <big>?".to_string(),
            answer: "It seats two.".to_string(),
        };
        let html = render_product(&sofa(Vec::new()), false, Some(&answered));
        assert!(html.contains("Is it &lt;big&gt;?</textarea>"));
        assert!(html.contains(r#"<div class="advisor-answer">It seats two.</div>"#));

        let failed = QuestionOutcome::Failed {
            question: "Hm".to_string(),
            message: "Please enter a question.".to_string(),
        };
        let html = render_product(&sofa(Vec::new()), false, Some(&failed));
        assert!(html.contains(r#"<p class="advisor-error">Please enter a question.</p>"#));
    }
}
