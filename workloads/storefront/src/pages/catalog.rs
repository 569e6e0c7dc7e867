//! Catalog page - search box, category buttons, product grid, pagination.

use furnish_commerce::prelude::*;

use super::{html_escape, render_product_card};

/// What the catalog page shows.
pub struct CatalogView<'a> {
    pub products: Vec<&'a Product>,
    pub wishlist: &'a Wishlist,
    pub filter: &'a CatalogFilter,
    /// Present only for the unfiltered view.
    pub pagination: Option<Page<()>>,
    /// Path of this page, used as the toggle return target.
    pub return_to: &'a str,
}

pub fn render_catalog(view: &CatalogView<'_>) -> String {
    let grid = if view.products.is_empty() {
        r#"<div class="empty-state">
        <h2>No Products Found</h2>
        <p>Try adjusting your search or filters to find what you're looking for.</p>
    </div>"#
            .to_string()
    } else {
        let cards: String = view
            .products
            .iter()
            .map(|p| render_product_card(p, view.wishlist.contains(&p.id), view.return_to))
            .collect();
        format!(r#"<div class="product-grid">{}</div>"#, cards)
    };

    let pagination = view
        .pagination
        .as_ref()
        .map(render_pagination)
        .unwrap_or_default();

    format!(
        r#"<section class="hero">
    <h1>Our Collection</h1>
    <p>Explore our curated selection of modern furniture, designed to bring style and comfort to your home.</p>
</section>
<section class="filters">
    {search}
    {categories}
</section>
<section class="catalog" data-section="results">
    {grid}
    {pagination}
</section>"#,
        search = render_search(view.filter),
        categories = render_categories(view.filter),
        grid = grid,
        pagination = pagination,
    )
}

fn render_search(filter: &CatalogFilter) -> String {
    let category = match &filter.category {
        CategoryFilter::All => String::new(),
        CategoryFilter::Only(category) => format!(
            r#"<input type="hidden" name="category" value="{}">"#,
            html_escape(category.as_str())
        ),
    };

    format!(
        r#"<form class="search-form" action="/" method="get">
        <input type="search" name="q" value="{}" placeholder="Search for products..." aria-label="Search for products">
        {}
    </form>"#,
        html_escape(&filter.term),
        category
    )
}

fn render_categories(filter: &CatalogFilter) -> String {
    let buttons: String = CategoryFilter::options()
        .into_iter()
        .map(|option| {
            let mut href = String::from("/");
            let mut params = Vec::new();
            if !filter.term.is_empty() {
                params.push(format!("q={}", urlencoding::encode(&filter.term)));
            }
            if let CategoryFilter::Only(category) = &option {
                params.push(format!("category={}", urlencoding::encode(category.as_str())));
            }
            if !params.is_empty() {
                href.push('?');
                href.push_str(&params.join("&"));
            }

            let class = if option == filter.category {
                "category-button active"
            } else {
                "category-button"
            };
            format!(
                r#"<a href="{}" class="{}">{}</a>"#,
                html_escape(&href),
                class,
                html_escape(option.label())
            )
        })
        .collect();

    format!(r#"<nav class="category-buttons" aria-label="Categories">{}</nav>"#, buttons)
}

fn render_pagination(page: &Page<()>) -> String {
    if page.total_pages <= 1 {
        return String::new();
    }

    let pages_html: String = page
        .page_numbers(7)
        .into_iter()
        .map(|n| {
            if n == page.current_page {
                format!(
                    r#"<span class="pagination-page current" aria-current="page">{}</span>"#,
                    n
                )
            } else {
                format!(r#"<a href="/?page={}" class="pagination-page">{}</a>"#, n, n)
            }
        })
        .collect();

    let prev_link = if page.has_prev() {
        // Past the end, Prev lands on the last real page.
        format!(
            r#"<a href="/?page={}" class="pagination-prev" aria-label="Previous page">&larr; Prev</a>"#,
            (page.current_page - 1).min(page.total_pages)
        )
    } else {
        r#"<span class="pagination-prev disabled">&larr; Prev</span>"#.to_string()
    };

    let next_link = if page.has_next() {
        format!(
            r#"<a href="/?page={}" class="pagination-next" aria-label="Next page">Next &rarr;</a>"#,
            page.current_page + 1
        )
    } else {
        r#"<span class="pagination-next disabled">Next &rarr;</span>"#.to_string()
    };

    format!(
        r#"<nav class="pagination" aria-label="Catalog pagination">
    {}
    <div class="pagination-pages">{}</div>
    {}
</nav>"#,
        prev_link, pages_html, next_link
    )
}
