//! Catalog commands.

use anyhow::{bail, Context as _, Result};
use furnish_commerce::prelude::*;
use serde_json::json;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;

pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List {
            page,
            page_size,
            query,
            category,
        } => {
            let filter = CatalogFilter::new(query.unwrap_or_default().trim())
                .with_category_filter(CategoryFilter::parse(category.as_deref().unwrap_or("")));
            list(ctx, &filter, page, page_size).await
        }
        CatalogCommand::Show { id } => show(ctx, &ProductId::from(id)).await,
    }
}

async fn list(
    ctx: &Context,
    filter: &CatalogFilter,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let storefront = ctx.storefront();
    let spinner = ctx.output.spinner("Loading catalog...");
    let all = storefront.catalog.all_products().await;
    spinner.finish_and_clear();
    let all = all.context("Failed to load the catalog")?;

    let wishlist = ctx.wishlist();

    let size = page_size.unwrap_or_else(|| storefront.catalog.page_size());
    let Page {
        items: products,
        current_page,
        total_pages,
    } = select(&all, filter, page, size);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "products": products,
            "current_page": current_page,
            "total_pages": total_pages,
        }));
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.warn("No Products Found");
        ctx.output
            .info("Try adjusting your search or filters to find what you're looking for.");
        return Ok(());
    }

    ctx.output.header(&format!("Our Collection ({})", filter.category));
    let rows: Vec<&Product> = products.iter().collect();
    ctx.output.products(&rows, wishlist.wishlist());

    if filter.is_empty() && total_pages > 1 {
        ctx.output.info(&format!("Page {} of {}", current_page, total_pages));
    }

    Ok(())
}

/// Filtered views show every match on one page; the plain catalog is paginated.
fn select(all: &[Product], filter: &CatalogFilter, page: usize, page_size: usize) -> Page<Product> {
    if filter.is_empty() {
        return paginate(all, page, page_size);
    }
    Page {
        items: filter.apply(all).into_iter().cloned().collect(),
        total_pages: 1,
        current_page: 1,
    }
}

async fn show(ctx: &Context, id: &ProductId) -> Result<()> {
    let storefront = ctx.storefront();
    let Some(product) = storefront.catalog.get_product(id).await else {
        bail!("Product not found: {}", id);
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    let wishlist = ctx.wishlist();

    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("category", product.category.as_str());
    ctx.output.kv("price", &product.display_price());
    ctx.output.kv("image", product.image_or_placeholder());
    ctx.output
        .kv("wishlisted", &wishlist.contains(&product.id).to_string());
    if !product.description.is_empty() {
        ctx.output.info("");
        ctx.output.info(&product.description);
    }

    ctx.output
        .header(&format!("Customer Reviews ({})", product.reviews.len()));
    if product.reviews.is_empty() {
        ctx.output.info("No reviews yet.");
    }
    if let Some(average) = product.average_rating() {
        ctx.output.kv("average", &format!("{:.1}", average));
    }
    for review in &product.reviews {
        ctx.output.list_item(&format!(
            "{} by {}: {}",
            review.render_stars(),
            review.author,
            review.comment
        ));
    }

    Ok(())
}
