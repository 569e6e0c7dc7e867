//! Wishlist commands.

use anyhow::Result;
use furnish_commerce::prelude::*;

use super::{WishlistArgs, WishlistCommand};
use crate::context::Context;

pub async fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    let mut wishlist = ctx.wishlist();
    ctx.output
        .debug(&format!("Wishlist file: {}", wishlist.storage().path().display()));

    match args.command {
        WishlistCommand::List => list(ctx, &wishlist).await,
        WishlistCommand::Add { id } => {
            if wishlist.add(ProductId::from(id)) {
                report(ctx, &wishlist, WishlistChange::Added.notice());
            } else {
                report(ctx, &wishlist, "Already in your wishlist.");
            }
            Ok(())
        }
        WishlistCommand::Remove { id } => {
            if wishlist.remove(&ProductId::from(id)) {
                report(ctx, &wishlist, WishlistChange::Removed.notice());
            } else {
                report(ctx, &wishlist, "Not in your wishlist.");
            }
            Ok(())
        }
        WishlistCommand::Toggle { id } => {
            let change = wishlist.toggle(ProductId::from(id));
            report(ctx, &wishlist, change.notice());
            Ok(())
        }
    }
}

fn report<S: WishlistStorage>(ctx: &Context, wishlist: &WishlistStore<S>, notice: &str) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "notice": notice,
            "wishlist": wishlist.ids(),
        }));
    } else {
        ctx.output.success(notice);
    }
}

async fn list<S: WishlistStorage>(ctx: &Context, wishlist: &WishlistStore<S>) -> Result<()> {
    if wishlist.is_empty() {
        if ctx.output.is_json() {
            ctx.output.json(&Vec::<Product>::new());
        } else {
            ctx.output.warn("Your wishlist is empty");
            ctx.output.info("Looks like you haven't added any items yet.");
        }
        return Ok(());
    }

    let products = ctx.storefront().catalog.wishlisted(wishlist.wishlist()).await;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Your Wishlist");
    if products.len() < wishlist.len() {
        ctx.output.warn(&format!(
            "{} of {} wishlisted products are not in the catalog",
            wishlist.len() - products.len(),
            wishlist.len()
        ));
    }
    let rows: Vec<&Product> = products.iter().collect();
    ctx.output.products(&rows, wishlist.wishlist());

    Ok(())
}
