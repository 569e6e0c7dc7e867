//! Assistant command: ask for recommendations and wait for the reply.

use anyhow::{Context as _, Result};
use furnish_commerce::prelude::*;

use super::AssistArgs;
use crate::context::Context;

pub async fn run(args: AssistArgs, ctx: &Context) -> Result<()> {
    let query = args.query.join(" ");
    let storefront = ctx.storefront();

    let spinner = ctx.output.spinner("Finding recommendations...");
    let reply = storefront.assistant.ask(&query).await;
    spinner.finish_and_clear();
    let reply = reply.context("Sorry, I had trouble finding recommendations. Please try again.")?;

    ctx.output.debug(&format!("Conversation document: {}", reply.document_id));

    if ctx.output.is_json() {
        ctx.output.json(&reply);
        return Ok(());
    }

    ctx.output.header("AI Recommendations");
    if !reply.message.is_empty() {
        ctx.output.info(&reply.message);
    }
    if !reply.products.is_empty() {
        let wishlist = ctx.wishlist();
        let rows: Vec<&Product> = reply.products.iter().collect();
        ctx.output.products(&rows, wishlist.wishlist());
    }

    Ok(())
}
