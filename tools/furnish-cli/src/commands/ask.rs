//! Product question command.

use anyhow::{bail, Context as _, Result};
use furnish_commerce::prelude::*;
use serde_json::json;

use super::AskArgs;
use crate::context::Context;

pub async fn run(args: AskArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::from(args.id);
    let question = args.question.join(" ");
    let storefront = ctx.storefront();

    let Some(product) = storefront.catalog.get_product(&id).await else {
        bail!("Product not found: {}", id);
    };

    let spinner = ctx.output.spinner(&format!("Asking about {}...", product.name));
    let answer = storefront.advisor.answer(&product.name, &question).await;
    spinner.finish_and_clear();
    let answer = answer.context("Failed to answer the question")?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "product_id": product.id,
            "question": question,
            "answer": answer,
        }));
    } else {
        ctx.output.header(&product.name);
        ctx.output.info(&answer);
    }

    Ok(())
}
