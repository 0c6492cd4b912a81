//! Search command

use anyhow::Result;
use aur_core::Method;

use super::{Context, execute, rpc_requests};
use crate::ui::Layout;

/// Run one search per term and print a summary line for each hit.
pub async fn search(ctx: &Context, terms: &[String]) -> Result<()> {
    let requests = rpc_requests(ctx, Method::Search, terms, Layout::Summary)?;
    execute(ctx, requests).await
}
