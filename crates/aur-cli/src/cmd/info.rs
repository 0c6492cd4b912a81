//! Info command

use anyhow::Result;
use aur_core::Method;

use super::{Context, execute, rpc_requests};
use crate::ui::Layout;

/// Show full details for packages looked up with `method`
/// (info, multiinfo or msearch).
pub async fn info(ctx: &Context, method: Method, terms: &[String]) -> Result<()> {
    let requests = rpc_requests(ctx, method, terms, Layout::Long)?;
    execute(ctx, requests).await
}
