//! Command implementations
//!
//! Each action builds its requests, hands them to one client and lets the
//! completion callbacks do the printing.

pub mod download;
pub mod info;
pub mod search;

use std::ops::ControlFlow;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use aur_core::{Client, Config, Method, Request, packages_from_json};
use crossterm::style::Stylize;

use crate::Cli;
use crate::ui::Layout;

/// State shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub debug: bool,
    pub format: Option<String>,
}

impl Context {
    pub fn new(cli: &Cli) -> Self {
        Self {
            config: cli.config(),
            debug: cli.debug,
            format: cli.format.clone(),
        }
    }
}

/// Queue `requests` on a fresh client and run them to completion.
pub(crate) async fn execute(ctx: &Context, requests: Vec<Request>) -> Result<()> {
    let mut client = Client::new(ctx.config.clone()).context("Failed to set up HTTP client")?;

    for request in requests {
        client.queue(request).context("Failed to queue request")?;
    }

    client.run().await.context("Request run failed")?;
    Ok(())
}

/// One request per term, or a single request carrying every term for
/// multiinfo. Each prints its results with `layout`.
pub(crate) fn rpc_requests(
    ctx: &Context,
    method: Method,
    terms: &[String],
    layout: Layout,
) -> Result<Vec<Request>> {
    let layout = Rc::new(layout.or_custom(ctx.format.as_deref()));
    let groups: Vec<&[String]> = if method == Method::MultiInfo {
        vec![terms]
    } else {
        terms.chunks(1).collect()
    };

    groups
        .into_iter()
        .map(|group| -> Result<Request> {
            let request = Request::new(method, print_results(Rc::clone(&layout)))?;
            for term in group {
                request.append_arg(term)?;
            }
            request.set_debug(ctx.debug);
            Ok(request)
        })
        .collect()
}

/// Completion callback that decodes an RPC response and prints every
/// package. Failures are reported and the run carries on.
fn print_results(
    layout: Rc<Layout>,
) -> impl FnOnce(&mut Client, Request, Vec<u8>) -> ControlFlow<()> + 'static {
    move |_client: &mut Client, request: Request, body: Vec<u8>| {
        match packages_from_json(&body) {
            Ok(packages) if packages.is_empty() => {
                eprintln!(
                    "{} no results for {}",
                    "error:".red().bold(),
                    request.args().join(" ")
                );
            }
            Ok(packages) => {
                for pkg in &packages {
                    print!("{}", layout.render(pkg));
                }
            }
            Err(e) => {
                eprintln!(
                    "{} failed to decode response for {}: {e}",
                    "error:".red().bold(),
                    request.args().join(" ")
                );
            }
        }
        ControlFlow::Continue(())
    }
}
