//! Download command
//!
//! A multiinfo lookup resolves every package to its snapshot path; its
//! callback then queues one download per package on the same client, and
//! each download's callback unpacks the tarball into the destination.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;
use aur_core::{Client, Method, Request, packages_from_json};
use crossterm::style::Stylize;
use tracing::debug;

use super::{Context, execute};
use crate::io::extract::extract_archive;

/// Download and extract snapshots for `packages` into `dest`.
pub async fn download(ctx: &Context, packages: &[String], dest: PathBuf) -> Result<()> {
    let dest = Rc::new(dest);
    let debug = ctx.debug;

    let lookup = Request::new(
        Method::MultiInfo,
        move |client: &mut Client, _request: Request, body: Vec<u8>| {
            queue_downloads(client, &body, &dest, debug)
        },
    )?;
    for name in packages {
        lookup.append_arg(name)?;
    }
    lookup.set_debug(debug);

    execute(ctx, vec![lookup]).await
}

fn queue_downloads(client: &mut Client, body: &[u8], dest: &Rc<PathBuf>, debug: bool) -> ControlFlow<()> {
    let packages = match packages_from_json(body) {
        Ok(packages) => packages,
        Err(e) => {
            eprintln!("{} failed to decode package lookup: {e}", "error:".red().bold());
            return ControlFlow::Break(());
        }
    };

    if packages.is_empty() {
        eprintln!("{} no packages found", "error:".red().bold());
        return ControlFlow::Continue(());
    }

    for pkg in &packages {
        let Some(urlpath) = pkg.urlpath.as_deref() else {
            eprintln!("{} {} has no snapshot", "error:".red().bold(), pkg.name());
            continue;
        };

        let dest = Rc::clone(dest);
        let queued = Request::new(
            Method::Download,
            move |_: &mut Client, request: Request, body: Vec<u8>| {
                extract_snapshot(&request, &body, &dest)
            },
        )
        .and_then(|request| {
            request.append_arg(urlpath)?;
            request.set_debug(debug);
            request.set_userdata(pkg.name().to_string());
            client.queue(request)
        });

        if let Err(e) = queued {
            eprintln!("{} cannot download {}: {e}", "error:".red().bold(), pkg.name());
            return ControlFlow::Break(());
        }
        debug!(package = pkg.name(), urlpath, "queued snapshot download");
    }

    ControlFlow::Continue(())
}

fn extract_snapshot(request: &Request, body: &[u8], dest: &Path) -> ControlFlow<()> {
    let name = request
        .userdata::<String>()
        .map_or_else(|| "snapshot".to_string(), |name| name.to_string());

    match request.http_status() {
        Some(status) if (200..300).contains(&status) => {}
        Some(status) => {
            eprintln!("{} {name}: HTTP {status}", "error:".red().bold());
            return ControlFlow::Break(());
        }
        None => {
            eprintln!("{} {name}: download failed", "error:".red().bold());
            return ControlFlow::Break(());
        }
    }

    match extract_archive(body, dest) {
        Ok(files) => {
            println!(
                "{} {} ({} files) -> {}",
                "::".blue().bold(),
                name.as_str().white().bold(),
                files.len(),
                dest.display()
            );
            ControlFlow::Continue(())
        }
        Err(e) => {
            eprintln!("{} failed to extract {name}: {e}", "error:".red().bold());
            ControlFlow::Break(())
        }
    }
}
