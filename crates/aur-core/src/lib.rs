//! aur-core - request lifecycle and transfer loop for the AUR RPC interface
//!
//! # Overview
//!
//! A [`Client`] owns the HTTP transport. Callers create [`Request`]s, append
//! arguments, and [`queue`](Client::queue) them; [`Client::run`] then drives
//! every transfer concurrently from the current task and hands each finished
//! request, with its response body, to the request's completion callback.
//! Callbacks typically decode the body with [`packages_from_json`] or treat
//! it as an opaque tarball, and may queue follow-up requests.
//!
//! ```no_run
//! use std::ops::ControlFlow;
//! use aur_core::{Client, Config, Method, Request};
//!
//! # async fn demo() -> aur_core::Result<()> {
//! let mut client = Client::new(Config::from_env())?;
//! let req = Request::new(Method::Info, |_client, _req, body| {
//!     if let Ok(pkgs) = aur_core::packages_from_json(&body) {
//!         for pkg in &pkgs {
//!             println!("{} {}", pkg.name(), pkg.version());
//!         }
//!     }
//!     ControlFlow::Continue(())
//! })?;
//! req.append_arg("yay")?;
//! client.queue(req)?;
//! client.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod buffer;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod strlist;

pub use address::build_url;
pub use buffer::DynBuffer;
pub use client::Client;
pub use config::Config;
pub use error::{Error, Result};
pub use request::{DoneFn, Method, Request};
pub use strlist::StringList;

// Re-exported record types and decoder
pub use aur_schema::{DecodeError, Package, PackageList, packages_from_json};

/// User Agent string sent with every request
pub const USER_AGENT: &str = concat!("aur/", env!("CARGO_PKG_VERSION"));
