//! Client context and the transfer loop.
//!
//! The [`Client`] owns the HTTP transport and the set of in-flight
//! transfers. [`Client::queue`] registers a request; [`Client::run`] drives
//! every registered transfer from the current task until all of them have
//! finished, handing each finished request to its completion callback.
//!
//! ```text
//! queue() ──> in flight ──> finished ──> done(client, request, body)
//!                 ^                              │
//!                 └──────── queue() ─────────────┘
//! ```
//!
//! Callbacks may queue more requests on the same client; those join the
//! running loop. Nothing here is `Send`: the loop is single-threaded and
//! cooperative, and the only suspension point is the bounded wait for the
//! next finished transfer.

use std::fmt;
use std::ops::ControlFlow;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use reqwest::RequestBuilder;
use tracing::{debug, error, info, warn};

use crate::address::build_url;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::request::Request;

/// Longest single wait for a transfer to finish before looping again.
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

type Transfer = LocalBoxFuture<'static, Finished>;

struct Finished {
    request: Request,
    result: Result<()>,
}

/// Owner of the HTTP transport and in-flight bookkeeping.
pub struct Client {
    http: reqwest::Client,
    config: Config,
    active: usize,
    transfers: FuturesUnordered<Transfer>,
}

impl Client {
    /// Set up the transport for `config`.
    ///
    /// Connection pool, TLS and resolver state live as long as the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            http,
            config,
            active: 0,
            transfers: FuturesUnordered::new(),
        })
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of queued requests whose callbacks have not run yet.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Build the request's URL and start its transfer.
    ///
    /// The client takes over the caller's reference. On error nothing is
    /// registered and the in-flight count is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyQueued`] if the request was queued before, or
    /// any error from building its URL.
    pub fn queue(&mut self, request: Request) -> Result<()> {
        if request.is_queued() {
            return Err(Error::AlreadyQueued);
        }

        let url = build_url(&self.config, request.method(), &request.args())?;
        let builder = self.http.get(&url);
        if request.debug() {
            info!(target: "aur::transport", method = %request.method(), %url, "GET");
        } else {
            debug!(method = %request.method(), %url, "queued request");
        }
        request.mark_queued(url)?;

        self.transfers.push(transfer(builder, request).boxed_local());
        self.active += 1;
        Ok(())
    }

    /// Drive all transfers until none are left in flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] once a completion callback breaks. The
    /// abort takes effect after the current batch of finished transfers
    /// has been dispatched; transfers still in flight are left alone.
    /// Returns [`Error::LostTransfers`] if the in-flight count outlives the
    /// transfers it counts. Individual transport failures are logged, not
    /// returned.
    pub async fn run(&mut self) -> Result<()> {
        while self.active > 0 {
            let mut finished = Vec::new();

            match tokio::time::timeout(POLL_TIMEOUT, self.transfers.next()).await {
                Ok(Some(done)) => finished.push(done),
                Ok(None) => {
                    warn!(active = self.active, "in-flight count without transfers");
                    return Err(Error::LostTransfers(self.active));
                }
                Err(_) => {}
            }

            // pick up everything else that is already done
            while let Some(Some(done)) = self.transfers.next().now_or_never() {
                finished.push(done);
            }

            if self.dispatch(finished).is_break() {
                return Err(Error::Aborted);
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, finished: Vec<Finished>) -> ControlFlow<()> {
        let mut flow = ControlFlow::Continue(());

        for Finished { request, result } in finished {
            self.active -= 1;

            if let Err(err) = result {
                error!(
                    url = %request.url().unwrap_or_default(),
                    "request failed: {err}"
                );
            }

            // keep the request alive even if the callback drops its handle
            let extra = request.retain();
            let body = request.take_response();
            debug!(
                method = %request.method(),
                status = request.http_status(),
                bytes = body.len(),
                "request finished"
            );

            if let Some(done) = request.take_done() {
                if done(self, request, body).is_break() {
                    warn!("completion handler signaled abort");
                    flow = ControlFlow::Break(());
                }
            }

            extra.release();
        }

        flow
    }
}

async fn transfer(builder: RequestBuilder, request: Request) -> Finished {
    let result = receive(builder, &request).await;
    Finished { request, result }
}

async fn receive(builder: RequestBuilder, request: &Request) -> Result<()> {
    let mut response = builder.send().await?;
    request.record_response(response.status().as_u16(), response.url().as_str());

    if request.debug() {
        info!(
            target: "aur::transport",
            url = %response.url(),
            status = %response.status(),
            headers = ?response.headers(),
            "response"
        );
    }

    while let Some(chunk) = response.chunk().await? {
        request.append_response(&chunk)?;
    }

    Ok(())
}

impl Drop for Client {
    fn drop(&mut self) {
        if self.active > 0 {
            warn!(active = self.active, "dropping client with transfers in flight");
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
