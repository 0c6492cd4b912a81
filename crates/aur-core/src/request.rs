//! Outbound requests and their reference-counted handle.
//!
//! A [`Request`] is created with a reference count of one. Extra references
//! are taken with [`Request::retain`] and given back with
//! [`Request::release`] (or by dropping the handle); the request and
//! everything it owns is freed when the last one goes. All requests belong
//! to the single thread driving a [`Client`], so the count is an `Rc`.

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::trace;

use crate::buffer::DynBuffer;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::strlist::StringList;

/// The remote call a request makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Look up one package by exact name.
    Info,
    /// Look up several packages by exact name in one call.
    MultiInfo,
    /// Search names and descriptions.
    Search,
    /// Search by maintainer.
    MSearch,
    /// Fetch a snapshot tarball.
    Download,
}

impl Method {
    /// Value of the `type=` query parameter, `None` for downloads.
    pub fn rpc_name(self) -> Option<&'static str> {
        match self {
            Self::Info => Some("info"),
            Self::MultiInfo => Some("multiinfo"),
            Self::Search => Some("search"),
            Self::MSearch => Some("msearch"),
            Self::Download => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rpc_name().unwrap_or("download"))
    }
}

/// Completion callback, invoked once when the request's transfer finishes.
///
/// It receives the client (so it can queue follow-up requests), the
/// request itself and the response body. Returning
/// [`ControlFlow::Break`] aborts the run.
pub type DoneFn = Box<dyn FnOnce(&mut Client, Request, Vec<u8>) -> ControlFlow<()>>;

/// Shared handle to one outbound request.
pub struct Request(Rc<RefCell<Inner>>);

struct Inner {
    method: Method,
    args: StringList,
    url: Option<String>,
    body: DynBuffer,
    done: Option<DoneFn>,
    debug: bool,
    userdata: Option<Rc<dyn Any>>,
    status: Option<u16>,
    effective_url: Option<String>,
    received: u64,
    queued: bool,
}

impl Drop for Inner {
    fn drop(&mut self) {
        trace!(method = %self.method, url = self.url.as_deref(), "request freed");
    }
}

impl Request {
    /// Create a request with a reference count of one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if the argument list cannot be allocated.
    pub fn new<F>(method: Method, done: F) -> Result<Self>
    where
        F: FnOnce(&mut Client, Request, Vec<u8>) -> ControlFlow<()> + 'static,
    {
        Ok(Self(Rc::new(RefCell::new(Inner {
            method,
            args: StringList::init()?,
            url: None,
            body: DynBuffer::new(),
            done: Some(Box::new(done)),
            debug: false,
            userdata: None,
            status: None,
            effective_url: None,
            received: 0,
            queued: false,
        }))))
    }

    /// Append an argument; order is preserved in the built URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if the argument cannot be stored.
    pub fn append_arg(&self, value: &str) -> Result<()> {
        self.0.borrow_mut().args.append(value)
    }

    /// Take another reference to the same request.
    #[must_use = "dropping the new reference releases it immediately"]
    pub fn retain(&self) -> Request {
        Self(Rc::clone(&self.0))
    }

    /// Give back this reference. Returns `true` if it was the last one and
    /// the request has been freed.
    pub fn release(self) -> bool {
        Rc::into_inner(self.0).is_some()
    }

    /// Number of live handles to this request.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Move the accumulated response body out, leaving it empty.
    pub fn take_response(&self) -> Vec<u8> {
        self.0.borrow_mut().body.take()
    }

    /// The remote call this request makes.
    pub fn method(&self) -> Method {
        self.0.borrow().method
    }

    /// Whether verbose transport logging is on.
    pub fn debug(&self) -> bool {
        self.0.borrow().debug
    }

    /// Enable verbose transport logging for this request.
    pub fn set_debug(&self, debug: bool) {
        self.0.borrow_mut().debug = debug;
    }

    /// Attach arbitrary caller data, replacing any previous value.
    pub fn set_userdata<T: Any>(&self, data: T) {
        self.0.borrow_mut().userdata = Some(Rc::new(data));
    }

    /// Caller data previously attached, if it is a `T`.
    pub fn userdata<T: Any>(&self) -> Option<Rc<T>> {
        let data = self.0.borrow().userdata.clone()?;
        data.downcast::<T>().ok()
    }

    /// URL built when the request was queued.
    pub fn url(&self) -> Option<String> {
        self.0.borrow().url.clone()
    }

    /// URL the response actually came from, after redirects.
    pub fn effective_url(&self) -> Option<String> {
        self.0.borrow().effective_url.clone()
    }

    /// HTTP status of the response, once headers have arrived.
    pub fn http_status(&self) -> Option<u16> {
        self.0.borrow().status
    }

    /// Body bytes received so far.
    pub fn bytes_received(&self) -> u64 {
        self.0.borrow().received
    }

    /// Arguments in the order they were appended.
    pub fn args(&self) -> Ref<'_, [String]> {
        Ref::map(self.0.borrow(), |inner| inner.args.as_slice())
    }

    /// Whether the request has been handed to a [`Client`].
    pub fn is_queued(&self) -> bool {
        self.0.borrow().queued
    }

    pub(crate) fn mark_queued(&self, url: String) -> Result<()> {
        let mut inner = self.0.borrow_mut();
        if inner.queued {
            return Err(Error::AlreadyQueued);
        }
        inner.queued = true;
        inner.url = Some(url);
        Ok(())
    }

    pub(crate) fn record_response(&self, status: u16, effective_url: &str) {
        let mut inner = self.0.borrow_mut();
        inner.status = Some(status);
        inner.effective_url = Some(effective_url.to_string());
    }

    /// Response sink; the body buffer initializes itself on first use.
    pub(crate) fn append_response(&self, chunk: &[u8]) -> Result<()> {
        let mut inner = self.0.borrow_mut();
        inner.body.append(chunk)?;
        inner.received += chunk.len() as u64;
        Ok(())
    }

    pub(crate) fn take_done(&self) -> Option<DoneFn> {
        self.0.borrow_mut().done.take()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Request")
            .field("method", &inner.method)
            .field("args", &inner.args)
            .field("url", &inner.url)
            .field("status", &inner.status)
            .field("refcount", &Rc::strong_count(&self.0))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Client, _: Request, _: Vec<u8>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    #[test]
    fn test_new_request_has_one_reference() {
        let req = Request::new(Method::Info, noop).unwrap();
        assert_eq!(req.ref_count(), 1);
        assert_eq!(req.method(), Method::Info);
        assert!(req.url().is_none());
        assert!(req.http_status().is_none());
    }

    #[test]
    fn test_freed_exactly_on_last_release() {
        let req = Request::new(Method::Search, noop).unwrap();
        let extra = req.retain();
        assert_eq!(req.ref_count(), 2);

        assert!(!req.release());
        assert_eq!(extra.ref_count(), 1);
        assert!(extra.release());
    }

    #[test]
    fn test_args_keep_order() {
        let req = Request::new(Method::MultiInfo, noop).unwrap();
        for name in ["yay", "paru", "aurutils"] {
            req.append_arg(name).unwrap();
        }
        assert_eq!(&*req.args(), ["yay", "paru", "aurutils"]);
    }

    #[test]
    fn test_response_sink_and_take() {
        let req = Request::new(Method::Download, noop).unwrap();
        req.append_response(b"abc").unwrap();
        req.append_response(b"def").unwrap();

        assert_eq!(req.bytes_received(), 6);
        assert_eq!(req.take_response(), b"abcdef");
        assert!(req.take_response().is_empty());
    }

    #[test]
    fn test_userdata_round_trip() {
        let req = Request::new(Method::Info, noop).unwrap();
        assert!(req.userdata::<u32>().is_none());

        req.set_userdata(String::from("ctx"));
        assert_eq!(req.userdata::<String>().as_deref().map(String::as_str), Some("ctx"));
        assert!(req.userdata::<u32>().is_none());
    }

    #[test]
    fn test_cannot_mark_queued_twice() {
        let req = Request::new(Method::Info, noop).unwrap();
        req.mark_queued("https://example.org".to_string()).unwrap();
        assert!(req.is_queued());
        assert!(matches!(
            req.mark_queued("https://example.org".to_string()),
            Err(Error::AlreadyQueued)
        ));
    }

    #[test]
    fn test_callback_taken_once() {
        let req = Request::new(Method::Info, noop).unwrap();
        assert!(req.take_done().is_some());
        assert!(req.take_done().is_none());
    }

    #[test]
    fn test_display_method() {
        assert_eq!(Method::MultiInfo.to_string(), "multiinfo");
        assert_eq!(Method::Download.to_string(), "download");
    }
}
