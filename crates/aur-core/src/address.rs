//! URL construction for queued requests.
//!
//! RPC calls become `<scheme>://<domain>/rpc.php?v=<version>&type=<name>`
//! followed by their arguments. `multiinfo` sends every argument as a
//! repeated `arg[]`, the other RPC methods send only the first one as `arg`.
//! Downloads fetch their single argument: absolute URLs are used as given,
//! root-relative paths such as a package's `URLPath` are resolved against
//! the configured host.

use url::{Url, form_urlencoded};

use crate::buffer::DynBuffer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::request::Method;

/// Build the final URL for a request.
///
/// # Errors
///
/// Returns [`Error::MissingArgument`] for a download without a target,
/// [`Error::Url`] for a target that is neither an absolute URL nor a path,
/// and [`Error::Alloc`] if the URL cannot be assembled. No partial URL is
/// ever returned.
pub fn build_url(config: &Config, method: Method, args: &[String]) -> Result<String> {
    let Some(name) = method.rpc_name() else {
        return download_url(config, args);
    };

    let version = config.rpc_version.to_string();
    let mut buf = DynBuffer::init()?;
    for part in [
        config.scheme(),
        "://",
        &config.domain,
        "/rpc.php?v=",
        &version,
        "&type=",
        name,
    ] {
        buf.append(part.as_bytes())?;
    }

    if method == Method::MultiInfo {
        for arg in args {
            append_arg(&mut buf, "&arg[]=", arg)?;
        }
    } else if let Some(arg) = args.first() {
        append_arg(&mut buf, "&arg=", arg)?;
    }

    Ok(String::from_utf8(buf.take())?)
}

fn append_arg(buf: &mut DynBuffer, prefix: &str, value: &str) -> Result<()> {
    buf.append(prefix.as_bytes())?;
    for encoded in form_urlencoded::byte_serialize(value.as_bytes()) {
        buf.append(encoded.as_bytes())?;
    }
    Ok(())
}

fn download_url(config: &Config, args: &[String]) -> Result<String> {
    let target = args.first().ok_or(Error::MissingArgument)?;

    match Url::parse(target) {
        Ok(_) => Ok(target.clone()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(&config.base_url())?;
            Ok(base.join(target)?.into())
        }
        Err(e) => Err(e.into()),
    }
}
