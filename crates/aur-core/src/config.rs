//! Client configuration.

/// Host serving the RPC interface and snapshot tarballs.
pub const DEFAULT_DOMAIN: &str = "aur.archlinux.org";

/// RPC interface version sent as `v=` on every call.
pub const DEFAULT_RPC_VERSION: u32 = 5;

/// Where requests go and which RPC dialect they speak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host name, optionally with `:port`.
    pub domain: String,
    /// Use `https` (default) rather than `http`.
    pub secure: bool,
    /// RPC interface version.
    pub rpc_version: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            secure: true,
            rpc_version: DEFAULT_RPC_VERSION,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// - `AUR_DOMAIN`: host name
    /// - `AUR_INSECURE`: `1` or `true` selects plain `http`
    /// - `AUR_RPC_VERSION`: RPC interface version
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            domain: std::env::var("AUR_DOMAIN").unwrap_or(defaults.domain),
            secure: !std::env::var("AUR_INSECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            rpc_version: std::env::var("AUR_RPC_VERSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rpc_version),
        }
    }

    /// URL scheme implied by [`secure`](Self::secure).
    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    /// `<scheme>://<domain>`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme(), self.domain)
    }
}
