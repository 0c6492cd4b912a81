//! aur - query and download packages from the Arch User Repository
//!
//! Every action turns its arguments into one or more RPC requests, queues
//! them on a single [`aur_core::Client`] and runs them concurrently. The
//! completion callbacks print what came back or, for `download`, chain a
//! snapshot download per package and unpack it.
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]

pub mod cmd;
pub mod io;
pub mod ui;

use aur_core::Config;
use aur_core::config::{DEFAULT_DOMAIN, DEFAULT_RPC_VERSION};
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "aur")]
#[command(author, version, about = "Query and download packages from the Arch User Repository")]
pub struct Cli {
    /// AUR host to talk to
    #[arg(long, global = true, env = "AUR_DOMAIN", default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Use plain http instead of https
    #[arg(long, global = true, env = "AUR_INSECURE", value_parser = FalseyValueParser::new())]
    pub insecure: bool,

    /// RPC interface version
    #[arg(long, global = true, env = "AUR_RPC_VERSION", default_value_t = DEFAULT_RPC_VERSION)]
    pub rpc_version: u32,

    /// Log request and response details for every transfer
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print each package with a format string instead, e.g. '%n %v\n'
    #[arg(long, global = true)]
    pub format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Client configuration selected by the global flags.
    pub fn config(&self) -> Config {
        Config {
            domain: self.domain.clone(),
            secure: !self.insecure,
            rpc_version: self.rpc_version,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show package info, one request per package
    Info {
        /// Package name(s)
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Show package info, all packages in a single request
    Multiinfo {
        /// Package name(s)
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Search package names and descriptions
    Search {
        /// Search term(s), one search each
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Show packages by maintainer
    Msearch {
        /// Maintainer name(s)
        #[arg(required = true)]
        maintainers: Vec<String>,
    },
    /// Download and extract package snapshots
    Download {
        /// Package name(s)
        #[arg(required = true)]
        packages: Vec<String>,
        /// Directory to extract into
        #[arg(long, short, default_value = ".")]
        dest: PathBuf,
    },
}
