//! Filesystem side of the CLI.

pub mod extract;
