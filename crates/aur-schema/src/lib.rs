//! Package records and decoding for AUR RPC documents.

pub mod decode;
pub mod package;

// Re-exports
pub use decode::{DecodeError, packages_from_json};
pub use package::{Package, PackageList};
