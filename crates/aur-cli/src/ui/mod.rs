//! Package rendering

pub mod format;
pub mod output;

use aur_schema::Package;

/// How packages from a response are printed.
#[derive(Debug, Clone)]
pub enum Layout {
    /// Labelled block with every field, one package per block.
    Long,
    /// One line of name, version and votes, then the description.
    Summary,
    /// User-supplied `--format` string.
    Custom(String),
}

impl Layout {
    /// `--format` overrides the action's own layout.
    pub fn or_custom(self, format: Option<&str>) -> Self {
        format.map_or(self, |f| Self::Custom(f.to_string()))
    }

    pub fn render(&self, pkg: &Package) -> String {
        match self {
            Self::Long => output::info_block(pkg),
            Self::Summary => output::search_line(pkg),
            Self::Custom(fmt) => format::format_package(fmt, pkg),
        }
    }
}
