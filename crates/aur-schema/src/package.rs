//! Decoded package records.

use std::ops::Deref;

/// One package entry as reported by the AUR RPC interface.
///
/// Every field starts out unset: `None` for scalar strings, `0` for integers
/// and an empty list for the list fields. Fields absent from the document, or
/// reported as `null`, stay that way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Package name (`Name`).
    pub name: Option<String>,
    /// One-line description (`Description`).
    pub description: Option<String>,
    /// Maintainer account, `None` for orphans (`Maintainer`).
    pub maintainer: Option<String>,
    /// Name of the package base this package is split from (`PackageBase`).
    pub pkgbase: Option<String>,
    /// Upstream project URL (`URL`).
    pub upstream_url: Option<String>,
    /// Path of the snapshot tarball, relative to the AUR host (`URLPath`).
    pub urlpath: Option<String>,
    /// Full `epoch:pkgver-pkgrel` string (`Version`).
    pub version: Option<String>,

    /// Category id (`CategoryID`).
    pub category_id: i64,
    /// Package id (`ID`).
    pub package_id: i64,
    /// Package base id (`PackageBaseID`).
    pub pkgbase_id: i64,
    /// Timestamp the package was flagged out of date, or 0 (`OutOfDate`).
    pub out_of_date: i64,
    /// Number of votes (`NumVotes`).
    pub votes: i64,
    /// Unix timestamp of first submission (`FirstSubmitted`).
    pub submitted: i64,
    /// Unix timestamp of last modification (`LastModified`).
    pub modified: i64,

    /// `License`
    pub licenses: Vec<String>,
    /// `Conflicts`
    pub conflicts: Vec<String>,
    /// `Depends`
    pub depends: Vec<String>,
    /// `Groups`
    pub groups: Vec<String>,
    /// `MakeDepends`
    pub makedepends: Vec<String>,
    /// `OptDepends`
    pub optdepends: Vec<String>,
    /// `CheckDepends`
    pub checkdepends: Vec<String>,
    /// `Provides`
    pub provides: Vec<String>,
    /// `Replaces`
    pub replaces: Vec<String>,
}

impl Package {
    /// A record with no name marks the end of a [`PackageList`].
    pub fn is_sentinel(&self) -> bool {
        self.name.as_deref().is_none_or(str::is_empty)
    }

    /// Name as a string slice, empty when unset.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Version as a string slice, empty when unset.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }
}

/// Contiguous, sentinel-terminated array of decoded packages.
///
/// The backing storage always holds one record more than [`len`](Self::len);
/// the trailing record is a default [`Package`] whose unset name marks the
/// end. Dereferencing yields only the real records. Dropping the list frees
/// every record at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageList {
    records: Vec<Package>,
}

impl PackageList {
    /// Wrap records whose last slot is already the sentinel.
    pub(crate) fn from_terminated(records: Vec<Package>) -> Self {
        debug_assert!(records.last().is_some_and(Package::is_sentinel));
        Self { records }
    }

    /// Number of packages, not counting the sentinel.
    pub fn len(&self) -> usize {
        self.records.len() - 1
    }

    /// Whether the document held no packages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records including the trailing sentinel.
    pub fn with_sentinel(&self) -> &[Package] {
        &self.records
    }

    /// Consume the list, returning the packages without the sentinel.
    pub fn into_vec(mut self) -> Vec<Package> {
        self.records.pop();
        self.records
    }
}

impl Default for PackageList {
    fn default() -> Self {
        Self::from_terminated(vec![Package::default()])
    }
}

impl Deref for PackageList {
    type Target = [Package];

    fn deref(&self) -> &[Package] {
        &self.records[..self.len()]
    }
}

impl<'a> IntoIterator for &'a PackageList {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_has_only_sentinel() {
        let list = PackageList::default();
        assert!(list.is_empty());
        assert_eq!(list.with_sentinel().len(), 1);
        assert!(list.with_sentinel()[0].is_sentinel());
    }

    #[test]
    fn test_deref_hides_sentinel() {
        let pkg = Package {
            name: Some("yay".to_string()),
            ..Package::default()
        };
        let list = PackageList::from_terminated(vec![pkg, Package::default()]);

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name(), "yay");
        assert_eq!(list.iter().count(), 1);
        assert_eq!(list.into_vec().len(), 1);
    }

    #[test]
    fn test_empty_name_is_sentinel() {
        let pkg = Package {
            name: Some(String::new()),
            ..Package::default()
        };
        assert!(pkg.is_sentinel());
    }
}
