//! Append-only list of owned strings.
//!
//! Holds request arguments. Insertion order is kept, since it decides the
//! order of query parameters.

use crate::buffer::next_capacity;
use crate::error::Result;

/// Capacity of a freshly initialized list.
pub const INITIAL_CAPACITY: usize = 10;

/// Growable list of owned strings, kept in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StringList {
    items: Vec<String>,
}

impl StringList {
    /// An empty list with no storage. The first append allocates.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty list with room for [`INITIAL_CAPACITY`] strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn init() -> Result<Self> {
        let mut list = Self::new();
        list.items.try_reserve_exact(INITIAL_CAPACITY)?;
        Ok(list)
    }

    /// Store an owned copy of `s` at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`](crate::Error::Alloc) if either the copy or
    /// the backing array cannot be allocated.
    pub fn append(&mut self, s: &str) -> Result<()> {
        let len = self.items.len();
        if len == self.items.capacity() {
            let capacity = match self.items.capacity() {
                0 => INITIAL_CAPACITY,
                n => next_capacity(n),
            };
            self.items.try_reserve_exact(capacity - len)?;
        }

        let mut owned = String::new();
        owned.try_reserve_exact(s.len())?;
        owned.push_str(s);

        self.items.push(owned);
        Ok(())
    }

    /// Drop every stored string and the backing array.
    pub fn reset(&mut self) {
        self.items = Vec::new();
    }

    /// Stored strings in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Iterate over the stored strings in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    /// First stored string, if any.
    pub fn first(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    /// Number of stored strings.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no strings.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Strings that fit before the next growth step.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }
}

impl<'a> IntoIterator for &'a StringList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        let mut list = StringList::init().unwrap();
        let inputs: Vec<String> = (0..37).map(|i| format!("pkg-{i}")).collect();

        for s in &inputs {
            list.append(s).unwrap();
        }

        assert_eq!(list.len(), inputs.len());
        assert_eq!(list.as_slice(), inputs.as_slice());
        assert!(list.len() <= list.capacity());
    }

    #[test]
    fn test_grows_by_factor_when_full() {
        let mut list = StringList::init().unwrap();
        for i in 0..INITIAL_CAPACITY {
            list.append(&i.to_string()).unwrap();
        }
        list.append("one more").unwrap();
        assert!(list.capacity() >= 25);
    }

    #[test]
    fn test_stores_independent_copies() {
        let mut list = StringList::new();
        let mut source = String::from("yay");
        list.append(&source).unwrap();
        source.push_str("-bin");

        assert_eq!(list.first(), Some("yay"));
    }

    #[test]
    fn test_reset_then_reuse() {
        let mut list = StringList::init().unwrap();
        list.append("a").unwrap();
        list.append("b").unwrap();

        list.reset();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), 0);

        list.append("c").unwrap();
        assert_eq!(list.as_slice(), ["c".to_string()]);
    }
}
