use std::borrow::Borrow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for EntryKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&String> for EntryKey {
    fn from(key: &String) -> Self {
        Self(key.clone())
    }
}

/// Ordered constraint targets for one side of an `add` call.
///
/// Accepts nothing, a single key, or a sequence of keys; every shape ends up as
/// the same ordered list so nothing past the boundary branches on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys(Vec<EntryKey>);

impl Keys {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryKey> {
        self.0.iter()
    }
}

impl IntoIterator for Keys {
    type Item = EntryKey;
    type IntoIter = std::vec::IntoIter<EntryKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Keys {
    type Item = &'a EntryKey;
    type IntoIter = std::slice::Iter<'a, EntryKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<()> for Keys {
    fn from(_: ()) -> Self {
        Self::none()
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Self(vec![EntryKey::from(key)])
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Self(vec![EntryKey::from(key)])
    }
}

impl From<EntryKey> for Keys {
    fn from(key: EntryKey) -> Self {
        Self(vec![key])
    }
}

impl<T: Into<EntryKey>> From<Option<T>> for Keys {
    fn from(key: Option<T>) -> Self {
        Self(key.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<EntryKey>> From<Vec<T>> for Keys {
    fn from(keys: Vec<T>) -> Self {
        Self(keys.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<EntryKey>, const N: usize> From<[T; N]> for Keys {
    fn from(keys: [T; N]) -> Self {
        Self(keys.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<EntryKey> + Clone> From<&[T]> for Keys {
    fn from(keys: &[T]) -> Self {
        Self(keys.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<EntryKey>> FromIterator<T> for Keys {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
