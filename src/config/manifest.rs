use std::path::PathBuf;

use serde::Deserialize;

use crate::core::key::Keys;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default, rename = "step", alias = "steps")]
    pub steps: Vec<StepEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepEntry {
    pub name: String,
    #[serde(default)]
    pub run: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub before: Option<KeyList>,
    #[serde(default)]
    pub after: Option<KeyList>,
    /// File the entry was read from.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// `before`/`after` as written: one step name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyList {
    One(String),
    Many(Vec<String>),
}

impl From<&KeyList> for Keys {
    fn from(list: &KeyList) -> Self {
        match list {
            KeyList::One(key) => Keys::from(key.as_str()),
            KeyList::Many(keys) => Keys::from(keys.as_slice()),
        }
    }
}

impl StepEntry {
    pub fn before_keys(&self) -> Keys {
        self.before.as_ref().map(Keys::from).unwrap_or_default()
    }

    pub fn after_keys(&self) -> Keys {
        self.after.as_ref().map(Keys::from).unwrap_or_default()
    }
}
