#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod graph;
pub mod util;

pub use crate::core::{EntryKey, Keys, OrderedMap};
pub use crate::graph::GraphError;
