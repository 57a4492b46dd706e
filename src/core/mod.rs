pub mod key;
pub mod map;
pub mod step;

pub use key::{EntryKey, Keys};
pub use map::OrderedMap;
pub use step::Step;
