use crate::config::{Manifest, StepEntry};
use crate::core::map::OrderedMap;
use crate::core::step::Step;
use crate::error::{PrecedenceError, Result};

/// Add every manifest step, in file order, to a fresh map.
pub fn build_map(manifest: &Manifest) -> Result<OrderedMap<Step>> {
    let mut map = OrderedMap::new();
    for entry in &manifest.steps {
        map.add(
            entry.name.as_str(),
            step_for(entry),
            entry.before_keys(),
            entry.after_keys(),
        )
        .map_err(|source| PrecedenceError::Step {
            name: entry.name.clone(),
            source,
        })?;
    }
    Ok(map)
}

fn step_for(entry: &StepEntry) -> Step {
    Step {
        name: entry.name.clone(),
        run: entry.run.clone(),
        description: entry.description.clone(),
        source: entry.source.clone(),
    }
}
