/// Decoded entry of an [`IndexStack`] used as a depth-first work stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Enter(usize),
    Exit(usize),
}

/// Growable stack of signed vertex indices.
///
/// Non-negative values mean "enter", one's complement values mean "exit".
#[derive(Debug, Default, Clone)]
pub struct IndexStack {
    items: Vec<isize>,
}

impl IndexStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: isize) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<isize> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push_enter(&mut self, index: usize) {
        self.push(index as isize);
    }

    pub fn push_exit(&mut self, index: usize) {
        self.push(!(index as isize));
    }

    pub fn pop_marker(&mut self) -> Option<Marker> {
        self.pop().map(|value| {
            if value >= 0 {
                Marker::Enter(value as usize)
            } else {
                Marker::Exit((!value) as usize)
            }
        })
    }

    /// Non-negative entries as indices, bottom first.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .filter(|value| **value >= 0)
            .map(|value| *value as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::{IndexStack, Marker};

    #[test]
    fn pops_in_lifo_order() {
        let mut stack = IndexStack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn markers_encode_enter_and_exit() {
        let mut stack = IndexStack::with_capacity(4);
        stack.push_enter(0);
        stack.push_exit(0);
        stack.push_exit(7);
        stack.push_enter(7);
        assert_eq!(stack.pop(), Some(7));
        assert_eq!(stack.pop_marker(), Some(Marker::Exit(7)));
        stack.push(-8);
        assert_eq!(stack.pop(), Some(-8));
        assert_eq!(stack.pop_marker(), Some(Marker::Exit(0)));
        assert_eq!(stack.pop(), Some(0));
        assert_eq!(stack.pop_marker(), None);
    }

    #[test]
    fn indices_skip_exit_markers() {
        let mut stack = IndexStack::new();
        stack.push_enter(2);
        stack.push_exit(2);
        stack.push_enter(5);
        assert_eq!(stack.indices().collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(stack.len(), 3);
    }
}
