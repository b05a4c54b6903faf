//! Clip-region stack for one drawing session.

use crate::geometry::RectF;

/// Stack of logical clip rectangles. The root entry is never popped.
#[derive(Debug, Clone)]
pub struct ClipStack {
    entries: Vec<RectF>,
}

impl ClipStack {
    pub fn new(root: RectF) -> Self {
        Self {
            entries: vec![root],
        }
    }

    pub fn top(&self) -> RectF {
        // the root entry is never removed
        self.entries[self.entries.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, rect: RectF) {
        self.entries.push(rect);
    }

    /// Pushes a copy of the current top.
    pub fn push_top(&mut self) {
        let top = self.top();
        self.entries.push(top);
    }

    /// Removes the top entry and returns the new top.
    ///
    /// # Panics
    ///
    /// Panics when only the root entry is left; every pop must pair with an
    /// earlier push.
    pub fn pop(&mut self) -> RectF {
        if self.entries.len() <= 1 {
            log::error!("clip stack underflow: pop without matching push");
            panic!("clip stack underflow: pop without matching push");
        }
        self.entries.pop();
        self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_restores_previous_top() {
        let root = RectF::new(0.0, 0.0, 100.0, 100.0);
        let mut s = ClipStack::new(root);
        s.push(RectF::new(10.0, 10.0, 5.0, 5.0));
        assert_eq!(s.depth(), 2);
        assert_eq!(s.pop(), root);
        assert_eq!(s.top(), root);
    }

    #[test]
    fn push_top_duplicates_current_entry() {
        let mut s = ClipStack::new(RectF::new(0.0, 0.0, 10.0, 10.0));
        s.push(RectF::new(1.0, 1.0, 2.0, 2.0));
        s.push_top();
        assert_eq!(s.depth(), 3);
        assert_eq!(s.top(), RectF::new(1.0, 1.0, 2.0, 2.0));
    }

    #[test]
    #[should_panic(expected = "clip stack underflow")]
    fn popping_root_panics() {
        let mut s = ClipStack::new(RectF::new(0.0, 0.0, 10.0, 10.0));
        s.pop();
    }
}
