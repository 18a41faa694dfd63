//! Point selection with FIFO replacement
//!
//! At most two sample indices are held, oldest first. Two points define the
//! closed interval a delete acts on.

/// Maximum number of selected points
pub const MAX_SELECTED: usize = 2;

/// Ordered set of up to two selected sample indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: Vec<usize>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle an index in or out of the selection
    ///
    /// A present index is removed. A new index is appended, evicting the
    /// oldest when the selection is full.
    pub fn toggle(&mut self, index: usize) -> &[usize] {
        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
        } else {
            if self.selected.len() >= MAX_SELECTED {
                self.selected.remove(0);
            }
            self.selected.push(index);
        }
        &self.selected
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Remove the most recently added index
    pub fn pop_most_recent(&mut self) -> Option<usize> {
        self.selected.pop()
    }

    /// Selected indices in selection order
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The sorted closed interval when exactly two points are selected
    pub fn range(&self) -> Option<(usize, usize)> {
        match self.selected.as_slice() {
            &[a, b] => Some((a.min(b), a.max(b))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_toggle_evicts_oldest() {
        let mut sel = SelectionModel::new();
        sel.toggle(4);
        sel.toggle(1);
        assert_eq!(sel.toggle(7), &[1, 7]);
    }

    #[test]
    fn test_toggle_present_removes() {
        let mut sel = SelectionModel::new();
        sel.toggle(4);
        sel.toggle(1);
        assert_eq!(sel.toggle(4), &[1]);
    }

    #[test]
    fn test_pop_most_recent() {
        let mut sel = SelectionModel::new();
        assert_eq!(sel.pop_most_recent(), None);
        sel.toggle(2);
        sel.toggle(9);
        assert_eq!(sel.pop_most_recent(), Some(9));
        assert_eq!(sel.selected(), &[2]);
    }

    #[test]
    fn test_range_sorted() {
        let mut sel = SelectionModel::new();
        sel.toggle(8);
        assert_eq!(sel.range(), None);
        sel.toggle(3);
        assert_eq!(sel.range(), Some((3, 8)));
    }

    proptest! {
        #[test]
        fn test_toggle_never_exceeds_capacity(
            clicks in prop::collection::vec(0usize..20, 0..100)
        ) {
            let mut sel = SelectionModel::new();
            for idx in clicks {
                let was_present = sel.selected().contains(&idx);
                let before = sel.selected().to_vec();
                let after = sel.toggle(idx).to_vec();

                prop_assert!(after.len() <= MAX_SELECTED);
                if was_present {
                    // Exactly that index is gone, order of the rest kept
                    let expected: Vec<usize> = before.into_iter().filter(|&i| i != idx).collect();
                    prop_assert_eq!(after, expected);
                } else {
                    prop_assert_eq!(after.last().copied(), Some(idx));
                }
                let mut dedup = sel.selected().to_vec();
                dedup.sort_unstable();
                dedup.dedup();
                prop_assert_eq!(dedup.len(), sel.len());
            }
        }
    }
}
