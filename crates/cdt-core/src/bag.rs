//! Set of labels with O(1) insert, remove and uniform random pick.

use rand::Rng;

use crate::label::Label;
use crate::rng::RngHandle;

const EMPTY: u32 = u32::MAX;

/// Dense-array set over labels drawn from a pool of fixed capacity.
///
/// `elements[0..len)` is the member list; `indices[label]` stores a member's
/// position in that list, or `EMPTY`. Removal swaps the last member into the
/// vacated slot, which keeps every operation constant time. Monte Carlo moves
/// sample seeds with [`Bag::pick`].
#[derive(Debug, Clone)]
pub struct Bag<T> {
    indices: Vec<u32>,
    elements: Vec<Label<T>>,
}

impl<T> Bag<T> {
    /// Creates an empty bag for labels below `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: vec![EMPTY; capacity],
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the bag has no members.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns whether `label` is a member.
    pub fn contains(&self, label: Label<T>) -> bool {
        self.indices[label.index()] != EMPTY
    }

    /// Inserts `label`. Panics if it is already a member.
    pub fn add(&mut self, label: Label<T>) {
        assert!(!self.contains(label), "bag already contains label {label}");
        self.indices[label.index()] = self.elements.len() as u32;
        self.elements.push(label);
    }

    /// Removes `label`. Panics if it is not a member.
    pub fn remove(&mut self, label: Label<T>) {
        assert!(self.contains(label), "bag does not contain label {label}");
        let position = self.indices[label.index()] as usize;
        let last = *self.elements.last().unwrap();
        self.elements[position] = last;
        self.elements.pop();
        self.indices[last.index()] = position as u32;
        self.indices[label.index()] = EMPTY;
    }

    /// Draws a member uniformly at random. Panics on an empty bag.
    pub fn pick(&self, rng: &mut RngHandle) -> Label<T> {
        assert!(!self.is_empty(), "pick from an empty bag");
        self.elements[rng.gen_range(0..self.elements.len())]
    }

    /// Iterates over the members in dense-array order.
    pub fn iter(&self) -> impl Iterator<Item = Label<T>> + '_ {
        self.elements.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_keeps_dense_invariant() {
        let mut bag: Bag<()> = Bag::with_capacity(16);
        for raw in [3u32, 7, 11, 2] {
            bag.add(Label::from_raw(raw));
        }
        assert_eq!(bag.len(), 4);
        assert!(bag.contains(Label::from_raw(7)));

        bag.remove(Label::from_raw(7));
        assert!(!bag.contains(Label::from_raw(7)));
        assert_eq!(bag.len(), 3);

        let members: Vec<u32> = bag.iter().map(Label::as_raw).collect();
        assert_eq!(members, vec![3, 2, 11]);
    }

    #[test]
    fn pick_only_returns_members() {
        let mut bag: Bag<()> = Bag::with_capacity(64);
        for raw in 0..32u32 {
            if raw % 3 == 0 {
                bag.add(Label::from_raw(raw));
            }
        }
        let mut rng = RngHandle::from_seed(42);
        for _ in 0..200 {
            let picked = bag.pick(&mut rng);
            assert!(bag.contains(picked));
        }
    }

    #[test]
    #[should_panic(expected = "pick from an empty bag")]
    fn pick_from_empty_bag_panics() {
        let bag: Bag<()> = Bag::with_capacity(4);
        let mut rng = RngHandle::from_seed(0);
        bag.pick(&mut rng);
    }

    #[test]
    #[should_panic(expected = "already contains")]
    fn double_add_panics() {
        let mut bag: Bag<()> = Bag::with_capacity(4);
        bag.add(Label::from_raw(1));
        bag.add(Label::from_raw(1));
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn remove_missing_panics() {
        let mut bag: Bag<()> = Bag::with_capacity(4);
        bag.remove(Label::from_raw(1));
    }
}
