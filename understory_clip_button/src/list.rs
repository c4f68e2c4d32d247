// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered list of linked buttons.

use alloc::vec::Vec;

use crate::types::ButtonId;

/// The host's ordered button list.
///
/// Linking pushes to the front, so the most recently linked button is visited
/// first. Clips relink their buttons every frame in display order, which makes
/// the topmost button come first in [`ButtonList::iter`].
///
/// ```
/// use understory_clip_button::{ButtonId, ButtonList};
///
/// let mut list = ButtonList::new();
/// list.link(ButtonId::new(0, 1));
/// list.link(ButtonId::new(1, 1));
/// assert_eq!(list.head(), Some(ButtonId::new(1, 1)));
/// assert_eq!(
///     list.iter().collect::<Vec<_>>(),
///     [ButtonId::new(1, 1), ButtonId::new(0, 1)],
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct ButtonList {
    // Stored back-to-front so linking is a push.
    ids: Vec<ButtonId>,
}

impl ButtonList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `id` at the front.
    ///
    /// Nothing prevents linking the same id twice; it is then visited twice.
    pub fn link(&mut self, id: ButtonId) {
        self.ids.push(id);
    }

    /// Front of the list.
    pub fn head(&self) -> Option<ButtonId> {
        self.ids.last().copied()
    }

    /// Iterate front to back.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = ButtonId> + ExactSizeIterator + '_ {
        self.ids.iter().rev().copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is linked.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is linked.
    pub fn contains(&self, id: ButtonId) -> bool {
        self.ids.contains(&id)
    }

    /// Unlink everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only entries for which `keep` returns `true`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(ButtonId) -> bool) {
        self.ids.retain(|&id| keep(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn id(i: u32) -> ButtonId {
        ButtonId::new(i, 1)
    }

    #[test]
    fn link_prepends() {
        let mut list = ButtonList::new();
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        for i in 0..3 {
            list.link(id(i));
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![id(2), id(1), id(0)]);
        assert_eq!(list.iter().next_back(), Some(id(0)));
    }

    #[test]
    fn retain_keeps_order() {
        let mut list = ButtonList::new();
        for i in 0..4 {
            list.link(id(i));
        }
        list.retain(|b| b.index() % 2 == 0);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![id(2), id(0)]);
        assert!(list.contains(id(2)));
        assert!(!list.contains(id(3)));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn double_link_is_visited_twice() {
        let mut list = ButtonList::new();
        list.link(id(7));
        list.link(id(7));
        assert_eq!(list.iter().filter(|&b| b == id(7)).count(), 2);
    }
}
