//! The ordering relation a queue sorts by.
//!
//! The comparator is a value held by the queue, so it may carry state. The
//! queue extracts the *minimum* under the relation; for a max-queue wrap the
//! keys in [`core::cmp::Reverse`].

/// Strict weak ordering: `sorts_before(lhs, rhs)` means `lhs` sorts strictly
/// before `rhs`. Arguments are always evaluated in that order.
pub trait SortsBefore<TKey> {
    fn sorts_before(&self, lhs: &TKey, rhs: &TKey) -> bool;
}

/// The default relation: `lhs < rhs` through [`Ord`].
///
/// ### Examples
///
/// ```
/// use blocked_priority_queue::BlockedPriorityQueue;
/// use std::cmp::Reverse;
///
/// let mut min_queue = BlockedPriorityQueue::<8, u32>::new();
/// min_queue.push(3);
/// min_queue.push(1);
/// assert_eq!(min_queue.peek(), Some(&1));
///
/// let mut max_queue = BlockedPriorityQueue::<8, Reverse<u32>>::new();
/// max_queue.push(Reverse(3));
/// max_queue.push(Reverse(1));
/// assert_eq!(max_queue.peek(), Some(&Reverse(3)));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<TKey: Ord> SortsBefore<TKey> for NaturalOrder {
    #[inline]
    fn sorts_before(&self, lhs: &TKey, rhs: &TKey) -> bool {
        lhs < rhs
    }
}

/// Any `Fn(&TKey, &TKey) -> bool` closure works as a comparator.
///
/// ### Examples
///
/// ```
/// use blocked_priority_queue::{BlockedPriorityQueue, KeyOnly};
///
/// let mut by_length = BlockedPriorityQueue::<8, &str, KeyOnly, _>::with_compare(
///     |lhs: &&str, rhs: &&str| lhs.len() < rhs.len(),
/// );
/// by_length.push("pear");
/// by_length.push("fig");
/// by_length.push("banana");
/// assert_eq!(by_length.pop(), Some("fig"));
/// assert_eq!(by_length.pop(), Some("pear"));
/// assert_eq!(by_length.pop(), Some("banana"));
/// ```
impl<TKey, F> SortsBefore<TKey> for F
where
    F: Fn(&TKey, &TKey) -> bool,
{
    #[inline]
    fn sorts_before(&self, lhs: &TKey, rhs: &TKey) -> bool {
        self(lhs, rhs)
    }
}
