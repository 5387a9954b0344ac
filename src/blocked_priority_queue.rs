use std::fmt::{self, Debug};
use std::mem::{self, ManuallyDrop};

use crate::block_addressing::BlockAddressing;
use crate::ordering::{NaturalOrder, SortsBefore};
use crate::payload::{KeyOnly, KeyValue, PayloadStorage, PayloadStrategy};
use crate::skip_vector::SkipVector;

/// A priority queue laid out as a B-heap: heap nodes are grouped into blocks
/// of `BLOCK_SIZE` slots so a root-to-leaf percolation touches
/// `ceil(log_BLOCK_SIZE n)` blocks instead of `log2 n` scattered cache
/// lines.
///
/// The queue extracts the *minimum* key under its comparator ([`NaturalOrder`]
/// by default; wrap keys in [`std::cmp::Reverse`] for a max-queue). Keys may
/// travel with a value: pick the payload variant with the third type
/// parameter, [`KeyOnly`] (the default) or [`KeyValue`].
///
/// Besides the usual push / peek / pop, the queue offers
/// [`reschedule_top`](Self::reschedule_top), which re-keys the current
/// minimum and restores order in one sift instead of a pop followed by a
/// push. That is the common beat of timer wheels and simulation loops where
/// the earliest deadline is consumed and immediately re-armed.
///
/// `BLOCK_SIZE` must be a power of two and at least 2; 8 or 16 fits a 64-byte
/// cache line for most key types.
///
/// References into the queue do not survive mutating calls: `push`, `pop`
/// and `reschedule_top` move elements between slots.
///
/// # Examples
///
/// ## Bare keys
///
/// ```
/// use blocked_priority_queue::BlockedPriorityQueue;
///
/// let mut queue = BlockedPriorityQueue::<16, u32>::new();
///
/// queue.push(3);
/// queue.push(1);
/// queue.push(2);
///
/// assert_eq!(queue.peek(), Some(&1));
/// assert_eq!(queue.pop(), Some(1));
/// assert_eq!(queue.pop(), Some(2));
/// assert_eq!(queue.pop(), Some(3));
/// assert_eq!(queue.pop(), None);
/// ```
///
/// ## Keys with payloads, rescheduling the top
///
/// ```
/// use blocked_priority_queue::{BlockedPriorityQueue, KeyValue};
///
/// // Deadline -> task name; the earliest deadline wins.
/// let mut timers: BlockedPriorityQueue<8, u64, KeyValue<&str>> =
///     BlockedPriorityQueue::new();
///
/// timers.push(130, "heartbeat");
/// timers.push(105, "flush");
/// timers.push(240, "compact");
///
/// // "flush" fires at 105 and is re-armed 100 ticks later without
/// // disturbing the rest of the heap more than one sift.
/// assert_eq!(timers.peek(), Some((&105, &"flush")));
/// timers.reschedule_top(205);
///
/// assert_eq!(timers.pop(), Some((130, "heartbeat")));
/// assert_eq!(timers.pop(), Some((205, "flush")));
/// assert_eq!(timers.pop(), Some((240, "compact")));
/// ```
pub struct BlockedPriorityQueue<
    const BLOCK_SIZE: usize,
    TKey,
    TPayload = KeyOnly,
    TCompare = NaturalOrder,
> where
    TPayload: PayloadStrategy,
{
    keys: SkipVector<BLOCK_SIZE, TKey>,
    payloads: TPayload::Storage<BLOCK_SIZE>,
    compare: TCompare,
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare>
    BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
    TCompare: SortsBefore<TKey> + Default,
{
    /// Creates an empty queue with the default comparator.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::BlockedPriorityQueue;
    /// let mut queue = BlockedPriorityQueue::<16, i32>::new();
    /// queue.push(4);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_compare(TCompare::default())
    }
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare>
    BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
    TCompare: SortsBefore<TKey>,
{
    /// Creates an empty queue ordered by `compare`. The comparator is kept
    /// by value and may be stateful.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::{BlockedPriorityQueue, KeyOnly};
    ///
    /// let mut queue = BlockedPriorityQueue::<16, i32, KeyOnly, _>::with_compare(
    ///     |lhs: &i32, rhs: &i32| rhs < lhs,
    /// );
    /// queue.push(1);
    /// queue.push(3);
    /// queue.push(2);
    /// assert_eq!(queue.pop(), Some(3));
    /// ```
    #[inline]
    pub fn with_compare(compare: TCompare) -> Self {
        Self {
            keys: SkipVector::new(),
            payloads: Default::default(),
            compare,
        }
    }

    /// Number of elements in the queue.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::BlockedPriorityQueue;
    /// let mut queue = BlockedPriorityQueue::<4, i32>::new();
    /// for x in 0..100 {
    ///     queue.push(x);
    /// }
    /// assert_eq!(queue.len(), 100);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        let raw = self.keys.raw_len();
        raw - (raw + BLOCK_SIZE - 1) / BLOCK_SIZE
    }

    /// Returns true when the queue holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drops every element. Allocated capacity is kept.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::BlockedPriorityQueue;
    /// let mut queue = BlockedPriorityQueue::<8, i32>::new();
    /// queue.push(1);
    /// queue.clear();
    /// assert!(queue.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.keys.clear();
        self.payloads.clear();
    }

    /// Replaces the key of the current minimum and restores the heap order
    /// in a single sift-down. The payload that travelled with the old top
    /// key stays attached to the new key.
    ///
    /// Equivalent to a `pop` followed by a `push` of the new key with the
    /// old payload, at roughly half the comparisons and one percolation
    /// instead of two.
    ///
    /// ### Panics
    ///
    /// Panics if the queue is empty.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::BlockedPriorityQueue;
    /// let mut queue = BlockedPriorityQueue::<4, i32>::new();
    /// queue.push(1);
    /// queue.push(2);
    /// queue.push(4);
    /// queue.reschedule_top(3);
    /// assert_eq!(queue.pop(), Some(2));
    /// assert_eq!(queue.pop(), Some(3));
    /// assert_eq!(queue.pop(), Some(4));
    /// ```
    pub fn reschedule_top(&mut self, key: TKey) {
        assert!(!self.is_empty(), "reschedule_top on an empty queue");
        let last = self.keys.raw_len() - 1;
        // SAFETY: slot 1 is occupied; the hole guard re-fills whatever slot
        // the vacancy ends up in, even if a comparison or the old key's drop
        // panics below.
        unsafe {
            let old_key = self.keys.take(1);
            let value = self.payloads.take(1);
            let mut hole = Hole {
                queue: &mut *self,
                pos: 1,
                key: ManuallyDrop::new(key),
                value: ManuallyDrop::new(value),
            };
            drop(old_key);
            loop {
                let child = BlockAddressing::<BLOCK_SIZE>::child_of(hole.pos);
                if child > last {
                    break;
                }
                let sibling = child + BlockAddressing::<BLOCK_SIZE>::sibling_offset(hole.pos);
                let next = if sibling <= last
                    && !hole
                        .queue
                        .sorts_before(&hole.queue.keys[child], &hole.queue.keys[sibling])
                {
                    sibling
                } else {
                    child
                };
                if !hole.queue.sorts_before(&hole.queue.keys[next], &hole.key) {
                    break;
                }
                hole.queue.keys.transfer(next, hole.pos);
                hole.queue.payloads.transfer(next, hole.pos);
                hole.pos = next;
            }
        }
    }

    /// Shared push path: the payload is parked at the back, then the key is
    /// pushed and sifted toward the root.
    ///
    /// The sift runs in two phases so a panicking comparator cannot tear the
    /// heap: first the final position is located while the new element still
    /// sits in its back slot (unwinding pops it again, restoring the exact
    /// pre-push state), then the ancestor chain is shifted down with plain
    /// moves that cannot fail.
    fn push_pair(&mut self, key: TKey, value: TPayload::Value) {
        self.payloads.push_back(value);
        let hole = self.keys.push_back(key);
        let mut target = hole;
        {
            let guard = PushGuard { queue: &mut *self };
            while target != 1 {
                let parent = BlockAddressing::<BLOCK_SIZE>::parent_of(target);
                if !guard
                    .queue
                    .sorts_before(&guard.queue.keys[hole], &guard.queue.keys[parent])
                {
                    break;
                }
                target = parent;
            }
            mem::forget(guard);
        }
        if target != hole {
            // SAFETY: `hole` is occupied by the freshly pushed pair and
            // `target` is one of its ancestors; the chain of transfers
            // relocates each ancestor one level down and leaves `target`
            // vacant for the new pair.
            unsafe {
                let key = self.keys.take(hole);
                let value = self.payloads.take(hole);
                let mut at = hole;
                while at != target {
                    let parent = BlockAddressing::<BLOCK_SIZE>::parent_of(at);
                    self.keys.transfer(parent, at);
                    self.payloads.transfer(parent, at);
                    at = parent;
                }
                self.keys.put(target, key);
                self.payloads.put(target, value);
            }
        }
    }

    /// Shared pop path: the top pair is moved out, the hole is sifted down
    /// to the bottom row, and the back pair settles into it by sifting up.
    /// Sifting the hole all the way first halves the comparisons against
    /// the settling element.
    fn pop_pair(&mut self) -> Option<(TKey, TPayload::Value)> {
        if self.is_empty() {
            return None;
        }
        let last = self.keys.raw_len() - 1;
        // SAFETY: slot 1 is occupied; until the function returns, exactly one
        // slot is vacant and one of the guards below re-fills it on every
        // path, unwinding included.
        let popped = unsafe { (self.keys.take(1), self.payloads.take(1)) };
        let mut guard = BackfillGuard {
            queue: &mut *self,
            hole: 1,
        };
        loop {
            let child = BlockAddressing::<BLOCK_SIZE>::child_of(guard.hole);
            if child > last {
                break;
            }
            let sibling = child + BlockAddressing::<BLOCK_SIZE>::sibling_offset(guard.hole);
            let next = if sibling < last
                && !guard
                    .queue
                    .sorts_before(&guard.queue.keys[child], &guard.queue.keys[sibling])
            {
                sibling
            } else {
                child
            };
            // SAFETY: `next` is occupied, the hole is vacant.
            unsafe {
                guard.queue.keys.transfer(next, guard.hole);
                guard.queue.payloads.transfer(next, guard.hole);
            }
            guard.hole = next;
        }
        if guard.hole == last {
            // The hole walked onto the back slot; dropping the guard only
            // rolls the end markers back.
            drop(guard);
            return Some(popped);
        }
        let hole_pos = guard.hole;
        mem::forget(guard);
        // SAFETY: the back pair is moved out and the end markers retracted
        // before the hole guard takes over; from here the only vacant slot
        // is `hole_pos`, which the guard re-fills.
        unsafe {
            let key = self.keys.take(last);
            let value = self.payloads.take(last);
            self.keys.forget_back();
            self.payloads.forget_back();
            let mut hole = Hole {
                queue: &mut *self,
                pos: hole_pos,
                key: ManuallyDrop::new(key),
                value: ManuallyDrop::new(value),
            };
            while hole.pos != 1 {
                let parent = BlockAddressing::<BLOCK_SIZE>::parent_of(hole.pos);
                if !hole.queue.sorts_before(&hole.key, &hole.queue.keys[parent]) {
                    break;
                }
                hole.queue.keys.transfer(parent, hole.pos);
                hole.queue.payloads.transfer(parent, hole.pos);
                hole.pos = parent;
            }
        }
        Some(popped)
    }

    #[inline]
    fn sorts_before(&self, lhs: &TKey, rhs: &TKey) -> bool {
        self.compare.sorts_before(lhs, rhs)
    }
}

impl<const BLOCK_SIZE: usize, TKey, TCompare>
    BlockedPriorityQueue<BLOCK_SIZE, TKey, KeyOnly, TCompare>
where
    TCompare: SortsBefore<TKey>,
{
    /// Adds a key to the queue.
    ///
    /// If the comparator panics, the queue is left exactly as it was before
    /// the call.
    ///
    /// ### Time complexity
    ///
    /// Average ***O(1)***, worst case ***O(log n)*** plus an ***O(n)***
    /// relocation when the storage grows.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::BlockedPriorityQueue;
    /// let mut queue = BlockedPriorityQueue::<16, i32>::new();
    /// queue.push(5);
    /// queue.push(3);
    /// assert_eq!(queue.peek(), Some(&3));
    /// ```
    #[inline]
    pub fn push(&mut self, key: TKey) {
        self.push_pair(key, ());
    }

    /// The minimum key, or `None` when the queue is empty.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::BlockedPriorityQueue;
    /// let mut queue = BlockedPriorityQueue::<16, i32>::new();
    /// assert_eq!(queue.peek(), None);
    /// queue.push(2);
    /// assert_eq!(queue.peek(), Some(&2));
    /// ```
    #[inline]
    pub fn peek(&self) -> Option<&TKey> {
        if self.is_empty() {
            None
        } else {
            Some(&self.keys[1])
        }
    }

    /// Removes and returns the minimum key.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::BlockedPriorityQueue;
    /// let mut queue = BlockedPriorityQueue::<16, i32>::new();
    /// queue.push(2);
    /// queue.push(1);
    /// assert_eq!(queue.pop(), Some(1));
    /// assert_eq!(queue.pop(), Some(2));
    /// assert_eq!(queue.pop(), None);
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<TKey> {
        self.pop_pair().map(|(key, ())| key)
    }
}

impl<const BLOCK_SIZE: usize, TKey, TValue, TCompare>
    BlockedPriorityQueue<BLOCK_SIZE, TKey, KeyValue<TValue>, TCompare>
where
    TCompare: SortsBefore<TKey>,
{
    /// Adds a key and the value travelling with it.
    ///
    /// If the comparator panics, the queue is left exactly as it was before
    /// the call.
    ///
    /// ### Time complexity
    ///
    /// Average ***O(1)***, worst case ***O(log n)*** plus an ***O(n)***
    /// relocation when the storage grows.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::{BlockedPriorityQueue, KeyValue};
    /// let mut queue: BlockedPriorityQueue<16, i32, KeyValue<&str>> =
    ///     BlockedPriorityQueue::new();
    /// queue.push(2, "two");
    /// queue.push(1, "one");
    /// assert_eq!(queue.peek(), Some((&1, &"one")));
    /// ```
    #[inline]
    pub fn push(&mut self, key: TKey, value: TValue) {
        self.push_pair(key, value);
    }

    /// The minimum key and its value, or `None` when the queue is empty.
    #[inline]
    pub fn peek(&self) -> Option<(&TKey, &TValue)> {
        if self.is_empty() {
            None
        } else {
            Some((&self.keys[1], self.payloads.value(1)))
        }
    }

    /// Like [`peek`](Self::peek), but the value is mutable. The key stays
    /// shared: the heap order depends only on keys.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::{BlockedPriorityQueue, KeyValue};
    /// let mut queue: BlockedPriorityQueue<16, i32, KeyValue<u32>> =
    ///     BlockedPriorityQueue::new();
    /// queue.push(1, 10);
    /// if let Some((_, attempts)) = queue.peek_mut() {
    ///     *attempts += 1;
    /// }
    /// assert_eq!(queue.pop(), Some((1, 11)));
    /// ```
    #[inline]
    pub fn peek_mut(&mut self) -> Option<(&TKey, &mut TValue)> {
        if self.is_empty() {
            None
        } else {
            Some((&self.keys[1], self.payloads.value_mut(1)))
        }
    }

    /// Removes and returns the minimum key with its value.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)***.
    ///
    /// ### Examples
    ///
    /// ```
    /// use blocked_priority_queue::{BlockedPriorityQueue, KeyValue};
    /// let mut queue: BlockedPriorityQueue<16, i32, KeyValue<&str>> =
    ///     BlockedPriorityQueue::new();
    /// queue.push(2, "two");
    /// queue.push(1, "one");
    /// assert_eq!(queue.pop(), Some((1, "one")));
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<(TKey, TValue)> {
        self.pop_pair()
    }
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare> Default
    for BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
    TCompare: SortsBefore<TKey> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare> Clone
    for BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TKey: Clone,
    TPayload: PayloadStrategy,
    TPayload::Storage<BLOCK_SIZE>: Clone,
    TCompare: Clone,
{
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            payloads: self.payloads.clone(),
            compare: self.compare.clone(),
        }
    }
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare> Debug
    for BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TKey: Debug,
    TPayload: PayloadStrategy,
{
    /// Keys in storage order, not in priority order.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.keys.fmt(f)
    }
}

/// Unwind guard for the comparison phase of a push: drops the pair parked at
/// the back, restoring the pre-push state.
struct PushGuard<'a, const BLOCK_SIZE: usize, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
{
    queue: &'a mut BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>,
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare> Drop
    for PushGuard<'_, BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
{
    fn drop(&mut self) {
        self.queue.keys.pop_back();
        self.queue.payloads.pop_back();
    }
}

/// Unwind guard for pop's hole-to-bottom walk: on drop the back pair moves
/// into the hole and the end markers retract, so the heap stays structurally
/// valid even when a comparison panics mid-walk.
struct BackfillGuard<'a, const BLOCK_SIZE: usize, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
{
    queue: &'a mut BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>,
    hole: usize,
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare> Drop
    for BackfillGuard<'_, BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
{
    fn drop(&mut self) {
        let last = self.queue.keys.raw_len() - 1;
        // SAFETY: the back slot is occupied and `hole` is the single vacant
        // slot; after the transfer the vacancy sits at the back, where the
        // end markers retract over it.
        unsafe {
            if self.hole != last {
                self.queue.keys.transfer(last, self.hole);
                self.queue.payloads.transfer(last, self.hole);
            }
            self.queue.keys.forget_back();
            self.queue.payloads.forget_back();
        }
    }
}

/// A vacant slot plus the pair destined for it. Filling the slot in `drop`
/// keeps the heap structurally valid when a comparison panics mid-sift.
struct Hole<'a, const BLOCK_SIZE: usize, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
{
    queue: &'a mut BlockedPriorityQueue<BLOCK_SIZE, TKey, TPayload, TCompare>,
    pos: usize,
    key: ManuallyDrop<TKey>,
    value: ManuallyDrop<TPayload::Value>,
}

impl<const BLOCK_SIZE: usize, TKey, TPayload, TCompare> Drop
    for Hole<'_, BLOCK_SIZE, TKey, TPayload, TCompare>
where
    TPayload: PayloadStrategy,
{
    fn drop(&mut self) {
        // SAFETY: `pos` is the single vacant slot and the pair is taken out
        // of the ManuallyDrop wrappers exactly once.
        unsafe {
            let key = ManuallyDrop::take(&mut self.key);
            let value = ManuallyDrop::take(&mut self.value);
            self.queue.keys.put(self.pos, key);
            self.queue.payloads.put(self.pos, value);
        }
    }
}
