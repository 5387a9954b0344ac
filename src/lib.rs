//! A priority queue over a B-heap: the binary heap is laid out in fixed-size
//! blocks sized to a cache line, so the hot percolation paths of push and pop
//! touch `ceil(log_B n)` blocks instead of `log2 n` arbitrary cache lines.
//!
//! Keys can optionally carry a value; key and value always move together.
//! The queue pops the *minimum* key under its comparator (the natural `<` by
//! default, any strict-weak relation via [`SortsBefore`]). On top of the
//! usual operations there is [`reschedule_top`], which swaps a new key into
//! the current minimum and fixes the heap in one sift. That is the pattern
//! of timer queues and event simulations, where the earliest entry is
//! consumed and immediately re-armed.
//!
//! Push, pop and reschedule_top are ***O(log n)***; peek is ***O(1)***.
//!
//! [`reschedule_top`]: BlockedPriorityQueue::reschedule_top
//!
//! # Examples
//!
//! A tiny discrete-event simulation: every actor is scheduled at its next
//! event time, fires, and is re-scheduled in place.
//!
//! ```
//! use blocked_priority_queue::{BlockedPriorityQueue, KeyValue};
//!
//! struct Actor {
//!     name: &'static str,
//!     period: u64,
//! }
//!
//! let mut schedule: BlockedPriorityQueue<8, u64, KeyValue<Actor>> =
//!     BlockedPriorityQueue::new();
//!
//! schedule.push(10, Actor { name: "sensor", period: 10 });
//! schedule.push(25, Actor { name: "logger", period: 25 });
//!
//! let mut fired = Vec::new();
//! while let Some((&at, actor)) = schedule.peek() {
//!     if at > 60 {
//!         break;
//!     }
//!     fired.push((at, actor.name));
//!     let next = at + actor.period;
//!     // One sift instead of pop + push, and the Actor never moves out of
//!     // the queue.
//!     schedule.reschedule_top(next);
//! }
//!
//! assert_eq!(
//!     fired,
//!     vec![
//!         (10, "sensor"),
//!         (20, "sensor"),
//!         (25, "logger"),
//!         (30, "sensor"),
//!         (40, "sensor"),
//!         (50, "sensor"),
//!         (50, "logger"),
//!         (60, "sensor"),
//!     ],
//! );
//! ```
//!
//! The block size is a type-level constant so the heap arithmetic compiles
//! down to shifts and masks. Pick it so one block spans one or two cache
//! lines for your key type: 8 or 16 for `u64` keys on common hardware.

mod block_addressing;
mod blocked_priority_queue;
mod ordering;
mod payload;
mod skip_vector;

pub use crate::blocked_priority_queue::BlockedPriorityQueue;
pub use crate::ordering::{NaturalOrder, SortsBefore};
pub use crate::payload::{
    KeyOnly, KeyValue, NoValueStorage, PayloadStorage, PayloadStrategy, ValueStorage,
};

#[doc = include_str!("../Readme.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
