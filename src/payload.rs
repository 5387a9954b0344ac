//! Payload strategies: a queue either carries a value alongside every key or
//! carries keys alone. The selection is made at the type level so the
//! key-only variant compiles down to nothing.

use crate::skip_vector::SkipVector;

mod sealed {
    pub trait Sealed {}
}

/// Selects how a queue stores the data travelling with its keys.
///
/// Implemented by [`KeyOnly`] and [`KeyValue`]; the trait is sealed.
pub trait PayloadStrategy: sealed::Sealed {
    /// What a push accepts alongside a key: `()` for [`KeyOnly`], the value
    /// type for [`KeyValue`].
    type Value;
    /// Backing storage, indexed by the same logical positions as the keys.
    type Storage<const BLOCK_SIZE: usize>: PayloadStorage<Value = Self::Value>;
}

/// Slot operations the queue drives in lock-step with its key storage.
///
/// The unsafe operations have the same vacancy contract as the key side:
/// `take` leaves a slot vacant, `put` fills a vacant slot, `transfer` moves
/// the vacancy from `to` to `from`.
pub trait PayloadStorage: Default + sealed::Sealed {
    type Value;

    fn push_back(&mut self, value: Self::Value);
    fn pop_back(&mut self);
    /// Retract the end marker over an already-vacated back slot.
    unsafe fn forget_back(&mut self);
    unsafe fn take(&mut self, idx: usize) -> Self::Value;
    unsafe fn put(&mut self, idx: usize, value: Self::Value);
    unsafe fn transfer(&mut self, from: usize, to: usize);
    fn clear(&mut self);
}

/// Marker for queues that carry bare keys. All payload operations are
/// statically empty.
pub struct KeyOnly;

/// Marker for queues that carry a `TValue` with every key.
pub struct KeyValue<TValue> {
    _values: std::marker::PhantomData<TValue>,
}

impl sealed::Sealed for KeyOnly {}

impl<TValue> sealed::Sealed for KeyValue<TValue> {}

impl PayloadStrategy for KeyOnly {
    type Value = ();
    type Storage<const BLOCK_SIZE: usize> = NoValueStorage;
}

impl<TValue> PayloadStrategy for KeyValue<TValue> {
    type Value = TValue;
    type Storage<const BLOCK_SIZE: usize> = ValueStorage<BLOCK_SIZE, TValue>;
}

/// Zero-sized storage behind [`KeyOnly`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoValueStorage;

impl sealed::Sealed for NoValueStorage {}

impl PayloadStorage for NoValueStorage {
    type Value = ();

    #[inline(always)]
    fn push_back(&mut self, _value: ()) {}
    #[inline(always)]
    fn pop_back(&mut self) {}
    #[inline(always)]
    unsafe fn forget_back(&mut self) {}
    #[inline(always)]
    unsafe fn take(&mut self, _idx: usize) {}
    #[inline(always)]
    unsafe fn put(&mut self, _idx: usize, _value: ()) {}
    #[inline(always)]
    unsafe fn transfer(&mut self, _from: usize, _to: usize) {}
    #[inline(always)]
    fn clear(&mut self) {}
}

/// Skip-vector storage behind [`KeyValue`], sharing the key side's logical
/// indices so key and value always sit at the same position.
pub struct ValueStorage<const BLOCK_SIZE: usize, TValue> {
    values: SkipVector<BLOCK_SIZE, TValue>,
}

impl<const BLOCK_SIZE: usize, TValue> ValueStorage<BLOCK_SIZE, TValue> {
    #[inline]
    pub(crate) fn value(&self, idx: usize) -> &TValue {
        &self.values[idx]
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, idx: usize) -> &mut TValue {
        &mut self.values[idx]
    }
}

impl<const BLOCK_SIZE: usize, TValue> sealed::Sealed for ValueStorage<BLOCK_SIZE, TValue> {}

impl<const BLOCK_SIZE: usize, TValue> Default for ValueStorage<BLOCK_SIZE, TValue> {
    fn default() -> Self {
        Self {
            values: SkipVector::new(),
        }
    }
}

impl<const BLOCK_SIZE: usize, TValue: Clone> Clone for ValueStorage<BLOCK_SIZE, TValue> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<const BLOCK_SIZE: usize, TValue> PayloadStorage for ValueStorage<BLOCK_SIZE, TValue> {
    type Value = TValue;

    #[inline]
    fn push_back(&mut self, value: TValue) {
        self.values.push_back(value);
    }

    #[inline]
    fn pop_back(&mut self) {
        self.values.pop_back();
    }

    #[inline]
    unsafe fn forget_back(&mut self) {
        self.values.forget_back();
    }

    #[inline]
    unsafe fn take(&mut self, idx: usize) -> TValue {
        self.values.take(idx)
    }

    #[inline]
    unsafe fn put(&mut self, idx: usize, value: TValue) {
        self.values.put(idx, value);
    }

    #[inline]
    unsafe fn transfer(&mut self, from: usize, to: usize) {
        self.values.transfer(from, to);
    }

    #[inline]
    fn clear(&mut self) {
        self.values.clear();
    }
}
