use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// An arena of `Value`s which can only be indexed by ids of type `Key`.
///
/// Curriculum blocks, flow vertices and flow edges all live in a [`KeyedVec`] and refer to each
/// other through their keys, which keeps the structures free of reference cycles.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct KeyedVec<Key, Value> {
    key: PhantomData<Key>,
    elements: Vec<Value>,
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        Self {
            key: PhantomData,
            elements: self.elements.clone(),
        }
    }
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        Self {
            key: PhantomData,
            elements: Vec::default(),
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    /// Creates an arena holding `len` copies of `value`.
    pub fn filled(len: usize, value: Value) -> Self
    where
        Value: Clone,
    {
        Self {
            key: PhantomData,
            elements: vec![value; len],
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Adds a value and returns the key under which it is stored.
    pub fn push(&mut self, value: Value) -> Key {
        self.elements.push(value);
        Key::create_from_index(self.elements.len() - 1)
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'_ Value> {
        self.elements.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.elements.len()).map(Key::create_from_index)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter_with_keys(&self) -> impl Iterator<Item = (Key, &'_ Value)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, value)| (Key::create_from_index(index), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &'_ mut Value> {
        self.elements.iter_mut()
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, index: Key) -> &Self::Output {
        &self.elements[index.index()]
    }
}

impl<Key: StorageKey, Value> Index<&Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, index: &Key) -> &Self::Output {
        &self.elements[index.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, index: Key) -> &mut Self::Output {
        &mut self.elements[index.index()]
    }
}

/// Implemented by the small integer ids that address a [`KeyedVec`].
pub trait StorageKey: Clone {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}

/// Declares a `Copy` id newtype over `u32` implementing [`StorageKey`].
#[macro_export]
#[doc(hidden)]
macro_rules! storage_key {
    ($(#[$attr:meta])* $vis:vis $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name(u32);

        impl $crate::containers::StorageKey for $name {
            fn index(&self) -> usize {
                self.0 as usize
            }

            fn create_from_index(index: usize) -> Self {
                $name(index as u32)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    storage_key!(TestKey);

    #[test]
    fn pushed_values_are_addressed_by_returned_keys() {
        let mut arena: KeyedVec<TestKey, &str> = KeyedVec::default();
        let first = arena.push("first");
        let second = arena.push("second");

        assert_eq!(arena[first], "first");
        assert_eq!(arena[second], "second");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut arena: KeyedVec<TestKey, u32> = KeyedVec::default();
        let _ = arena.push(10);
        let _ = arena.push(20);

        let pairs = arena
            .iter_with_keys()
            .map(|(key, value)| (key.index(), *value))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![(0, 10), (1, 20)]);
    }

    #[test]
    fn filled_arena_can_be_updated_in_place() {
        let mut arena: KeyedVec<TestKey, i64> = KeyedVec::filled(3, 0);
        arena[TestKey::create_from_index(1)] += 5;

        assert_eq!(arena.iter().copied().collect::<Vec<_>>(), vec![0, 5, 0]);
    }
}
