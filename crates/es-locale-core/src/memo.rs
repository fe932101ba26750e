//! Single-entry memoization with an injectable equality predicate.

use crate::utils::structurally_equal;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

type EqualityFn<I> = dyn Fn(&I, &I) -> bool + Send + Sync;

/// Remembers the last input and its output. A new input that the equality
/// predicate considers equal to the remembered one returns the cached
/// output without recomputing.
pub struct Memo<I, O> {
    equals: Box<EqualityFn<I>>,
    last: Mutex<Option<(I, Arc<O>)>>,
    recomputations: AtomicUsize,
}

impl<I, O> Memo<I, O> {
    pub fn new<F>(equals: F) -> Self
    where
        F: Fn(&I, &I) -> bool + Send + Sync + 'static,
    {
        Self {
            equals: Box::new(equals),
            last: Mutex::new(None),
            recomputations: AtomicUsize::new(0),
        }
    }

    pub fn get_or_compute<F>(&self, input: &I, compute: F) -> Arc<O>
    where
        I: Clone,
        F: FnOnce(&I) -> O,
    {
        let mut last = self.last.lock();
        if let Some((cached_input, output)) = last.as_ref()
            && (self.equals)(cached_input, input)
        {
            return Arc::clone(output);
        }

        let output = Arc::new(compute(input));
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        *last = Some((input.clone(), Arc::clone(&output)));
        output
    }

    /// How many times the output has been computed.
    pub fn recomputations(&self) -> usize {
        self.recomputations.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        *self.last.lock() = None;
    }
}

impl<I: Serialize + 'static, O> Memo<I, O> {
    /// A memo comparing inputs by serialized content.
    pub fn structural() -> Self {
        Self::new(|left: &I, right: &I| structurally_equal(left, right))
    }
}

impl<I, O> fmt::Debug for Memo<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("cached", &self.last.lock().is_some())
            .field("recomputations", &self.recomputations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn reuses_output_for_equal_inputs() {
        let memo: Memo<Vec<u32>, u32> = Memo::new(|a, b| a == b);

        let first = memo.get_or_compute(&vec![1, 2], |input| input.iter().sum());
        let second = memo.get_or_compute(&vec![1, 2], |_| unreachable!("cached"));

        assert_eq!(*first, 3);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(memo.recomputations(), 1);
    }

    #[test]
    fn recomputes_for_different_inputs() {
        let memo: Memo<Vec<u32>, u32> = Memo::new(|a, b| a == b);

        memo.get_or_compute(&vec![1], |input| input.iter().sum());
        let output = memo.get_or_compute(&vec![2, 3], |input| input.iter().sum());

        assert_eq!(*output, 5);
        assert_eq!(memo.recomputations(), 2);
    }

    #[test]
    fn structural_memo_compares_content() {
        let memo: Memo<BTreeMap<String, String>, usize> = Memo::structural();
        let mut input = BTreeMap::new();
        input.insert("a".to_string(), "1".to_string());

        memo.get_or_compute(&input, BTreeMap::len);
        memo.get_or_compute(&input.clone(), BTreeMap::len);
        assert_eq!(memo.recomputations(), 1);

        input.insert("b".to_string(), "2".to_string());
        memo.get_or_compute(&input, BTreeMap::len);
        assert_eq!(memo.recomputations(), 2);
    }

    #[test]
    fn clear_forgets_cached_output() {
        let memo: Memo<u8, u8> = Memo::new(|a, b| a == b);
        memo.get_or_compute(&1, |x| *x);
        memo.clear();
        memo.get_or_compute(&1, |x| *x);
        assert_eq!(memo.recomputations(), 2);
    }
}
