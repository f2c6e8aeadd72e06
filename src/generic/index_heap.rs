/*!
A max-heap over a subset of elements with fixed indices.

In other words, a heap backed by a store of values indexed by `usize`, with a companion vector tracking where (if anywhere) each index currently sits in the heap.

The store of values stays constant as elements move on and off the heap, allowing the heap to act as a store of elements which may be *activated* when of interest.
For example, the [atom database](crate::db::atom) stores the activity of every atom on an [IndexHeap], while only atoms without a value are active --- an atom is removed on a decision and re-activated on a backjump.

```rust
# use orbit_sat::generic::index_heap::IndexHeap;
let mut heap = IndexHeap::default();

heap.add(600, 10);
heap.add(0, 70);

heap.activate(600);
heap.activate(0);

assert_eq!(heap.pop_max(), Some(0));
assert_eq!(heap.pop_max(), Some(600));
assert_eq!(heap.pop_max(), None);
```
*/

/// A max-heap over indices, ordered by stored values.
pub struct IndexHeap<V: PartialOrd + Default> {
    /// The value of each index, whether or not the index is active.
    values: Vec<V>,

    /// The position of each index on the heap, if active.
    position: Vec<Option<usize>>,

    /// The heap itself, as a vector of indices.
    heap: Vec<usize>,
}

impl<V: PartialOrd + Default> Default for IndexHeap<V> {
    fn default() -> Self {
        IndexHeap {
            values: Vec::default(),
            position: Vec::default(),
            heap: Vec::default(),
        }
    }
}

impl<V: PartialOrd + Default> IndexHeap<V> {
    /// Indexes `value` with `index`, growing the structure if required.
    ///
    /// The index is *not* active on the heap --- for this, [activate](IndexHeap::activate) should be called after this method.
    pub fn add(&mut self, index: usize, value: V) {
        while self.values.len() <= index {
            self.values.push(V::default());
            self.position.push(None);
        }
        self.values[index] = value;
    }

    /// True if `index` is active on the heap, false otherwise.
    pub fn active(&self, index: usize) -> bool {
        self.position.get(index).is_some_and(|p| p.is_some())
    }

    /// Activates `index` on the heap, or restores heap order for the index if already active.
    ///
    /// Returns true if the index was freshly activated.
    pub fn activate(&mut self, index: usize) -> bool {
        match self.position[index] {
            None => {
                let slot = self.heap.len();
                self.heap.push(index);
                self.position[index] = Some(slot);
                self.sift_up(slot);
                true
            }
            Some(slot) => {
                let slot = self.sift_up(slot);
                self.sift_down(slot);
                false
            }
        }
    }

    /// Removes `index` from the heap, if active.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.position[index] {
            None => false,
            Some(slot) => {
                let last = self.heap.len() - 1;
                self.heap.swap(slot, last);
                self.position[self.heap[slot]] = Some(slot);
                self.heap.pop();
                self.position[index] = None;
                if slot < self.heap.len() {
                    let slot = self.sift_up(slot);
                    self.sift_down(slot);
                }
                true
            }
        }
    }

    /// The active index with the maximum value, if any.
    pub fn peek_max(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    /// The maximum value of any active index, if any index is active.
    pub fn peek_max_value(&self) -> Option<&V> {
        self.peek_max().map(|index| &self.values[index])
    }

    /// Pops the active index with the maximum value off the heap.
    pub fn pop_max(&mut self) -> Option<usize> {
        let max = self.peek_max()?;
        self.remove(max);
        Some(max)
    }

    /// Restores heap order, e.g. after values have been revised en masse.
    pub fn heapify(&mut self) {
        for slot in (0..self.heap.len() / 2).rev() {
            self.sift_down(slot);
        }
    }

    /// Restores heap order for `index`, if active.
    pub fn heapify_if_active(&mut self, index: usize) {
        if let Some(slot) = self.position[index] {
            let slot = self.sift_up(slot);
            self.sift_down(slot);
        }
    }

    /// Deactivates every index, leaving values in place.
    pub fn clear_active(&mut self) {
        for index in self.heap.drain(..) {
            self.position[index] = None;
        }
    }

    /// The value indexed by `index`.
    pub fn value_at(&self, index: usize) -> &V {
        &self.values[index]
    }

    /// Sets the value of `index` to `value`, without restoring heap order.
    pub fn revalue(&mut self, index: usize, value: V) {
        self.values[index] = value;
    }

    /// Applies `f` to all (indexed) values, without restoring heap order.
    pub fn apply_to_all(&mut self, f: impl Fn(&V) -> V) {
        for value in self.values.iter_mut() {
            *value = f(value);
        }
    }

    /// A count of indices active on the heap.
    pub fn active_count(&self) -> usize {
        self.heap.len()
    }

    /// The active index at position `n` of the backing heap vector, in no particular order.
    ///
    /// Supports uniform choice over active indices.
    pub fn active_nth(&self, n: usize) -> Option<usize> {
        self.heap.get(n).copied()
    }

    /// A count of values indexed by the structure.
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

impl<V: PartialOrd + Default> IndexHeap<V> {
    /// Moves the element at `slot` towards the root while its value exceeds that of its parent, returning the final slot.
    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot != 0 {
            let parent = (slot - 1) / 2;
            if self.values[self.heap[parent]] >= self.values[self.heap[slot]] {
                break;
            }
            self.swap_slots(slot, parent);
            slot = parent;
        }
        slot
    }

    /// Moves the element at `slot` away from the root while some child has a greater value.
    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;

            let mut largest = slot;
            if self.values[self.heap[left]] > self.values[self.heap[largest]] {
                largest = left;
            }
            if right < self.heap.len()
                && self.values[self.heap[right]] > self.values[self.heap[largest]]
            {
                largest = right;
            }

            if largest == slot {
                break;
            }
            self.swap_slots(slot, largest);
            slot = largest;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a]] = Some(a);
        self.position[self.heap[b]] = Some(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_simple() {
        let mut heap = IndexHeap::default();
        heap.add(6, 10);
        heap.add(5, 20);
        heap.add(4, 30);
        heap.add(1, 60);
        heap.add(0, 70);
        for index in [6, 5, 4, 1, 0] {
            heap.activate(index);
        }

        assert_eq!(heap.pop_max(), Some(0));
        assert_eq!(heap.pop_max(), Some(1));
        assert_eq!(heap.pop_max(), Some(4));
        assert_eq!(heap.pop_max(), Some(5));
        assert_eq!(heap.pop_max(), Some(6));
        assert_eq!(heap.pop_max(), None);
    }

    #[test]
    fn heap_revalue() {
        let mut heap = IndexHeap::default();
        heap.add(6, 10);
        heap.add(4, 30);
        heap.add(1, 60);
        heap.add(0, 70);
        for index in [6, 4, 1, 0] {
            heap.activate(index);
        }

        heap.revalue(0, 0);
        heap.revalue(1, 1);
        heap.revalue(4, 4);
        heap.revalue(6, 6);
        heap.heapify();

        assert_eq!(heap.pop_max(), Some(6));
        assert_eq!(heap.pop_max(), Some(4));
        assert_eq!(heap.pop_max(), Some(1));
        assert_eq!(heap.pop_max(), Some(0));
    }

    #[test]
    fn heap_sparse() {
        let mut heap = IndexHeap::default();
        heap.add(600, 10);
        heap.add(0, 70);
        heap.activate(600);
        heap.activate(0);

        assert_eq!(heap.count(), 601);
        assert_eq!(heap.value_at(5), &i32::default());
        assert_eq!(heap.pop_max(), Some(0));
        assert_eq!(heap.pop_max(), Some(600));
        assert_eq!(heap.pop_max(), None);
    }

    #[test]
    fn heap_remove() {
        let mut heap = IndexHeap::default();
        for index in [6, 5, 4, 1, 0] {
            heap.add(index, index as i32);
            heap.activate(index);
        }

        assert!(heap.remove(4));
        assert!(!heap.remove(4));
        assert!(heap.remove(6));
        heap.revalue(4, 2);
        heap.activate(4);

        assert_eq!(heap.pop_max(), Some(5));
        assert_eq!(heap.pop_max(), Some(4));
        assert_eq!(heap.pop_max(), Some(1));
        assert_eq!(heap.pop_max(), Some(0));
    }
}
