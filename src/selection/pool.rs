//! Weighted candidate pool with cumulative-probability draws.
//!
//! Pools are built fresh for every selection round and discarded afterward.
//! Zero-weight entries stay structurally present (they can still be removed
//! by predicate) but carry no probability mass.

/// Ordered collection of `(value, weight)` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPool<T> {
    entries: Vec<(T, f64)>,
    total_weight: f64,
}

impl<T> Default for WeightedPool<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            total_weight: 0.0,
        }
    }
}

impl<T: Copy + PartialEq> WeightedPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Negative weights are clamped to zero.
    pub fn add_choice(&mut self, value: T, weight: f64) {
        let weight = weight.max(0.0);
        self.entries.push((value, weight));
        self.total_weight += weight;
    }

    /// Remove the first entry with this value. Returns whether one was found.
    pub fn remove_value(&mut self, value: T) -> bool {
        match self.entries.iter().position(|(v, _)| *v == value) {
            Some(i) => {
                self.remove_at(i);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) {
        self.entries.remove(index);
        self.rebuild_total();
    }

    /// Remove every entry matching the predicate.
    pub fn remove_all(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        self.entries.retain(|(v, _)| !predicate(v));
        self.rebuild_total();
    }

    // Recomputed on removal rather than subtracted, to keep float drift out
    // of the running total.
    fn rebuild_total(&mut self) {
        self.total_weight = self.entries.iter().map(|(_, w)| w).sum();
    }

    /// Map a uniform sample in `[0,1)` to an entry index proportional to
    /// weight. Returns `None` when no entry has positive weight; never
    /// returns a zero-weight index otherwise.
    pub fn draw_index(&self, u: f64) -> Option<usize> {
        if self.total_weight <= 0.0 {
            return None;
        }
        let target = u * self.total_weight;
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (i, (_, weight)) in self.entries.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = Some(i);
            if target < cumulative {
                return Some(i);
            }
        }
        // Float accumulation can leave target a hair past the final sum.
        last_positive
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> T {
        self.entries[index].0
    }

    pub fn weight_at(&self, index: usize) -> f64 {
        self.entries[index].1
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().map(|(v, _)| *v)
    }

    pub fn contains(&self, value: T) -> bool {
        self.entries.iter().any(|(v, _)| *v == value)
    }

    /// A new pool holding only the entries matching the predicate, weights
    /// and order preserved.
    pub fn filtered(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        let entries: Vec<(T, f64)> = self
            .entries
            .iter()
            .filter(|(v, _)| predicate(v))
            .copied()
            .collect();
        let total_weight = entries.iter().map(|(_, w)| w).sum();
        Self {
            entries,
            total_weight,
        }
    }
}
