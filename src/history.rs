use crate::sampling::Statistics;

/// Ring buffer of the most recent per-tick statistics, used for the plot.
#[derive(Debug, Clone)]
pub struct StatsHistory {
    ring: Vec<(u64, Statistics)>, // (tick, stats)
    capacity: usize,              // fixed slot count
    index: usize,                 // next slot in ring buffer
    stored: usize,                // how many ticks stored so far
}

impl StatsHistory {
    /// `capacity` is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: Vec::with_capacity(capacity),
            capacity,
            index: 0,
            stored: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.stored
    }

    pub fn is_empty(&self) -> bool {
        self.stored == 0
    }

    pub fn push(&mut self, tick: u64, stats: Statistics) {
        let cap = self.capacity;
        if self.ring.len() < cap {
            self.ring.push((tick, stats));
        } else {
            self.ring[self.index] = (tick, stats);
        }
        self.index = (self.index + 1) % cap;
        if self.stored < cap {
            self.stored += 1;
        }
    }

    pub fn clear(&mut self) {
        self.ring.clear();
        self.index = 0;
        self.stored = 0;
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &(u64, Statistics)> {
        // Until the ring wraps, `index == len` and everything is in order.
        let (newer, older) = self.ring.split_at(self.index.min(self.ring.len()));
        older.iter().chain(newer.iter())
    }

    pub fn latest(&self) -> Option<&Statistics> {
        if self.stored == 0 {
            return None;
        }
        let cap = self.capacity;
        let last = (self.index + cap - 1) % cap;
        self.ring.get(last).map(|(_, s)| s)
    }

    /// `[tick, true_mean]` pairs for plotting.
    pub fn true_points(&self) -> Vec<[f64; 2]> {
        self.iter().map(|(t, s)| [*t as f64, s.true_mean as f64]).collect()
    }

    /// `[tick, sampled_mean]` pairs, skipping ticks with an empty sample.
    pub fn sampled_points(&self) -> Vec<[f64; 2]> {
        self.iter()
            .filter_map(|(t, s)| s.sampled_mean.map(|m| [*t as f64, m as f64]))
            .collect()
    }
}
