//! Rolling colony statistics for the viewer's graphs.

use crate::simulation::AntSimulation;

/// Ring buffer that stores the last N samples of a metric.
pub struct RingBuffer {
    data: Vec<f32>,
    head: usize,
    len: usize,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity],
            head: 0,
            len: 0,
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        self.data[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Return samples in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let start = if self.len < self.capacity { 0 } else { self.head };
        (0..self.len).map(move |i| self.data[(start + i) % self.capacity])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last(&self) -> Option<f32> {
        if self.len == 0 {
            None
        } else {
            let idx = (self.head + self.capacity - 1) % self.capacity;
            Some(self.data[idx])
        }
    }
}

pub struct ColonyStats {
    /// Food delivered to the nest per sample interval.
    pub deliveries: RingBuffer,
    /// Food picked up per sample interval.
    pub pickups: RingBuffer,
    /// Fraction of ants carrying food at sample time.
    pub carrying_fraction: RingBuffer,
    pub sample_interval: u32,
    tick_counter: u32,
    last_collected: u64,
    last_delivered: u64,
}

impl ColonyStats {
    pub fn new(capacity: usize, sample_interval: u32) -> Self {
        Self {
            deliveries: RingBuffer::new(capacity),
            pickups: RingBuffer::new(capacity),
            carrying_fraction: RingBuffer::new(capacity),
            sample_interval: sample_interval.max(1),
            tick_counter: 0,
            last_collected: 0,
            last_delivered: 0,
        }
    }

    /// Call once per tick; pushes a sample every `sample_interval` ticks.
    pub fn record(&mut self, sim: &AntSimulation) {
        self.tick_counter += 1;
        if self.tick_counter % self.sample_interval != 0 {
            return;
        }

        let collected = sim.food_collected();
        let delivered = sim.food_at_nest();
        self.pickups.push((collected - self.last_collected) as f32);
        self.deliveries.push((delivered - self.last_delivered) as f32);
        self.last_collected = collected;
        self.last_delivered = delivered;

        let ants = sim.ants().len().max(1);
        self.carrying_fraction.push(sim.carrying_count() as f32 / ants as f32);
    }
}
