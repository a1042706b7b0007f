//! Bounded position history stored inline in the particle

use skyburst_core::Vec3;

pub const TRAIL_CAPACITY: usize = 8;

/// Ring buffer of recent positions; the oldest point is evicted on overflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trail {
    points: [Vec3; TRAIL_CAPACITY],
    head: usize,
    len: usize,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Vec3) {
        self.points[self.head] = point;
        self.head = (self.head + 1) % TRAIL_CAPACITY;
        if self.len < TRAIL_CAPACITY {
            self.len += 1;
        }
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Points from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        let start = (self.head + TRAIL_CAPACITY - self.len) % TRAIL_CAPACITY;
        (0..self.len).map(move |i| self.points[(start + i) % TRAIL_CAPACITY])
    }
}
