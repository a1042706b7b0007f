//! Fixed-capacity particle pool with generational handles.
//!
//! Slots are handed out from a FIFO free list first, then grown up to the
//! capacity. When every slot is alive, the oldest live particle (acquisition
//! order) is forcibly recycled, so `acquire` never fails and the pool never
//! grows past its capacity.

use crate::particle::{BurstId, KindTag, Particle};
use std::collections::VecDeque;

/// Stable reference to a pool slot; stale once the slot is released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    index: u32,
    generation: u32,
}

impl ParticleHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

struct Slot {
    particle: Particle,
    generation: u32,
    alive: bool,
}

/// Result of an acquisition
pub struct Acquired<'a> {
    pub handle: ParticleHandle,
    /// Burst group of the live particle that was recycled to make room
    pub evicted: Option<BurstId>,
    pub particle: &'a mut Particle,
}

pub struct ParticlePool {
    slots: Vec<Slot>,
    free: VecDeque<u32>,
    /// Acquisition order; may hold stale handles until compaction
    order: VecDeque<ParticleHandle>,
    alive_count: usize,
    capacity: usize,
    recycled_total: u64,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            free: VecDeque::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            alive_count: 0,
            capacity,
            recycled_total: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Slots allocated so far (alive or free)
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Live particles forcibly recycled since construction
    pub fn recycled_total(&self) -> u64 {
        self.recycled_total
    }

    /// Hand out a slot reset to `kind` defaults. Never fails.
    pub fn acquire(&mut self, kind: KindTag) -> Acquired<'_> {
        let mut evicted = None;

        let index = if let Some(index) = self.free.pop_front() {
            index
        } else if self.slots.len() < self.capacity {
            self.slots.push(Slot {
                particle: Particle::blank(kind),
                generation: 0,
                alive: false,
            });
            (self.slots.len() - 1) as u32
        } else {
            let victim = self.pop_oldest_alive();
            let slot = &mut self.slots[victim.index()];
            slot.alive = false;
            slot.generation = slot.generation.wrapping_add(1);
            self.alive_count -= 1;
            self.recycled_total += 1;
            evicted = Some(slot.particle.group);
            tracing::trace!(index = victim.index, "pool saturated, recycling oldest particle");
            victim.index
        };

        if self.order.len() > self.alive_count * 2 + 64 {
            self.compact_order();
        }

        let slot = &mut self.slots[index as usize];
        slot.alive = true;
        slot.particle = Particle::blank(kind);
        let handle = ParticleHandle {
            index,
            generation: slot.generation,
        };
        self.alive_count += 1;
        self.order.push_back(handle);

        Acquired {
            handle,
            evicted,
            particle: &mut slot.particle,
        }
    }

    /// Acquire a slot and initialize it with `particle`
    pub fn spawn(&mut self, particle: Particle) -> (ParticleHandle, Option<BurstId>) {
        let acquired = self.acquire(particle.kind_tag());
        *acquired.particle = particle;
        (acquired.handle, acquired.evicted)
    }

    /// Return a slot to the free list. Stale handles are ignored (returns false).
    pub fn release(&mut self, handle: ParticleHandle) -> bool {
        if !self.is_alive(handle) {
            return false;
        }
        release_slot(
            &mut self.slots[handle.index()],
            handle.index,
            &mut self.free,
            &mut self.alive_count,
        );
        true
    }

    pub fn is_alive(&self, handle: ParticleHandle) -> bool {
        self.slots
            .get(handle.index())
            .map(|s| s.alive && s.generation == handle.generation)
            .unwrap_or(false)
    }

    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        let slot = self.slots.get(handle.index())?;
        (slot.alive && slot.generation == handle.generation).then_some(&slot.particle)
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        let slot = self.slots.get_mut(handle.index())?;
        (slot.alive && slot.generation == handle.generation).then_some(&mut slot.particle)
    }

    /// Visit live particles in acquisition order
    pub fn for_each_alive(&self, mut f: impl FnMut(ParticleHandle, &Particle)) {
        for handle in &self.order {
            let slot = &self.slots[handle.index()];
            if slot.alive && slot.generation == handle.generation {
                f(*handle, &slot.particle);
            }
        }
    }

    /// Mutable variant of [`for_each_alive`](Self::for_each_alive)
    pub fn for_each_alive_mut(&mut self, mut f: impl FnMut(ParticleHandle, &mut Particle)) {
        let Self { slots, order, .. } = self;
        for handle in order.iter() {
            let slot = &mut slots[handle.index()];
            if slot.alive && slot.generation == handle.generation {
                f(*handle, &mut slot.particle);
            }
        }
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> + '_ {
        self.order.iter().filter_map(move |handle| {
            let slot = &self.slots[handle.index()];
            (slot.alive && slot.generation == handle.generation).then_some((*handle, &slot.particle))
        })
    }

    /// Release every expired particle, reporting each one to `on_cull` first
    pub fn cull_expired(&mut self, mut on_cull: impl FnMut(&Particle)) -> usize {
        let Self {
            slots,
            order,
            free,
            alive_count,
            ..
        } = self;
        let mut culled = 0;
        for handle in order.iter() {
            let slot = &mut slots[handle.index()];
            if slot.alive && slot.generation == handle.generation && slot.particle.is_expired() {
                on_cull(&slot.particle);
                release_slot(slot, handle.index, free, alive_count);
                culled += 1;
            }
        }
        culled
    }

    /// Release every live particle of one burst group
    pub fn release_group(&mut self, group: BurstId) -> usize {
        let Self {
            slots,
            order,
            free,
            alive_count,
            ..
        } = self;
        let mut released = 0;
        for handle in order.iter() {
            let slot = &mut slots[handle.index()];
            if slot.alive && slot.generation == handle.generation && slot.particle.group == group {
                release_slot(slot, handle.index, free, alive_count);
                released += 1;
            }
        }
        released
    }

    pub fn count_in_group(&self, group: BurstId) -> usize {
        self.iter_alive().filter(|(_, p)| p.group == group).count()
    }

    /// Release everything. Allocated slots are kept for reuse.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.alive {
                slot.alive = false;
                slot.generation = slot.generation.wrapping_add(1);
                slot.particle.clear_transient();
            }
        }
        self.free.clear();
        self.free.extend(0..self.slots.len() as u32);
        self.order.clear();
        self.alive_count = 0;
    }

    fn pop_oldest_alive(&mut self) -> ParticleHandle {
        while let Some(handle) = self.order.pop_front() {
            let slot = &self.slots[handle.index()];
            if slot.alive && slot.generation == handle.generation {
                return handle;
            }
        }
        // Every live slot is in `order`, and this is only reached when all
        // slots are alive, so the loop always returns. Fall back to slot 0.
        ParticleHandle {
            index: 0,
            generation: self.slots[0].generation,
        }
    }

    fn compact_order(&mut self) {
        let slots = &self.slots;
        self.order.retain(|h| {
            let slot = &slots[h.index()];
            slot.alive && slot.generation == h.generation
        });
    }
}

fn release_slot(slot: &mut Slot, index: u32, free: &mut VecDeque<u32>, alive_count: &mut usize) {
    slot.alive = false;
    slot.generation = slot.generation.wrapping_add(1);
    slot.particle.clear_transient();
    free.push_back(index);
    *alive_count -= 1;
}
