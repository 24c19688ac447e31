//! Instruction admission and cancellation scheduling.
//!
//! The instruction source owns the arena, the admission queue, the
//! cancellation schedule, the running program counter, and the RNG — all of
//! the mutable state outside the stage network. It performs:
//! 1. **Admission:** One new instruction per cycle while the queue has room.
//! 2. **Cancellation scheduling:** A coin flip at admission time picks a
//!    future slot in a delay-indexed schedule.
//! 3. **Cancellation delivery:** Each cycle the earliest slot is popped and
//!    every instruction in it is marked canceled.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::trace;

use crate::config::SourceConfig;
use crate::core::instruction::{InstrId, InstructionPool};
use crate::stats::SimStats;

/// FIFO of pending instructions awaiting a free reservation station.
///
/// Only the head slot is visible to the stage network: one station per cycle
/// may claim it, which marks the head consumed without shifting the queue.
/// The consumed head is dropped by [`AdmissionQueue::compact`] at the end of
/// the cycle, so admission never observes a half-removed slot.
#[derive(Debug)]
pub struct AdmissionQueue {
    slots: VecDeque<InstrId>,
    head_claimed: bool,
    capacity: usize,
}

impl AdmissionQueue {
    /// Creates an empty queue with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity),
            head_claimed: false,
            capacity,
        }
    }

    /// Number of pending slots (a consumed head still counts until compaction).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the queue holds no pending instructions.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Appends a freshly admitted instruction at the tail.
    pub fn push_back(&mut self, id: InstrId) {
        self.slots.push_back(id);
    }

    /// Claims the head instruction, if one is present and still unclaimed.
    ///
    /// The head stays in place (marked consumed) until [`Self::compact`];
    /// a second claim in the same cycle returns `None`, so at most one
    /// station admits per cycle.
    pub fn claim_head(&mut self) -> Option<InstrId> {
        if self.head_claimed {
            return None;
        }
        let id = self.slots.front().copied()?;
        self.head_claimed = true;
        Some(id)
    }

    /// Drops the head slot if it was consumed this cycle.
    pub fn compact(&mut self) {
        if self.head_claimed {
            self.slots.pop_front();
            self.head_claimed = false;
        }
    }

    /// Iterates over the pending instruction ids, head first.
    ///
    /// A consumed head is skipped; it no longer counts as pending.
    pub fn pending(&self) -> impl Iterator<Item = InstrId> + '_ {
        let skip = usize::from(self.head_claimed);
        self.slots.iter().skip(skip).copied()
    }
}

/// Delay-indexed cancellation schedule.
///
/// This is a FIFO over *slots*, not over absolute cycle numbers: every cycle
/// the front slot is popped regardless of content, so an entry scheduled at
/// delay `d` drifts forward with the queue rather than being pinned to a
/// wall-clock cycle.
#[derive(Debug, Default)]
pub struct CancelSchedule {
    slots: VecDeque<Vec<InstrId>>,
}

impl CancelSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an instruction into the slot `delay` positions from the front.
    pub fn insert(&mut self, delay: usize, id: InstrId) {
        while self.slots.len() <= delay {
            self.slots.push_back(Vec::new());
        }
        self.slots[delay].push(id);
    }

    /// Pops the earliest slot and returns its contents (empty when the
    /// schedule has nothing due).
    pub fn pop_due(&mut self) -> Vec<InstrId> {
        self.slots.pop_front().unwrap_or_default()
    }

    /// Whether any slot remains.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of remaining slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Generator of instructions with monotonically increasing program counters,
/// plus the queues that feed them into (and cancel them out of) the network.
#[derive(Debug)]
pub struct InstructionSource {
    pool: InstructionPool,
    queue: AdmissionQueue,
    schedule: CancelSchedule,
    next_pc: u64,
    pc_stride: u64,
    cancel_probability: f64,
    cancel_delay_max: usize,
    rng: Xoshiro256StarStar,
}

impl InstructionSource {
    /// Creates a source from configuration.
    ///
    /// A fixed `seed` makes the cancellation pattern reproducible; without
    /// one the RNG is seeded from entropy.
    pub fn new(config: &SourceConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(Xoshiro256StarStar::from_entropy, Xoshiro256StarStar::seed_from_u64);
        Self {
            pool: InstructionPool::new(),
            queue: AdmissionQueue::new(config.queue_capacity),
            schedule: CancelSchedule::new(),
            next_pc: config.start_pc,
            pc_stride: config.pc_stride,
            cancel_probability: config.cancel_probability,
            cancel_delay_max: config.cancel_delay_max,
            rng,
        }
    }

    /// Admits at most one new instruction, if the queue has room.
    ///
    /// The new instruction may also be scheduled for cancellation at a slot
    /// drawn uniformly from `1..=cancel_delay_max`.
    pub fn admit(&mut self, stats: &mut SimStats) {
        if self.queue.is_full() {
            return;
        }
        let pc = self.next_pc;
        self.next_pc = self.next_pc.wrapping_add(self.pc_stride);
        let id = self.pool.alloc(pc);
        self.queue.push_back(id);
        stats.instructions_admitted += 1;
        trace!(pc, "admitted instruction");

        if self.rng.gen_range(0.0..1.0) < self.cancel_probability {
            let delay = self.rng.gen_range(1..=self.cancel_delay_max);
            self.schedule.insert(delay, id);
            stats.cancellations_scheduled += 1;
            trace!(pc, delay, "scheduled cancellation");
        }
    }

    /// Pops the earliest schedule slot and marks its instructions canceled.
    ///
    /// Delivery is independent of where each instruction currently is —
    /// pending, held by a station, or already released.
    pub fn deliver_cancellations(&mut self, stats: &mut SimStats) {
        for id in self.schedule.pop_due() {
            let instr = self.pool.get_mut(id);
            instr.canceled = true;
            stats.cancellations_delivered += 1;
            trace!(pc = instr.pc, "delivered cancellation");
        }
    }

    /// Drops the admission queue head if it was consumed this cycle.
    pub fn compact_queue(&mut self) {
        self.queue.compact();
    }

    /// Read access to the instruction arena.
    pub fn pool(&self) -> &InstructionPool {
        &self.pool
    }

    /// Read access to the admission queue.
    pub fn queue(&self) -> &AdmissionQueue {
        &self.queue
    }

    /// Read access to the cancellation schedule.
    pub fn schedule(&self) -> &CancelSchedule {
        &self.schedule
    }

    /// Split mutable access for the commit phase (queue claims plus
    /// instruction back-reference updates).
    pub fn admission_mut(&mut self) -> (&mut AdmissionQueue, &mut InstructionPool) {
        (&mut self.queue, &mut self.pool)
    }
}
