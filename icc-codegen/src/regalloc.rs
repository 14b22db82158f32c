//! Register Pool
//!
//! LIR has an unbounded supply of symbolic registers, so there is no spilling
//! and no liveness analysis. The pool hands out the lowest free register,
//! remembers which logical value (a variable name, `this`, a `_DV_<Class>`
//! tag) each register holds, and lets the generator release everything a
//! statement allocated once the statement is complete.

use crate::lir::Reg;
use log::trace;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Pool size used when the caller does not configure one
pub const DEFAULT_REGISTER_COUNT: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegAllocError {
    #[error("All {capacity} registers are in use")]
    OutOfRegisters { capacity: usize },

    #[error("Invalid register: {0}")]
    InvalidRegister(Reg),
}

/// Snapshot of the free list, used to release everything allocated after it
#[derive(Debug, Clone)]
pub struct PoolCheckpoint {
    free: BTreeSet<u32>,
}

/// Fixed-size pool of symbolic registers
#[derive(Debug, Clone)]
pub struct RegisterPool {
    capacity: usize,
    /// Free register ids; the smallest is handed out first
    free: BTreeSet<u32>,
    /// Tag of each register, indexed by `id - 1`
    tags: Vec<Option<String>>,
    /// Reverse map from tag to the register currently holding it
    bound: HashMap<String, Reg>,
    /// Register the last producer left its result in
    target: Option<Reg>,
}

impl RegisterPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: (1..=capacity as u32).collect(),
            tags: vec![None; capacity],
            bound: HashMap::new(),
            target: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocate the first free register
    pub fn allocate(&mut self) -> Result<Reg, RegAllocError> {
        let id = self
            .free
            .pop_first()
            .ok_or(RegAllocError::OutOfRegisters { capacity: self.capacity })?;
        trace!("allocate R{}", id);
        Ok(Reg(id))
    }

    /// Allocate a register and bind it to `tag` in one step
    pub fn allocate_for(&mut self, tag: &str) -> Result<Reg, RegAllocError> {
        let reg = self.allocate()?;
        self.bind(reg, tag)?;
        Ok(reg)
    }

    fn slot(&self, reg: Reg) -> Result<usize, RegAllocError> {
        let id = reg.id() as usize;
        if id == 0 || id > self.capacity {
            return Err(RegAllocError::InvalidRegister(reg));
        }
        Ok(id - 1)
    }

    /// Record that `reg` now holds `tag`; any other register holding the
    /// same tag loses it
    pub fn bind(&mut self, reg: Reg, tag: &str) -> Result<(), RegAllocError> {
        let slot = self.slot(reg)?;
        if let Some(old) = self.tags[slot].take() {
            self.bound.remove(&old);
        }
        if let Some(previous) = self.bound.insert(tag.to_string(), reg) {
            if previous != reg {
                let prev_slot = self.slot(previous)?;
                self.tags[prev_slot] = None;
            }
        }
        self.tags[slot] = Some(tag.to_string());
        Ok(())
    }

    /// Register currently bound to `tag`
    pub fn lookup(&self, tag: &str) -> Option<Reg> {
        self.bound.get(tag).copied()
    }

    pub fn tag_of(&self, reg: Reg) -> Option<&str> {
        let slot = self.slot(reg).ok()?;
        self.tags[slot].as_deref()
    }

    pub fn is_free(&self, reg: Reg) -> bool {
        self.free.contains(&reg.id())
    }

    /// Return a register to the pool and clear its tag; freeing a free
    /// register is a no-op
    pub fn free(&mut self, reg: Reg) -> Result<(), RegAllocError> {
        let slot = self.slot(reg)?;
        if let Some(tag) = self.tags[slot].take() {
            self.bound.remove(&tag);
        }
        if self.target == Some(reg) {
            self.target = None;
        }
        if self.free.insert(reg.id()) {
            trace!("free {}", reg);
        }
        Ok(())
    }

    /// Release every register; called at each method boundary
    pub fn free_all(&mut self) {
        self.free = (1..=self.capacity as u32).collect();
        self.tags.iter_mut().for_each(|t| *t = None);
        self.bound.clear();
        self.target = None;
    }

    pub fn set_target(&mut self, reg: Option<Reg>) {
        self.target = reg;
    }

    pub fn target(&self) -> Option<Reg> {
        self.target
    }

    pub fn checkpoint(&self) -> PoolCheckpoint {
        PoolCheckpoint {
            free: self.free.clone(),
        }
    }

    /// Free every register that was free at `checkpoint` and is in use now
    pub fn release_to(&mut self, checkpoint: &PoolCheckpoint) -> Result<(), RegAllocError> {
        let taken: Vec<u32> = checkpoint.free.difference(&self.free).copied().collect();
        for id in taken {
            self.free(Reg(id))?;
        }
        Ok(())
    }

    pub fn in_use(&self) -> usize {
        self.capacity - self.free.len()
    }

    /// `R<k>=<tag>` for every register in use, for trace output
    pub fn dump(&self) -> String {
        (1..=self.capacity as u32)
            .filter(|id| !self.free.contains(id))
            .map(|id| {
                let tag = self.tags[(id - 1) as usize].as_deref().unwrap_or("-");
                format!("R{}={}", id, tag)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTER_COUNT)
    }
}
