//! Configuration and stats interface (C9): the in-memory surface a
//! collector reads/writes, replacing the original eBPF ABI's fixed-index
//! config array and 1-entry stats map (spec §4.9, §6).

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::errors::ClassifyError;

const DEFAULT_CAPACITY_PER_GENERATION: usize = 500_000;

/// In-memory configuration. Loading from a file or environment is out
/// of scope (spec §1) — the crate only owns this in-memory surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub capacity_per_generation: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity_per_generation: DEFAULT_CAPACITY_PER_GENERATION,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Fluent builder, `#[must_use]` on every setter so a dropped
/// intermediate value can't be mistaken for a configured one.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    capacity_per_generation: usize,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            capacity_per_generation: DEFAULT_CAPACITY_PER_GENERATION,
        }
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn capacity_per_generation(mut self, capacity: usize) -> Self {
        self.capacity_per_generation = capacity;
        self
    }

    pub fn build(self) -> Result<Config, ClassifyError> {
        if self.capacity_per_generation == 0 {
            return Err(ClassifyError::ZeroCapacity);
        }
        Ok(Config {
            capacity_per_generation: self.capacity_per_generation,
        })
    }
}

/// Shared, externally-readable/writable stats and config surface.
///
/// Replaces the original's fixed-index `START_TIME_NS`/`FLOW_PAGE`
/// config slots and 1-entry `insert_failures` stats map — there is no
/// BPF map ABI to match in a userspace rewrite, but every field and its
/// read/write contract from spec §6 is preserved: the classifier only
/// initializes `start_time_ns` once and reads `active_page` per packet;
/// the collector owns flipping `active_page` and draining the inactive
/// generation.
#[derive(Debug, Default)]
pub struct Stats {
    pub start_time_ns: AtomicU64,
    /// `FLOW_PAGE`: 0 selects generation 0, 1 selects generation 1.
    pub active_page: AtomicU8,
    pub insert_failures: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: only the first call (process-wide) has any effect.
    pub(crate) fn init_start_time(&self, tm: u64) {
        if self
            .start_time_ns
            .compare_exchange(0, tm, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            tracing::debug!(start_time_ns = tm, "classifier observed its first packet");
        }
    }

    /// Flips the active generation. A collector convenience — the
    /// classifier itself never calls this (spec §4.8's rotation
    /// discipline is external).
    pub fn flip_page(&self) -> u8 {
        let previous = self.active_page.fetch_xor(1, Ordering::SeqCst);
        tracing::info!(from = previous, to = previous ^ 1, "flow page flipped");
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_matches_spec() {
        assert_eq!(Config::default().capacity_per_generation, 500_000);
    }

    #[test]
    fn builder_rejects_zero_capacity() {
        let err = ConfigBuilder::new().capacity_per_generation(0).build().unwrap_err();
        assert_eq!(err, ClassifyError::ZeroCapacity);
    }

    #[test]
    fn init_start_time_is_idempotent() {
        let stats = Stats::new();
        stats.init_start_time(100);
        stats.init_start_time(200);
        assert_eq!(stats.start_time_ns.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn flip_page_toggles_between_zero_and_one() {
        let stats = Stats::new();
        assert_eq!(stats.active_page.load(Ordering::Relaxed), 0);
        stats.flip_page();
        assert_eq!(stats.active_page.load(Ordering::Relaxed), 1);
        stats.flip_page();
        assert_eq!(stats.active_page.load(Ordering::Relaxed), 0);
    }
}
