//! Memory probes

use sysinfo::System;

use super::sample::MemoryReading;

/// Source of memory readings for performance samples
pub trait MemoryProbe: Send {
    /// Current reading, or `None` when unavailable
    fn read(&mut self) -> Option<MemoryReading>;
}

/// System-wide memory via `sysinfo`: used = total - available, limit = total
pub struct SystemMemoryProbe {
    system: System,
}

impl SystemMemoryProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemoryProbe {
    fn read(&mut self) -> Option<MemoryReading> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return None;
        }
        let available = self.system.available_memory().min(total);
        Some(MemoryReading {
            used: total - available,
            limit: total,
        })
    }
}

/// Probe that never reports memory
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn read(&mut self) -> Option<MemoryReading> {
        None
    }
}

/// Probe returning a fixed reading
#[derive(Debug, Clone, Copy)]
pub struct FixedMemoryProbe(pub MemoryReading);

impl MemoryProbe for FixedMemoryProbe {
    fn read(&mut self) -> Option<MemoryReading> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_probe_is_consistent() {
        let mut probe = SystemMemoryProbe::new();
        if let Some(reading) = probe.read() {
            assert!(reading.limit > 0);
            assert!(reading.used <= reading.limit);
        }
    }

    #[test]
    fn test_no_probe() {
        assert_eq!(NoMemoryProbe.read(), None);
    }
}
