//! Bounded sample buffer
//!
//! Fixed-capacity FIFO: pushing past capacity evicts the oldest sample.
//! The buffer never holds more than `capacity` samples and keeps
//! insertion order.

use std::collections::VecDeque;

use super::types::Sample;

/// Capacity-capped, oldest-evicted sample queue
#[derive(Debug, Clone)]
pub struct BoundedBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl BoundedBuffer {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a buffer pre-filled with `samples`, keeping only the latest
    /// `capacity` of them
    pub fn with_samples(capacity: usize, samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.extend(samples);
        buffer
    }

    /// Append a sample, returning the evicted sample if the buffer was full
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front()
        } else {
            None
        }
    }

    /// Append many samples in order
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) {
        for sample in samples {
            self.push(sample);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Copy the contents out, oldest first
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(range: std::ops::Range<i64>) -> Vec<Sample> {
        range.map(|i| Sample::new(i * 100, i as f64)).collect()
    }

    #[test]
    fn test_push_under_capacity() {
        let mut buffer = BoundedBuffer::new(5);
        assert_eq!(buffer.push(Sample::new(0, 1.0)), None);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.latest().map(|s| s.value), Some(1.0));
    }

    #[test]
    fn test_overflow_keeps_most_recent_in_order() {
        let mut buffer = BoundedBuffer::new(10);
        buffer.extend(samples(0..25));

        assert_eq!(buffer.len(), 10);
        let timestamps: Vec<i64> = buffer.iter().map(|s| s.timestamp).collect();
        let expected: Vec<i64> = (15..25).map(|i| i * 100).collect();
        assert_eq!(timestamps, expected);
    }

    #[test]
    fn test_push_returns_evicted() {
        let mut buffer = BoundedBuffer::with_samples(2, samples(0..2));
        let evicted = buffer.push(Sample::new(999, 9.0));
        assert_eq!(evicted.map(|s| s.timestamp), Some(0));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut buffer = BoundedBuffer::new(0);
        buffer.extend(samples(0..3));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot(), vec![Sample::new(200, 2.0)]);
    }

    #[test]
    fn test_clear() {
        let mut buffer = BoundedBuffer::with_samples(4, samples(0..4));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 4);
    }
}
