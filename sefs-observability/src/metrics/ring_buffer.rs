use std::collections::VecDeque;

/// Fixed-capacity FIFO sample window. Pushing past capacity drops the
/// oldest sample first — a rolling window, not a percentile sketch.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f64>() / self.samples.len() as f64
        }
    }

    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_sample_past_capacity() {
        let mut buf = RingBuffer::new(2);
        buf.push(1.0);
        buf.push(2.0);
        buf.push(3.0);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.average(), 2.5);
    }

    #[test]
    fn empty_buffer_reports_zero_average_and_no_last() {
        let buf = RingBuffer::new(4);
        assert_eq!(buf.average(), 0.0);
        assert_eq!(buf.last(), None);
    }
}
