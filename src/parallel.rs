//! Fork-join over a fixed number of workers.
//!
//! Input is split into contiguous partitions up front, each partition is
//! handled by one task, and results come back indexed by partition, never by
//! completion order.

use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use crate::error::{HuffmanError, Result};

pub struct WorkerPool {
    thread_pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(HuffmanError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("huffman-worker-{index}"))
            .build()
            .map_err(|e| HuffmanError::ThreadPool(e.to_string()))?;

        Ok(WorkerPool {
            thread_pool,
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `f` on every partition of `data` and joins the results in partition order.
    pub fn map_partitions<T, F>(&self, data: &[u8], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&[u8]) -> T + Sync,
    {
        let ranges = partition(data.len(), self.workers);
        debug!(
            "{} bytes split across {} partitions of at most {} bytes",
            data.len(),
            ranges.len(),
            ranges.first().map_or(0, |r| r.len())
        );

        self.thread_pool.install(|| {
            ranges
                .into_par_iter()
                .map(|range| f(&data[range]))
                .collect()
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

/// Splits `0..len` into `parts` contiguous ranges whose sizes differ by at most one.
///
/// Earlier ranges take the remainder. Trailing ranges are empty when `len < parts`.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let extra = len % parts;

    let mut start = 0;
    (0..parts)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_covers_input() {
        let ranges = partition(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn test_partition_more_parts_than_items() {
        let ranges = partition(2, 4);
        assert_eq!(ranges, vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn test_partition_empty() {
        assert_eq!(partition(0, 2), vec![0..0, 0..0]);
        assert!(partition(5, 0).is_empty());
    }

    #[test]
    fn test_results_in_partition_order() {
        let pool = WorkerPool::new(4).unwrap();
        let data: Vec<u8> = (0..=99).collect();
        let firsts = pool.map_partitions(&data, |chunk| chunk.first().copied());
        assert_eq!(firsts, vec![Some(0), Some(25), Some(50), Some(75)]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(HuffmanError::InvalidConfig(_))
        ));
    }
}
