//! Byte frequency counting, sequential and fork-join.

use crate::parallel::WorkerPool;

/// Occurrence count of every byte value that appears in the input.
///
/// Only symbols with a non-zero count are keys; iteration is in ascending
/// symbol order.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    fn zeroed() -> Self {
        FrequencyTable { counts: [0; 256] }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::zeroed();
        table.accumulate(data);
        table
    }

    /// Counts `data` on `pool`: one private table per partition, summed after the join.
    pub fn from_bytes_parallel(data: &[u8], pool: &WorkerPool) -> Self {
        let partials = pool.map_partitions(data, Self::from_bytes);

        let mut table = Self::zeroed();
        for partial in &partials {
            table.merge(partial);
        }
        table
    }

    fn accumulate(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn merge(&mut self, other: &FrequencyTable) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        match self.counts[symbol as usize] {
            0 => None,
            n => Some(n),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count != 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sum of all counts, equal to the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut table = Self::zeroed();
        for (symbol, count) in iter {
            table.counts[symbol as usize] += count;
        }
        table
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
