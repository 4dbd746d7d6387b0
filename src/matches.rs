use alloc::vec;
use alloc::vec::Vec;

use crate::window::SlidingWindow;

/// Output buffer for a single `get_matches` call. Pairs are stored in
/// strictly increasing length order; `dist[i]` is already `distance - 1`
/// so LZ4-style callers can fit it in 16 bits.
pub struct Matches {
    pub(crate) len: Vec<u32>,
    pub(crate) dist: Vec<i32>,
    pub(crate) count: u32,
}

impl Matches {
    pub(crate) fn new(count_max: usize) -> Self {
        Self {
            len: vec![0; count_max],
            dist: vec![0; count_max],
            count: 0,
        }
    }

    /// Number of `(length, distance)` pairs produced by the last call.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterates the reported pairs as `(length, distance)`, with `distance`
    /// already converted back from the stored `distance - 1` wire form.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let count = self.count as usize;
        self.len[..count]
            .iter()
            .zip(self.dist[..count].iter())
            .map(|(&l, &d)| (l, (d + 1) as u32))
    }

    /// Longest match found, if any.
    pub fn best(&self) -> Option<(u32, u32)> {
        if self.count == 0 {
            None
        } else {
            let i = self.count as usize - 1;
            Some((self.len[i], (self.dist[i] + 1) as u32))
        }
    }

    /// Appends the wire-compatible binary form: two little-endian `u32`
    /// words per pair, `length` then `distance - 1`.
    pub fn write_le_pairs(&self, out: &mut Vec<u8>) {
        for i in 0..self.count as usize {
            out.extend_from_slice(&self.len[i].to_le_bytes());
            out.extend_from_slice(&(self.dist[i] as u32).to_le_bytes());
        }
    }
}

/// The match search engine's interface, implemented once per dictionary
/// store. Dispatch across `{Hc, Bt, Cehc} x {2,3,4,5}` is resolved once at
/// session creation rather than branching inside these hot-path methods.
pub(crate) trait MatchFinder {
    fn find_matches(&mut self, window: &mut SlidingWindow, matches: &mut Matches);
    fn skip(&mut self, window: &mut SlidingWindow, len: usize);
    fn get_mem_usage(dict_size: u32) -> u32
    where
        Self: Sized;
}
