//! Cache-efficient hash chain: replaces the HC linked-list layout with
//! fixed-size blocks so a chain walk touches one or two cache lines
//! instead of chasing pointers through the whole window.
//!
//! Layout is a flat `chain[numBuckets * slotSize]` array: cell 0 of each
//! block is a running insert count, cells `1..slotSize` are a circular
//! buffer of positions. `slotSize` is chosen from `level` at construction
//! time and kept as a runtime field rather than a further const-generic
//! axis; see DESIGN.md.

use alloc::vec;
use alloc::vec::Vec;

use crate::extend::extend_match;
use crate::hash::Hasher;
use crate::matches::{MatchFinder, Matches};
use crate::window::SlidingWindow;

/// Cache-efficient hash chain with a `WIDTH`-byte main hash and a
/// construction-time slot size (8 or 16 cells per bucket, including the
/// head cell).
pub(crate) struct Cehc<const WIDTH: usize> {
    hash: Hasher<WIDTH>,
    chain: Vec<u32>,
    slot_size: u32,
    cut_value: u32,
    lz_pos: i32,
    history_size: i32,
    normalize_threshold: i32,
}

impl<const WIDTH: usize> Cehc<WIDTH> {
    pub(crate) fn new(
        dict_size: u32,
        expected_data_size: u32,
        slot_size: u32,
        cut_value: u32,
        normalize_threshold: i32,
    ) -> Self {
        debug_assert!(slot_size == 8 || slot_size == 16);
        let hash = Hasher::new(dict_size, expected_data_size);
        let num_buckets = hash.bucket_count();
        let chain = vec![0u32; num_buckets as usize * slot_size as usize];

        Self {
            hash,
            chain,
            slot_size,
            // The chain can hold no more entries than slot_size - 1.
            cut_value: cut_value.min(slot_size - 1),
            lz_pos: dict_size as i32 + 1,
            history_size: dict_size as i32,
            normalize_threshold,
        }
    }

    #[inline(always)]
    fn block_base(&self, bucket: u32) -> usize {
        bucket as usize * self.slot_size as usize
    }

    fn move_pos(&mut self, window: &mut SlidingWindow) -> i32 {
        let avail = window.move_pos(WIDTH as i32, WIDTH as i32);
        if avail != 0 {
            self.lz_pos += 1;
            if self.lz_pos >= self.normalize_threshold {
                let norm_offset = self.normalize_threshold - self.history_size;
                self.hash.normalize(norm_offset);
                self.normalize_chain(norm_offset);
                self.lz_pos = self.lz_pos.wrapping_sub(norm_offset);
            }
        }
        avail
    }

    /// Position cells are interleaved with per-bucket insert counters, so
    /// the shared SIMD `normalize` (which assumes every cell holds a
    /// position) can't run over the whole array. Walk each block and only
    /// touch its position cells.
    fn normalize_chain(&mut self, norm_offset: i32) {
        for base in (0..self.chain.len()).step_by(self.slot_size as usize) {
            for cell in &mut self.chain[base + 1..base + self.slot_size as usize] {
                *cell = (*cell as i32 - norm_offset).max(0) as u32;
            }
        }
    }

    /// `chain[base]` holds the total number of inserts ever made to this
    /// bucket. The `k`-th insert (`k` starting at 0) always lands in cell
    /// `1 + (k % span)`, so the most recent entry is recoverable without a
    /// separate write-cursor table.
    fn insert(&mut self, bucket: u32, pos: u32) {
        let base = self.block_base(bucket);
        let span = self.slot_size - 1;
        let n = self.chain[base];
        let slot = base + 1 + (n % span) as usize;
        self.chain[slot] = pos;
        self.chain[base] = n + 1;
    }

    /// Walks a bucket's chain most-recent-first, bounded by `cut_value`,
    /// the slot span, and the number of entries actually inserted so far.
    fn walk(&self, bucket: u32) -> impl Iterator<Item = u32> + '_ {
        let base = self.block_base(bucket);
        let span = self.slot_size - 1;
        let n = self.chain[base];
        let remaining = n.min(span).min(self.cut_value);

        let mut next_k = if n == 0 { None } else { Some(n - 1) };
        let mut left = remaining;
        core::iter::from_fn(move || {
            if left == 0 {
                return None;
            }
            let k = next_k?;
            left -= 1;
            next_k = if k == 0 { None } else { Some(k - 1) };
            let slot = base + 1 + (k % span) as usize;
            Some(self.chain[slot])
        })
    }
}

impl<const WIDTH: usize> MatchFinder for Cehc<WIDTH> {
    fn find_matches(&mut self, window: &mut SlidingWindow, matches: &mut Matches) {
        matches.count = 0;
        let mut match_len_limit = window.match_len_max as i32;
        let mut nice_len_limit = window.nice_len as i32;

        let avail = self.move_pos(window);
        if avail == 0 {
            return;
        }
        if avail < match_len_limit {
            match_len_limit = avail;
            if nice_len_limit > avail {
                nice_len_limit = avail;
            }
        }

        self.hash.calc_hashes(window.read_buffer());
        let bucket = self.hash.main_bucket();
        // Matches shorter than the hash width add nothing a chain lookup
        // didn't already give the caller for free (same floor as Hc/Bt).
        let mut len_best = (WIDTH as i32).min(3) - 1;

        for candidate in self.walk(bucket) {
            let delta = self.lz_pos - candidate as i32;
            if delta <= 0 || delta > self.history_size {
                continue;
            }
            let len = extend_match(&window.buf, window.get_pos(), 0, delta, match_len_limit);
            if len > len_best {
                len_best = len;
                let count = matches.count as usize;
                matches.len[count] = len as u32;
                matches.dist[count] = delta - 1;
                matches.count += 1;
                if len >= nice_len_limit {
                    break;
                }
            }
        }

        self.hash.update_tables(self.lz_pos);
        self.insert(bucket, self.lz_pos as u32);
    }

    fn skip(&mut self, window: &mut SlidingWindow, mut len: usize) {
        while len > 0 {
            len -= 1;
            if self.move_pos(window) != 0 {
                self.hash.calc_hashes(window.read_buffer());
                let bucket = self.hash.main_bucket();
                self.hash.update_tables(self.lz_pos);
                self.insert(bucket, self.lz_pos as u32);
            }
        }
    }

    fn get_mem_usage(dict_size: u32) -> u32 {
        let hash = Hasher::<WIDTH>::get_mem_usage(dict_size);
        let slots_kib = (Hasher::<WIDTH>::bucket_count_for(dict_size) as u64 * 16 * 4) / 1024;
        hash + slots_kib as u32 + 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ByteSource;

    fn feed(window: &mut SlidingWindow, data: &[u8]) {
        let mut src: &[u8] = data;
        let n = window.write_pos as usize;
        let len = ByteSource::read(&mut src, &mut window.buf[n..]).unwrap();
        window.write_pos += len as i32;
        window.read_limit = window.write_pos - window.keep_size_after as i32;
    }

    #[test]
    fn chain_walk_never_exceeds_slot_size_minus_one() {
        let mut window = SlidingWindow::new(1 << 16, 4, 16, 32, 32);
        let mut c = Cehc::<4>::new(1 << 16, 0, 8, 255, i32::MAX);
        // Force 100 positions into the same bucket by repeating the same
        // 4-byte n-gram throughout.
        let mut data = Vec::new();
        for _ in 0..100 {
            data.extend_from_slice(b"abcd");
        }
        feed(&mut window, &data);

        let mut matches = Matches::new(32);
        let mut visited_counts = Vec::new();
        for _ in 0..90 {
            matches.count = 0;
            c.find_matches(&mut window, &mut matches);
            visited_counts.push(matches.count);
        }
        // cut_value was clamped to slot_size - 1 = 7, so no single call can
        // have inserted and reported more than 7 improving candidates.
        assert!(visited_counts.iter().all(|&n| n <= 7));
    }

    #[test]
    fn repeating_pattern_is_found() {
        let mut window = SlidingWindow::new(64, 4, 16, 32, 32);
        let mut c = Cehc::<4>::new(64, 0, 16, 15, i32::MAX);
        feed(&mut window, b"aaaaaaaaaaaaaaaaaaaa");

        let mut matches = Matches::new(32);
        for _ in 0..20 {
            matches.count = 0;
            c.find_matches(&mut window, &mut matches);
        }
        assert!(matches.count > 0);
    }

    #[test]
    fn distinct_bytes_produce_no_matches() {
        let mut window = SlidingWindow::new(256, 4, 16, 32, 32);
        let mut c = Cehc::<4>::new(256, 0, 16, 15, i32::MAX);
        let data: Vec<u8> = (0u8..64).collect();
        feed(&mut window, &data);

        let mut matches = Matches::new(32);
        for _ in 0..data.len() - 1 {
            matches.count = 0;
            c.find_matches(&mut window, &mut matches);
            assert_eq!(matches.count, 0);
        }
    }
}
