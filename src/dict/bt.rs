//! Binary-search-tree dictionary store. Reuses `Hc`'s `move_pos`/
//! hashing/normalize skeleton (same `lz_pos`/`cyclic_pos` bookkeeping,
//! same hash layer), replacing the linear chain walk with a binary tree.

use alloc::vec;
use alloc::vec::Vec;

use crate::extend::extend_match;
use crate::hash::Hasher;
use crate::matches::{MatchFinder, Matches};
use crate::window::SlidingWindow;

/// Binary tree with a `WIDTH`-byte main hash. Each cyclic-buffer slot owns
/// two `son` cells: the left child (smaller prefixes) and the right child
/// (larger prefixes). Insert and search are fused: the walk both reports
/// matches and re-links the tree for the current position in one pass.
pub(crate) struct Bt<const WIDTH: usize> {
    hash: Hasher<WIDTH>,
    son: Vec<i32>,
    depth_limit: i32,
    cyclic_size: i32,
    cyclic_pos: i32,
    lz_pos: i32,
    normalize_threshold: i32,
}

impl<const WIDTH: usize> Bt<WIDTH> {
    pub(crate) fn new(
        dict_size: u32,
        expected_data_size: u32,
        nice_len: u32,
        depth_limit: i32,
        normalize_threshold: i32,
    ) -> Self {
        let son = vec![0; dict_size as usize * 2 + 2];

        Self {
            hash: Hasher::new(dict_size, expected_data_size),
            son,
            depth_limit: if depth_limit > 0 { depth_limit } else { 16 + nice_len as i32 / 2 },
            cyclic_size: dict_size as i32 + 1,
            cyclic_pos: -1,
            lz_pos: dict_size as i32 + 1,
            normalize_threshold,
        }
    }

    fn move_pos(&mut self, window: &mut SlidingWindow) -> i32 {
        let avail = window.move_pos(WIDTH as i32, WIDTH as i32);
        if avail != 0 {
            self.lz_pos += 1;
            if self.lz_pos >= self.normalize_threshold {
                let norm_offset = self.normalize_threshold - self.cyclic_size;
                self.hash.normalize(norm_offset);
                crate::normalize::normalize(&mut self.son, norm_offset);
                self.lz_pos = self.lz_pos.wrapping_sub(norm_offset);
            }

            self.cyclic_pos += 1;
            if self.cyclic_pos == self.cyclic_size {
                self.cyclic_pos = 0;
            }
        }
        avail
    }

    /// Fused insert+search: descends the tree rooted at `current_match`,
    /// reporting improving candidates into `matches` (when `Some`) and
    /// relinking the current position's two owned `son` cells as it goes.
    /// Shared by `find_matches` (reporting) and `skip` (maintenance only).
    fn insert_and_search(
        &mut self,
        window: &SlidingWindow,
        mut current_match: i32,
        match_len_limit: i32,
        nice_len_limit: i32,
        mut len_best: i32,
        mut matches: Option<&mut Matches>,
    ) {
        let cyclic_pos = self.cyclic_pos;
        let mut left_slot = (cyclic_pos * 2 + 1) as usize;
        let mut right_slot = (cyclic_pos * 2) as usize;
        let mut len0 = 0i32;
        let mut len1 = 0i32;
        let mut depth = self.depth_limit;

        loop {
            let delta = self.lz_pos - current_match;
            if {
                let tmp = depth;
                depth -= 1;
                tmp
            } == 0
                || delta >= self.cyclic_size
                || delta <= 0
            {
                self.son[left_slot] = 0;
                self.son[right_slot] = 0;
                return;
            }

            let pair_base = (cyclic_pos - delta + if delta > cyclic_pos { self.cyclic_size } else { 0 }) as usize * 2;

            let len = len0.min(len1);
            let len = extend_match(&window.buf, window.get_pos(), len, delta, match_len_limit);

            if len > len_best {
                len_best = len;
                if let Some(m) = matches.as_deref_mut() {
                    let count = m.count as usize;
                    m.len[count] = len as u32;
                    m.dist[count] = delta - 1;
                    m.count += 1;
                }
                if len >= nice_len_limit {
                    self.son[left_slot] = self.son[pair_base];
                    self.son[right_slot] = self.son[pair_base + 1];
                    return;
                }
            }

            if window.get_byte(len, delta) < window.get_byte(len, 0) {
                self.son[right_slot] = current_match;
                right_slot = pair_base + 1;
                current_match = self.son[right_slot];
                len1 = len;
            } else {
                self.son[left_slot] = current_match;
                left_slot = pair_base;
                current_match = self.son[left_slot];
                len0 = len;
            }
        }
    }
}

impl<const WIDTH: usize> MatchFinder for Bt<WIDTH> {
    fn find_matches(&mut self, window: &mut SlidingWindow, matches: &mut Matches) {
        matches.count = 0;
        let mut match_len_limit = window.match_len_max as i32;
        let mut nice_len_limit = window.nice_len as i32;
        let avail = self.move_pos(window);

        if avail < match_len_limit {
            if avail == 0 {
                return;
            }
            match_len_limit = avail;
            if nice_len_limit > avail {
                nice_len_limit = avail;
            }
        }

        self.hash.calc_hashes(window.read_buffer());
        let mut len_best = 0;

        if WIDTH >= 3 {
            let mut delta2 = self.lz_pos.wrapping_sub(self.hash.hash2_pos());
            let delta3 = if WIDTH >= 4 {
                self.lz_pos.wrapping_sub(self.hash.hash3_pos())
            } else {
                delta2
            };

            if delta2 < self.cyclic_size
                && window.get_byte_by_pos(window.get_pos() - delta2) == window.get_byte_by_pos(window.get_pos())
            {
                len_best = 2;
                matches.len[0] = 2;
                matches.dist[0] = delta2 - 1;
                matches.count = 1;
            }

            if WIDTH >= 4
                && delta2 != delta3
                && delta3 < self.cyclic_size
                && window.get_byte(0, delta3) == window.get_current_byte()
            {
                len_best = 3;
                let count = matches.count as usize;
                matches.dist[count] = delta3 - 1;
                matches.count += 1;
                delta2 = delta3;
            }

            if matches.count > 0 {
                len_best = extend_match(&window.buf, window.get_pos(), len_best, delta2, match_len_limit);
                let count = matches.count as usize;
                matches.len[count - 1] = len_best as u32;
            }
        }

        let current_match = self.hash.main_pos();
        self.hash.update_tables(self.lz_pos);

        // The tree walk re-derives its own starting length from len0/len1 as
        // it descends, so it only needs to know the best length already
        // reported by the h2/h3 probes above to avoid reporting a
        // non-improving duplicate at the same length.
        self.insert_and_search(window, current_match, match_len_limit, nice_len_limit, len_best, Some(matches));
    }

    fn skip(&mut self, window: &mut SlidingWindow, mut len: usize) {
        while len > 0 {
            len -= 1;
            let avail = self.move_pos(window);
            if avail != 0 {
                self.hash.calc_hashes(window.read_buffer());
                let current_match = self.hash.main_pos();
                self.hash.update_tables(self.lz_pos);

                let mut match_len_limit = window.match_len_max as i32;
                let mut nice_len_limit = window.nice_len as i32;
                if avail < match_len_limit {
                    match_len_limit = avail;
                    if nice_len_limit > avail {
                        nice_len_limit = avail;
                    }
                }

                self.insert_and_search(window, current_match, match_len_limit, nice_len_limit, 0, None);
            }
        }
    }

    fn get_mem_usage(dict_size: u32) -> u32 {
        Hasher::<WIDTH>::get_mem_usage(dict_size) + dict_size / (1024 / 8) + 10
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
    fn repeating_pattern_is_found() {
        let mut window = SlidingWindow::new(64, 4, 16, 32, 32);
        let mut bt = Bt::<4>::new(64, 0, 32, 0, i32::MAX);
        feed(&mut window, b"aaaaaaaaaaaaaaaaaaaa");

        let mut matches = Matches::new(32);
        for _ in 0..4 {
            bt.find_matches(&mut window, &mut matches);
        }
        bt.find_matches(&mut window, &mut matches);
        assert!(matches.count > 0);
        let (len, dist) = matches.best().unwrap();
        assert_eq!(dist, 1);
        assert!(len >= 4);
    }

    #[test]
    fn distinct_bytes_produce_no_matches() {
        let mut window = SlidingWindow::new(256, 4, 16, 32, 32);
        let mut bt = Bt::<4>::new(256, 0, 32, 0, i32::MAX);
        let data: Vec<u8> = (0u8..64).collect();
        feed(&mut window, &data);

        let mut matches = Matches::new(32);
        for _ in 0..data.len() - 1 {
            bt.find_matches(&mut window, &mut matches);
            assert_eq!(matches.count, 0);
        }
    }

    #[test]
    fn lengths_reported_in_increasing_order() {
        let mut window = SlidingWindow::new(256, 4, 16, 64, 64);
        let mut bt = Bt::<4>::new(256, 0, 64, 0, i32::MAX);
        feed(&mut window, b"abcabcabcabcabcdabcabcabcabcabcd");

        let mut matches = Matches::new(64);
        for _ in 0..40 {
            bt.find_matches(&mut window, &mut matches);
            for w in 0..matches.count as usize {
                if w > 0 {
                    assert!(matches.len[w] > matches.len[w - 1]);
                }
            }
        }
    }
}
