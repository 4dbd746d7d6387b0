//! Hash-chain dictionary store, generic over hash width 2..=5 via the
//! `WIDTH` const generic.

use alloc::vec;
use alloc::vec::Vec;

use crate::extend::extend_match;
use crate::hash::Hasher;
use crate::matches::{MatchFinder, Matches};
use crate::window::SlidingWindow;

/// Hash chain with a `WIDTH`-byte main hash.
pub(crate) struct Hc<const WIDTH: usize> {
    hash: Hasher<WIDTH>,
    chain: Vec<i32>,
    depth_limit: i32,
    cyclic_size: i32,
    cyclic_pos: i32,
    lz_pos: i32,
    normalize_threshold: i32,
}

impl<const WIDTH: usize> Hc<WIDTH> {
    pub(crate) fn new(
        dict_size: u32,
        expected_data_size: u32,
        nice_len: u32,
        depth_limit: i32,
        normalize_threshold: i32,
    ) -> Self {
        let chain = vec![0; dict_size as usize + 1];

        Self {
            hash: Hasher::new(dict_size, expected_data_size),
            chain,
            depth_limit: if depth_limit > 0 { depth_limit } else { 4 + nice_len as i32 / 4 },
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
                crate::normalize::normalize(&mut self.chain, norm_offset);
                self.lz_pos = self.lz_pos.wrapping_sub(norm_offset);
            }

            self.cyclic_pos += 1;
            if self.cyclic_pos == self.cyclic_size {
                self.cyclic_pos = 0;
            }
        }
        avail
    }
}

impl<const WIDTH: usize> MatchFinder for Hc<WIDTH> {
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
        let mut current_match;
        let mut len_best = 0;

        if WIDTH >= 3 {
            let mut delta2 = self.lz_pos.wrapping_sub(self.hash.hash2_pos());
            let delta3 = if WIDTH >= 4 {
                self.lz_pos.wrapping_sub(self.hash.hash3_pos())
            } else {
                delta2
            };
            current_match = self.hash.main_pos();
            self.hash.update_tables(self.lz_pos);
            self.chain[self.cyclic_pos as usize] = current_match;

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
                if len_best >= nice_len_limit {
                    return;
                }
            }
        } else {
            current_match = self.hash.main_pos();
            self.hash.update_tables(self.lz_pos);
            self.chain[self.cyclic_pos as usize] = current_match;
        }

        let min_best = (WIDTH as i32).min(3);
        if len_best < min_best {
            len_best = min_best;
        }

        let mut depth = self.depth_limit;
        loop {
            let delta = self.lz_pos - current_match;
            if {
                let tmp = depth;
                depth -= 1;
                tmp
            } == 0
                || delta >= self.cyclic_size
            {
                return;
            }

            let i = self.cyclic_pos - delta + if delta > self.cyclic_pos { self.cyclic_size } else { 0 };
            current_match = self.chain[i as usize];

            if window.get_byte(len_best, delta) == window.get_byte(len_best, 0)
                && window.get_byte(0, delta) == window.get_current_byte()
            {
                let len = extend_match(&window.buf, window.get_pos(), 1, delta, match_len_limit);
                if len > len_best {
                    len_best = len;
                    let count = matches.count as usize;
                    matches.len[count] = len as u32;
                    matches.dist[count] = delta - 1;
                    matches.count += 1;
                    if len >= nice_len_limit {
                        return;
                    }
                }
            }
        }
    }

    fn skip(&mut self, window: &mut SlidingWindow, mut len: usize) {
        while len > 0 {
            len -= 1;
            if self.move_pos(window) != 0 {
                self.hash.calc_hashes(window.read_buffer());
                self.chain[self.cyclic_pos as usize] = self.hash.main_pos();
                self.hash.update_tables(self.lz_pos);
            }
        }
    }

    fn get_mem_usage(dict_size: u32) -> u32 {
        Hasher::<WIDTH>::get_mem_usage(dict_size) + dict_size / (1024 / 4) + 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(window: &mut SlidingWindow, data: &[u8]) {
        let mut src: &[u8] = data;
        use crate::io::ByteSource;
        let n = window.write_pos as usize;
        let len = ByteSource::read(&mut src, &mut window.buf[n..]).unwrap();
        window.write_pos += len as i32;
        window.read_limit = window.write_pos - window.keep_size_after as i32;
    }

    #[test]
    fn repeating_pattern_is_found_at_width4() {
        let mut window = SlidingWindow::new(64, 4, 16, 32, 32);
        let mut hc = Hc::<4>::new(64, 0, 32, 0, i32::MAX);
        feed(&mut window, b"aaaaaaaaaaaaaaaaaaaa");

        let mut matches = Matches::new(32);
        for _ in 0..4 {
            hc.find_matches(&mut window, &mut matches);
        }
        hc.find_matches(&mut window, &mut matches);
        assert!(matches.count > 0);
        let (len, dist) = matches.best().unwrap();
        assert_eq!(dist, 1);
        assert!(len >= 4);
    }

    #[test]
    fn distinct_bytes_produce_no_matches() {
        let mut window = SlidingWindow::new(256, 4, 16, 32, 32);
        let mut hc = Hc::<4>::new(256, 0, 32, 0, i32::MAX);
        let data: Vec<u8> = (0u8..64).collect();
        feed(&mut window, &data);

        let mut matches = Matches::new(32);
        for _ in 0..data.len() - 1 {
            hc.find_matches(&mut window, &mut matches);
            assert_eq!(matches.count, 0, "unexpected match in all-distinct input");
        }
    }

    #[test]
    fn periodic_text_at_width3() {
        let mut window = SlidingWindow::new(256, 4, 16, 16, 16);
        let mut hc = Hc::<3>::new(256, 0, 16, 0, i32::MAX);
        feed(&mut window, b"abcabcabcabc");

        let mut matches = Matches::new(16);
        for _ in 0..3 {
            hc.find_matches(&mut window, &mut matches);
        }
        hc.find_matches(&mut window, &mut matches);
        assert!(matches.count > 0);
        let (_, dist) = matches.best().unwrap();
        assert_eq!(dist, 3);
    }

    #[test]
    fn skip_advances_without_reporting() {
        let mut window = SlidingWindow::new(64, 4, 16, 16, 16);
        let mut hc = Hc::<4>::new(64, 0, 16, 0, i32::MAX);
        feed(&mut window, b"abcdabcdabcdabcd");
        hc.skip(&mut window, 4);
        assert_eq!(window.get_pos(), 3);
    }
}
