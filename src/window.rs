//! Sliding-window buffer manager: a single growable byte buffer holding
//! history plus look-ahead, relocated in place when the cursor nears the
//! end.

use alloc::vec;
use alloc::vec::Vec;

use crate::extend::extend_match;
use crate::io::ByteSource;
use crate::matches::MatchFinder;
use crate::normalize::MOVE_BLOCK_ALIGN_MASK;
use crate::{Error, Result};

pub(crate) struct SlidingWindow {
    pub(crate) keep_size_before: u32,
    pub(crate) keep_size_after: u32,
    pub(crate) match_len_max: u32,
    pub(crate) nice_len: u32,
    pub(crate) buf: Vec<u8>,
    pub(crate) buf_size: usize,
    pub(crate) read_pos: i32,
    pub(crate) read_limit: i32,
    pub(crate) finishing: bool,
    pub(crate) write_pos: i32,
    pub(crate) pending_size: u32,
    /// Latched upstream read failure: once set, `feed` and the
    /// dictionary's `get_matches` become no-ops that keep returning it.
    last_error: Option<Error>,
}

pub(crate) fn get_buf_size(
    dict_size: u32,
    extra_size_before: u32,
    extra_size_after: u32,
    match_len_max: u32,
) -> u32 {
    let keep_size_before = extra_size_before + dict_size;
    let keep_size_after = extra_size_after + match_len_max;
    let reserve_size = (dict_size / 2 + (256 << 10)).min(512 << 20);
    keep_size_before + keep_size_after + reserve_size
}

impl SlidingWindow {
    pub(crate) fn new(
        dict_size: u32,
        extra_size_before: u32,
        extra_size_after: u32,
        nice_len: u32,
        match_len_max: u32,
    ) -> Self {
        let buf_size = get_buf_size(dict_size, extra_size_before, extra_size_after, match_len_max);
        let keep_size_before = extra_size_before + dict_size;
        let keep_size_after = extra_size_after + match_len_max;

        Self {
            keep_size_before,
            keep_size_after,
            match_len_max,
            nice_len,
            buf: vec![0; buf_size as usize],
            buf_size: buf_size as usize,
            read_pos: -1,
            read_limit: -1,
            finishing: false,
            write_pos: 0,
            pending_size: 0,
            last_error: None,
        }
    }

    pub(crate) fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub(crate) fn is_started(&self) -> bool {
        self.read_pos != -1
    }

    pub(crate) fn read_buffer(&self) -> &[u8] {
        &self.buf[self.read_pos as usize..]
    }

    pub(crate) fn set_preset_dict(
        &mut self,
        dict_size: u32,
        preset_dict: &[u8],
        match_finder: &mut dyn MatchFinder,
    ) {
        debug_assert!(!self.is_started());
        debug_assert_eq!(self.write_pos, 0);
        let copy_size = preset_dict.len().min(dict_size as usize);
        let offset = preset_dict.len() - copy_size;
        self.buf[0..copy_size].copy_from_slice(&preset_dict[offset..(offset + copy_size)]);
        self.write_pos += copy_size as i32;
        match_finder.skip(self, copy_size);
    }

    fn move_window(&mut self) {
        let move_offset = (self.read_pos + 1 - self.keep_size_before as i32) & MOVE_BLOCK_ALIGN_MASK;
        let move_size = self.write_pos - move_offset;
        debug_assert!(move_size >= 0);
        debug_assert!(move_offset >= 0);

        let move_size = move_size as usize;
        let offset = move_offset as usize;
        self.buf.copy_within(offset..offset + move_size, 0);

        self.read_pos -= move_offset;
        self.read_limit -= move_offset;
        self.write_pos -= move_offset;
    }

    /// Pulls from `src` until the window has `keep_size_after` bytes of
    /// look-ahead past the cursor or the source is exhausted. Returns the
    /// number of bytes actually read. A read failure is latched and
    /// returned; subsequent calls return the same error without touching
    /// `src` again.
    pub(crate) fn feed(&mut self, src: &mut dyn ByteSource, match_finder: &mut dyn MatchFinder) -> Result<usize> {
        if let Some(err) = &self.last_error {
            return Err(clone_error(err));
        }
        debug_assert!(!self.finishing);

        if self.read_pos >= (self.buf_size as i32 - self.keep_size_after as i32) {
            self.move_window();
        }

        let dst_start = self.write_pos as usize;
        let dst_end = self.buf_size;
        let len = match src.read(&mut self.buf[dst_start..dst_end]) {
            Ok(len) => len,
            Err(err) => {
                self.last_error = Some(clone_error(&err));
                return Err(err);
            }
        };

        self.write_pos += len as i32;
        if self.write_pos >= self.keep_size_after as i32 {
            self.read_limit = self.write_pos - self.keep_size_after as i32;
        }
        self.process_pending_bytes(match_finder);
        Ok(len)
    }

    fn process_pending_bytes(&mut self, match_finder: &mut dyn MatchFinder) {
        if self.pending_size > 0 && self.read_pos < self.read_limit {
            self.read_pos -= self.pending_size as i32;
            let old_pending = self.pending_size;
            self.pending_size = 0;
            match_finder.skip(self, old_pending as usize);
            debug_assert!(self.pending_size < old_pending);
        }
    }

    pub(crate) fn set_flushing(&mut self, match_finder: &mut dyn MatchFinder) {
        self.read_limit = self.write_pos - 1;
        self.process_pending_bytes(match_finder);
    }

    pub(crate) fn set_finishing(&mut self, match_finder: &mut dyn MatchFinder) {
        self.read_limit = self.write_pos - 1;
        self.finishing = true;
        self.process_pending_bytes(match_finder);
    }

    pub(crate) fn has_enough_data(&self, already_read_len: i32) -> bool {
        self.read_pos - already_read_len < self.read_limit
    }

    #[inline(always)]
    pub(crate) fn available_bytes(&self) -> i32 {
        if self.read_pos < 0 {
            return self.write_pos;
        }
        self.write_pos - self.read_pos
    }

    #[inline(always)]
    pub(crate) fn get_pos(&self) -> i32 {
        self.read_pos
    }

    #[inline(always)]
    pub(crate) fn get_byte(&self, forward: i32, backward: i32) -> u8 {
        self.buf[(self.read_pos + forward - backward) as usize]
    }

    #[inline(always)]
    pub(crate) fn get_byte_by_pos(&self, pos: i32) -> u8 {
        self.buf[pos as usize]
    }

    #[inline(always)]
    pub(crate) fn get_current_byte(&self) -> u8 {
        self.buf[self.read_pos as usize]
    }

    #[inline(always)]
    pub(crate) fn get_match_len(&self, dist: i32, len_limit: i32) -> usize {
        extend_match(&self.buf, self.read_pos, 0, dist + 1, len_limit) as usize
    }

    pub(crate) fn verify_matches(&self, lens: &[u32], dists: &[i32], count: usize) -> bool {
        let len_limit = self.available_bytes().min(self.match_len_max as i32);
        for i in 0..count {
            let actual = extend_match(&self.buf, self.read_pos, 0, dists[i] + 1, len_limit);
            if actual as u32 != lens[i] {
                return false;
            }
        }
        true
    }

    /// Advances the cursor by one position. Returns the number of
    /// available look-ahead bytes, or `0` if the caller must stop and wait
    /// for more input (tracked via `pending_size`).
    pub(crate) fn move_pos(&mut self, required_for_flushing: i32, required_for_finishing: i32) -> i32 {
        debug_assert!(required_for_flushing >= required_for_finishing);
        self.read_pos += 1;
        let mut avail = self.write_pos - self.read_pos;
        if avail < required_for_flushing && (avail < required_for_finishing || !self.finishing) {
            self.pending_size += 1;
            avail = 0;
        }
        avail
    }
}

fn clone_error(err: &Error) -> Error {
    match err {
        Error::UpstreamRead(msg) => Error::UpstreamRead(msg),
        Error::Alloc => Error::Alloc,
        Error::Parameter(msg) => Error::Parameter(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;
    impl ByteSource for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
            Err(Error::UpstreamRead("boom"))
        }
    }

    struct NoopFinder;
    impl MatchFinder for NoopFinder {
        fn find_matches(&mut self, _window: &mut SlidingWindow, _matches: &mut crate::matches::Matches) {}
        fn skip(&mut self, _window: &mut SlidingWindow, _len: usize) {}
        fn get_mem_usage(_dict_size: u32) -> u32 {
            0
        }
    }

    #[test]
    fn feed_reads_available_bytes() {
        let mut w = SlidingWindow::new(1 << 12, 8, 8, 64, 273);
        let mut src: &[u8] = b"hello world";
        let n = w.feed(&mut src, &mut NoopFinder).unwrap();
        assert_eq!(n, 11);
        assert_eq!(w.write_pos, 11);
    }

    #[test]
    fn feed_latches_upstream_error() {
        let mut w = SlidingWindow::new(1 << 12, 8, 8, 64, 273);
        let mut src = FailingSource;
        assert!(w.feed(&mut src, &mut NoopFinder).is_err());
        // Subsequent calls keep failing without touching the source again.
        assert!(w.feed(&mut src, &mut NoopFinder).is_err());
        assert!(w.last_error().is_some());
    }

    #[test]
    fn move_pos_tracks_pending_when_starved() {
        let mut w = SlidingWindow::new(1 << 12, 8, 8, 64, 273);
        let mut src: &[u8] = b"ab";
        w.feed(&mut src, &mut NoopFinder).unwrap();
        // No look-ahead guarantee reached yet (keep_size_after not hit),
        // so moving past available bytes should register pending work.
        w.write_pos = 2;
        w.read_pos = -1;
        assert_eq!(w.move_pos(4, 4), 0);
        assert_eq!(w.pending_size, 1);
    }
}
