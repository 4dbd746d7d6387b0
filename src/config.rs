//! Builder for the finder parameters: `historySize`, `matchMaxLen`, the
//! keep-buffer sizes, hash width, algorithm, search depth, and the CEHC
//! auto-selection rule, ending in `Config::build` which validates
//! everything up front so no partially constructed finder escapes.

use crate::dict::{Bt, Cehc, Hc};
use crate::dispatch::{Algorithm, FinderImpl};
use crate::error::error_parameter;
use crate::window::SlidingWindow;
use crate::{Finder, Result};

/// `historySize` beyond this would let `cyclic_size = historySize + 1`
/// overflow `i32`.
const MAX_HISTORY_SIZE: u32 = 1 << 30;

pub struct Config {
    history_size: u32,
    match_max_len: u32,
    keep_add_buffer_before: u32,
    keep_add_buffer_after: u32,
    num_hash_bytes: usize,
    algorithm: Algorithm,
    nice_len: u32,
    cut_value: u32,
    expected_data_size: u32,
    cache_efficient_search: bool,
    level: u32,
    normalize_threshold: i32,
}

impl Config {
    pub fn new(history_size: u32) -> Self {
        Self {
            history_size,
            match_max_len: 273,
            keep_add_buffer_before: 0,
            keep_add_buffer_after: 0,
            num_hash_bytes: 4,
            algorithm: Algorithm::Hc,
            nice_len: 64,
            cut_value: 0,
            expected_data_size: 0,
            cache_efficient_search: false,
            level: 6,
            normalize_threshold: i32::MAX,
        }
    }

    pub fn match_max_len(mut self, value: u32) -> Self {
        self.match_max_len = value;
        self
    }

    pub fn keep_add_buffer_before(mut self, value: u32) -> Self {
        self.keep_add_buffer_before = value;
        self
    }

    pub fn keep_add_buffer_after(mut self, value: u32) -> Self {
        self.keep_add_buffer_after = value;
        self
    }

    pub fn num_hash_bytes(mut self, value: usize) -> Self {
        self.num_hash_bytes = value;
        self
    }

    pub fn algorithm(mut self, value: Algorithm) -> Self {
        self.algorithm = value;
        self
    }

    pub fn nice_len(mut self, value: u32) -> Self {
        self.nice_len = value;
        self
    }

    /// `0` means "derive from `nice_len`" (`depth_limit = 4 + nice_len / 4`).
    pub fn cut_value(mut self, value: u32) -> Self {
        self.cut_value = value;
        self
    }

    pub fn expected_data_size(mut self, value: u32) -> Self {
        self.expected_data_size = value;
        self
    }

    pub fn cache_efficient_search(mut self, value: bool) -> Self {
        self.cache_efficient_search = value;
        self
    }

    pub fn level(mut self, value: u32) -> Self {
        self.level = value;
        self
    }

    /// Lowers the position at which the normalizer fires. Production code
    /// should leave this at the default (`i32::MAX`); tests use it to
    /// exercise normalization without feeding gigabytes of input.
    pub fn normalize_threshold(mut self, value: i32) -> Self {
        self.normalize_threshold = value;
        self
    }

    /// Estimated dictionary memory usage in KiB for the algorithm/width
    /// this configuration would select, without constructing a `Finder`.
    /// Useful for callers sizing a session before committing to it.
    pub fn estimated_mem_usage_kib(&self) -> u32 {
        let use_cehc = self.cache_efficient_search
            && matches!(self.algorithm, Algorithm::Hc)
            && self.expected_data_size >= 512 << 10;
        let algorithm = if use_cehc { Algorithm::Cehc } else { self.algorithm };
        let width = self.num_hash_bytes.clamp(2, 5);
        FinderImpl::mem_usage_for(algorithm, width, self.history_size)
    }

    pub fn build(self) -> Result<Finder> {
        if self.history_size == 0 || self.history_size > MAX_HISTORY_SIZE {
            return Err(error_parameter("historySize out of range"));
        }
        if !(2..=5).contains(&self.num_hash_bytes) {
            return Err(error_parameter("numHashBytes must be in 2..=5"));
        }
        if self.cut_value == 0 && self.nice_len == 0 {
            return Err(error_parameter("cutValue and niceLen cannot both be 0"));
        }

        // CEHC is auto-selected for HC-family requests once the expected
        // data size clears the dictionary-size threshold.
        let use_cehc = self.cache_efficient_search
            && matches!(self.algorithm, Algorithm::Hc)
            && self.expected_data_size >= 512 << 10;
        let algorithm = if use_cehc { Algorithm::Cehc } else { self.algorithm };
        let depth_limit = self.cut_value as i32;

        let window = SlidingWindow::new(
            self.history_size,
            self.keep_add_buffer_before,
            self.keep_add_buffer_after,
            self.nice_len,
            self.match_max_len,
        );

        let finder_impl = match (algorithm, self.num_hash_bytes) {
            (Algorithm::Hc, 2) => FinderImpl::Hc2(Hc::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Hc, 3) => FinderImpl::Hc3(Hc::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Hc, 4) => FinderImpl::Hc4(Hc::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Hc, 5) => FinderImpl::Hc5(Hc::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Bt, 2) => FinderImpl::Bt2(Bt::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Bt, 3) => FinderImpl::Bt3(Bt::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Bt, 4) => FinderImpl::Bt4(Bt::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Bt, 5) => FinderImpl::Bt5(Bt::new(self.history_size, self.expected_data_size, self.nice_len, depth_limit, self.normalize_threshold)),
            (Algorithm::Cehc, w) => {
                let slot_size = if self.level < 2 { 8 } else { 16 };
                let cut_value = if self.cut_value > 0 { self.cut_value } else { 4 + self.nice_len / 4 };
                match w {
                    2 => FinderImpl::Cehc2(Cehc::new(self.history_size, self.expected_data_size, slot_size, cut_value, self.normalize_threshold)),
                    3 => FinderImpl::Cehc3(Cehc::new(self.history_size, self.expected_data_size, slot_size, cut_value, self.normalize_threshold)),
                    4 => FinderImpl::Cehc4(Cehc::new(self.history_size, self.expected_data_size, slot_size, cut_value, self.normalize_threshold)),
                    5 => FinderImpl::Cehc5(Cehc::new(self.history_size, self.expected_data_size, slot_size, cut_value, self.normalize_threshold)),
                    _ => unreachable!("numHashBytes validated above"),
                }
            }
            _ => unreachable!("numHashBytes validated above"),
        };

        Ok(Finder::new(window, finder_impl, self.match_max_len as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_history_size_is_rejected() {
        assert!(Config::new(0).build().is_err());
    }

    #[test]
    fn history_size_above_max_is_rejected() {
        assert!(Config::new(MAX_HISTORY_SIZE + 1).build().is_err());
    }

    #[test]
    fn hash_width_out_of_range_is_rejected() {
        assert!(Config::new(1 << 16).num_hash_bytes(6).build().is_err());
        assert!(Config::new(1 << 16).num_hash_bytes(1).build().is_err());
    }

    #[test]
    fn default_config_builds() {
        assert!(Config::new(1 << 16).build().is_ok());
    }

    #[test]
    fn cache_efficient_search_selects_cehc_above_threshold() {
        let finder = Config::new(1 << 20)
            .cache_efficient_search(true)
            .expected_data_size(1 << 21)
            .build()
            .unwrap();
        assert!(matches!(finder.algorithm_in_use(), Algorithm::Cehc));
    }

    #[test]
    fn estimated_mem_usage_is_nonzero() {
        assert!(Config::new(1 << 16).estimated_mem_usage_kib() > 0);
    }

    #[test]
    fn cache_efficient_search_ignored_below_threshold() {
        let finder = Config::new(1 << 20)
            .cache_efficient_search(true)
            .expected_data_size(1 << 10)
            .build()
            .unwrap();
        assert!(matches!(finder.algorithm_in_use(), Algorithm::Hc));
    }
}
