//! Dictionary-backed longest-match search for LZ77-style encoders.
//!
//! This crate implements the part of an LZMA/LZ4-HC/deflate-style encoder
//! that decides *where the next back-reference points*: a sliding window
//! over the input, a hash-index layer over short n-grams, and a choice of
//! three dictionary stores (hash-chain, binary-search-tree, cache-efficient
//! hash-chain). It does not implement entropy coding, stream framing, or
//! decompression; see `Config` for the knobs and [`Finder`] for the
//! session type.
//!
//! ```
//! use lz_matchfinder::Config;
//!
//! let mut finder = Config::new(1 << 16).build().unwrap();
//! let mut src: &[u8] = b"abcabcabcabc";
//! finder.feed(&mut src).unwrap();
//!
//! while finder.available_bytes() > 0 {
//!     let matches = finder.get_matches();
//!     if let Some((len, dist)) = matches.best() {
//!         println!("match: len={len} dist={dist}");
//!     }
//!     finder.skip(1);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod dict;
mod dispatch;
mod error;
mod extend;
mod hash;
mod io;
mod matches;
mod normalize;
mod window;

pub use config::Config;
pub use dispatch::Algorithm;
pub use error::{Error, Result};
pub use io::ByteSource;
#[cfg(feature = "std")]
pub use io::StdReader;
pub use matches::Matches;

use dispatch::FinderImpl;
use matches::MatchFinder;
use window::SlidingWindow;

/// A constructed match-finder session: the sliding window, the dispatched
/// dictionary store, and the reusable `Matches` output buffer. Built via
/// [`Config::build`].
pub struct Finder {
    window: SlidingWindow,
    finder_impl: FinderImpl,
    matches: Matches,
}

impl Finder {
    pub(crate) fn new(window: SlidingWindow, finder_impl: FinderImpl, match_count_max: usize) -> Self {
        Self {
            window,
            finder_impl,
            matches: Matches::new(match_count_max),
        }
    }

    /// Pulls bytes from `src` into the window. Returns the number of bytes
    /// actually read; `0` means `src` is exhausted. A read failure is
    /// latched and returned again by every subsequent call.
    pub fn feed(&mut self, src: &mut dyn ByteSource) -> Result<usize> {
        self.window.feed(src, &mut self.finder_impl)
    }

    /// Marks the stream as complete: all remaining pending bytes are
    /// flushed into the dictionary so trailing positions are searchable.
    pub fn finish(&mut self) {
        self.window.set_finishing(&mut self.finder_impl);
    }

    /// Bytes available to search starting at the current cursor.
    pub fn available_bytes(&self) -> i32 {
        self.window.available_bytes()
    }

    /// Finds matches at the current cursor and advances it by one position.
    pub fn get_matches(&mut self) -> &Matches {
        self.finder_impl.find_matches(&mut self.window, &mut self.matches);
        &self.matches
    }

    /// Advances the cursor by `len` positions, inserting each into the
    /// dictionary without reporting matches.
    pub fn skip(&mut self, len: usize) {
        self.finder_impl.skip(&mut self.window, len);
    }

    /// The latched upstream read error, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.window.last_error()
    }

    /// Which algorithm family this session actually dispatches to. Useful
    /// for diagnostics when `cache_efficient_search` overrode the
    /// requested algorithm.
    pub fn algorithm_in_use(&self) -> Algorithm {
        self.finder_impl.algorithm()
    }
}
