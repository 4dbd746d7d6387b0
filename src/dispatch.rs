//! Algorithm/width dispatch: one `FinderImpl` is built once at
//! `Config::build` time and never re-selected per call. Twelve variants
//! cover `{Hc, Bt, Cehc} x {2,3,4,5}`; CEHC's slot size is a runtime field
//! on `Cehc` itself rather than a further type axis (see DESIGN.md).

use crate::dict::{Bt, Cehc, Hc};
use crate::matches::{MatchFinder, Matches};
use crate::window::SlidingWindow;

pub(crate) enum FinderImpl {
    Hc2(Hc<2>),
    Hc3(Hc<3>),
    Hc4(Hc<4>),
    Hc5(Hc<5>),
    Bt2(Bt<2>),
    Bt3(Bt<3>),
    Bt4(Bt<4>),
    Bt5(Bt<5>),
    Cehc2(Cehc<2>),
    Cehc3(Cehc<3>),
    Cehc4(Cehc<4>),
    Cehc5(Cehc<5>),
}

macro_rules! forward {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            FinderImpl::Hc2(f) => f.$method($($arg),*),
            FinderImpl::Hc3(f) => f.$method($($arg),*),
            FinderImpl::Hc4(f) => f.$method($($arg),*),
            FinderImpl::Hc5(f) => f.$method($($arg),*),
            FinderImpl::Bt2(f) => f.$method($($arg),*),
            FinderImpl::Bt3(f) => f.$method($($arg),*),
            FinderImpl::Bt4(f) => f.$method($($arg),*),
            FinderImpl::Bt5(f) => f.$method($($arg),*),
            FinderImpl::Cehc2(f) => f.$method($($arg),*),
            FinderImpl::Cehc3(f) => f.$method($($arg),*),
            FinderImpl::Cehc4(f) => f.$method($($arg),*),
            FinderImpl::Cehc5(f) => f.$method($($arg),*),
        }
    };
}

impl MatchFinder for FinderImpl {
    fn find_matches(&mut self, window: &mut SlidingWindow, matches: &mut Matches) {
        forward!(self, find_matches, window, matches)
    }

    fn skip(&mut self, window: &mut SlidingWindow, len: usize) {
        forward!(self, skip, window, len)
    }

    fn get_mem_usage(_dict_size: u32) -> u32 {
        // This associated function has no `self` to dispatch on; callers
        // use `FinderImpl::mem_usage_for` instead.
        unreachable!("use FinderImpl::mem_usage_for")
    }
}

impl FinderImpl {
    /// Which of the three algorithm families this instance runs, regardless
    /// of hash width. Informational only (diagnostics, tests); the hot path
    /// never branches on it.
    pub(crate) fn algorithm(&self) -> Algorithm {
        match self {
            FinderImpl::Hc2(_) | FinderImpl::Hc3(_) | FinderImpl::Hc4(_) | FinderImpl::Hc5(_) => Algorithm::Hc,
            FinderImpl::Bt2(_) | FinderImpl::Bt3(_) | FinderImpl::Bt4(_) | FinderImpl::Bt5(_) => Algorithm::Bt,
            FinderImpl::Cehc2(_) | FinderImpl::Cehc3(_) | FinderImpl::Cehc4(_) | FinderImpl::Cehc5(_) => Algorithm::Cehc,
        }
    }

    /// Estimated dictionary memory usage in KiB for the algorithm/width
    /// combination `Config::build` is about to construct, before the
    /// buffers actually exist.
    pub(crate) fn mem_usage_for(algorithm: Algorithm, width: usize, dict_size: u32) -> u32 {
        match (algorithm, width) {
            (Algorithm::Hc, 2) => Hc::<2>::get_mem_usage(dict_size),
            (Algorithm::Hc, 3) => Hc::<3>::get_mem_usage(dict_size),
            (Algorithm::Hc, 4) => Hc::<4>::get_mem_usage(dict_size),
            (Algorithm::Hc, 5) => Hc::<5>::get_mem_usage(dict_size),
            (Algorithm::Bt, 2) => Bt::<2>::get_mem_usage(dict_size),
            (Algorithm::Bt, 3) => Bt::<3>::get_mem_usage(dict_size),
            (Algorithm::Bt, 4) => Bt::<4>::get_mem_usage(dict_size),
            (Algorithm::Bt, 5) => Bt::<5>::get_mem_usage(dict_size),
            (Algorithm::Cehc, 2) => Cehc::<2>::get_mem_usage(dict_size),
            (Algorithm::Cehc, 3) => Cehc::<3>::get_mem_usage(dict_size),
            (Algorithm::Cehc, 4) => Cehc::<4>::get_mem_usage(dict_size),
            (Algorithm::Cehc, 5) => Cehc::<5>::get_mem_usage(dict_size),
            _ => unreachable!("numHashBytes validated to 2..=5 at Config::build"),
        }
    }
}

/// Which dictionary store algorithm to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Hc,
    Bt,
    Cehc,
}
