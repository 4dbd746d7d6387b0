//! Dictionary stores: hash-chain, binary-search-tree, and cache-efficient
//! hash-chain, each generic over the main hash width.

mod bt;
mod cehc;
mod hc;

pub(crate) use bt::Bt;
pub(crate) use cehc::Cehc;
pub(crate) use hc::Hc;
