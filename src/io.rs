use crate::Result;

/// Minimal pull-based byte source the window manager reads from.
///
/// `read` attempts to fill `buf` and returns the number of bytes actually
/// written; `0` signals end-of-stream. This is deliberately smaller than
/// `std::io::Read` so the core stays usable in `no_std + alloc` builds.
pub trait ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}

impl ByteSource for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = buf.len().min(self.len());
        buf[..n].copy_from_slice(&self[..n]);
        *self = &self[n..];
        Ok(n)
    }
}

/// Adapts any `std::io::Read` into a [`ByteSource`].
///
/// A blanket `impl<R: Read> ByteSource for R` would conflict with the
/// `&[u8]` impl above (`&[u8]` already implements `std::io::Read`), so this
/// crate uses an explicit wrapper instead.
#[cfg(feature = "std")]
pub struct StdReader<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for StdReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        std::io::Read::read(&mut self.0, buf)
            .map_err(|_| crate::error::error_upstream("std::io::Read failed"))
    }
}
