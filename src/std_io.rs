use std::io::{IoSlice, Write};

use crate::HybridVec;

/// Write is implemented for `HybridVec<u8, N>` by appending to the vector.
/// The vector will grow as needed, following the usual growth rule.
impl<const N: usize> Write for HybridVec<u8, N> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.try_reserve(buf.len()).map_err(std::io::Error::other)?;
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline(always)]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> std::io::Result<usize> {
        let num = bufs.iter().map(|b| b.len()).sum::<usize>();

        self.try_reserve(num).map_err(std::io::Error::other)?;
        for buf in bufs {
            self.extend_from_slice(buf);
        }

        Ok(num)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        Write::write(self, buf)?;
        Ok(())
    }
}
