//! Unbuffered output to a raw file descriptor.
//!
//! Every `write` goes straight to `write(2)`: the engine's bytes reach the
//! descriptor in the order they are issued, with nothing held back in a
//! userspace buffer.

use std::io;
use std::os::fd::RawFd;

/// A `std::io::Write` over a borrowed file descriptor. Never closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdSink {
    fd: RawFd,
}

impl FdSink {
    /// Sink for an arbitrary descriptor owned elsewhere.
    #[must_use]
    pub const fn new(fd: RawFd) -> Self {
        Self { fd }
    }

    /// Sink for the process standard output.
    #[must_use]
    pub const fn stdout() -> Self {
        Self::new(libc::STDOUT_FILENO)
    }

    /// Sink for the process standard error.
    #[must_use]
    pub const fn stderr() -> Self {
        Self::new(libc::STDERR_FILENO)
    }

    #[must_use]
    pub const fn fd(&self) -> RawFd {
        self.fd
    }
}

impl io::Write for FdSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            // SAFETY: `buf` is a live slice valid for `buf.len()` bytes of reads.
            let rc = unsafe { libc::write(self.fd, buf.as_ptr().cast(), buf.len()) };
            if rc >= 0 {
                return Ok(rc as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
