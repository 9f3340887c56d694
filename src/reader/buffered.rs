//! Read buffer over a dump file
//!
//! Holds the unconsumed tail of the input. Consumed bytes are dropped by
//! shifting the tail to the front before each read; when one construct
//! (a row with a long post body, say) fills the whole window, the window
//! doubles. Memory therefore tracks the largest row, not the file.
//!
//! The buffer owns the byte source. Releasing it drops (closes) the source
//! and is how a session closes its file.

use std::io::{self, Read};

/// Initial window size
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

const MIN_BUFFER_SIZE: usize = 16;

/// Growable window over a `Read` source
pub struct BufferedReader<R: Read> {
    source: Option<R>,
    window: Vec<u8>,
    /// Start of unconsumed bytes in `window`
    start: usize,
    /// End of valid bytes in `window`
    filled: usize,
    exhausted: bool,
    /// Absolute source offset of `window[start]`
    offset: u64,
}

impl<R: Read> BufferedReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_BUFFER_SIZE)
    }

    /// Start with a window of `capacity` bytes (at least 16)
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        BufferedReader {
            source: Some(source),
            window: vec![0u8; capacity.max(MIN_BUFFER_SIZE)],
            start: 0,
            filled: 0,
            exhausted: false,
            offset: 0,
        }
    }

    /// Read more bytes into the window
    ///
    /// Returns `Ok(false)` once the source is exhausted or released.
    pub fn fill_buffer(&mut self) -> io::Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let Some(source) = self.source.as_mut() else {
            self.exhausted = true;
            return Ok(false);
        };

        if self.start > 0 {
            self.window.copy_within(self.start..self.filled, 0);
            self.filled -= self.start;
            self.start = 0;
        }
        if self.filled == self.window.len() {
            let doubled = self.window.len() * 2;
            self.window.resize(doubled, 0);
        }

        let read = loop {
            match source.read(&mut self.window[self.filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.filled += read;
        self.exhausted = read == 0;
        Ok(read > 0)
    }

    /// Read until at least `n` bytes are buffered; `false` if the input
    /// ends first
    pub fn fill_to(&mut self, n: usize) -> io::Result<bool> {
        while self.buffered().len() < n {
            if !self.fill_buffer()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Unconsumed bytes
    #[inline]
    pub fn buffered(&self) -> &[u8] {
        &self.window[self.start..self.filled]
    }

    /// True when nothing is buffered and nothing more can be read
    pub fn is_eof(&self) -> bool {
        self.exhausted && self.start >= self.filled
    }

    /// Mark `n` buffered bytes as consumed
    #[inline]
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.filled - self.start);
        self.start += n;
        self.offset += n as u64;
    }

    /// Absolute offset of the next unconsumed byte
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Drop the byte source and discard buffered bytes
    ///
    /// Returns `true` only on the call that actually released it.
    pub fn release(&mut self) -> bool {
        self.exhausted = true;
        self.start = self.filled;
        self.source.take().is_some()
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }
}
