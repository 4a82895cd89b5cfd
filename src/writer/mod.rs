//! One output interface, three backends.
//!
//! Generation code is written once against [`CodeWriter`]. Run against a
//! [`LengthWriter`] it only counts bytes, against a [`StringWriter`] it
//! builds text, against a [`SinkWriter`] it streams into a file.

use std::io::{self, Write};

#[cfg(test)]
mod tests;

/// Buffered bytes that trigger a write to the underlying sink.
pub const SINK_FLUSH_THRESHOLD: usize = 8192;

/// Output of a nested computation captured by [`CodeWriter::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Text(String),
    /// Byte count only, from a length-only writer.
    Len(usize),
}

impl Saved {
    pub fn len(&self) -> usize {
        match self {
            Saved::Text(text) => text.len(),
            Saved::Len(len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait CodeWriter {
    fn str(&mut self, s: &str) -> &mut dyn CodeWriter;

    /// Writes `n` in base 10.
    fn int(&mut self, n: u64) -> &mut dyn CodeWriter;

    /// Runs `f` on a scratch writer of the same kind and returns what it wrote,
    /// without writing it here.
    fn save(&mut self, f: &mut dyn FnMut(&mut dyn CodeWriter)) -> Saved;

    /// Writes a result previously returned by this writer's [`CodeWriter::save`].
    fn replay(&mut self, saved: &Saved) -> &mut dyn CodeWriter;
}

/// Writes `items` separated by `sep`, rendering each with `each`.
pub fn join<I, F>(w: &mut dyn CodeWriter, sep: &str, items: I, mut each: F)
where
    I: IntoIterator,
    F: FnMut(&mut dyn CodeWriter, I::Item),
{
    let mut first = true;
    for item in items {
        if !first {
            w.str(sep);
        }
        first = false;
        each(w, item);
    }
}

/// Bytes `f` would write.
pub fn measure(f: impl FnOnce(&mut dyn CodeWriter)) -> usize {
    let mut w = LengthWriter::new();
    f(&mut w);
    w.len()
}

/// Text `f` would write.
pub fn render(f: impl FnOnce(&mut dyn CodeWriter)) -> String {
    let mut w = StringWriter::new();
    f(&mut w);
    w.into_string()
}

fn decimal_len(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |digits| digits as usize + 1)
}

#[derive(Debug, Default)]
pub struct StringWriter {
    buf: String,
}

impl StringWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl CodeWriter for StringWriter {
    fn str(&mut self, s: &str) -> &mut dyn CodeWriter {
        self.buf.push_str(s);
        self
    }

    fn int(&mut self, n: u64) -> &mut dyn CodeWriter {
        self.buf.push_str(&n.to_string());
        self
    }

    fn save(&mut self, f: &mut dyn FnMut(&mut dyn CodeWriter)) -> Saved {
        Saved::Text(render(f))
    }

    fn replay(&mut self, saved: &Saved) -> &mut dyn CodeWriter {
        match saved {
            Saved::Text(text) => self.buf.push_str(text),
            Saved::Len(_) => unreachable!("byte count replayed into a text writer"),
        }
        self
    }
}

/// Counts bytes without keeping them.
#[derive(Debug, Default)]
pub struct LengthWriter {
    len: usize,
}

impl LengthWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl CodeWriter for LengthWriter {
    fn str(&mut self, s: &str) -> &mut dyn CodeWriter {
        self.len += s.len();
        self
    }

    fn int(&mut self, n: u64) -> &mut dyn CodeWriter {
        self.len += decimal_len(n);
        self
    }

    fn save(&mut self, f: &mut dyn FnMut(&mut dyn CodeWriter)) -> Saved {
        Saved::Len(measure(f))
    }

    fn replay(&mut self, saved: &Saved) -> &mut dyn CodeWriter {
        self.len += saved.len();
        self
    }
}

/// Streams into an [`io::Write`] in chunks of about [`SINK_FLUSH_THRESHOLD`] bytes.
///
/// Writes can't fail mid-generation; the first I/O error is kept and
/// returned by [`SinkWriter::finish`], and later output is dropped.
pub struct SinkWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
    written: usize,
    error: Option<io::Error>,
}

impl<W: Write> SinkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(SINK_FLUSH_THRESHOLD),
            written: 0,
            error: None,
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        self.buf.extend_from_slice(bytes);
        if self.buf.len() >= SINK_FLUSH_THRESHOLD {
            self.drain();
        }
    }

    fn drain(&mut self) {
        if self.buf.is_empty() || self.error.is_some() {
            return;
        }
        match self.inner.write_all(&self.buf) {
            Ok(()) => self.written += self.buf.len(),
            Err(e) => self.error = Some(e),
        }
        self.buf.clear();
    }

    /// Flushes everything and returns the number of bytes written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.drain();
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.inner.flush()?;
        Ok(self.written)
    }
}

impl<W: Write> CodeWriter for SinkWriter<W> {
    fn str(&mut self, s: &str) -> &mut dyn CodeWriter {
        self.push(s.as_bytes());
        self
    }

    fn int(&mut self, n: u64) -> &mut dyn CodeWriter {
        self.push(n.to_string().as_bytes());
        self
    }

    fn save(&mut self, f: &mut dyn FnMut(&mut dyn CodeWriter)) -> Saved {
        Saved::Text(render(f))
    }

    fn replay(&mut self, saved: &Saved) -> &mut dyn CodeWriter {
        match saved {
            Saved::Text(text) => self.push(text.as_bytes()),
            Saved::Len(_) => unreachable!("byte count replayed into a sink writer"),
        }
        self
    }
}
