use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{Result, TapeSortError};
use crate::latency::{Access, LatencyModel};
use crate::Element;

/// Sequential reader of whitespace-delimited base-10 tokens.
pub struct TapeReader<'a, R> {
    inner: R,
    latency: &'a LatencyModel,
    name: String,
    token: Vec<u8>,
    position: u64,
}

impl<'a, R: BufRead> TapeReader<'a, R> {
    pub fn new(inner: R, latency: &'a LatencyModel, name: impl Into<String>) -> Self {
        Self {
            inner,
            latency,
            name: name.into(),
            token: Vec::new(),
            position: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tokens read so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the leading element-count token of an input tape.
    pub fn read_count(&mut self) -> Result<u64> {
        self.read_token::<u64>()?.ok_or_else(|| {
            TapeSortError::UnexpectedEndOfInput(format!(
                "Unable to read number of elements, {} is empty",
                self.name
            ))
        })
    }

    /// Reads the next element, or `None` once the tape is exhausted.
    pub fn read_one(&mut self) -> Result<Option<Element>> {
        self.read_token::<Element>()
    }

    fn read_token<T: FromStr>(&mut self) -> Result<Option<T>> {
        if !self.next_token()? {
            return Ok(None);
        }
        self.latency.apply_read_write_delay(Access::Read);
        let value = std::str::from_utf8(&self.token)
            .ok()
            .and_then(|s| s.parse::<T>().ok())
            .ok_or_else(|| TapeSortError::MalformedElement {
                token: String::from_utf8_lossy(&self.token).into_owned(),
                position: self.position,
                resource: self.name.clone(),
            })?;
        self.latency.apply_shift_delay();
        self.position += 1;
        Ok(Some(value))
    }

    /// Fills `self.token` with the next non-whitespace run of bytes.
    fn next_token(&mut self) -> Result<bool> {
        self.token.clear();
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(TapeSortError::ResourceUnavailable {
                        resource: self.name.clone(),
                        source: e,
                    });
                }
            };
            if buf.is_empty() {
                return Ok(!self.token.is_empty());
            }

            let mut consumed = 0;
            let mut complete = false;
            for &byte in buf {
                consumed += 1;
                if byte.is_ascii_whitespace() {
                    if !self.token.is_empty() {
                        complete = true;
                        break;
                    }
                } else {
                    self.token.push(byte);
                }
            }
            self.inner.consume(consumed);
            if complete {
                return Ok(true);
            }
        }
    }
}

/// Sequential writer of space-separated elements.
pub struct TapeWriter<'a, W> {
    inner: W,
    latency: &'a LatencyModel,
    name: String,
    written: u64,
}

impl<'a, W: Write> TapeWriter<'a, W> {
    pub fn new(inner: W, latency: &'a LatencyModel, name: impl Into<String>) -> Self {
        Self {
            inner,
            latency,
            name: name.into(),
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write_one(&mut self, value: Element) -> Result<()> {
        if self.written > 0 {
            self.inner
                .write_all(b" ")
                .map_err(TapeSortError::resource(self.name.as_str()))?;
        }
        self.latency.apply_read_write_delay(Access::Write);
        write!(self.inner, "{value}").map_err(TapeSortError::resource(self.name.as_str()))?;
        self.latency.apply_shift_delay();
        self.written += 1;
        Ok(())
    }

    /// Flushes and hands back the underlying stream.
    pub fn finish(mut self) -> Result<W> {
        self.inner
            .flush()
            .map_err(TapeSortError::resource(self.name.as_str()))?;
        Ok(self.inner)
    }
}
