//! The pre-loaded integer stream feeding the Random policy.

use crate::error::{SimError, SimResult};
use std::path::Path;

/// A finite, restartable sequence of integers.
///
/// The first value in the file is an advisory count; every readable value
/// after it joins the stream. Values are consumed in order and the cursor
/// wraps to offset zero on exhaustion. The stream is owned by the
/// simulator and consumed only by the Random policy; it is never reseeded.
#[derive(Debug, Clone)]
pub struct RandomStream {
    values: Vec<u64>,
    cursor: usize,
}

impl RandomStream {
    /// Read and parse a random file.
    pub fn load(path: &Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let stream = Self::parse(&content, path)?;
        tracing::debug!(file = %path.display(), values = stream.len(), "loaded random pool");
        Ok(stream)
    }

    /// Parse random-file text. `path` is used for error reporting only.
    pub fn parse(content: &str, path: &Path) -> SimResult<Self> {
        let mut tokens = content.split_whitespace();
        // Advisory count; the values that follow are what binds.
        tokens.next();

        let mut values = Vec::new();
        for token in tokens {
            let value: u64 = token.parse().map_err(|_| SimError::Parse {
                file: path.to_path_buf(),
                line: None,
                cause: format!("invalid random value: {token}"),
            })?;
            values.push(value);
        }

        Ok(Self { values, cursor: 0 })
    }

    /// Stream built from in-memory values, for tests and benchmarks.
    pub fn from_values(values: Vec<u64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of values in the pool.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the pool holds no values; the Random policy cannot run.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The next value reduced modulo `bound`. Wraps to the start of the
    /// pool when exhausted. Caller guarantees a non-empty pool and a
    /// nonzero bound.
    pub fn next_in(&mut self, bound: usize) -> usize {
        if self.cursor >= self.values.len() {
            self.cursor = 0;
        }
        let value = self.values[self.cursor];
        self.cursor += 1;
        (value % bound as u64) as usize
    }
}
