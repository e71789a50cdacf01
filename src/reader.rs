use std::io::{self, Read};

use crate::error::Underflow;
use crate::source::EntropySource;

/// Exposes an entropy source as a byte stream.
///
/// Each sampled word contributes its native-order bytes; a trailing partial
/// word is cut short. A read that hits exhaustion after producing some bytes
/// returns the short count, and a read that produces nothing fails.
#[derive(Debug)]
pub struct EntropyReader<S> {
    source: S,
}

impl<S: EntropySource> EntropyReader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: EntropySource> Read for EntropyReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut read_count = 0;

        for chunk in buf.chunks_mut(8) {
            match self.source.sample().value() {
                Some(word) => {
                    chunk.copy_from_slice(&word.to_ne_bytes()[..chunk.len()]);
                    read_count += chunk.len();
                }
                None if read_count == 0 => return Err(Underflow.into()),
                None => break,
            }
        }

        Ok(read_count)
    }
}
