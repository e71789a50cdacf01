use std::io::Write;
use std::path::Path;

use crate::error::CollectionError;
use crate::sink::OutputStream;
use crate::source::{EntropySource, SamplingOutcome};

/// Where a [`Collector`] is in its single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectorState {
    Idle,
    Running { index: u64 },
    /// Every requested word was written.
    Complete,
    /// The run stopped early; whatever was written stays in the sink.
    Aborted,
}

impl CollectorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CollectorState::Complete | CollectorState::Aborted)
    }
}

/// Streams words from an [`EntropySource`] into an [`OutputStream`].
#[derive(Debug)]
pub struct Collector<S> {
    source: S,
    state: CollectorState,
}

impl<S: EntropySource> Collector<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: CollectorState::Idle,
        }
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Writes `count` words to `sink`, each as 8 bytes in native byte order.
    ///
    /// Stops at the first word the source cannot produce. Bytes already
    /// appended are left in place. The sink is closed before returning,
    /// whatever the outcome.
    pub fn run<W: Write>(
        &mut self,
        count: u64,
        sink: &mut OutputStream<W>,
    ) -> Result<(), CollectionError> {
        if self.state != CollectorState::Idle {
            close_after_failure(sink);
            return Err(CollectionError::AlreadyFinished);
        }

        log::info!("collecting {} word(s)", count);
        let filled = self.fill(count, sink);
        let closed = sink.close();

        let result = match (filled, closed) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(e)) => Err(CollectionError::Io(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                log::warn!("output stream did not close cleanly: {}", close_err);
                Err(e)
            }
        };

        self.state = match result {
            Ok(()) => {
                log::info!("wrote {} word(s)", count);
                CollectorState::Complete
            }
            Err(_) => CollectorState::Aborted,
        };
        result
    }

    fn fill<W: Write>(
        &mut self,
        count: u64,
        sink: &mut OutputStream<W>,
    ) -> Result<(), CollectionError> {
        for index in 0..count {
            self.state = CollectorState::Running { index };
            match self.source.sample() {
                SamplingOutcome::Produced(word) => {
                    log::trace!("word {}: {:#018x}", index, word);
                    sink.append(&word.to_ne_bytes())?;
                }
                SamplingOutcome::Exhausted => {
                    log::warn!("aborting at word {} of {}", index, count);
                    return Err(CollectionError::HardwareExhausted { written: index });
                }
            }
        }
        Ok(())
    }
}

fn close_after_failure<W: Write>(sink: &mut OutputStream<W>) {
    if let Err(e) = sink.close() {
        log::warn!("output stream did not close cleanly: {}", e);
    }
}

/// Creates (or truncates) `path` and writes `count` words from `source` to it.
pub fn collect_to_path<S: EntropySource>(
    source: S,
    count: u64,
    path: impl AsRef<Path>,
) -> Result<(), CollectionError> {
    let mut sink = OutputStream::open(path)?;
    Collector::new(source).run(count, &mut sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedInstruction;
    use crate::source::HardwareEntropySource;
    use std::io;

    /// Accepts `remaining` bytes, then reports a full disk.
    struct FailAfter {
        remaining: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.len() > self.remaining {
                return Err(io::Error::new(io::ErrorKind::Other, "full"));
            }
            self.remaining -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn words(bytes: &[u8]) -> Vec<u64> {
        bytes
            .chunks_exact(8)
            .map(|chunk| u64::from_ne_bytes(chunk.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn writes_every_word_in_order() {
        for n in [1u64, 2, 5, 64] {
            let values: Vec<u64> = (0..n)
                .map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15))
                .collect();
            let source = HardwareEntropySource::new(ScriptedInstruction::values(values.clone()));
            let mut collector = Collector::new(source);
            let mut buf = Vec::new();
            let mut sink = OutputStream::new(&mut buf);

            collector.run(n, &mut sink).unwrap();
            assert!(sink.is_closed());
            drop(sink);

            assert_eq!(buf.len() as u64, 8 * n);
            assert_eq!(words(&buf), values);
            assert_eq!(collector.state(), CollectorState::Complete);
        }
    }

    #[test]
    fn zero_words_samples_nothing() {
        let mut collector =
            Collector::new(HardwareEntropySource::new(ScriptedInstruction::values([1])));
        let mut sink = OutputStream::new(Vec::new());

        collector.run(0, &mut sink).unwrap();
        assert_eq!(sink.bytes_written(), 0);
        assert!(sink.is_closed());
        assert_eq!(collector.into_source().instruction().calls(), 0);
    }

    #[test]
    fn exhaustion_keeps_the_prefix() {
        for k in 0..4u64 {
            let mut instruction = ScriptedInstruction::values(100..100 + k);
            instruction.push_underflows(10).push_value(42);
            let mut collector = Collector::new(HardwareEntropySource::new(instruction));
            let mut buf = Vec::new();
            let mut sink = OutputStream::new(&mut buf);

            let err = collector.run(k + 3, &mut sink).unwrap_err();
            assert!(matches!(err, CollectionError::HardwareExhausted { written } if written == k));
            assert!(sink.is_closed());
            drop(sink);

            assert_eq!(words(&buf), (100..100 + k).collect::<Vec<_>>());
            assert_eq!(collector.state(), CollectorState::Aborted);
            // No word past the exhausted one was requested.
            let instruction = collector.into_source().into_inner();
            assert_eq!(instruction.calls() as u64, k + 10);
            assert_eq!(instruction.remaining(), 1);
        }
    }

    #[test]
    fn underflow_within_budget_is_invisible() {
        let mut instruction = ScriptedInstruction::default();
        instruction
            .push_underflows(9)
            .push_value(1)
            .push_underflows(3)
            .push_value(2);
        let mut collector = Collector::new(HardwareEntropySource::new(instruction));
        let mut buf = Vec::new();
        let mut sink = OutputStream::new(&mut buf);

        collector.run(2, &mut sink).unwrap();
        drop(sink);
        assert_eq!(words(&buf), [1, 2]);
    }

    #[test]
    fn terminal_states_refuse_another_run() {
        let mut collector =
            Collector::new(HardwareEntropySource::new(ScriptedInstruction::values([1, 2])));
        collector.run(1, &mut OutputStream::new(Vec::new())).unwrap();

        let mut sink = OutputStream::new(Vec::new());
        let err = collector.run(1, &mut sink).unwrap_err();
        assert!(matches!(err, CollectionError::AlreadyFinished));
        assert!(sink.is_closed());
        assert_eq!(sink.bytes_written(), 0);
        assert_eq!(collector.state(), CollectorState::Complete);
        assert!(collector.state().is_terminal());
    }

    #[test]
    fn identical_scripts_give_identical_bytes() {
        let run = || {
            let mut instruction = ScriptedInstruction::values([u64::MAX, 0, 0x0102_0304_0506_0708]);
            instruction.push_underflows(4).push_value(17);
            let mut buf = Vec::new();
            Collector::new(HardwareEntropySource::new(instruction))
                .run(4, &mut OutputStream::new(&mut buf))
                .unwrap();
            buf
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn write_failure_aborts_and_closes() {
        let source = HardwareEntropySource::new(ScriptedInstruction::values([1, 2, 3, 4]));
        let mut collector = Collector::new(source);
        let mut sink = OutputStream::new(FailAfter { remaining: 16 });

        let err = collector.run(4, &mut sink).unwrap_err();
        assert!(matches!(err, CollectionError::Io(ref e) if e.to_string() == "full"));
        assert!(sink.is_closed());
        assert_eq!(sink.bytes_written(), 16);
        assert_eq!(collector.state(), CollectorState::Aborted);
        // The word that failed to write is the last one sampled.
        let instruction = collector.into_source().into_inner();
        assert_eq!(instruction.calls(), 3);
        assert_eq!(instruction.remaining(), 1);
    }
}
