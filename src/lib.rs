//! Dumps raw words from the CPU's hardware randomness instruction.
//!
//! [`HardwareEntropySource`] turns the instruction's transient underflow into
//! a bounded-retry [`SamplingOutcome`]; [`Collector`] streams the produced
//! words into an [`OutputStream`] and stops at the first word it cannot get.

mod collector;
mod error;
pub mod exit_codes;
pub mod logger;
mod reader;
mod retry;
mod rng;
#[cfg(any(test, feature = "testing"))]
mod scripted;
mod sink;
mod source;

pub use collector::{collect_to_path, Collector, CollectorState};
pub use error::{CollectionError, Underflow};
pub use reader::EntropyReader;
pub use retry::{retry, RetryBudget};
#[cfg(any(test, feature = "testing"))]
pub use scripted::{ScriptedInstruction, Step};
pub use sink::OutputStream;
pub use source::{EntropySource, HardwareEntropySource, RandomInstruction, Rdrand, SamplingOutcome};
