use crate::retry::{retry, RetryBudget};

/// One invocation of a hardware randomness instruction.
///
/// `step` returns `Some` when the hardware asserted that the value is valid
/// and `None` on underflow (the entropy pool was not ready this cycle).
pub trait RandomInstruction {
    fn step(&mut self) -> Option<u64>;
}

impl<I: RandomInstruction + ?Sized> RandomInstruction for &mut I {
    fn step(&mut self) -> Option<u64> {
        (**self).step()
    }
}

/// Result of sampling a single word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum SamplingOutcome {
    Produced(u64),
    Exhausted,
}

impl SamplingOutcome {
    pub fn value(self) -> Option<u64> {
        match self {
            SamplingOutcome::Produced(value) => Some(value),
            SamplingOutcome::Exhausted => None,
        }
    }
}

/// Something that hands out raw random words one at a time.
pub trait EntropySource {
    fn sample(&mut self) -> SamplingOutcome;
}

impl<S: EntropySource + ?Sized> EntropySource for &mut S {
    fn sample(&mut self) -> SamplingOutcome {
        (**self).sample()
    }
}

/// Wraps a [`RandomInstruction`] and absorbs transient underflow with a
/// bounded number of immediate retries.
#[derive(Debug)]
pub struct HardwareEntropySource<I = Rdrand> {
    instruction: I,
    budget: RetryBudget,
}

impl<I: RandomInstruction> HardwareEntropySource<I> {
    pub fn new(instruction: I) -> Self {
        Self::with_budget(instruction, RetryBudget::DEFAULT)
    }

    pub fn with_budget(instruction: I, budget: RetryBudget) -> Self {
        Self {
            instruction,
            budget,
        }
    }

    pub fn budget(&self) -> RetryBudget {
        self.budget
    }

    pub fn instruction(&self) -> &I {
        &self.instruction
    }

    pub fn into_inner(self) -> I {
        self.instruction
    }
}

impl HardwareEntropySource<Rdrand> {
    /// Binds to the CPU's `rdrand` instruction, if there is one.
    pub fn rdrand() -> Option<Self> {
        Rdrand::detect().map(Self::new)
    }
}

impl<I: RandomInstruction> EntropySource for HardwareEntropySource<I> {
    fn sample(&mut self) -> SamplingOutcome {
        let mut attempts = 0u32;
        let instruction = &mut self.instruction;
        let produced = retry(self.budget, || {
            attempts += 1;
            instruction.step()
        });

        match produced {
            Some(value) => {
                if attempts > 1 {
                    log::debug!("hardware underflow absorbed after {} attempts", attempts);
                }
                SamplingOutcome::Produced(value)
            }
            None => {
                log::warn!(
                    "hardware randomness underflowed on all {} attempts",
                    self.budget.attempts()
                );
                SamplingOutcome::Exhausted
            }
        }
    }
}

/// The x86_64 `rdrand` instruction.
///
/// A value of this type only exists once the CPU has reported support, so
/// [`RandomInstruction::step`] can issue the instruction unconditionally.
#[derive(Clone, Copy, Debug)]
pub struct Rdrand {
    _detected: (),
}

impl Rdrand {
    pub fn detect() -> Option<Self> {
        cpu_has_rdrand().then_some(Rdrand { _detected: () })
    }
}

impl RandomInstruction for Rdrand {
    fn step(&mut self) -> Option<u64> {
        rdrand64()
    }
}

#[cfg(target_arch = "x86_64")]
fn cpu_has_rdrand() -> bool {
    std::arch::is_x86_feature_detected!("rdrand")
}

#[cfg(not(target_arch = "x86_64"))]
fn cpu_has_rdrand() -> bool {
    false
}

#[cfg(target_arch = "x86_64")]
fn rdrand64() -> Option<u64> {
    #[target_feature(enable = "rdrand")]
    unsafe fn step(out: &mut u64) -> i32 {
        core::arch::x86_64::_rdrand64_step(out)
    }

    let mut r = 0;
    // SAFETY: only reachable through an `Rdrand`, which is built after
    // runtime detection confirmed the instruction exists.
    if unsafe { step(&mut r) } == 1 {
        Some(r)
    } else {
        None
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn rdrand64() -> Option<u64> {
    None
}
