use std::collections::VecDeque;

use crate::source::RandomInstruction;

/// One scripted instruction result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Value(u64),
    Underflow,
}

/// Deterministic stand-in for a hardware randomness instruction.
///
/// Replays its script in order; once the script runs out every further call
/// underflows.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInstruction {
    script: VecDeque<Step>,
    calls: usize,
}

impl ScriptedInstruction {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: 0,
        }
    }

    /// Every call succeeds, yielding `values` in order.
    pub fn values(values: impl IntoIterator<Item = u64>) -> Self {
        Self::new(values.into_iter().map(Step::Value))
    }

    /// Queues `count` consecutive underflows.
    pub fn push_underflows(&mut self, count: usize) -> &mut Self {
        self.script
            .extend(std::iter::repeat(Step::Underflow).take(count));
        self
    }

    pub fn push_value(&mut self, value: u64) -> &mut Self {
        self.script.push_back(Step::Value(value));
        self
    }

    /// Number of times the instruction has been issued.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomInstruction for ScriptedInstruction {
    fn step(&mut self) -> Option<u64> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(Step::Value(value)) => Some(value),
            Some(Step::Underflow) | None => None,
        }
    }
}
