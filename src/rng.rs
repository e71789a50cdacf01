//! `rand_core` integration, so the hardware source can seed or back a CSPRNG.

use rand_core::{TryCryptoRng, TryRngCore};

use crate::error::Underflow;
use crate::source::{EntropySource, HardwareEntropySource, RandomInstruction};

impl<I: RandomInstruction> TryRngCore for HardwareEntropySource<I> {
    type Error = Underflow;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        self.try_next_u64().map(|word| word as u32)
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        self.sample().value().ok_or(Underflow)
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.try_next_u64()?.to_ne_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
        Ok(())
    }
}

impl<I: RandomInstruction> TryCryptoRng for HardwareEntropySource<I> {}
