//! Per-channel transfer busy flags.
//!
//! A [`TransferFlags`] set holds two independent bits, one per transfer
//! direction. It is the single piece of state shared between task context
//! and interrupt context:
//!
//! - a task claims a flag (under a critical section) when arming a transfer,
//! - the completion path clears it from the interrupt handler,
//! - abort clears it from task context,
//! - completion queries are lock-free loads, valid from task context at any
//!   time.
//!
//! Single-core model: claims only happen with interrupts masked, and each
//! flag is cleared by exactly one interrupt vector, so plain atomic loads
//! and stores suffice. No read-modify-write is needed, which also keeps the
//! crate usable on cores without compare-and-swap.

use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::CriticalSection;

/// Transfer direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Tx,
    Rx,
}

/// Two independent busy bits, one per direction.
///
/// Invariant: a bit is set if and only if a transfer in that direction has
/// been armed and has not yet completed or been aborted.
pub struct TransferFlags {
    tx_busy: AtomicBool,
    rx_busy: AtomicBool,
}

impl TransferFlags {
    /// Create the flag set with both bits clear.
    pub const fn new() -> Self {
        Self {
            tx_busy: AtomicBool::new(false),
            rx_busy: AtomicBool::new(false),
        }
    }

    #[inline(always)]
    fn bit(&self, dir: Direction) -> &AtomicBool {
        match dir {
            Direction::Tx => &self.tx_busy,
            Direction::Rx => &self.rx_busy,
        }
    }

    /// Whether a transfer in `dir` is currently armed. Lock-free.
    #[inline]
    pub fn is_busy(&self, dir: Direction) -> bool {
        self.bit(dir).load(Ordering::Acquire)
    }

    /// Task-context claim: set the bit if it was clear.
    ///
    /// Returns `false` (and leaves the bit set) when a transfer is already
    /// armed. The `CriticalSection` token evidences that interrupts are
    /// masked for the check-and-set.
    #[inline]
    pub(crate) fn claim(&self, dir: Direction, _cs: CriticalSection<'_>) -> bool {
        let bit = self.bit(dir);
        if bit.load(Ordering::Acquire) {
            return false;
        }
        bit.store(true, Ordering::Release);
        true
    }

    /// Task-context clear, used by abort and initialization. Idempotent.
    #[inline]
    pub(crate) fn clear(&self, dir: Direction) {
        self.bit(dir).store(false, Ordering::Release);
    }

    /// Interrupt-context clear, used by the completion path. Idempotent.
    ///
    /// Kept as a distinct entry point from [`clear`](Self::clear), mirroring
    /// the from-ISR convention of RTOS flag primitives; both are single
    /// atomic stores here.
    #[inline]
    pub(crate) fn clear_from_isr(&self, dir: Direction) {
        self.bit(dir).store(false, Ordering::Release);
    }
}

impl Default for TransferFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear() {
        let flags = TransferFlags::new();
        assert!(!flags.is_busy(Direction::Tx));
        assert!(!flags.is_busy(Direction::Rx));
    }

    #[test]
    fn claim_is_exclusive_per_direction() {
        let flags = TransferFlags::new();
        critical_section::with(|cs| {
            assert!(flags.claim(Direction::Tx, cs));
            assert!(!flags.claim(Direction::Tx, cs));
            // The other direction is independent.
            assert!(flags.claim(Direction::Rx, cs));
        });
        assert!(flags.is_busy(Direction::Tx));
        assert!(flags.is_busy(Direction::Rx));
    }

    #[test]
    fn clears_are_idempotent() {
        let flags = TransferFlags::new();
        critical_section::with(|cs| assert!(flags.claim(Direction::Tx, cs)));

        flags.clear_from_isr(Direction::Tx);
        assert!(!flags.is_busy(Direction::Tx));
        flags.clear_from_isr(Direction::Tx);
        flags.clear(Direction::Tx);
        assert!(!flags.is_busy(Direction::Tx));

        // A cleared flag can be claimed again.
        critical_section::with(|cs| assert!(flags.claim(Direction::Tx, cs)));
    }
}
