//! Hardware seam for one UART peripheral instance.
//!
//! The transfer engine in [`channel`](crate::channel) is written against
//! this trait so the core stays target-agnostic. A target implementation
//! wraps the PAC registers of one peripheral instance plus its NVIC vector;
//! host tests use a recording mock.

use crate::config::Config;

/// Interrupt cause reported by a [`UartPort`].
///
/// These are the two interrupt sources the driver enables: receive register
/// not empty, and transmit complete (one byte fully shifted out).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    RxNotEmpty,
    TxComplete,
}

/// One UART peripheral instance, exclusively owned by its channel slot.
///
/// All methods are called either with interrupts masked or from the
/// channel's own interrupt handler; implementations need no internal
/// locking. None of them may block or allocate.
pub trait UartPort {
    /// Commit the frame policy ([`Config::FRAME`]) and baud divisor to the
    /// hardware, enable the receive-not-empty and transmit-complete
    /// interrupt sources, and unmask the instance's interrupt vector at the
    /// fixed driver priority.
    ///
    /// The driver validates [`Config::divisor`] before calling, so the
    /// divisor is always representable here.
    fn configure(&mut self, config: &Config);

    /// Read and acknowledge the next pending interrupt cause, if any.
    ///
    /// Called from the interrupt handler until it returns `None`.
    fn pending_event(&mut self) -> Option<Event>;

    /// Read the received byte out of the data register.
    fn read_byte(&mut self) -> u8;

    /// Put one byte into the transmit data register.
    fn write_byte(&mut self, byte: u8);

    /// Request cancellation of any in-flight transmission.
    ///
    /// Must be safe to call when nothing is in flight. Cancellation need not
    /// be instantaneous; the driver only requires that no further
    /// [`Event::TxComplete`] causes completion of the aborted transfer.
    fn abort_tx(&mut self);

    /// Request cancellation of any in-flight reception. Same caveats as
    /// [`abort_tx`](Self::abort_tx).
    fn abort_rx(&mut self);
}
