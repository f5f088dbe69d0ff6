//! The channel registry and operation surface.
//!
//! [`UartBus`] owns the state of every channel and is the single object
//! passed (by shared reference) to tasks and interrupt handlers. All
//! operations take `&self`; mutation happens behind per-channel locks and
//! atomic flags, so a `static` bus can be shared with interrupt vectors.

use crate::channel::{Channel, ChannelId};
use crate::config::{Config, Error};
use crate::flags::{Direction, TransferFlags};
use crate::port::UartPort;
use crate::serial::Serial;

/// Fixed-size registry of UART channels, one slot per [`ChannelId`].
///
/// Slots are created once and mutated in place; channels are never added or
/// removed.
pub struct UartBus<P> {
    clock_hz: u32,
    channels: [Channel<P>; ChannelId::COUNT],
}

impl<P: UartPort> UartBus<P> {
    /// Build the registry from the peripheral ports, in [`ChannelId::ALL`]
    /// order, and the peripheral clock feeding their baud generators.
    pub fn new(ports: [P; ChannelId::COUNT], clock_hz: u32) -> Self {
        Self {
            clock_hz,
            channels: ports.map(Channel::new),
        }
    }

    #[inline(always)]
    pub(crate) fn channel(&self, id: ChannelId) -> &Channel<P> {
        &self.channels[id.index()]
    }

    /// Initialize a channel: commit the fixed frame policy and `baud` to the
    /// hardware, enable its interrupt sources, and clear both busy flags.
    ///
    /// The channel's pins and clocks must already be configured (see
    /// [`pins`](crate::pins)). Call at most once per channel;
    /// re-initialization is unsupported.
    ///
    /// Returns [`Error::BadConfig`] if the divider cannot represent `baud`.
    pub fn initialize(&self, id: ChannelId, baud: u32) -> Result<(), Error> {
        let config = Config::new(self.clock_hz, baud);
        if config.divisor().is_none() {
            return Err(Error::BadConfig);
        }
        critical_section::with(|cs| self.channel(id).initialize(cs, &config));
        Ok(())
    }

    /// Arm a non-blocking, interrupt-driven transmit of `data`.
    ///
    /// If a transmission is already in flight on `id`, the call is a no-op
    /// and the request is dropped; check [`is_send_complete`] first. There
    /// is no return status. An empty `data` is a no-op.
    ///
    /// # Safety
    ///
    /// `data` must stay valid and unmodified until
    /// [`is_send_complete`](Self::is_send_complete)`(id)` is true again (by
    /// completion or [`abort_send`](Self::abort_send)); the driver neither
    /// copies the buffer nor takes ownership of it. The channel must have
    /// been initialized.
    ///
    /// [`is_send_complete`]: Self::is_send_complete
    pub unsafe fn send(&self, id: ChannelId, data: &[u8]) {
        critical_section::with(|cs| {
            // SAFETY: forwarded caller contract.
            unsafe { self.channel(id).arm_send(cs, data) }
        })
    }

    /// Arm a non-blocking, interrupt-driven receive into `buf`.
    ///
    /// Same drop-if-busy policy as [`send`](Self::send), against the RX busy
    /// flag.
    ///
    /// # Safety
    ///
    /// `buf` must stay valid, and untouched by the caller, until
    /// [`is_receive_complete`](Self::is_receive_complete)`(id)` is true
    /// again. The channel must have been initialized.
    pub unsafe fn receive(&self, id: ChannelId, buf: &mut [u8]) {
        critical_section::with(|cs| {
            // SAFETY: forwarded caller contract.
            unsafe { self.channel(id).arm_receive(cs, buf) }
        })
    }

    /// Whether no transmission is in flight on `id`.
    ///
    /// Pure lock-free read; trivially true before any send was armed.
    #[inline]
    pub fn is_send_complete(&self, id: ChannelId) -> bool {
        !self.channel(id).flags.is_busy(Direction::Tx)
    }

    /// Whether no reception is in flight on `id`.
    #[inline]
    pub fn is_receive_complete(&self, id: ChannelId) -> bool {
        !self.channel(id).flags.is_busy(Direction::Rx)
    }

    /// Request cancellation of any in-flight transmit and mark the
    /// direction idle. Always succeeds; idempotent.
    pub fn abort_send(&self, id: ChannelId) {
        critical_section::with(|cs| self.channel(id).abort(cs, Direction::Tx))
    }

    /// Request cancellation of any in-flight receive and mark the direction
    /// idle. Always succeeds; idempotent.
    pub fn abort_receive(&self, id: ChannelId) {
        critical_section::with(|cs| self.channel(id).abort(cs, Direction::Rx))
    }

    /// Interrupt dispatch entry: call from the interrupt vector of `id`.
    ///
    /// Drains the port's pending events, advances the in-flight transfers,
    /// and on completion clears the busy flag of this channel only.
    pub fn on_interrupt(&self, id: ChannelId) {
        critical_section::with(|cs| self.channel(id).service(cs))
    }

    /// The channel's flag set, for building scheduler-level waits on top of
    /// the completion bits.
    #[inline]
    pub fn flags(&self, id: ChannelId) -> &TransferFlags {
        &self.channel(id).flags
    }

    /// A byte-wise `embedded-hal-nb` / `embedded-io` handle over `id`.
    pub fn serial(&self, id: ChannelId) -> Serial<'_, P> {
        Serial::new(self, id)
    }

    /// Direct port access for host tests.
    #[cfg(test)]
    pub(crate) fn with_port<R>(&self, id: ChannelId, f: impl FnOnce(&mut P) -> R) -> R {
        critical_section::with(|cs| f(&mut self.channel(id).inner.borrow_ref_mut(cs).port))
    }
}
