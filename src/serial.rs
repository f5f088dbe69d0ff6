//! Byte-wise serial trait adapters.
//!
//! [`Serial`] exposes one channel through the `embedded-hal-nb` serial
//! traits and `embedded-io` `Write`, layered on the same busy-flag
//! machinery as the buffer operations: a write is `WouldBlock` while a
//! transmission is in flight, a read is `WouldBlock` until an armed
//! single-byte receive completes. Single-byte transfers are staged inside
//! the channel, so no caller-owned buffer (and no `unsafe`) is involved.

use embedded_hal_nb::serial;
use embedded_io as eio;

use crate::bus::UartBus;
use crate::channel::ChannelId;
use crate::config::Error;
use crate::port::UartPort;

/// A byte-wise handle over one channel of a [`UartBus`].
///
/// Mixing a `Serial` with buffer-level [`UartBus::send`] /
/// [`UartBus::receive`] on the same channel is allowed; both respect the
/// same one-transfer-per-direction policy.
pub struct Serial<'a, P> {
    bus: &'a UartBus<P>,
    id: ChannelId,
}

impl<'a, P: UartPort> Serial<'a, P> {
    pub(crate) fn new(bus: &'a UartBus<P>, id: ChannelId) -> Self {
        Self { bus, id }
    }

    /// The channel this handle addresses.
    #[inline]
    pub fn channel(&self) -> ChannelId {
        self.id
    }
}

impl<P: UartPort> serial::ErrorType for Serial<'_, P> {
    type Error = Error;
}

impl<P: UartPort> eio::ErrorType for Serial<'_, P> {
    type Error = Error;
}

impl<P: UartPort> serial::Write<u8> for Serial<'_, P> {
    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        critical_section::with(|cs| {
            if self.bus.channel(self.id).write_byte_nb(cs, word) {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        })
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if self.bus.is_send_complete(self.id) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<P: UartPort> serial::Read<u8> for Serial<'_, P> {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        critical_section::with(|cs| {
            self.bus
                .channel(self.id)
                .read_byte_nb(cs)
                .ok_or(nb::Error::WouldBlock)
        })
    }
}

impl<P: UartPort> eio::Write for Serial<'_, P> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &b in buf {
            nb::block!(<Self as serial::Write<u8>>::write(self, b))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        nb::block!(<Self as serial::Write<u8>>::flush(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPort;
    use crate::port::Event;
    use embedded_hal_nb::serial::{Read, Write};

    const CH1: ChannelId = ChannelId::Channel1;

    fn bus() -> UartBus<MockPort> {
        let bus = UartBus::new([MockPort::new(), MockPort::new()], 8_000_000);
        bus.initialize(CH1, 115_200).unwrap();
        bus
    }

    #[test]
    fn write_blocks_while_transmission_in_flight() {
        let bus = bus();
        let mut serial = bus.serial(CH1);

        assert_eq!(serial.write(b'A'), Ok(()));
        assert_eq!(serial.write(b'B'), Err(nb::Error::WouldBlock));
        assert_eq!(serial.flush(), Err(nb::Error::WouldBlock));
        assert_eq!(bus.with_port(CH1, |p| p.written.clone()), [b'A']);

        bus.with_port(CH1, |p| p.push_event(Event::TxComplete));
        bus.on_interrupt(CH1);

        assert_eq!(serial.flush(), Ok(()));
        assert_eq!(serial.write(b'B'), Ok(()));
        assert_eq!(bus.with_port(CH1, |p| p.written.clone()), [b'A', b'B']);
    }

    #[test]
    fn write_respects_buffer_transfers() {
        let bus = bus();
        let mut serial = bus.serial(CH1);
        let data = [0x01, 0x02];

        unsafe { bus.send(CH1, &data) };
        assert_eq!(serial.write(b'X'), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn read_arms_once_and_yields_the_byte() {
        let bus = bus();
        let mut serial = bus.serial(CH1);

        // First read arms a single-byte receive.
        assert_eq!(serial.read(), Err(nb::Error::WouldBlock));
        assert!(!bus.is_receive_complete(CH1));
        // Re-polling does not re-arm or lose anything.
        assert_eq!(serial.read(), Err(nb::Error::WouldBlock));

        bus.with_port(CH1, |p| p.push_rx_byte(0x5A));
        bus.on_interrupt(CH1);

        assert!(bus.is_receive_complete(CH1));
        assert_eq!(serial.read(), Ok(0x5A));
        // The byte is consumed; the next poll arms a fresh receive.
        assert_eq!(serial.read(), Err(nb::Error::WouldBlock));
        assert!(!bus.is_receive_complete(CH1));
    }

    #[test]
    fn abort_receive_discards_a_pending_byte() {
        let bus = bus();
        let mut serial = bus.serial(CH1);

        assert_eq!(serial.read(), Err(nb::Error::WouldBlock));
        bus.with_port(CH1, |p| p.push_rx_byte(0x99));
        bus.on_interrupt(CH1);

        bus.abort_receive(CH1);
        // The completed byte went with the abort; a new receive is armed.
        assert_eq!(serial.read(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn blocking_write_via_embedded_io() {
        let bus = bus();
        let mut serial = bus.serial(CH1);

        // One byte fits without pumping.
        assert_eq!(eio::Write::write(&mut serial, b"Q"), Ok(1));
        assert!(!bus.is_send_complete(CH1));
        bus.with_port(CH1, |p| p.push_event(Event::TxComplete));
        bus.on_interrupt(CH1);
        assert_eq!(eio::Write::flush(&mut serial), Ok(()));
        assert_eq!(bus.with_port(CH1, |p| p.written.clone()), [b'Q']);
    }
}
