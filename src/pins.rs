//! Pin descriptions consumed by the external pin/clock configurator.
//!
//! This crate does not touch GPIO or clock registers. The tables below state
//! what each channel needs; board support code is expected to enable the
//! relevant clocks and program the pins *before* calling
//! [`UartBus::initialize`](crate::UartBus::initialize).

use crate::channel::ChannelId;

/// GPIO port identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
}

/// Pin mode as programmed by the configurator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
    AlternateInput,
    AlternatePushPull,
}

/// Internal pull resistor configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// One pin assignment: where it lives and how it must be programmed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub port: Port,
    pub pin: u8,
    pub mode: PinMode,
    pub pull: Pull,
}

/// TX pin assignment for a channel.
#[inline]
pub const fn tx_pin(id: ChannelId) -> PinConfig {
    match id {
        ChannelId::Channel1 => PinConfig {
            port: Port::A,
            pin: 9,
            mode: PinMode::AlternatePushPull,
            pull: Pull::None,
        },
        ChannelId::Channel2 => PinConfig {
            port: Port::A,
            pin: 2,
            mode: PinMode::AlternatePushPull,
            pull: Pull::None,
        },
    }
}

/// RX pin assignment for a channel.
#[inline]
pub const fn rx_pin(id: ChannelId) -> PinConfig {
    match id {
        ChannelId::Channel1 => PinConfig {
            port: Port::A,
            pin: 10,
            mode: PinMode::AlternateInput,
            pull: Pull::Up,
        },
        ChannelId::Channel2 => PinConfig {
            port: Port::A,
            pin: 3,
            mode: PinMode::AlternateInput,
            pull: Pull::Up,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_do_not_collide() {
        let mut seen = std::vec::Vec::new();
        for id in ChannelId::ALL {
            for pc in [tx_pin(id), rx_pin(id)] {
                assert!(!seen.contains(&(pc.port, pc.pin)));
                seen.push((pc.port, pc.pin));
            }
        }
    }

    #[test]
    fn rx_pins_are_pulled_up_inputs() {
        for id in ChannelId::ALL {
            let rx = rx_pin(id);
            assert_eq!(rx.mode, PinMode::AlternateInput);
            assert_eq!(rx.pull, Pull::Up);
        }
    }
}
