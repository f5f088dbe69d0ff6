//! UART channel configuration.
//!
//! The frame format is a fixed policy shared by every channel: 8 data bits,
//! no parity, 1 stop bit, no hardware flow control, 16x oversampling. Only
//! the baud rate varies, chosen once per channel at initialization.

use core::{error, fmt};

use embedded_hal_nb::serial;
use embedded_io as eio;

/// UART channel configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Peripheral input clock in Hz.
    pub clock_hz: u32,
    /// Requested baud rate (bps).
    pub baud: u32,
}

impl Config {
    /// The frame policy applied to every channel.
    pub const FRAME: Frame = Frame {
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
        flow_control: FlowControl::None,
        oversampling: Oversampling::Sixteen,
    };

    /// Create a configuration for the given peripheral clock and baud rate.
    #[inline]
    pub const fn new(clock_hz: u32, baud: u32) -> Self {
        Self { clock_hz, baud }
    }

    /// Compute the baud-rate divisor committed to the hardware.
    ///
    /// `div = clock_hz / baud`. Returns `None` if `baud == 0` or the result
    /// does not fit the 16-bit divider register.
    #[inline]
    pub const fn divisor(&self) -> Option<u16> {
        if self.baud == 0 {
            return None;
        }
        let div = self.clock_hz / self.baud;
        if div == 0 || div > u16::MAX as u32 {
            None
        } else {
            Some(div as u16)
        }
    }
}

/// Frame format description, fixed at [`Config::FRAME`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    pub oversampling: Oversampling,
}

/// UART data bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Eight,
    Nine,
}

/// UART parity configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// UART stop bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// Hardware flow control configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    None,
    RtsCts,
}

/// Receiver oversampling factor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    Eight,
    Sixteen,
}

/// Errors returned by the driver.
///
/// Hardware-level transfer faults (framing, parity, overrun) are not
/// surfaced by this driver; the only failure in scope is a configuration
/// the divider cannot represent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Invalid configuration (the baud divisor does not fit).
    BadConfig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Error::BadConfig => "UART bad configuration",
        };
        f.write_str(s)
    }
}

impl error::Error for Error {}

impl serial::Error for Error {
    #[inline]
    fn kind(&self) -> serial::ErrorKind {
        match self {
            Error::BadConfig => serial::ErrorKind::Other,
        }
    }
}

impl eio::Error for Error {
    #[inline]
    fn kind(&self) -> eio::ErrorKind {
        match self {
            Error::BadConfig => eio::ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_matches_clock_over_baud() {
        let config = Config::new(8_000_000, 115_200);
        assert_eq!(config.divisor(), Some(69));

        let config = Config::new(72_000_000, 9_600);
        assert_eq!(config.divisor(), Some(7_500));
    }

    #[test]
    fn divisor_rejects_unrepresentable_rates() {
        // Zero baud rate.
        assert_eq!(Config::new(8_000_000, 0).divisor(), None);
        // Divisor overflows 16 bits.
        assert_eq!(Config::new(72_000_000, 1).divisor(), None);
        // Baud rate above the peripheral clock divides to zero.
        assert_eq!(Config::new(1_000, 115_200).divisor(), None);
    }

    #[test]
    fn frame_policy_is_8n1() {
        let frame = Config::FRAME;
        assert_eq!(frame.data_bits, DataBits::Eight);
        assert_eq!(frame.parity, Parity::None);
        assert_eq!(frame.stop_bits, StopBits::One);
        assert_eq!(frame.flow_control, FlowControl::None);
        assert_eq!(frame.oversampling, Oversampling::Sixteen);
    }
}
