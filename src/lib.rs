//! Interrupt-driven, non-blocking UART channels for cooperatively scheduled
//! firmware, implemented in an idiomatic embedded Rust style.
//!
//! This crate is intentionally minimal and "standard":
//! - A fixed, compile-time-known set of channels ([`ChannelId`]) owned by a
//!   single [`UartBus`] registry; no global mutable state.
//! - Hardware access goes through the [`UartPort`] trait, so the transfer
//!   engine is target-agnostic and host-testable.
//! - Per-channel, per-direction busy flags ([`TransferFlags`]) are the only
//!   state shared between task and interrupt context; completion queries are
//!   lock-free and callable at any time.
//! - `embedded-hal-nb` serial traits and `embedded-io` `Write` are provided
//!   on top of the flag machinery via [`Serial`].
//!
//! # Execution model
//!
//! [`UartBus::send`] and [`UartBus::receive`] never block: they arm an
//! interrupt-driven transfer and raise the direction's busy flag, or silently
//! decline if one is already in flight. The channel's interrupt vector calls
//! [`UartBus::on_interrupt`], which pumps bytes between buffer and data
//! register and clears the busy flag on completion. Tasks poll
//! [`UartBus::is_send_complete`] / [`UartBus::is_receive_complete`] (or a
//! scheduler-provided wait built on the flags) before reusing a buffer or
//! issuing the next transfer.
//!
//! ```ignore
//! static BUS: StaticCell<UartBus<MyPort>> = StaticCell::new();
//!
//! let bus = BUS.init(UartBus::new([port1, port2], 8_000_000));
//! bus.initialize(ChannelId::Channel1, 115_200)?;
//!
//! // task context
//! unsafe { bus.send(ChannelId::Channel1, b"hello") };
//! while !bus.is_send_complete(ChannelId::Channel1) { /* yield */ }
//!
//! // vector for channel 1
//! #[interrupt]
//! fn USART1() {
//!     bus.on_interrupt(ChannelId::Channel1);
//! }
//! ```
//!
//! Pin and clock configuration stays outside this crate: the tables in
//! [`pins`] describe what each channel needs, and the board support code is
//! expected to program them before calling [`UartBus::initialize`].

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod channel;
pub mod config;
pub mod flags;
pub mod pins;
pub mod port;
pub mod serial;
pub mod task;

#[cfg(test)]
mod mock;

pub use bus::UartBus;
pub use channel::ChannelId;
pub use config::{Config, DataBits, Error, FlowControl, Frame, Oversampling, Parity, StopBits};
pub use flags::{Direction, TransferFlags};
pub use pins::{PinConfig, PinMode, Port, Pull};
pub use port::{Event, UartPort};
pub use serial::Serial;
pub use task::Task;
