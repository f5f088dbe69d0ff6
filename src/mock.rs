//! Recording `UartPort` implementation for host tests.

use std::collections::VecDeque;

use crate::config::Config;
use crate::port::{Event, UartPort};

/// A scripted stand-in for one UART peripheral instance.
///
/// Bytes written to the data register, abort requests and the committed
/// configuration are recorded; interrupt causes and received bytes are
/// injected by the test before calling `UartBus::on_interrupt`.
pub struct MockPort {
    pub configured: Option<Config>,
    pub written: Vec<u8>,
    pub tx_aborts: usize,
    pub rx_aborts: usize,
    events: VecDeque<Event>,
    rx_bytes: VecDeque<u8>,
}

impl MockPort {
    pub fn new() -> Self {
        Self {
            configured: None,
            written: Vec::new(),
            tx_aborts: 0,
            rx_aborts: 0,
            events: VecDeque::new(),
            rx_bytes: VecDeque::new(),
        }
    }

    /// Queue an interrupt cause for the next `on_interrupt`.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Simulate one byte arriving on the wire: queues the byte and its
    /// receive-not-empty cause.
    pub fn push_rx_byte(&mut self, byte: u8) {
        self.rx_bytes.push_back(byte);
        self.events.push_back(Event::RxNotEmpty);
    }
}

impl UartPort for MockPort {
    fn configure(&mut self, config: &Config) {
        self.configured = Some(*config);
    }

    fn pending_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    fn read_byte(&mut self) -> u8 {
        self.rx_bytes.pop_front().unwrap_or(0)
    }

    fn write_byte(&mut self, byte: u8) {
        self.written.push(byte);
    }

    fn abort_tx(&mut self) {
        self.tx_aborts += 1;
    }

    fn abort_rx(&mut self) {
        self.rx_aborts += 1;
    }
}
