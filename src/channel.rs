//! Per-channel transfer state and the interrupt byte-pump.
//!
//! A [`Channel`] pairs one exclusively-owned [`UartPort`] with its
//! [`TransferFlags`] and the armed-transfer bookkeeping. The port and the
//! byte cursors live behind a `critical_section::Mutex`; the flags sit
//! outside it so completion queries stay lock-free.

use core::cell::RefCell;
use core::ptr::NonNull;

use critical_section::{CriticalSection, Mutex};

use crate::config::Config;
use crate::flags::{Direction, TransferFlags};
use crate::port::{Event, UartPort};

/// Channel identifier.
///
/// The set of channels is closed and known at compile time; an identifier
/// outside it is unrepresentable, so no fallible lookup exists.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    Channel1,
    Channel2,
}

impl ChannelId {
    /// Number of supported channels.
    pub const COUNT: usize = 2;

    /// All channels, in registry order.
    pub const ALL: [ChannelId; Self::COUNT] = [ChannelId::Channel1, ChannelId::Channel2];

    /// Registry slot index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Byte cursor over a caller-owned buffer.
///
/// `pos` counts bytes already handed to (TX) or taken from (RX) the data
/// register.
struct Cursor {
    ptr: NonNull<u8>,
    len: usize,
    pos: usize,
}

// SAFETY: the pointer is only dereferenced while the owning channel's lock
// is held, and the caller of `arm_send`/`arm_receive` guarantees the buffer
// outlives the transfer.
unsafe impl Send for Cursor {}

/// Armed transmit state.
enum TxSource {
    /// Caller-owned buffer; the first byte is already in the data register.
    Buffer(Cursor),
    /// Single byte from the [`Serial`](crate::Serial) adapter, already in
    /// the data register. Nothing left to feed; the next transmit-complete
    /// event finishes the transfer.
    Single,
}

/// Armed receive state.
enum RxSink {
    /// Caller-owned buffer.
    Buffer(Cursor),
    /// Single byte for the [`Serial`](crate::Serial) adapter, landing in
    /// `Inner::rx_byte`.
    Single,
}

pub(crate) struct Inner<P> {
    pub(crate) port: P,
    tx: Option<TxSource>,
    rx: Option<RxSink>,
    /// Completed single-byte receive awaiting pickup by the adapter.
    rx_byte: u8,
    rx_ready: bool,
}

/// One registry slot: flag set plus locked transfer engine.
pub(crate) struct Channel<P> {
    pub(crate) flags: TransferFlags,
    pub(crate) inner: Mutex<RefCell<Inner<P>>>,
}

impl<P: UartPort> Channel<P> {
    pub(crate) fn new(port: P) -> Self {
        Self {
            flags: TransferFlags::new(),
            inner: Mutex::new(RefCell::new(Inner {
                port,
                tx: None,
                rx: None,
                rx_byte: 0,
                rx_ready: false,
            })),
        }
    }

    /// Commit the configuration and reset all transfer state.
    pub(crate) fn initialize(&self, cs: CriticalSection<'_>, config: &Config) {
        let mut inner = self.inner.borrow_ref_mut(cs);
        inner.port.configure(config);
        inner.tx = None;
        inner.rx = None;
        inner.rx_ready = false;
        self.flags.clear(Direction::Tx);
        self.flags.clear(Direction::Rx);
    }

    /// Arm an interrupt-driven transmit, or silently decline if one is in
    /// flight.
    ///
    /// # Safety
    ///
    /// `data` must stay valid and unmodified until the transfer completes or
    /// is aborted; the driver keeps a raw cursor into it.
    pub(crate) unsafe fn arm_send(&self, cs: CriticalSection<'_>, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if !self.flags.claim(Direction::Tx, cs) {
            // A transmission is in flight; the request is dropped.
            return;
        }
        let mut inner = self.inner.borrow_ref_mut(cs);
        let inner = &mut *inner;
        inner.port.write_byte(data[0]);
        // SAFETY: slice pointers are non-null.
        let ptr = unsafe { NonNull::new_unchecked(data.as_ptr().cast_mut()) };
        inner.tx = Some(TxSource::Buffer(Cursor {
            ptr,
            len: data.len(),
            pos: 1,
        }));
    }

    /// Arm an interrupt-driven receive, or silently decline if one is in
    /// flight.
    ///
    /// # Safety
    ///
    /// `buf` must stay valid, and untouched by the caller, until the
    /// transfer completes or is aborted.
    pub(crate) unsafe fn arm_receive(&self, cs: CriticalSection<'_>, buf: &mut [u8]) {
        if buf.is_empty() {
            return;
        }
        if !self.flags.claim(Direction::Rx, cs) {
            return;
        }
        // SAFETY: slice pointers are non-null.
        let ptr = unsafe { NonNull::new_unchecked(buf.as_mut_ptr()) };
        let mut inner = self.inner.borrow_ref_mut(cs);
        inner.rx = Some(RxSink::Buffer(Cursor {
            ptr,
            len: buf.len(),
            pos: 0,
        }));
    }

    /// Request hardware cancellation and clear the busy flag.
    ///
    /// Always cancels exactly once, armed or not, and always leaves the
    /// direction idle.
    pub(crate) fn abort(&self, cs: CriticalSection<'_>, dir: Direction) {
        let mut inner = self.inner.borrow_ref_mut(cs);
        match dir {
            Direction::Tx => {
                inner.port.abort_tx();
                inner.tx = None;
            }
            Direction::Rx => {
                inner.port.abort_rx();
                inner.rx = None;
                inner.rx_ready = false;
            }
        }
        self.flags.clear(dir);
    }

    /// Interrupt dispatch: drain pending events and advance the transfer.
    ///
    /// Runs from the channel's interrupt vector. Bounded work per event (one
    /// data-register access), no blocking, no allocation.
    pub(crate) fn service(&self, cs: CriticalSection<'_>) {
        let mut inner = self.inner.borrow_ref_mut(cs);
        let inner = &mut *inner;
        while let Some(event) = inner.port.pending_event() {
            match event {
                Event::RxNotEmpty => {
                    let byte = inner.port.read_byte();
                    let completed = match inner.rx.as_mut() {
                        Some(RxSink::Buffer(cur)) => {
                            // SAFETY: the arm_receive caller keeps the
                            // buffer alive; pos < len holds until the sink
                            // is dropped below.
                            unsafe { cur.ptr.as_ptr().add(cur.pos).write(byte) };
                            cur.pos += 1;
                            cur.pos == cur.len
                        }
                        Some(RxSink::Single) => {
                            inner.rx_byte = byte;
                            inner.rx_ready = true;
                            true
                        }
                        // No receive armed: the byte is read out (keeping
                        // the interrupt source quiet) and discarded.
                        None => false,
                    };
                    if completed {
                        inner.rx = None;
                        self.flags.clear_from_isr(Direction::Rx);
                    }
                }
                Event::TxComplete => {
                    let completed = match inner.tx.as_mut() {
                        Some(TxSource::Buffer(cur)) if cur.pos < cur.len => {
                            // SAFETY: the arm_send caller keeps the buffer
                            // alive and pos is in bounds.
                            let byte = unsafe { cur.ptr.as_ptr().add(cur.pos).read() };
                            cur.pos += 1;
                            inner.port.write_byte(byte);
                            false
                        }
                        // Last byte left the shift register.
                        Some(_) => true,
                        // Stray completion (e.g. after an abort raced the
                        // final byte): nothing to do.
                        None => false,
                    };
                    if completed {
                        inner.tx = None;
                        self.flags.clear_from_isr(Direction::Tx);
                    }
                }
            }
        }
    }

    /// Single-byte transmit for the serial adapter. Returns `false` while a
    /// transmission is in flight.
    pub(crate) fn write_byte_nb(&self, cs: CriticalSection<'_>, byte: u8) -> bool {
        if !self.flags.claim(Direction::Tx, cs) {
            return false;
        }
        let mut inner = self.inner.borrow_ref_mut(cs);
        inner.port.write_byte(byte);
        inner.tx = Some(TxSource::Single);
        true
    }

    /// Single-byte receive for the serial adapter.
    ///
    /// Returns a completed byte if one is pending; otherwise makes sure a
    /// receive is armed and returns `None`.
    pub(crate) fn read_byte_nb(&self, cs: CriticalSection<'_>) -> Option<u8> {
        let mut inner = self.inner.borrow_ref_mut(cs);
        if inner.rx_ready {
            inner.rx_ready = false;
            return Some(inner.rx_byte);
        }
        if self.flags.claim(Direction::Rx, cs) {
            inner.rx = Some(RxSink::Single);
        }
        None
    }
}
