//! Delayed delivery of opponent tickets

use crate::session::OpponentTicket;

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{after, bounded, select, unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::debug;

/// Handle to cancel a pending delivery
///
/// Dropping the token cancels the delivery as well.
#[derive(Debug)]
pub struct CancelToken(Sender<()>);

impl CancelToken {
    pub fn cancel(self) {
        let _ = self.0.send(());
    }
}

struct Pending {
    token: CancelToken,
    handle: JoinHandle<()>,
}

/// Timer delivering at most one opponent ticket at a time
///
/// Each armed ticket is waited for on a separate thread, which sends it to the ready
/// channel once the delay expires. The tickets are received back on the owner's thread
/// with [`OpponentTimer::recv_timeout`] or [`OpponentTimer::try_recv`].
pub struct OpponentTimer {
    ready_tx: Sender<OpponentTicket>,
    ready_rx: Receiver<OpponentTicket>,
    pending: Option<Pending>,
}

impl OpponentTimer {
    pub fn new() -> OpponentTimer {
        let (ready_tx, ready_rx) = unbounded();
        OpponentTimer {
            ready_tx,
            ready_rx,
            pending: None,
        }
    }

    /// Delivers `ticket` after `delay`, cancelling the pending delivery if any
    pub fn arm(&mut self, ticket: OpponentTicket, delay: Duration) {
        self.cancel();
        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let ready = self.ready_tx.clone();
        let handle = thread::spawn(move || {
            select! {
                recv(cancel_rx) -> _ => {
                    debug!(ticket = ticket.generation(), "opponent move cancelled");
                }
                recv(after(delay)) -> _ => {
                    let _ = ready.send(ticket);
                }
            }
        });
        self.pending = Some(Pending {
            token: CancelToken(cancel_tx),
            handle,
        });
    }

    /// Cancels the pending delivery
    ///
    /// Tickets already delivered but not yet received are dropped.
    pub fn cancel(&mut self) {
        if let Some(Pending { token, handle }) = self.pending.take() {
            token.cancel();
            let _ = handle.join();
        }
        while self.ready_rx.try_recv().is_ok() {}
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some() || !self.ready_rx.is_empty()
    }

    fn finish(&mut self, ticket: OpponentTicket) -> OpponentTicket {
        if let Some(Pending { handle, .. }) = self.pending.take() {
            let _ = handle.join();
        }
        ticket
    }

    /// Waits for the pending ticket at most `timeout`
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<OpponentTicket> {
        match self.ready_rx.recv_timeout(timeout) {
            Ok(ticket) => Some(self.finish(ticket)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Returns the pending ticket if its delay has already expired
    pub fn try_recv(&mut self) -> Option<OpponentTicket> {
        let ticket = self.ready_rx.try_recv().ok()?;
        Some(self.finish(ticket))
    }
}

impl Default for OpponentTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OpponentTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
