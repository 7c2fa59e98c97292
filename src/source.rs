//! The input contract toward the external RDF syntax parser: a sequence
//! of statements, each paired one-to-one with a source location.
//!
//! Two implementations are provided. Any iterator over `(Triple, Meta)`
//! pairs works directly, which is what tests and in-memory callers use.
//! `stream()` builds a bounded channel pair for a syntax parser running
//! on a background thread; statements and locations travel on separate
//! channels and are received in lockstep, one location per statement.
//! The resolver keeps receiving to exhaustion even after a processing
//! error, so a producer blocked on the bounded channel can always finish
//! and its thread is never leaked.

use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

use crate::term::{Meta, Triple};

/// A producer of statements paired with source locations.
pub trait TripleSource {
    /// The next statement and its location, or `None` when the stream is
    /// exhausted.
    fn next_statement(&mut self) -> Option<(Triple, Meta)>;
}

impl<I> TripleSource for I
where
    I: Iterator<Item = (Triple, Meta)>,
{
    fn next_statement(&mut self) -> Option<(Triple, Meta)> {
        self.next()
    }
}

/// Sending half handed to the syntax parser's thread.
pub struct StreamProducer {
    statements: SyncSender<Triple>,
    locations: SyncSender<Meta>,
}

impl StreamProducer {
    /// Send one statement and its location. Returns `false` once the
    /// consuming side is gone and the producer should stop.
    pub fn send(&self, statement: Triple, meta: Meta) -> bool {
        if self.statements.send(statement).is_err() {
            return false;
        }
        self.locations.send(meta).is_ok()
    }
}

/// Receiving half consumed by the resolver. Iterating receives in
/// lockstep, so it is a `TripleSource` through the blanket impl.
pub struct StreamSource {
    statements: Receiver<Triple>,
    locations: Receiver<Meta>,
}

impl Iterator for StreamSource {
    type Item = (Triple, Meta);

    fn next(&mut self) -> Option<(Triple, Meta)> {
        let statement = self.statements.recv().ok()?;
        // Locations are paired strictly one per statement; a closed
        // location channel here means the producer broke the pairing.
        let meta = self.locations.recv().ok()?;
        Some((statement, meta))
    }
}

/// Create a bounded producer/source pair. `capacity` bounds both the
/// statement and the location channel.
pub fn stream(capacity: usize) -> (StreamProducer, StreamSource) {
    let (statement_tx, statement_rx) = sync_channel(capacity);
    let (location_tx, location_rx) = sync_channel(capacity);
    (
        StreamProducer {
            statements: statement_tx,
            locations: location_tx,
        },
        StreamSource {
            statements: statement_rx,
            locations: location_rx,
        },
    )
}
