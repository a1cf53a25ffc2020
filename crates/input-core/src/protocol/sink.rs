//! The transport seam: where encoded records leave the core.
//!
//! The core only needs one operation from a connection: hand it a record and
//! move on.  Delivery is fire-and-forget; nothing is acknowledged, retried or
//! inspected.
//!
//! # Buffer ownership
//!
//! `send` receives a *borrowed* slice that points into the encoder's reusable
//! scratch buffer.  The borrow ends when `send` returns, so an implementation
//! that transmits later must copy the slots (for example with
//! [`record_to_le_bytes`](crate::protocol::codec::record_to_le_bytes)) before
//! returning.  It cannot keep the reference; the compiler rejects that.

/// Receives encoded records in submission order.
///
/// The production implementation forwards records over a WebSocket; tests
/// use [`RecordingSink`].
#[cfg_attr(test, mockall::automock)]
pub trait RecordSink {
    /// Accepts one record.  Must not block and never reports failure.
    fn send(&mut self, record: &[i32]);
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn send(&mut self, record: &[i32]) {
        (**self).send(record);
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn send(&mut self, record: &[i32]) {
        (**self).send(record);
    }
}

/// A sink that keeps a copy of every record it receives.
///
/// Useful for tests and for inspecting what a sequence of events produces.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Vec<Vec<i32>>,
}

impl RecordingSink {
    /// Returns every record received so far, oldest first.
    pub fn records(&self) -> &[Vec<i32>] {
        &self.records
    }

    /// Returns the most recent record, if any.
    pub fn last(&self) -> Option<&[i32]> {
        self.records.last().map(Vec::as_slice)
    }

    /// Number of records received.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been sent.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops all recorded records.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl RecordSink for RecordingSink {
    fn send(&mut self, record: &[i32]) {
        self.records.push(record.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_snapshots_each_record() {
        // Arrange: one buffer reused for two sends, like the encoder does.
        let mut sink = RecordingSink::default();
        let mut buf = [3, 10, 10, 0];

        // Act
        sink.send(&buf);
        buf[1] = 99;
        sink.send(&buf);

        // Assert: the first record was not mutated by the second write.
        assert_eq!(sink.records(), &[vec![3, 10, 10, 0], vec![3, 99, 10, 0]]);
    }

    #[test]
    fn test_recording_sink_clear() {
        let mut sink = RecordingSink::default();
        sink.send(&[6, 1, 1, 0]);
        assert_eq!(sink.len(), 1);
        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(sink.last(), None);
    }

    #[test]
    fn test_mut_ref_forwards_to_inner_sink() {
        fn send_one<S: RecordSink>(mut sink: S) {
            sink.send(&[4, 65, 0, 0]);
        }

        let mut inner = RecordingSink::default();
        send_one(&mut inner);
        assert_eq!(inner.last(), Some(&[4, 65, 0, 0][..]));
    }

    #[test]
    fn test_mock_sink_send_returns_unit() {
        // `send` has no return value to await or inspect.
        let mut mock = MockRecordSink::new();
        mock.expect_send().times(1).return_const(());
        mock.send(&[6, 800, 600, 0]);
    }
}
