use std::{fmt, sync::Arc};

use crate::model::Record;

/// Append-only record of revealed cells, newest first.
///
/// Each node shares its tail, so a handle returned to a caller stays valid
/// and unchanged while the game keeps recording.
#[derive(Clone)]
pub struct History {
    record: Record,
    previous: Option<Arc<History>>,
}

impl History {
    pub fn record(&self) -> Record {
        self.record
    }

    pub fn previous(&self) -> Option<&History> {
        self.previous.as_deref()
    }

    pub fn iter(&self) -> HistoryIter<'_> {
        HistoryIter { next: Some(self) }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// A `History` node always holds at least its own record.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Drop for History {
    // Unlink iteratively; the default drop recurses once per record.
    fn drop(&mut self) {
        let mut next = self.previous.take();
        while let Some(node) = next {
            next = Arc::into_inner(node).and_then(|mut history| history.previous.take());
        }
    }
}

impl PartialEq for History {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = Record;
    type IntoIter = HistoryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct HistoryIter<'a> {
    next: Option<&'a History>,
}

impl Iterator for HistoryIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.previous();
        Some(node.record)
    }
}

/// Head of the chain owned by a game.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    head: Option<Arc<History>>,
}

impl Recorder {
    pub fn add(&mut self, record: Record) {
        let previous = self.head.take();
        self.head = Some(Arc::new(History { record, previous }));
    }

    pub fn head(&self) -> Option<Arc<History>> {
        self.head.clone()
    }

    pub fn last(&self) -> Option<Record> {
        self.head.as_ref().map(|h| h.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, Pos};

    fn record(x: usize, action: Action) -> Record {
        Record {
            pos: Pos::new(x, 0),
            action,
        }
    }

    #[test]
    fn newest_record_comes_first() {
        let mut recorder = Recorder::default();
        assert!(recorder.head().is_none());
        assert!(recorder.last().is_none());

        recorder.add(record(0, Action::Unknown));
        recorder.add(record(1, Action::Number));
        recorder.add(record(2, Action::Bomb));

        assert_eq!(recorder.last(), Some(record(2, Action::Bomb)));
        let history = recorder.head().expect("history");
        assert_eq!(history.len(), 3);
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            vec![
                record(2, Action::Bomb),
                record(1, Action::Number),
                record(0, Action::Unknown)
            ]
        );
    }

    #[test]
    fn earlier_snapshot_is_not_affected_by_later_records() {
        let mut recorder = Recorder::default();
        recorder.add(record(0, Action::Number));
        let snapshot = recorder.head().expect("history");

        recorder.add(record(1, Action::Number));
        drop(recorder);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.record(), record(0, Action::Number));
        assert!(snapshot.previous().is_none());
    }

    #[test]
    fn dropping_a_long_chain_does_not_recurse() {
        let mut recorder = Recorder::default();
        for x in 0..200_000 {
            recorder.add(record(x, Action::Number));
        }
        drop(recorder);
    }

    #[test]
    fn dropping_a_long_snapshot_after_its_recorder() {
        let mut recorder = Recorder::default();
        for x in 0..200_000 {
            recorder.add(record(x, Action::Unknown));
        }
        let snapshot = recorder.head().expect("history");
        drop(recorder);

        assert_eq!(snapshot.len(), 200_000);
        drop(snapshot);
    }

    #[test]
    fn snapshots_compare_by_records() {
        let mut left = Recorder::default();
        let mut right = Recorder::default();
        for x in 0..3 {
            left.add(record(x, Action::Number));
            right.add(record(x, Action::Number));
        }
        assert_eq!(left.head(), right.head());

        right.add(record(3, Action::Number));
        assert_ne!(left.head(), right.head());
        assert_eq!(
            format!("{:?}", left.last()),
            format!("{:?}", Some(record(2, Action::Number)))
        );
    }
}
