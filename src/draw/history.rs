use crate::draw::raster::{RasterSurface, Snapshot};
use anyhow::Result;

/// Linear snapshot history. `cursor` is `None` only while the stack is empty
/// and otherwise always indexes a valid entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotHistory {
    entries: Vec<Snapshot>,
    cursor: Option<usize>,
}

impl SnapshotHistory {
    /// Captures `surface`, drops every redo entry past the cursor and appends
    /// the capture as the new tail. The cursor is read at call time.
    pub fn snapshot(&mut self, surface: &RasterSurface) -> Result<usize> {
        let snapshot = Snapshot::capture(surface)?;
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        let cursor = self.entries.len() - 1;
        self.cursor = Some(cursor);
        tracing::debug!(len = self.entries.len(), cursor, "history snapshot");
        Ok(cursor)
    }

    /// Steps back one entry and restores it. Returns `false` at the baseline.
    pub fn undo(&mut self, surface: &mut RasterSurface) -> bool {
        match self.cursor {
            Some(cursor) if cursor > 0 => self.restore(cursor - 1, surface),
            _ => false,
        }
    }

    /// Steps forward one entry and restores it. Returns `false` at the tail.
    pub fn redo(&mut self, surface: &mut RasterSurface) -> bool {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => self.restore(cursor + 1, surface),
            _ => false,
        }
    }

    fn restore(&mut self, target: usize, surface: &mut RasterSurface) -> bool {
        let Some(entry) = self.entries.get(target) else {
            return false;
        };
        if let Err(err) = entry.restore_into(surface) {
            tracing::warn!(?err, target, "history entry could not be restored");
            return false;
        }
        self.cursor = Some(target);
        tracing::debug!(len = self.entries.len(), cursor = target, "history restore");
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor + 1 < self.entries.len())
    }
}
