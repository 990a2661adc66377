use crate::calc::orchestrator::ResultEntry;
use crate::draw::model::Point;

pub type OverlayId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRecord {
    pub id: OverlayId,
    pub position: Point,
    pub entry: ResultEntry,
}

/// Visible result overlays. Each record owns its position; dragging one never
/// moves another or changes where the next overlay appears.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBoard {
    records: Vec<OverlayRecord>,
    next_id: OverlayId,
    default_position: Point,
    anchor: Point,
}

impl OverlayBoard {
    pub fn new(default_position: Point) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            default_position,
            anchor: default_position,
        }
    }

    /// Anchor used for the most recent calculation, or the configured default
    /// before the first one.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Point) {
        self.anchor = anchor;
    }

    pub fn place(&mut self, position: Point, entry: ResultEntry) -> OverlayId {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(OverlayRecord {
            id,
            position,
            entry,
        });
        id
    }

    /// Moves one overlay; returns `false` for unknown ids.
    pub fn drag(&mut self, id: OverlayId, position: Point) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.position = position;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn records(&self) -> &[OverlayRecord] {
        &self.records
    }

    pub fn markup(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.entry.display.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.anchor = self.default_position;
    }
}
