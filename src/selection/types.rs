//! Pick and batch types shared across the selection pipeline.

use serde::{Deserialize, Serialize};

use crate::catalog::CandidateId;

/// Display color attached to a pick. Encodes *why* the pick happened and is
/// recorded at draw time, never re-derived from the candidate afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Plain unconstrained item draw.
    pub const RANDOM_PICK: Rgb = Rgb::new(1.0, 1.0, 1.0);
    /// Item pool exhausted for this slot.
    pub const EMPTY_ITEM: Rgb = Rgb::new(0.1, 0.1, 0.1);
    /// Equipment pool exhausted for this slot.
    pub const EMPTY_GEAR: Rgb = Rgb::new(0.5, 0.5, 0.5);
    /// Equipment draw.
    pub const GEAR: Rgb = Rgb::new(1.0, 0.6, 0.2);
    pub const GUARANTEE_DAMAGE: Rgb = Rgb::new(1.0, 0.2, 0.2);
    pub const GUARANTEE_UTILITY: Rgb = Rgb::new(0.2, 0.2, 1.0);
    pub const GUARANTEE_HEALING: Rgb = Rgb::new(0.2, 1.0, 0.2);
}

/// One slot of a selection batch. `id == None` is the fallback sentinel for
/// an exhausted pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub id: Option<CandidateId>,
    pub color: Rgb,
}

impl Pick {
    pub fn item(id: CandidateId, color: Rgb) -> Self {
        Self {
            id: Some(id),
            color,
        }
    }

    pub fn gear(id: CandidateId) -> Self {
        Self {
            id: Some(id),
            color: Rgb::GEAR,
        }
    }

    pub fn empty_item() -> Self {
        Self {
            id: None,
            color: Rgb::EMPTY_ITEM,
        }
    }

    pub fn empty_gear() -> Self {
        Self {
            id: None,
            color: Rgb::EMPTY_GEAR,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id.is_none()
    }
}

/// One full round's worth of picks: item slots first, then equipment slots.
/// Regenerated wholesale each round, never patched in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionBatch {
    picks: Vec<Pick>,
}

impl SelectionBatch {
    pub fn new(picks: Vec<Pick>) -> Self {
        Self { picks }
    }

    pub fn get(&self, index: usize) -> Option<&Pick> {
        self.picks.get(index)
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pick> {
        self.picks.iter()
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_picks() {
        assert!(Pick::empty_item().is_fallback());
        assert!(Pick::empty_gear().is_fallback());
        assert!(!Pick::item(CandidateId(1), Rgb::RANDOM_PICK).is_fallback());
        assert_eq!(Pick::empty_item().color, Rgb::EMPTY_ITEM);
        assert_eq!(Pick::empty_gear().color, Rgb::EMPTY_GEAR);
    }

    #[test]
    fn test_batch_indexing() {
        let batch = SelectionBatch::new(vec![
            Pick::item(CandidateId(1), Rgb::RANDOM_PICK),
            Pick::empty_gear(),
        ]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(0).unwrap().id, Some(CandidateId(1)));
        assert!(batch.get(2).is_none());
    }

    #[test]
    fn test_batch_serializes() {
        let batch = SelectionBatch::new(vec![Pick::gear(CandidateId(4))]);
        let json = serde_json::to_string(&batch).unwrap();
        let back: SelectionBatch = serde_json::from_str(&json).unwrap();
        assert_eq!(batch, back);
    }
}
