//! Reward catalog: static facts about every candidate the draft can offer.
//!
//! The catalog is a read-only collaborator. Nothing in the selection core
//! ever mutates an entry; availability is decided by whoever builds the
//! catalog for the current run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a draftable reward. Equality is by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub u32);

/// Rarity/category classification. Drives base weights and scarcity caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    Lunar,
    VoidTier1,
    VoidTier2,
    VoidTier3,
}

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::Tier1,
        Tier::Tier2,
        Tier::Tier3,
        Tier::Lunar,
        Tier::VoidTier1,
        Tier::VoidTier2,
        Tier::VoidTier3,
    ];

    pub fn is_void(&self) -> bool {
        matches!(self, Tier::VoidTier1 | Tier::VoidTier2 | Tier::VoidTier3)
    }

    /// The void counterpart of a base tier, if one exists.
    pub fn void_equivalent(&self) -> Option<Tier> {
        match self {
            Tier::Tier1 => Some(Tier::VoidTier1),
            Tier::Tier2 => Some(Tier::VoidTier2),
            Tier::Tier3 => Some(Tier::VoidTier3),
            _ => None,
        }
    }
}

/// Cross-cutting category label used for guarantee coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Damage,
    Utility,
    Healing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    Item,
    Equipment,
}

/// Per-candidate static facts supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: CandidateId,
    pub kind: CandidateKind,
    pub tier: Tier,
    pub tags: Vec<Tag>,
    pub hidden: bool,
    pub world_unique: bool,
    pub available: bool,
}

impl CatalogEntry {
    pub fn item(id: CandidateId, tier: Tier, tags: Vec<Tag>) -> Self {
        Self {
            id,
            kind: CandidateKind::Item,
            tier,
            tags,
            hidden: false,
            world_unique: false,
            available: true,
        }
    }

    pub fn equipment(id: CandidateId, tier: Tier) -> Self {
        Self {
            id,
            kind: CandidateKind::Equipment,
            tier,
            tags: Vec::new(),
            hidden: false,
            world_unique: false,
            available: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn world_unique(mut self) -> Self {
        self.world_unique = true;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Lookup surface the selection core draws candidates from.
pub trait Catalog {
    fn entry(&self, id: CandidateId) -> Option<&CatalogEntry>;

    /// Every known reward, in a stable order. Pool construction order (and
    /// therefore draw determinism) follows this order.
    fn entries(&self) -> &[CatalogEntry];
}

/// In-memory catalog backed by a Vec plus an id index.
#[derive(Debug, Clone, Default)]
pub struct RewardCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<CandidateId, usize>,
}

impl RewardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A duplicate id replaces the previous entry in place.
    pub fn add(&mut self, entry: CatalogEntry) {
        match self.index.get(&entry.id) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(entry.id, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn with(mut self, entry: CatalogEntry) -> Self {
        self.add(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for RewardCatalog {
    fn entry(&self, id: CandidateId) -> Option<&CatalogEntry> {
        self.index.get(&id).map(|&i| &self.entries[i])
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
