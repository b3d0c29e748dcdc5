//! The round algorithm: build pools, apply constraints, draw the batch.
//!
//! A round always re-derives everything from current progression state.
//! Callers replace the previous batch wholesale with the returned one, so
//! observers never see a half-built selection.

use std::collections::HashSet;

use rand::Rng;

use crate::catalog::{CandidateId, Catalog};
use crate::config::SelectionConfig;
use crate::selection::constraints::ConstraintSet;
use crate::selection::hooks::SelectionHooks;
use crate::selection::pool::WeightedPool;
use crate::selection::pool_builder::{build_gear_pool, build_item_pool, derive_tier_weights};
use crate::selection::types::{Pick, Rgb, SelectionBatch};

/// Generate one full selection batch: `selection_size` item slots followed
/// by `gear_selection_size` equipment slots.
///
/// RNG contract: one uniform sample is consumed per slot whose pool is
/// nonempty, items first then gear, in slot order. With a fixed sample
/// sequence the batch is exactly reproducible.
pub fn generate_round(
    catalog: &impl Catalog,
    cfg: &SelectionConfig,
    hooks: &SelectionHooks,
    spent_upgrades: u32,
    banished: &HashSet<CandidateId>,
    equipped: Option<CandidateId>,
    rng: &mut impl Rng,
) -> SelectionBatch {
    let mut weights = derive_tier_weights(cfg, spent_upgrades);
    hooks.apply_tier_weights(&mut weights);

    let mut item_pool = build_item_pool(catalog, &weights, banished);
    let mut gear_pool = build_gear_pool(catalog, cfg, banished, equipped);

    let mut constraints = ConstraintSet::from_config(cfg);
    hooks.apply_tier_caps(&mut constraints.tier_caps);
    hooks.apply_guarantees(&mut constraints.guarantees);
    hooks.apply_item_pool(&mut item_pool);

    let mut picks = Vec::with_capacity(cfg.selection_size + cfg.gear_selection_size);

    for _ in 0..cfg.selection_size {
        picks.push(draw_item_slot(
            catalog,
            &mut item_pool,
            &mut constraints,
            rng,
        ));
    }

    for _ in 0..cfg.gear_selection_size {
        picks.push(draw_gear_slot(&mut gear_pool, rng));
    }

    SelectionBatch::new(picks)
}

fn draw_item_slot(
    catalog: &impl Catalog,
    item_pool: &mut WeightedPool<CandidateId>,
    constraints: &mut ConstraintSet,
    rng: &mut impl Rng,
) -> Pick {
    // Restrict to entries that can still satisfy a guarantee, if any are
    // active. Ids unknown to the catalog pass the filter.
    let active_tags = constraints.active_guarantee_tags();
    let sub_pool = if active_tags.is_empty() {
        item_pool.clone()
    } else {
        item_pool.filtered(|&id| match catalog.entry(id) {
            Some(entry) => entry.tags.iter().any(|t| active_tags.contains(t)),
            None => true,
        })
    };

    // Exhaustion is not an error: the slot presents nothing.
    if sub_pool.is_empty() {
        return Pick::empty_item();
    }

    let index = match sub_pool.draw_index(rng.gen::<f64>()) {
        Some(i) => i,
        // Nonempty but massless pool, same fallback.
        None => return Pick::empty_item(),
    };
    let id = sub_pool.get(index);

    let tags = catalog
        .entry(id)
        .map(|e| e.tags.clone())
        .unwrap_or_default();
    let color = if active_tags.is_empty() {
        Rgb::RANDOM_PICK
    } else {
        constraints
            .consume_guarantee(&tags)
            .unwrap_or(Rgb::RANDOM_PICK)
    };

    item_pool.remove_value(id);
    constraints.expire_unsatisfiable(item_pool, catalog);
    if let Some(entry) = catalog.entry(id) {
        constraints.apply_tier_caps(entry.tier, item_pool, catalog);
    }

    Pick::item(id, color)
}

fn draw_gear_slot(gear_pool: &mut WeightedPool<CandidateId>, rng: &mut impl Rng) -> Pick {
    if gear_pool.is_empty() {
        return Pick::empty_gear();
    }
    match gear_pool.draw_index(rng.gen::<f64>()) {
        Some(index) => {
            let id = gear_pool.get(index);
            gear_pool.remove_at(index);
            Pick::gear(id)
        }
        None => Pick::empty_gear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, RewardCatalog, Tag, Tier};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn basic_catalog() -> RewardCatalog {
        let mut catalog = RewardCatalog::new();
        for i in 0..8 {
            let tag = match i % 3 {
                0 => Tag::Damage,
                1 => Tag::Utility,
                _ => Tag::Healing,
            };
            catalog.add(CatalogEntry::item(CandidateId(i), Tier::Tier1, vec![tag]));
        }
        catalog.add(CatalogEntry::equipment(CandidateId(100), Tier::Tier1));
        catalog.add(CatalogEntry::equipment(CandidateId(101), Tier::Lunar));
        catalog
    }

    #[test]
    fn test_batch_has_fixed_shape() {
        let catalog = basic_catalog();
        let cfg = SelectionConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let batch = generate_round(
            &catalog,
            &cfg,
            &SelectionHooks::new(),
            0,
            &HashSet::new(),
            None,
            &mut rng,
        );
        assert_eq!(batch.len(), cfg.selection_size + cfg.gear_selection_size);
        // Gear slot comes last and is annotated as gear.
        let gear = batch.get(cfg.selection_size).unwrap();
        assert!(gear.color == Rgb::GEAR || gear.color == Rgb::EMPTY_GEAR);
    }

    #[test]
    fn test_no_duplicate_item_picks() {
        let catalog = basic_catalog();
        let cfg = SelectionConfig::default();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let batch = generate_round(
                &catalog,
                &cfg,
                &SelectionHooks::new(),
                0,
                &HashSet::new(),
                None,
                &mut rng,
            );
            let mut seen = HashSet::new();
            for pick in batch.iter().filter(|p| !p.is_fallback()) {
                assert!(seen.insert(pick.id), "duplicate pick with seed {seed}");
            }
        }
    }

    #[test]
    fn test_identical_seed_identical_batch() {
        let catalog = basic_catalog();
        let cfg = SelectionConfig::default();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            generate_round(
                &catalog,
                &cfg,
                &SelectionHooks::new(),
                3,
                &HashSet::new(),
                None,
                &mut rng,
            )
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_empty_catalog_yields_all_fallbacks() {
        let catalog = RewardCatalog::new();
        let mut cfg = SelectionConfig::default();
        cfg.selection_size = 3;
        cfg.gear_selection_size = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let batch = generate_round(
            &catalog,
            &cfg,
            &SelectionHooks::new(),
            0,
            &HashSet::new(),
            None,
            &mut rng,
        );
        assert_eq!(batch.len(), 3);
        for pick in batch.iter() {
            assert!(pick.is_fallback());
            assert_eq!(pick.color, Rgb::EMPTY_ITEM);
        }
    }

    #[test]
    fn test_guarantees_cover_first_slots() {
        let catalog = basic_catalog();
        let mut cfg = SelectionConfig::default();
        cfg.selection_size = 3;
        // With one carrier of each tag per guarantee, the first three slots
        // must each credit a distinct guarantee.
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let batch = generate_round(
                &catalog,
                &cfg,
                &SelectionHooks::new(),
                0,
                &HashSet::new(),
                None,
                &mut rng,
            );
            let colors: HashSet<_> = batch
                .iter()
                .take(3)
                .map(|p| format!("{:?}", p.color))
                .collect();
            assert_eq!(colors.len(), 3, "seed {seed} repeated a guarantee color");
            for pick in batch.iter().take(3) {
                assert_ne!(pick.color, Rgb::RANDOM_PICK);
            }
        }
    }

    #[test]
    fn test_fourth_slot_is_plain_random() {
        let catalog = basic_catalog();
        let cfg = SelectionConfig::default();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let batch = generate_round(
                &catalog,
                &cfg,
                &SelectionHooks::new(),
                0,
                &HashSet::new(),
                None,
                &mut rng,
            );
            let fourth = batch.get(3).unwrap();
            assert!(!fourth.is_fallback());
            assert_eq!(fourth.color, Rgb::RANDOM_PICK);
        }
    }

    #[test]
    fn test_void_cap_limits_void_picks() {
        let mut catalog = RewardCatalog::new();
        for i in 0..6 {
            catalog.add(CatalogEntry::item(
                CandidateId(i),
                Tier::VoidTier1,
                vec![Tag::Damage],
            ));
        }
        let mut cfg = SelectionConfig::default();
        cfg.guarantee_categories = false;
        cfg.selection_size = 4;
        // Make void drawable on a baseline round.
        cfg.void_weight_mult = 1.0;

        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let batch = generate_round(
                &catalog,
                &cfg,
                &SelectionHooks::new(),
                0,
                &HashSet::new(),
                None,
                &mut rng,
            );
            let void_picks = batch.iter().filter(|p| !p.is_fallback()).count();
            assert_eq!(void_picks, 1, "void cap breached with seed {seed}");
            // The remaining slots fell back once the group was purged.
            assert!(batch.iter().skip(1).take(3).all(|p| p.is_fallback()));
        }
    }

    #[test]
    fn test_banished_never_drawn() {
        let catalog = basic_catalog();
        let cfg = SelectionConfig::default();
        let banished: HashSet<CandidateId> =
            (0..8).map(CandidateId).chain([CandidateId(100)]).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let batch = generate_round(
            &catalog,
            &cfg,
            &SelectionHooks::new(),
            0,
            &banished,
            None,
            &mut rng,
        );
        // Only the lunar equipment survives the banish set.
        for pick in batch.iter() {
            assert!(pick.id.is_none() || pick.id == Some(CandidateId(101)));
        }
    }

    #[test]
    fn test_equipped_gear_excluded() {
        let mut catalog = RewardCatalog::new();
        catalog.add(CatalogEntry::equipment(CandidateId(100), Tier::Tier1));
        let mut cfg = SelectionConfig::default();
        cfg.selection_size = 0;
        cfg.gear_selection_size = 1;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let batch = generate_round(
            &catalog,
            &cfg,
            &SelectionHooks::new(),
            0,
            &HashSet::new(),
            Some(CandidateId(100)),
            &mut rng,
        );
        assert_eq!(batch.get(0).unwrap().color, Rgb::EMPTY_GEAR);
    }

    #[test]
    fn test_pool_hook_runs_before_drawing() {
        let catalog = basic_catalog();
        let mut cfg = SelectionConfig::default();
        cfg.guarantee_categories = false;
        let mut hooks = SelectionHooks::new();
        hooks.on_item_pool("only_zero", |pool| {
            pool.remove_all(|&id| id != CandidateId(0));
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let batch = generate_round(&catalog, &cfg, &hooks, 0, &HashSet::new(), None, &mut rng);
        assert_eq!(batch.get(0).unwrap().id, Some(CandidateId(0)));
        assert!(batch.get(1).unwrap().is_fallback());
    }

    #[test]
    fn test_weight_hook_can_silence_a_tier() {
        let catalog = basic_catalog();
        let mut cfg = SelectionConfig::default();
        cfg.guarantee_categories = false;
        let mut hooks = SelectionHooks::new();
        hooks.on_tier_weights("no_tier1", |w| {
            w.insert(Tier::Tier1, 0.0);
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let batch = generate_round(&catalog, &cfg, &hooks, 0, &HashSet::new(), None, &mut rng);
        // All items in the catalog are tier 1, so every item slot falls back.
        for pick in batch.iter().take(cfg.selection_size) {
            assert!(pick.is_fallback());
        }
    }
}
