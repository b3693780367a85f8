//! Behavioral properties of the outfit ledger.
//!
//! Randomized sequences use a seeded `SmallRng` so every run exercises the
//! same operations.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use outfitter_ledger::{
    DepreciationCurve, OutfitGroup, WearOrder, WearPreset, cost, used_wear,
};
use outfitter_types::{AGELESS_ATTRIBUTE, AMMUNITION_CATEGORY, Catalog, OutfitDefinition, OutfitHandle};

struct Fixture {
    laser: OutfitHandle,
    shield: OutfitHandle,
    missile: OutfitHandle,
    pod: OutfitHandle,
}

fn fixture() -> Fixture {
    let mut catalog = Catalog::new();
    let laser = catalog
        .register(OutfitDefinition::new("Laser Cannon", 12_000, "Guns").with_attribute("mass", 8.0))
        .unwrap();
    let shield = catalog
        .register(
            OutfitDefinition::new("Shield Generator", 33_000, "Systems")
                .with_attribute("mass", 20.0),
        )
        .unwrap();
    let missile = catalog
        .register(
            OutfitDefinition::new("Meteor Missile", 500, AMMUNITION_CATEGORY)
                .with_attribute("mass", 1.0),
        )
        .unwrap();
    let pod = catalog
        .register(
            OutfitDefinition::new("Fuel Pod", 10_000, "Systems")
                .with_attribute(AGELESS_ATTRIBUTE, 1.0)
                .with_attribute("mass", 5.0),
        )
        .unwrap();
    Fixture {
        laser,
        shield,
        missile,
        pod,
    }
}

fn order(rng: &mut SmallRng) -> WearOrder {
    if rng.random_bool(0.5) {
        WearOrder::MostWornFirst
    } else {
        WearOrder::LeastWornFirst
    }
}

fn assert_invariants(group: &OutfitGroup) {
    for outfit in group.outfits() {
        let bucket = group.find(outfit).unwrap();
        assert!(!bucket.is_empty(), "{outfit} maps to an empty bucket");
        assert!(bucket.values().all(|&q| q > 0), "{outfit} holds a zero quantity");
        let summed: u64 = group.iter_outfit(outfit).map(|e| u64::from(e.quantity())).sum();
        assert_eq!(summed, group.total_count(outfit));
    }
}

fn wear_multiset(group: &OutfitGroup, outfit: &OutfitHandle) -> BTreeMap<i32, u32> {
    group.find(outfit).cloned().unwrap_or_default()
}

#[test]
fn example_most_worn_first_scenario() {
    let f = fixture();
    let mut group = OutfitGroup::new();
    group.add_outfit(&f.laser, 3, 0).unwrap();
    group.add_outfit(&f.laser, 2, 100).unwrap();
    assert_eq!(group.total_count(&f.laser), 5);

    let removed = group
        .remove_outfit(&f.laser, 4, WearOrder::MostWornFirst, None)
        .unwrap();
    assert_eq!(removed, 4);
    assert_eq!(group.total_count(&f.laser), 1);
    assert_eq!(group.find(&f.laser).unwrap().get(&0), Some(&1));
}

#[test]
fn example_used_wear_range() {
    let curve = DepreciationCurve::default();
    assert!((curve.full_depreciation_wear() - 251.0).abs() < 1e-9);
    assert_eq!(curve.wear_bounds(WearPreset::Used.range()), (50, 125));

    let mut rng = SmallRng::seed_from_u64(42);
    let draws: Vec<i32> = (0..1_000).map(|_| used_wear(&mut rng)).collect();
    assert!(draws.iter().all(|w| (50..125).contains(w)));
    // The interval is actually explored, not pinned to one value.
    assert!(draws.iter().min() < draws.iter().max());
}

#[test]
fn invariants_hold_under_random_operations() {
    let f = fixture();
    let outfits = [&f.laser, &f.shield, &f.missile, &f.pod];
    let mut rng = SmallRng::seed_from_u64(7);
    let mut a = OutfitGroup::new();
    let mut b = OutfitGroup::new();

    for _ in 0..2_000 {
        let outfit = outfits[rng.random_range(0..outfits.len())];
        let wear = rng.random_range(0..300);
        match rng.random_range(0..6) {
            0 => {
                a.add_outfit(outfit, rng.random_range(1..5), wear).unwrap();
            }
            1 => {
                // Exact-wear removal may legitimately be rejected.
                let _ = a.add_outfit(outfit, -rng.random_range(1..3), wear);
            }
            2 => {
                a.remove_outfit(outfit, rng.random_range(0..6), order(&mut rng), None)
                    .unwrap();
            }
            3 => {
                let count = rng.random_range(-6..7);
                a.transfer_outfits(outfit, count, Some(&mut b), order(&mut rng), wear)
                    .unwrap();
            }
            4 => {
                let count = rng.random_range(-4..5);
                b.transfer_outfits(outfit, count, None, order(&mut rng), wear)
                    .unwrap();
            }
            _ => {
                a.increment_wear(rng.random_range(0..3)).unwrap();
            }
        }
        assert_invariants(&a);
        assert_invariants(&b);
    }
}

#[test]
fn transfer_conserves_units_and_wear() {
    let f = fixture();
    let mut rng = SmallRng::seed_from_u64(11);

    for _ in 0..200 {
        let mut a = OutfitGroup::new();
        let mut b = OutfitGroup::new();
        for _ in 0..rng.random_range(1..8) {
            a.add_outfit(&f.laser, rng.random_range(1..4), rng.random_range(0..50))
                .unwrap();
            b.add_outfit(&f.laser, rng.random_range(1..4), rng.random_range(0..50))
                .unwrap();
        }
        let total_before = a.total_count(&f.laser) + b.total_count(&f.laser);
        let a_before = wear_multiset(&a, &f.laser);
        let b_before = wear_multiset(&b, &f.laser);

        let n = rng.random_range(1..20);
        let moved = a
            .transfer_outfits(&f.laser, n, Some(&mut b), order(&mut rng), 0)
            .unwrap();
        assert!(moved >= 0 && moved <= n);

        assert_eq!(a.total_count(&f.laser) + b.total_count(&f.laser), total_before);

        // What left A at each wear level arrived in B at the same wear level.
        let a_after = wear_multiset(&a, &f.laser);
        let b_after = wear_multiset(&b, &f.laser);
        let mut moved_units = 0_i64;
        for (wear, &held) in &a_before {
            let left = i64::from(held) - i64::from(a_after.get(wear).copied().unwrap_or(0));
            let arrived = i64::from(b_after.get(wear).copied().unwrap_or(0))
                - i64::from(b_before.get(wear).copied().unwrap_or(0));
            assert_eq!(left, arrived, "wear {wear} not preserved");
            moved_units += left;
        }
        assert_eq!(moved_units, moved);
    }
}

#[test]
fn transfer_is_sign_symmetric() {
    let f = fixture();
    let mut rng = SmallRng::seed_from_u64(23);

    for _ in 0..200 {
        let mut a = OutfitGroup::new();
        let mut b = OutfitGroup::new();
        for _ in 0..rng.random_range(0..6) {
            a.add_outfit(&f.shield, rng.random_range(1..4), rng.random_range(0..20))
                .unwrap();
            b.add_outfit(&f.shield, rng.random_range(1..4), rng.random_range(0..20))
                .unwrap();
        }
        let order = order(&mut rng);
        let n = rng.random_range(-15..16);

        let mut a1 = a.clone();
        let mut b1 = b.clone();
        let forward = a1
            .transfer_outfits(&f.shield, n, Some(&mut b1), order, 0)
            .unwrap();

        let mut a2 = a.clone();
        let mut b2 = b.clone();
        let mirrored = b2
            .transfer_outfits(&f.shield, -n, Some(&mut a2), order, 0)
            .unwrap();

        assert_eq!(forward, -mirrored);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
    }
}

#[test]
fn negative_transfer_without_destination_materializes_stock() {
    let f = fixture();
    let mut group = OutfitGroup::new();
    let moved = group
        .transfer_outfits(&f.laser, -4, None, WearOrder::MostWornFirst, 60)
        .unwrap();
    assert_eq!(moved, -4);
    assert_eq!(group.find(&f.laser).unwrap().get(&60), Some(&4));

    // And the inverse call destroys them again.
    let moved = group
        .transfer_outfits(&f.laser, 4, None, WearOrder::MostWornFirst, 60)
        .unwrap();
    assert_eq!(moved, 4);
    assert!(group.is_empty());
}

#[test]
fn cost_is_monotone_and_floored() {
    let f = fixture();
    let base = f.laser.cost();
    assert_eq!(cost(&f.laser, 0), base);

    let floor = 4_800; // 12_000 * 0.40
    let mut previous = cost(&f.laser, 0);
    for wear in 1..1_000 {
        let current = cost(&f.laser, wear);
        assert!(current <= previous, "cost rose at wear {wear}");
        assert!(current >= floor);
        previous = current;
    }
    assert_eq!(previous, floor);
}

#[test]
fn ageless_and_ammunition_are_exempt() {
    let f = fixture();
    for wear in [0, 1, 2, 100, 251, 5_000] {
        assert_eq!(cost(&f.pod, wear), f.pod.cost());
        assert_eq!(cost(&f.missile, wear), f.missile.cost());
    }
}

#[test]
fn quote_matches_committed_removal() {
    let f = fixture();
    let mut rng = SmallRng::seed_from_u64(99);

    for _ in 0..300 {
        let mut group = OutfitGroup::new();
        for _ in 0..rng.random_range(1..10) {
            group
                .add_outfit(&f.laser, rng.random_range(1..5), rng.random_range(0..400))
                .unwrap();
        }
        let order = order(&mut rng);
        let n = rng.random_range(0..25);

        let quote = group.cost_of(&f.laser, n, order);
        let value_before = group.total_cost_of(&f.laser);
        let mut buyer = OutfitGroup::new();
        let removed = group
            .remove_outfit(&f.laser, n, order, Some(&mut buyer))
            .unwrap();

        assert_eq!(buyer.total_cost(), quote);
        assert_eq!(value_before - group.total_cost_of(&f.laser), quote);
        assert_eq!(removed, buyer.total_count(&f.laser));
    }
}

#[test]
fn add_then_remove_round_trips() {
    let f = fixture();
    let mut group = OutfitGroup::new();
    group.add_outfit(&f.shield, 2, 5).unwrap();
    let before = group.clone();

    for order in [WearOrder::MostWornFirst, WearOrder::LeastWornFirst] {
        let mut copy = group.clone();
        copy.add_outfit(&f.laser, 3, 17).unwrap();
        assert_eq!(copy.remove_outfit(&f.laser, 3, order, None).unwrap(), 3);
        assert_eq!(copy, before);
    }
}

#[test]
fn aging_preserves_units_and_lowers_value() {
    let f = fixture();
    let mut group = OutfitGroup::new();
    group.add_outfit(&f.laser, 2, 0).unwrap();
    group.add_outfit(&f.laser, 1, 40).unwrap();
    group.add_outfit(&f.missile, 50, 0).unwrap();
    group.add_outfit(&f.pod, 1, 0).unwrap();

    let value_before = group.total_cost();
    let mass_before = group.total_attribute("mass");
    group.increment_wear(30).unwrap();

    assert_eq!(group.total_count(&f.laser), 3);
    assert_eq!(group.min_wear(&f.laser), Some(30));
    assert_eq!(group.max_wear(&f.laser), Some(70));
    assert!(group.total_cost() < value_before);
    assert_eq!(group.total_cost_of(&f.missile), 25_000);
    assert_eq!(group.total_cost_of(&f.pod), 10_000);
    assert!((group.total_attribute("mass") - mass_before).abs() < 1e-9);
}

#[test]
fn iteration_matches_totals() {
    let f = fixture();
    let mut group = OutfitGroup::new();
    group.add_outfit(&f.laser, 2, 3).unwrap();
    group.add_outfit(&f.shield, 1, 0).unwrap();
    group.add_outfit(&f.shield, 4, 90).unwrap();

    let by_entries: i64 = (&group).into_iter().map(|e| e.total_cost()).sum();
    assert_eq!(by_entries, group.total_cost());

    let base: i64 = group.iter().map(|e| e.total_base_cost()).sum();
    assert_eq!(base, 2 * 12_000 + 5 * 33_000);

    let shield_only: Vec<i32> = group.iter_outfit(&f.shield).map(|e| e.wear()).collect();
    assert_eq!(shield_only, vec![0, 90]);
}
