//! # Validation Tier Tests (T0-T3)
//!
//! If ANY tier fails, the kernel is INVALID.
//!
//! ## Tiers
//! - T0: Item Identity
//! - T1: Ordered Index
//! - T2: Bounded Collection
//! - T3: World Transfers

#![allow(clippy::panic)]

use stockpile_core::{
    BoundedCollection, Container, ItemName, Liberation, NeverEvict, OrderedIndex, Power, Record,
    StockpileError, World,
};

fn names<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    records
        .into_iter()
        .map(|record| record.name().to_string())
        .collect()
}

// =============================================================================
// TIER T0: ITEM IDENTITY
// =============================================================================

mod t0_item_identity {
    use super::*;

    /// T0.1: Names compare equal regardless of case.
    #[test]
    fn names_ignore_case() {
        assert_eq!(ItemName::new("Sword"), ItemName::new("sWORD"));
        assert!(ItemName::new("apple") < ItemName::new("Banana"));
    }

    /// T0.2: Display keeps the original spelling.
    #[test]
    fn display_keeps_spelling() {
        let record = Record::new("Shield", 7);
        assert_eq!(record.to_string(), "Shield (power: 7)");
    }

    /// T0.3: Parsing rejects blank names.
    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            ItemName::parse("   "),
            Err(StockpileError::InvalidName(_))
        ));
        assert_eq!(
            ItemName::parse("  Torch ").map(|name| name.as_str().to_string()).ok(),
            Some("Torch".to_string())
        );
    }

    /// T0.4: Power sums saturate instead of overflowing.
    #[test]
    fn power_saturates() {
        assert_eq!(Power::new(i64::MAX).saturating_add(Power::new(1)), Power::new(i64::MAX));
        assert_eq!(Power::new(i64::MAX).times(3), Power::new(i64::MAX));
    }
}

// =============================================================================
// TIER T1: ORDERED INDEX
// =============================================================================

mod t1_ordered_index {
    use super::*;

    fn build(keys: &[&str]) -> OrderedIndex {
        keys.iter().map(|key| Record::new(*key, 0)).collect()
    }

    /// T1.1: In-order traversal is sorted and the tree stays shallow.
    #[test]
    fn five_inserts_balanced() {
        let index = build(&["M", "B", "Z", "A", "C"]);

        assert_eq!(names(&index), vec!["A", "B", "C", "M", "Z"]);
        assert!(index.height() <= 3);
        index.verify().expect("verify");
    }

    /// T1.2: Deleting a node with two children promotes its successor.
    #[test]
    fn two_child_delete_promotes_successor() {
        let mut index = build(&["M", "B", "Z", "A", "C"]);

        assert!(index.delete("b"));
        assert_eq!(names(&index), vec!["A", "C", "M", "Z"]);
        assert!(index.search("C").is_some());
        assert!(index.search("B").is_none());
        assert_eq!(index.len(), 4);
        index.verify().expect("verify");
    }

    /// T1.3: Operations on an empty tree are no-ops.
    #[test]
    fn empty_tree_is_quiet() {
        let mut index = OrderedIndex::new();
        assert!(index.search("anything").is_none());
        assert!(!index.delete("anything"));
        assert!(index.listing().is_empty());
        assert_eq!(index.height(), 0);
        index.verify().expect("verify");
    }

    /// T1.4: Search ignores case.
    #[test]
    fn search_ignores_case() {
        let index = build(&["Sword", "Potion"]);
        let found = index.search("POTION").expect("found");
        assert_eq!(found.name().as_str(), "Potion");
    }

    /// T1.5: Listing follows insertion order, not key order.
    #[test]
    fn listing_follows_insertion() {
        let mut index = build(&["Sword", "Food", "Shield", "Axe"]);
        index.delete("food");

        assert_eq!(names(index.listing()), vec!["Sword", "Shield", "Axe"]);
    }

    /// T1.6: Sequential inserts stay logarithmic.
    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut index = OrderedIndex::new();
        for n in 0..1024u32 {
            index.insert(Record::new(format!("item{n:05}"), i64::from(n)));
        }
        assert_eq!(index.len(), 1024);
        assert!(index.height() <= 14);
        index.verify().expect("verify");
    }
}

// =============================================================================
// TIER T2: BOUNDED COLLECTION
// =============================================================================

mod t2_bounded_collection {
    use super::*;

    /// T2.1: A full pack rejects pushes and accepts after a removal.
    #[test]
    fn capacity_three_walkthrough() {
        let mut pack = BoundedCollection::new(3).expect("pack");

        assert!(pack.push(Record::new("Sword", 10)));
        assert!(pack.push(Record::new("Potion", 5)));
        assert!(pack.push(Record::new("Shield", 7)));
        assert_eq!(pack.size(), 3);

        assert!(!pack.push(Record::new("Armor", 12)));
        assert_eq!(pack.size(), 3);
        assert!(!pack.contains("Armor"));

        assert!(pack.remove_by_name("sword"));
        assert_eq!(pack.size(), 2);
        assert!(pack.push(Record::new("Armor", 12)));
        assert_eq!(pack.size(), 3);
        assert_eq!(pack.total_power().value(), 24);
        pack.verify().expect("verify");
    }

    /// T2.2: Removing a missing name changes nothing.
    #[test]
    fn remove_missing_is_noop() {
        let mut pack = BoundedCollection::new(2).expect("pack");
        pack.push(Record::new("Key", 1));

        assert!(!pack.remove_by_name("Map"));
        assert_eq!(pack.size(), 1);
    }

    /// T2.3: Duplicates share one listed entry with a count.
    #[test]
    fn duplicates_are_counted() {
        let mut pack = BoundedCollection::new(4).expect("pack");
        for _ in 0..3 {
            pack.push(Record::new("Food", 3));
        }

        let rows: Vec<(String, u32)> = pack
            .list_view()
            .map(|item| (item.name.to_string(), item.count))
            .collect();
        assert_eq!(rows, vec![("Food".to_string(), 3)]);
        assert_eq!(pack.size(), 3);
        assert_eq!(pack.total_power().value(), 9);
    }
}

// =============================================================================
// TIER T3: WORLD TRANSFERS
// =============================================================================

mod t3_world_transfers {
    use super::*;

    fn world(capacity: usize) -> World {
        let villages = vec![
            Container::new(
                "Greenvale",
                [
                    Record::new("Sword", 10),
                    Record::new("Food", 3),
                    Record::new("Shield", 7),
                ],
            ),
            Container::new(
                "Silverton",
                [
                    Record::new("Potion", 5),
                    Record::new("Copper", 4),
                    Record::new("Armor", 12),
                ],
            )
            .with_requirements([ItemName::new("Food")]),
        ];
        World::new(villages, capacity).expect("world")
    }

    /// T3.1: A village is cleared only with its requirements in the pack.
    #[test]
    fn requirements_gate_clearing() {
        let mut world = world(10);
        assert!(matches!(
            world.liberate(&mut NeverEvict),
            Liberation::Cleared { .. }
        ));

        world.use_item("food");
        match world.liberate(&mut NeverEvict) {
            Liberation::MissingRequirements { village, missing } => {
                assert_eq!(village, "Silverton");
                assert_eq!(missing, vec![ItemName::new("Food")]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    /// T3.2: Clearing moves the whole stock into the pack.
    #[test]
    fn stock_moves_to_pack() {
        let mut world = world(10);
        world.liberate(&mut NeverEvict);
        world.liberate(&mut NeverEvict);

        let pack = world.pack();
        for name in ["Sword", "Shield", "Potion", "Copper", "Armor"] {
            assert!(pack.contains(name), "{name} missing from pack");
        }
        assert!(!pack.contains("Food"));
        assert!(world.containers().iter().all(|village| village.listing().is_empty()));
        assert!(world.progress().is_complete());
        pack.verify().expect("verify");
    }

    /// T3.3: A full pack with no eviction rolls the transfer back.
    #[test]
    fn full_pack_abandons_transfer() {
        let mut world = world(2);

        assert!(matches!(
            world.liberate(&mut NeverEvict),
            Liberation::Abandoned { .. }
        ));
        let village = world.current().expect("current");
        assert_eq!(village.name(), "Greenvale");
        for name in ["Sword", "Food", "Shield"] {
            assert!(village.has(name), "{name} not returned");
        }
        assert!(world.pack().is_empty());
    }
}
