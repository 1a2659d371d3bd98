//! # Property-Based Tests
//!
//! These tests check the structural invariants of the index and the pack
//! under random operation sequences.

use proptest::collection::vec;
use proptest::prelude::*;
use stockpile_core::{BoundedCollection, OrderedIndex, Record};

/// Short names from a small alphabet so collisions and case variants are common.
fn name() -> impl Strategy<Value = String> {
    "[a-dA-D]{1,3}"
}

#[derive(Debug, Clone)]
enum Op {
    Insert(String),
    Delete(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => name().prop_map(Op::Insert),
        2 => name().prop_map(Op::Delete),
    ]
}

fn lower(name: &str) -> String {
    name.to_lowercase()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Any insert/delete sequence leaves a valid AVL tree.
    #[test]
    fn index_stays_balanced_and_ordered(ops in vec(op(), 0..200)) {
        let mut index = OrderedIndex::new();
        for op in ops {
            match op {
                Op::Insert(name) => index.insert(Record::new(name, 0)),
                Op::Delete(name) => {
                    index.delete(&name);
                }
            }
            prop_assert!(index.verify().is_ok());
        }

        let keys: Vec<String> = index.iter().map(|r| lower(r.name().as_str())).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    /// The index holds exactly the multiset a plain list would.
    #[test]
    fn index_matches_model(ops in vec(op(), 0..200)) {
        let mut index = OrderedIndex::new();
        let mut model: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(name) => {
                    model.push(lower(&name));
                    index.insert(Record::new(name, 0));
                }
                Op::Delete(name) => {
                    let key = lower(&name);
                    let expected = model.iter().position(|m| *m == key);
                    prop_assert_eq!(index.delete(&name), expected.is_some());
                    if let Some(at) = expected {
                        model.remove(at);
                    }
                }
            }
        }

        prop_assert_eq!(index.len(), model.len());
        for key in &model {
            prop_assert!(index.search(key).is_some());
        }

        let mut listed: Vec<String> = index.listing().iter().map(|r| lower(r.name().as_str())).collect();
        let mut walked: Vec<String> = index.iter().map(|r| lower(r.name().as_str())).collect();
        listed.sort();
        walked.sort();
        model.sort();
        prop_assert_eq!(&listed, &model);
        prop_assert_eq!(&walked, &model);
    }

    /// Height stays within the AVL bound.
    #[test]
    fn index_height_logarithmic(keys in vec("[a-z]{1,8}", 1..300)) {
        let index: OrderedIndex = keys.iter().map(|k| Record::new(k.as_str(), 0)).collect();
        // 1.44 * log2(n + 2)
        let n = index.len() as u64 + 2;
        let log2 = u64::from(64 - n.leading_zeros());
        prop_assert!(u64::from(index.height()) <= log2 * 3 / 2 + 1);
    }

    /// Size never exceeds capacity and always matches the held units.
    #[test]
    fn pack_respects_capacity(
        capacity in 1usize..8,
        ops in vec((any::<bool>(), name(), 0i64..20), 0..100)
    ) {
        let mut pack = BoundedCollection::new(capacity).expect("pack");
        for (push, name, power) in ops {
            let before = pack.size();
            if push {
                let accepted = pack.push(Record::new(name, power));
                prop_assert_eq!(accepted, before < capacity);
            } else {
                let removed = pack.remove_by_name(&name);
                prop_assert_eq!(pack.size(), if removed { before - 1 } else { before });
            }
            prop_assert!(pack.size() <= pack.capacity());
            prop_assert!(pack.verify().is_ok());
        }
    }

    /// Pushing then removing the same name restores size and power.
    #[test]
    fn pack_push_remove_restores(
        seed in vec((name(), 0i64..20), 0..5),
        extra in name(),
        power in 0i64..20
    ) {
        let mut pack = BoundedCollection::new(8).expect("pack");
        for (name, power) in seed {
            pack.push(Record::new(name, power));
        }
        let size = pack.size();
        let total = pack.total_power();
        let entries = pack.entry_count();

        prop_assert!(pack.push(Record::new(extra.clone(), power)));
        let taken = pack.take_by_name(&extra).expect("take");
        prop_assert!(taken.name().matches(&extra));

        prop_assert_eq!(pack.size(), size);
        prop_assert_eq!(pack.total_power(), total);
        prop_assert_eq!(pack.entry_count(), entries);
        prop_assert!(pack.verify().is_ok());
    }
}
