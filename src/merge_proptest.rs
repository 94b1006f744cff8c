//! Property-based tests for the merge engine and the shape classifier.
//!
//! These tests use proptest to generate random trees of [`Value`]s and check
//! the laws the merge must obey for any input.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;

    use indexmap::IndexMap;

    use crate::config::MergeConfig;
    use crate::merge::merge;
    use crate::shape::{classify, FractalPolicy, ShapeCategory, TypeTag};
    use crate::strategy::Strategy;
    use crate::value::Value;
    use proptest::prelude::*;

    fn int_list(items: &[i32]) -> Value {
        Value::list(items.iter().map(|&i| Value::from(i)))
    }

    fn sum_config() -> MergeConfig<Value> {
        MergeConfig::new().with_boxed_merger(TypeTag::INT, TypeTag::INT, Strategy::Sum.into_merger())
    }

    // ============================================================================
    // Identity properties
    // ============================================================================

    proptest! {
        /// Property: merging into an empty list yields the right-hand list
        #[test]
        fn empty_list_lhs_yields_rhs(items in prop::collection::vec(any::<i32>(), 0..16)) {
            let merged = merge(Value::list([]), int_list(&items), &MergeConfig::new()).unwrap();
            prop_assert_eq!(merged, int_list(&items));
        }

        /// Property: merging an empty list leaves the left-hand list unchanged
        #[test]
        fn empty_list_rhs_is_identity(items in prop::collection::vec(any::<i32>(), 0..16)) {
            let merged = merge(int_list(&items), Value::list([]), &MergeConfig::new()).unwrap();
            prop_assert_eq!(merged, int_list(&items));
        }

        /// Property: merging an empty map leaves the left-hand map unchanged
        #[test]
        fn empty_map_rhs_is_identity(entries in prop::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..10)) {
            let lhs = Value::map(entries.iter().map(|(k, v)| (k.clone(), Value::from(*v))));
            let merged = merge(lhs.clone(), Value::Map(IndexMap::new()), &MergeConfig::new()).unwrap();
            prop_assert_eq!(merged, lhs);
        }
    }

    // ============================================================================
    // Sequence length laws
    // ============================================================================

    proptest! {
        /// Property: without a merger every scalar pair stays unresolved, so
        /// no element is lost and none is duplicated
        #[test]
        fn unresolved_sequence_keeps_every_element(
            lhs in prop::collection::vec(any::<i32>(), 0..12),
            rhs in prop::collection::vec(any::<i32>(), 0..12),
        ) {
            let merged = merge(int_list(&lhs), int_list(&rhs), &MergeConfig::new()).unwrap();
            let Value::List(items) = merged else {
                panic!("merged value is not a list");
            };
            prop_assert_eq!(items.len(), lhs.len() + rhs.len());

            // Paired positions interleave, leftovers follow in order
            let paired = lhs.len().min(rhs.len());
            for i in 0..paired {
                prop_assert_eq!(&items[2 * i], &Value::from(lhs[i]));
                prop_assert_eq!(&items[2 * i + 1], &Value::from(rhs[i]));
            }
            let rest: Vec<Value> = lhs[paired..]
                .iter()
                .chain(rhs[paired..].iter())
                .map(|&i| Value::from(i))
                .collect();
            prop_assert_eq!(&items[2 * paired..], rest.as_slice());
        }

        /// Property: with a merger every pair resolves in place
        #[test]
        fn resolved_sequence_has_longest_length(
            lhs in prop::collection::vec(any::<i32>(), 0..12),
            rhs in prop::collection::vec(any::<i32>(), 0..12),
        ) {
            let merged = merge(int_list(&lhs), int_list(&rhs), &sum_config()).unwrap();
            let Value::List(items) = merged else {
                panic!("merged value is not a list");
            };
            prop_assert_eq!(items.len(), lhs.len().max(rhs.len()));
            for (i, item) in items.iter().enumerate() {
                let expected = i64::from(lhs.get(i).copied().unwrap_or(0))
                    + i64::from(rhs.get(i).copied().unwrap_or(0));
                prop_assert_eq!(item, &Value::from(expected));
            }
        }
    }

    // ============================================================================
    // Mapping and set properties
    // ============================================================================

    proptest! {
        /// Property: maps with disjoint keys merge into their union
        #[test]
        fn disjoint_maps_merge_to_union(
            lhs in prop::collection::btree_map("[a-m]{1,4}", any::<i32>(), 0..8),
            rhs in prop::collection::btree_map("[n-z]{1,4}", any::<i32>(), 0..8),
        ) {
            let to_value = |entries: &BTreeMap<String, i32>| {
                Value::map(entries.iter().map(|(k, v)| (k.clone(), Value::from(*v))))
            };
            let merged = merge(to_value(&lhs), to_value(&rhs), &MergeConfig::new()).unwrap();

            let mut union = lhs.clone();
            union.extend(rhs.clone());
            prop_assert_eq!(merged, to_value(&union));
        }

        /// Property: a merged set contains every item of both operands
        #[test]
        fn set_merge_contains_both_operands(
            lhs in prop::collection::vec(any::<i32>(), 0..10),
            rhs in prop::collection::vec(any::<i32>(), 0..10),
        ) {
            let as_set = |items: &[i32]| Value::set(items.iter().map(|&i| Value::from(i)));
            let merged = merge(as_set(&lhs), as_set(&rhs), &MergeConfig::new()).unwrap();
            let Value::Set(set) = merged else {
                panic!("merged value is not a set");
            };
            for item in lhs.iter().chain(rhs.iter()) {
                prop_assert!(set.contains(&Value::from(*item)));
            }
        }

        /// Property: merging a set with itself changes nothing
        #[test]
        fn set_merge_is_idempotent(items in prop::collection::vec(any::<i32>(), 0..10)) {
            let set = Value::set(items.iter().map(|&i| Value::from(i)));
            let merged = merge(set.clone(), set.clone(), &MergeConfig::new()).unwrap();
            prop_assert_eq!(merged, set);
        }
    }

    // ============================================================================
    // Classification properties
    // ============================================================================

    proptest! {
        /// Property: strings are scalar under the default policy
        #[test]
        fn strings_are_scalar(text in ".*") {
            let category = classify(&Value::from(text.as_str()), &FractalPolicy::default());
            prop_assert_eq!(category, ShapeCategory::Scalar);
        }

        /// Property: strings are scalar even when `str` is not a known fractal
        #[test]
        fn strings_are_scalar_by_probe(text in ".*", depth in 1usize..12) {
            let policy = FractalPolicy::new(Vec::new(), depth);
            let category = classify(&Value::from(text.as_str()), &policy);
            prop_assert_eq!(category, ShapeCategory::Scalar);
        }

        /// Property: lists of integers are never fractal
        #[test]
        fn int_lists_are_sequences(items in prop::collection::vec(any::<i32>(), 0..8)) {
            let category = classify(&int_list(&items), &FractalPolicy::default());
            prop_assert_eq!(category, ShapeCategory::SequenceLike);
        }
    }
}
