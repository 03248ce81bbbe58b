//! Behavioral tests for the Lanai Trie.
//!
//! Model-based property tests, structural examples, allocation-failure atomicity
//! and release accounting.

use std::collections::BTreeMap;

use mockall::predicate::eq;
use proptest::prelude::*;
use test_case::test_case;

use super::test_utils::{contents, key_strategy, ops_strategy, trie_from, MockRelease, Op};
use crate::data_structures::alloc::{failpoint, AllocError};
use crate::data_structures::lanai_trie::{LanaiTrie, LanaiTrieConfig, LanaiTrieError, ReleaseFn};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Any insert/delete sequence agrees with an ordered map and leaves the trie compact.
    #[test]
    fn prop_matches_btreemap_model(ops in ops_strategy()) {
        let mut trie = LanaiTrie::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let is_new = trie.insert(&key, value).unwrap();
                    prop_assert_eq!(is_new, model.insert(key, value).is_none());
                }
                Op::Delete(key) => {
                    let removed = trie.delete(&key).unwrap();
                    prop_assert_eq!(removed, model.remove(&key).is_some());
                }
            }
            prop_assert_eq!(trie.check_invariants(), Ok(()));
        }

        prop_assert_eq!(trie.len(), model.len());
        prop_assert_eq!(contents(&trie), model.clone());
        for (key, value) in &model {
            prop_assert_eq!(trie.find(key), Some(value));
        }
    }

    /// Inserting an absent key and deleting it again restores the exact structure.
    #[test]
    fn prop_insert_delete_symmetry(
        keys in proptest::collection::vec(key_strategy(), 0..24),
        extra in key_strategy(),
    ) {
        let mut trie = LanaiTrie::new();
        for (i, key) in keys.iter().enumerate() {
            trie.insert(key, i as u32).unwrap();
        }
        prop_assume!(!trie.contains_key(&extra));

        let before = trie.shape();
        prop_assert!(trie.insert(&extra, 99).unwrap());
        prop_assert!(trie.delete(&extra).unwrap());
        prop_assert_eq!(trie.shape(), before);
    }

    /// The longest-key high-water mark never decreases.
    #[test]
    fn prop_max_key_len_monotonic(ops in ops_strategy()) {
        let mut trie = LanaiTrie::new();
        let mut high_water = 0;
        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    trie.insert(&key, value).unwrap();
                    high_water = high_water.max(key.len());
                }
                Op::Delete(key) => {
                    trie.delete(&key).unwrap();
                }
            }
            prop_assert_eq!(trie.max_key_len_added(), high_water);
        }
    }

    /// Prefix enumeration returns exactly the model's keys under the prefix and ceiling.
    #[test]
    fn prop_prefix_enumeration(
        keys in proptest::collection::vec(key_strategy(), 0..24),
        prefix in key_strategy(),
        ceiling in 0usize..10,
    ) {
        let mut trie = LanaiTrie::new();
        let mut model = BTreeMap::new();
        for (i, key) in keys.into_iter().enumerate() {
            trie.insert(&key, i as u32).unwrap();
            model.insert(key, i as u32);
        }

        let expected: Vec<(Vec<u8>, u32)> = model
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix) && key.len() <= ceiling)
            .map(|(key, value)| (key.clone(), *value))
            .collect();
        let any_under_prefix = model.keys().any(|key| key.starts_with(&prefix));

        match trie.find_all(&prefix, ceiling).unwrap() {
            Some(iter) => {
                // The root always matches the empty prefix
                prop_assert!(any_under_prefix || prefix.is_empty());
                let found: Vec<(Vec<u8>, u32)> = iter.map(|(key, value)| (key, *value)).collect();
                prop_assert_eq!(found, expected);
            }
            None => prop_assert!(!any_under_prefix),
        }
    }
}

#[test]
fn test_enumeration_is_ascending() {
    let trie = trie_from(&[("cat", 1), ("car", 2), ("dog", 3)]);
    let keys: Vec<Vec<u8>> = trie.find_all("", 10).unwrap().unwrap().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![b"car".to_vec(), b"cat".to_vec(), b"dog".to_vec()]);
}

#[test]
fn test_delete_middle_key_merges_nodes() {
    let mut trie = trie_from(&[("a", 1), ("ab", 2), ("abc", 3)]);
    assert_eq!(trie.node_count(), 4);

    assert!(trie.delete("ab").unwrap());

    assert_eq!(trie.find("a"), Some(&1));
    assert_eq!(trie.find("abc"), Some(&3));
    assert_eq!(trie.find("ab"), None);
    assert_eq!(
        trie.shape(),
        vec![(0, vec![], false), (1, b"a".to_vec(), true), (2, b"bc".to_vec(), true)]
    );
}

#[test]
fn test_empty_key_delete_only_touches_root_value() {
    let mut trie = trie_from(&[("", 0), ("x", 1)]);
    let mut expected = trie.shape();
    expected[0].2 = false;

    assert!(trie.delete("").unwrap());
    assert_eq!(trie.shape(), expected);
    assert_eq!(trie.find("x"), Some(&1));
    assert!(!trie.delete("").unwrap());
}

#[test]
fn test_root_with_single_child_is_kept() {
    let mut trie = trie_from(&[("ab", 1), ("ac", 2)]);
    trie.delete("ac").unwrap();
    assert_eq!(
        trie.shape(),
        vec![(0, vec![], false), (1, b"ab".to_vec(), true)]
    );
    assert_eq!(trie.check_invariants(), Ok(()));
}

#[test_case("" ; "empty key")]
#[test_case("car" ; "leaf key")]
#[test_case("ca" ; "interior prefix")]
#[test_case("c" ; "mid segment prefix")]
#[test_case("cart" ; "extends leaf")]
#[test_case("b" ; "new root child")]
fn test_insert_is_atomic_under_allocation_failure(key: &str) {
    let mut successes = 0;
    loop {
        let mut trie = trie_from(&[("cat", 1), ("car", 2), ("dog", 3)]);
        let before = trie.shape();

        failpoint::reset_hits();
        failpoint::arm(successes);
        let result = trie.insert(key, 9);
        failpoint::disarm();

        match result {
            Ok(_) => {
                assert_eq!(trie.find(key), Some(&9));
                break;
            }
            Err(err) => {
                assert!(matches!(err, LanaiTrieError::Allocation(_)));
                assert_eq!(trie.shape(), before, "failure after {successes} allocation(s)");
                assert_eq!(trie.len(), 3);
                assert_eq!(trie.max_key_len_added(), 3);
                assert_eq!(failpoint::hits(), successes + 1);
            }
        }
        successes += 1;
    }
}

#[test]
fn test_overwrite_failure_keeps_old_value() {
    let mut trie = trie_from(&[("abcd", 1)]);

    // Making "ab" a boundary needs a split
    failpoint::arm(0);
    let result = trie.insert("ab", 2);
    failpoint::disarm();

    assert!(result.is_err());
    assert_eq!(trie.find("ab"), None);
    assert_eq!(trie.find("abcd"), Some(&1));
}

#[test]
fn test_failed_merge_leaves_compaction_debt() {
    let mut trie = trie_from(&[("a", 1), ("ab", 2), ("abc", 3)]);

    failpoint::arm(0);
    let result = trie.delete("ab");
    failpoint::disarm();

    assert_eq!(
        result,
        Err(LanaiTrieError::Allocation(AllocError { requested: 1 }))
    );
    assert_eq!(trie.len(), 2);
    assert_eq!(trie.find("ab"), None);
    assert_eq!(trie.find("abc"), Some(&3));
    assert!(trie.check_invariants().is_err());

    assert_eq!(trie.compact().unwrap(), 1);
    assert_eq!(trie.check_invariants(), Ok(()));
    assert_eq!(trie.compact().unwrap(), 0);
    assert_eq!(
        contents(&trie).into_iter().collect::<Vec<_>>(),
        vec![(b"a".to_vec(), 1), (b"abc".to_vec(), 3)]
    );
}

#[test]
fn test_failed_merge_after_leaf_removal_leaves_compaction_debt() {
    // "k" -> "a" -> { "b", "c" }, with "a" split off as an exactly sized tail
    let mut trie = trie_from(&[("kab", 1), ("kac", 2), ("k", 3)]);

    failpoint::arm(0);
    let result = trie.delete("kac");
    failpoint::disarm();

    assert_eq!(
        result,
        Err(LanaiTrieError::Allocation(AllocError { requested: 1 }))
    );
    assert_eq!(trie.find("kab"), Some(&1));

    // Removing the last child leaves "a" as a leaf without a value
    assert!(trie.delete("kab").unwrap());
    assert!(trie.check_invariants().is_err());
    assert_eq!(trie.node_count(), 3);

    assert_eq!(trie.compact().unwrap(), 1);
    assert_eq!(trie.check_invariants(), Ok(()));
    assert_eq!(
        trie.shape(),
        vec![(0, vec![], false), (1, b"k".to_vec(), true)]
    );
}

#[test]
fn test_shrinking_delete_ignores_allocation_failure() {
    let config = LanaiTrieConfig::new().with_shrink_after_delete(true);
    let mut trie = LanaiTrie::with_config(config);
    for key in ["a", "b", "c"] {
        trie.insert(key, 1u32).unwrap();
    }

    failpoint::reset_hits();
    failpoint::arm(0);
    let result = trie.delete("a");
    failpoint::disarm();

    assert_eq!(result, Ok(true));
    assert_eq!(failpoint::hits(), 1);
    assert_eq!(trie.find("b"), Some(&1));
    assert_eq!(trie.check_invariants(), Ok(()));
}

#[test]
fn test_compact_on_compact_trie_is_noop() {
    let mut trie = trie_from(&[("x", 1), ("xy", 2), ("z", 3)]);
    let before = trie.shape();
    assert_eq!(trie.compact().unwrap(), 0);
    assert_eq!(trie.shape(), before);
}

#[test]
fn test_overwrite_releases_old_value_once() {
    let mut release = MockRelease::new();
    release.expect_release().with(eq(1)).times(1).return_const(());

    let mut trie = LanaiTrie::with_release(release);
    assert!(trie.insert("key", 1u32).unwrap());
    assert!(!trie.insert("key", 2u32).unwrap());
    trie.release_strategy_mut().checkpoint();

    trie.release_strategy_mut()
        .expect_release()
        .with(eq(2))
        .times(1)
        .return_const(());
    assert_eq!(trie.find("key"), Some(&2));
    // Dropping the trie releases the remaining value
}

#[test]
fn test_delete_releases_before_restructuring() {
    let mut released = Vec::new();
    {
        let mut trie = LanaiTrie::with_release(ReleaseFn(|v: u32| released.push(v)));
        trie.insert("a", 1).unwrap();
        trie.insert("ab", 2).unwrap();
        trie.insert("abc", 3).unwrap();

        failpoint::arm(0);
        assert!(trie.delete("ab").is_err());
        failpoint::disarm();
    }
    assert_eq!(released[0], 2);
    released.sort_unstable();
    assert_eq!(released, vec![1, 2, 3]);
}

#[test]
fn test_long_keys_do_not_recurse() {
    let key = vec![b'k'; 100_000];
    let mut trie = LanaiTrie::new();
    for len in (1..key.len()).step_by(1000) {
        trie.insert(&key[..len], len).unwrap();
    }
    assert_eq!(trie.find(&key[..1001]), Some(&1001));
    assert_eq!(trie.iter().unwrap().count(), trie.len());
    trie.clear();
    assert!(trie.is_empty());
}
