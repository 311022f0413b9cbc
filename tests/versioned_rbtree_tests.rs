//! Integration tests for VersionedRedBlackTree and PersistentRedBlackTree.
//!
//! Covers the documented insert and delete scenarios, the history
//! convention and structural sharing between versions.

use rstest::{fixture, rstest};
use versioned_rbtree::persistent::{Colour, PersistentRedBlackTree};
use versioned_rbtree::{TreeError, VersionedRedBlackTree};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn values<T: Copy>(tree: &VersionedRedBlackTree<T>) -> Vec<T> {
    tree.iter().copied().collect()
}

#[fixture]
fn six() -> VersionedRedBlackTree<i32> {
    init_tracing();
    let mut tree = VersionedRedBlackTree::new();
    for value in [5, 4, 7, 6, 8, 9] {
        tree.insert(value).unwrap();
    }
    tree
}

// =============================================================================
// Insert Scenarios
// =============================================================================

#[rstest]
fn test_insert_sequence_is_valid_and_sorted(six: VersionedRedBlackTree<i32>) {
    assert!(six.validate());
    assert_eq!(values(&six), vec![4, 5, 6, 7, 8, 9]);
}

#[rstest]
fn test_insert_sequence_shape(six: VersionedRedBlackTree<i32>) {
    assert_eq!(
        six.to_string(),
        "5b[4b[null,null],7r[6b[null,null],8b[null,9r[null,null]]]]"
    );
}

#[rstest]
fn test_every_intermediate_version_is_valid(six: VersionedRedBlackTree<i32>) {
    for version in six.versions() {
        assert_eq!(version.check_invariants(), Ok(()));
    }
}

#[rstest]
fn test_duplicate_insert_is_rejected(mut six: VersionedRedBlackTree<i32>) {
    assert_eq!(six.insert(6), Err(TreeError::DuplicateValue));
    assert_eq!(six.version_count(), 7);
    assert_eq!(six.len(), 6);
}

// =============================================================================
// Delete Scenarios
// =============================================================================

#[rstest]
fn test_delete_sequence_keeps_invariants() {
    init_tracing();
    let mut tree = VersionedRedBlackTree::new();
    for value in [7, 5, 8, 4, 6, 9, 2, 10, 3] {
        tree.insert(value).unwrap();
    }

    let mut expected_length = 9;
    for value in [9, 3, 4, 7, 10] {
        tree.delete(&value).unwrap();
        expected_length -= 1;
        assert_eq!(tree.check_invariants(), Ok(()), "after deleting {value}");
        assert_eq!(tree.iter().len(), expected_length);
        assert_eq!(tree.find(&value).err(), Some(TreeError::NotFound));
    }
    assert_eq!(values(&tree), vec![2, 5, 6, 8]);
}

#[rstest]
#[case::ascending((0..32).collect())]
#[case::descending((0..32).rev().collect())]
#[case::alternating(vec![16, 0, 31, 1, 30, 2, 29, 15, 17, 8, 24])]
fn test_delete_until_empty(#[case] order: Vec<i32>) {
    let mut tree = VersionedRedBlackTree::new();
    for value in 0..32 {
        tree.insert(value).unwrap();
    }
    for value in &order {
        tree.delete(value).unwrap();
        assert!(tree.validate(), "after deleting {value}");
    }
    assert_eq!(tree.len(), 32 - order.len());
}

#[rstest]
fn test_delete_errors(mut six: VersionedRedBlackTree<i32>) {
    assert_eq!(six.delete(&42), Err(TreeError::NotFound));

    let mut empty: VersionedRedBlackTree<i32> = VersionedRedBlackTree::new();
    assert_eq!(empty.delete(&42), Err(TreeError::EmptyTreeUnderflow));
    assert_eq!(empty.version_count(), 1);
}

// =============================================================================
// History
// =============================================================================

#[rstest]
fn test_history_records_empty_state_first(six: VersionedRedBlackTree<i32>) {
    let history = six.history();
    assert_eq!(history.len(), 7);
    assert!(history[0].is_none());
    assert!(six.get_version(0).unwrap().is_empty());
    assert_eq!(history[1].as_ref().map(|root| *root.value()), Some(5));
}

#[rstest]
fn test_old_versions_survive_deletes(mut six: VersionedRedBlackTree<i32>) {
    six.delete(&7).unwrap();
    six.delete(&5).unwrap();

    assert_eq!(values(&six), vec![4, 6, 8, 9]);
    let before = six.get_version(6).unwrap();
    assert_eq!(
        before.iter().copied().collect::<Vec<_>>(),
        vec![4, 5, 6, 7, 8, 9]
    );
    assert!(before.validate());
}

#[rstest]
fn test_revert_restores_values(mut six: VersionedRedBlackTree<i32>) {
    six.delete(&8).unwrap();
    six.revert().unwrap();
    assert_eq!(values(&six), vec![4, 5, 6, 7, 8, 9]);
    assert_eq!(six.version_count(), 9);
}

#[rstest]
#[case(0, false)]
#[case(6, false)]
#[case(7, true)]
#[case(100, true)]
fn test_get_version_bounds(
    six: VersionedRedBlackTree<i32>,
    #[case] index: usize,
    #[case] out_of_range: bool,
) {
    assert_eq!(six.get_version(index).is_err(), out_of_range);
}

// =============================================================================
// Structural Sharing
// =============================================================================

#[rstest]
fn test_insert_shares_untouched_subtree(six: VersionedRedBlackTree<i32>) {
    let before = six.current().clone();
    let after = before.insert(3).unwrap();

    let old_root = before.root().unwrap();
    let new_root = after.root().unwrap();
    assert!(!new_root.ptr_eq(&old_root));

    // 3 lands under 4, so the whole right subtree is shared
    assert!(new_root.right().unwrap().ptr_eq(&old_root.right().unwrap()));
    assert!(!new_root.left().unwrap().ptr_eq(&old_root.left().unwrap()));
}

#[rstest]
fn test_path_nodes_are_fresh_even_when_unchanged(six: VersionedRedBlackTree<i32>) {
    let before = six.current().clone();
    let after = before.insert(10).unwrap();

    // 10 goes under red 9, rebalancing somewhere on the right path
    let old_root = before.root().unwrap();
    let new_root = after.root().unwrap();
    assert_eq!(*new_root.value(), *old_root.value());
    assert_eq!(new_root.colour(), Colour::Black);
    assert!(!new_root.ptr_eq(&old_root));
    assert!(new_root.left().unwrap().ptr_eq(&old_root.left().unwrap()));
}

#[rstest]
fn test_find_returns_shared_node(six: VersionedRedBlackTree<i32>) {
    let found = six.find(&4).unwrap();
    let left = six.current().root().unwrap().left().unwrap();
    assert!(found.ptr_eq(&left));
    assert!(found.is_leaf());
}

// =============================================================================
// Persistent Tree Values
// =============================================================================

#[rstest]
fn test_from_root_continues_from_existing_tree() {
    let tree = PersistentRedBlackTree::try_from_values([3, 1, 2]).unwrap();
    let mut history = VersionedRedBlackTree::from_root(tree.clone());
    history.insert(4).unwrap();

    assert_eq!(history.version_count(), 3);
    assert_eq!(history.get_version(1).unwrap(), &tree);
    assert_eq!(values(&history), vec![1, 2, 3, 4]);
}

#[rstest]
fn test_display_of_empty_history() {
    let tree: VersionedRedBlackTree<i32> = VersionedRedBlackTree::new();
    assert_eq!(tree.to_string(), "null");
}
