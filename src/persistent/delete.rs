//! Deletion and the delete rebalancing state machine.
//!
//! Removing a black node leaves every path through its position one black
//! node short. The position is tracked as *(parent value, side)*: the
//! deficient subtree is whatever hangs from that slot. When the removed node
//! was a black leaf the slot holds the [`Link::Nil`] sentinel so that "no
//! child" and "black-deficient child" can be told apart; rebalancing never
//! moves the sentinel away from its parent, and it is detached once the
//! tree is balanced again.
//!
//! Like insertion, every step re-locates nodes by value in the latest
//! intermediate root and splices its locally rebuilt subtree back with
//! [`path_copy_replace`].

use super::ReferenceCounter;
use super::node::{Colour, Link, Node, Side};
use super::search::{find, find_parent, leftmost, path_copy_replace, replace_child};
use super::validate::leftmost_black_height;
use crate::error::{InvariantViolation, TreeError};

/// Removes `value` and restores the red-black invariants.
///
/// # Errors
///
/// Returns [`TreeError::EmptyTreeUnderflow`] if the tree is empty and
/// [`TreeError::NotFound`] if `value` is not present.
pub(crate) fn delete_value<T: Ord + Clone>(
    root: &Link<T>,
    value: &T,
) -> Result<Link<T>, TreeError> {
    if root.node().is_none() {
        return Err(TreeError::EmptyTreeUnderflow);
    }
    let target = find(root, value)?.clone();

    // With two children the in-order successor is unlinked instead and its
    // value takes over the target's slot.
    let removed = match (target.left.node(), target.right.node()) {
        (Some(_), Some(right)) => leftmost(right).clone(),
        _ => target.clone(),
    };
    let moved_up = match removed.left.node().or_else(|| removed.right.node()) {
        Some(child) => Link::Node(child.clone()),
        None if removed.is_black() => Link::Nil,
        None => Link::Empty,
    };

    let Some((parent, side)) = find_parent(root, &removed.value)? else {
        // Only a root with at most one child gets here.
        let replacement = if moved_up.is_nil() {
            Link::Empty
        } else {
            moved_up
        };
        return Ok(replacement.into_black());
    };
    let mut parent_value = parent.value.clone();
    let mut working = path_copy_replace(
        root,
        &parent_value,
        Link::from_node(parent.with_child(side, moved_up.clone())),
    )?;

    if !ReferenceCounter::ptr_eq(&removed, &target) {
        let relocated = find(&working, &target.value)?.with_value(removed.value.clone());
        working = path_copy_replace(&working, &target.value, Link::from_node(relocated))?;
        if parent_value == target.value {
            parent_value = removed.value.clone();
        }
    }

    if removed.is_red() {
        return Ok(working);
    }
    let balanced = rebalance_after_delete(working, parent_value.clone(), side)?;
    if moved_up.is_nil() {
        detach_sentinel(&balanced, &parent_value, side)
    } else {
        Ok(balanced)
    }
}

/// Restores the black height of the subtree hanging from `side` of the
/// node holding `parent_value`.
///
/// # Errors
///
/// Returns [`TreeError::InvariantViolation`] if the deficient position has
/// no sibling, which a tree that was valid before the delete cannot produce.
pub(crate) fn rebalance_after_delete<T: Ord + Clone>(
    mut root: Link<T>,
    mut parent_value: T,
    mut side: Side,
) -> Result<Link<T>, TreeError> {
    loop {
        let mut parent = find(&root, &parent_value)?.clone();

        let node = parent.child(side);
        if node.is_red() {
            tracing::trace!("delete rebalance: red replacement absorbs the missing black");
            let blackened = node.clone().into_black();
            return replace_child(&root, &parent_value, side, blackened);
        }

        let mut sibling = sibling_of(&parent, side)?;
        if sibling.is_red() {
            tracing::trace!("delete rebalance: red sibling, rotating parent");
            let rotated = parent
                .recolour(Colour::Red)
                .with_child(
                    side.opposite(),
                    Link::from_node(sibling.recolour(Colour::Black)),
                )
                .rotate(side);
            root = path_copy_replace(&root, &parent_value, Link::from_node(rotated))?;
            parent = find(&root, &parent_value)?.clone();
            sibling = sibling_of(&parent, side)?;
        }

        if sibling.left.is_black() && sibling.right.is_black() {
            let recoloured = parent.with_child(
                side.opposite(),
                Link::from_node(sibling.recolour(Colour::Red)),
            );
            if parent.is_red() {
                tracing::trace!("delete rebalance: black nephews, red parent absorbs");
                let absorbed = Link::from_node(recoloured.recolour(Colour::Black));
                return path_copy_replace(&root, &parent_value, absorbed);
            }
            tracing::trace!("delete rebalance: black nephews, deficiency moves up");
            root = path_copy_replace(&root, &parent_value, Link::from_node(recoloured))?;
            match find_parent(&root, &parent_value)? {
                Some((grandparent, parent_side)) => {
                    parent_value = grandparent.value.clone();
                    side = parent_side;
                    continue;
                }
                None => return Ok(root),
            }
        }

        tracing::trace!("delete rebalance: red nephew, rotating parent");
        let resolved = resolve_red_nephew(&parent, side, &sibling);
        return path_copy_replace(&root, &parent_value, Link::from_node(resolved));
    }
}

fn sibling_of<T>(parent: &Node<T>, side: Side) -> Result<ReferenceCounter<Node<T>>, TreeError> {
    parent
        .child(side.opposite())
        .node()
        .cloned()
        .ok_or_else(|| {
            let (left, right) = match side {
                Side::Left => (leftmost_black_height(&parent.left) + 1, 0),
                Side::Right => (0, leftmost_black_height(&parent.right) + 1),
            };
            InvariantViolation::BlackHeightMismatch { left, right }.into()
        })
}

/// Black sibling with at least one red child. Terminal.
///
/// When only the near nephew is red it is first rotated above the sibling,
/// turning it into the far-nephew shape. The sibling then takes the
/// parent's colour, parent and far nephew turn black, and the parent
/// rotates towards the deficient side.
fn resolve_red_nephew<T: Ord + Clone>(parent: &Node<T>, side: Side, sibling: &Node<T>) -> Node<T> {
    let far_side = side.opposite();
    let straightened;
    let sibling = if sibling.child(far_side).is_black() {
        straightened = sibling
            .switch_colour()
            .with_child(side, sibling.child(side).clone().into_black())
            .rotate(far_side);
        &straightened
    } else {
        sibling
    };
    let sibling = sibling
        .recolour(parent.colour)
        .with_child(far_side, sibling.child(far_side).clone().into_black());
    parent
        .recolour(Colour::Black)
        .with_child(far_side, Link::from_node(sibling))
        .rotate(side)
}

/// Replaces the sentinel under `parent_value` with an absent child.
///
/// # Errors
///
/// Returns [`TreeError::InvariantViolation`] if the sentinel is no longer in
/// that slot.
fn detach_sentinel<T: Ord + Clone>(
    root: &Link<T>,
    parent_value: &T,
    side: Side,
) -> Result<Link<T>, TreeError> {
    if !find(root, parent_value)?.child(side).is_nil() {
        return Err(InvariantViolation::SentinelReachable.into());
    }
    replace_child(root, parent_value, side, Link::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::insert::insert_value;
    use crate::persistent::validate;
    use rstest::rstest;

    fn build(values: &[i32]) -> Link<i32> {
        values.iter().fold(Link::Empty, |root, value| {
            insert_value(&root, *value).unwrap()
        })
    }

    fn in_order(link: &Link<i32>) -> Vec<i32> {
        fn go(link: &Link<i32>, out: &mut Vec<i32>) {
            if let Some(node) = link.node() {
                go(&node.left, out);
                out.push(node.value);
                go(&node.right, out);
            }
        }
        let mut out = Vec::new();
        go(link, &mut out);
        out
    }

    fn assert_deletes(values: &[i32], deletions: &[i32]) {
        let mut root = build(values);
        let mut expected: Vec<i32> = values.to_vec();
        expected.sort_unstable();
        for value in deletions {
            root = delete_value(&root, value).unwrap();
            expected.retain(|kept| kept != value);
            assert_eq!(validate::check(&root), Ok(()), "after deleting {value}");
            assert_eq!(in_order(&root), expected, "after deleting {value}");
        }
    }

    #[rstest]
    fn test_delete_only_node_empties_tree() {
        let root = build(&[4]);
        let emptied = delete_value(&root, &4).unwrap();
        assert!(emptied.node().is_none());
    }

    #[rstest]
    fn test_delete_from_empty_tree() {
        assert_eq!(
            delete_value(&Link::<i32>::Empty, &1).err(),
            Some(TreeError::EmptyTreeUnderflow)
        );
    }

    #[rstest]
    fn test_delete_absent_value() {
        let root = build(&[1, 2, 3]);
        assert_eq!(delete_value(&root, &9).err(), Some(TreeError::NotFound));
    }

    #[rstest]
    fn test_delete_red_leaf_needs_no_rebalance() {
        let root = build(&[2, 1, 3]);
        let deleted = delete_value(&root, &3).unwrap();
        let rendered = format!("{}", Shape(&deleted));
        assert_eq!(rendered, "2b[1r[null,null],null]");
    }

    #[rstest]
    fn test_delete_black_leaf_detaches_sentinel() {
        // 2b[1b,3b[null,4r]] -> deleting 1 leaves a sentinel under 2
        let root = build(&[2, 1, 3, 4]);
        let deleted = delete_value(&root, &1).unwrap();
        assert_eq!(validate::check(&deleted), Ok(()));
        assert_eq!(in_order(&deleted), vec![2, 3, 4]);
    }

    #[rstest]
    fn test_delete_root_with_two_children() {
        let root = build(&[2, 1, 3]);
        let deleted = delete_value(&root, &2).unwrap();
        assert_eq!(format!("{}", Shape(&deleted)), "3b[1r[null,null],null]");
    }

    #[rstest]
    fn test_delete_root_with_single_child() {
        let root = build(&[1, 2]);
        let deleted = delete_value(&root, &1).unwrap();
        assert_eq!(format!("{}", Shape(&deleted)), "2b[null,null]");
    }

    #[rstest]
    #[case(&[2, 4, 1, 5, 3], &[4])]
    #[case(&[6, 3, 7, 4, 8, 1], &[3, 6])]
    #[case(&[10, 5, 15, 6, 13, 18, 12, 14, 19], &[15])]
    #[case(&[3, 1, 5, 2, 4, 6, 7], &[1])]
    #[case(&[8, 4, 9, 2, 5, 10, 6], &[9])]
    #[case(&[2, 1, 5, 4, 7, 6, 8], &[4])]
    #[case(&[2, 1, 5, 4, 7, 6, 8, 10], &[4, 10, 2])]
    #[case(&[10, 5, 15, 4], &[5, 15])]
    #[case(&[2, 1, 5, 4, 8, 3, 7], &[4])]
    #[case(&[7, 5, 8, 4, 6, 9, 2, 10, 3], &[9, 3, 4, 7, 10])]
    fn test_delete_sequences(#[case] values: &[i32], #[case] deletions: &[i32]) {
        assert_deletes(values, deletions);
    }

    #[rstest]
    fn test_delete_everything_in_both_directions() {
        let values: Vec<i32> = (0..40).collect();
        assert_deletes(&values, &values);
        let reversed: Vec<i32> = values.iter().rev().copied().collect();
        assert_deletes(&values, &reversed);
    }

    #[rstest]
    fn test_delete_interleaved_order() {
        let values: Vec<i32> = (0..50).map(|index| (index * 17) % 50).collect();
        let deletions: Vec<i32> = (0..50).map(|index| (index * 31) % 50).collect();
        assert_deletes(&values, &deletions);
    }

    #[rstest]
    fn test_delete_leaves_previous_root_untouched() {
        let before = build(&[5, 3, 8, 1, 4, 7, 9]);
        let rendered = format!("{}", Shape(&before));
        let _after = delete_value(&before, &3).unwrap();
        assert_eq!(format!("{}", Shape(&before)), rendered);
    }

    #[rstest]
    fn test_rebalance_missing_sibling_is_reported() {
        let root = build(&[1]);
        let result = rebalance_after_delete(root, 1, Side::Left);
        assert!(matches!(
            result.err(),
            Some(TreeError::InvariantViolation(
                InvariantViolation::BlackHeightMismatch { .. }
            ))
        ));
    }

    struct Shape<'a>(&'a Link<i32>);

    impl std::fmt::Display for Shape<'_> {
        fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            self.0.write_structure(formatter)
        }
    }
}
