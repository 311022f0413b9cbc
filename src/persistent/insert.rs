//! Insertion and the insert rebalancing state machine.
//!
//! A value is first added as a red leaf by a path-copied binary search tree
//! insert. [`rebalance_after_insert`] then walks upwards, re-locating the
//! parent, grandparent and uncle by value in the *latest* intermediate root
//! at every step, since path copying replaces the node objects on the
//! modified path.

use super::node::{Colour, Link, Node, Side};
use super::search::{find_parent, path_copy_replace};
use crate::error::TreeError;

/// Inserts `value` and restores the red-black invariants.
///
/// # Errors
///
/// Returns [`TreeError::DuplicateValue`] if `value` is already present.
pub(crate) fn insert_value<T: Ord + Clone>(root: &Link<T>, value: T) -> Result<Link<T>, TreeError> {
    let inserted = value.clone();
    let with_leaf = insert_leaf(root, value)?;
    rebalance_after_insert(with_leaf, inserted)
}

/// Plain binary search tree insert of a red leaf.
fn insert_leaf<T: Ord + Clone>(link: &Link<T>, value: T) -> Result<Link<T>, TreeError> {
    let Some(node) = link.node() else {
        return Ok(Link::from_node(Node::red_leaf(value)));
    };
    let side = Side::toward(&value, &node.value).ok_or(TreeError::DuplicateValue)?;
    let child = insert_leaf(node.child(side), value)?;
    Ok(Link::from_node(node.with_child(side, child)))
}

/// Restores the invariants after `inserted` was added as a red leaf.
///
/// # Errors
///
/// Returns [`TreeError::NotFound`] only if `inserted` is missing from `root`.
pub(crate) fn rebalance_after_insert<T: Ord + Clone>(
    mut root: Link<T>,
    inserted: T,
) -> Result<Link<T>, TreeError> {
    let mut current = inserted;
    loop {
        let Some((parent, side)) = find_parent(&root, &current)? else {
            return Ok(root.into_black());
        };
        if parent.is_black() {
            return Ok(root);
        }
        let Some((grandparent, parent_side)) = find_parent(&root, &parent.value)? else {
            return Ok(root.into_black());
        };

        let uncle = parent.sibling(Some(&*grandparent));
        if let Some(red_uncle) = uncle.node().filter(|uncle| uncle.is_red()) {
            tracing::trace!("insert rebalance: red uncle, recolouring grandparent");
            let recoloured = grandparent
                .recolour(Colour::Red)
                .with_child(parent_side, Link::from_node(parent.recolour(Colour::Black)))
                .with_child(
                    parent_side.opposite(),
                    Link::from_node(red_uncle.recolour(Colour::Black)),
                );
            root = path_copy_replace(&root, &grandparent.value, Link::from_node(recoloured))?;
            current = grandparent.value.clone();
            continue;
        }

        tracing::trace!(
            zig_zag = side != parent_side,
            "insert rebalance: black uncle, rotating grandparent"
        );
        let rotated = restructure(&grandparent, &parent, parent_side, side);
        return path_copy_replace(&root, &grandparent.value, Link::from_node(rotated));
    }
}

/// Black or absent uncle.
///
/// `parent_side` is the parent's side under the grandparent and `side` the
/// inserted node's side under the parent. A zig-zag is first straightened by
/// rotating the parent, then the grandparent is rotated away from the
/// parent's side. The returned subtree has a black top and no red-red edge.
fn restructure<T: Ord + Clone>(
    grandparent: &Node<T>,
    parent: &Node<T>,
    parent_side: Side,
    side: Side,
) -> Node<T> {
    let straightened = if side == parent_side {
        parent.recolour(Colour::Black)
    } else {
        parent.rotate(parent_side).recolour(Colour::Black)
    };
    grandparent
        .switch_colour()
        .with_child(parent_side, Link::from_node(straightened))
        .rotate(parent_side.opposite())
}
