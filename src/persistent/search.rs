//! Value-based navigation and path copying.
//!
//! Nodes have no parent links, so every ancestor lookup is a fresh binary
//! search from a root. Values are unique, which makes a value a stable name
//! for a position even after path copying has replaced the node objects
//! along the way. [`path_copy_replace`] lifts a subtree rebuilt deep inside
//! the tree back to a new root, reusing every sibling subtree it passes.

use super::ReferenceCounter;
use super::node::{Link, Node, Side};
use crate::error::TreeError;

/// Binary search for the node holding `value`.
///
/// # Errors
///
/// Returns [`TreeError::NotFound`] if `value` is not in the tree.
pub(crate) fn find<'a, T: Ord>(
    root: &'a Link<T>,
    value: &T,
) -> Result<&'a ReferenceCounter<Node<T>>, TreeError> {
    let mut current = root;
    loop {
        let node = current.node().ok_or(TreeError::NotFound)?;
        match Side::toward(value, &node.value) {
            Some(side) => current = node.child(side),
            None => return Ok(node),
        }
    }
}

/// Finds the parent of the node holding `value` and the side it hangs on.
///
/// Returns `Ok(None)` when `value` sits at the root.
///
/// # Errors
///
/// Returns [`TreeError::NotFound`] if `value` is not in the tree.
pub(crate) fn find_parent<T: Ord>(
    root: &Link<T>,
    value: &T,
) -> Result<Option<(ReferenceCounter<Node<T>>, Side)>, TreeError> {
    let node = root.node().ok_or(TreeError::NotFound)?;
    match Side::toward(value, &node.value) {
        Some(side) => find_parent_below(node, side, value).map(Some),
        None => Ok(None),
    }
}

fn find_parent_below<T: Ord>(
    parent: &ReferenceCounter<Node<T>>,
    side: Side,
    value: &T,
) -> Result<(ReferenceCounter<Node<T>>, Side), TreeError> {
    let child = parent.child(side).node().ok_or(TreeError::NotFound)?;
    match Side::toward(value, &child.value) {
        Some(next) => find_parent_below(child, next, value),
        None => Ok((parent.clone(), side)),
    }
}

/// Rebuilds the path from `root` to the node holding `old_value`, putting
/// `replacement` in that node's place.
///
/// Every ancestor on the path becomes a new node with the same value and
/// colour; every subtree off the path is shared with `root`.
///
/// # Errors
///
/// Returns [`TreeError::NotFound`] if `old_value` is not in the tree.
pub(crate) fn path_copy_replace<T: Ord + Clone>(
    root: &Link<T>,
    old_value: &T,
    replacement: Link<T>,
) -> Result<Link<T>, TreeError> {
    let node = root.node().ok_or(TreeError::NotFound)?;
    match Side::toward(old_value, &node.value) {
        Some(side) => {
            let child = path_copy_replace(node.child(side), old_value, replacement)?;
            Ok(Link::from_node(node.with_child(side, child)))
        }
        None => Ok(replacement),
    }
}

/// Replaces one child slot of the node holding `parent_value`.
///
/// # Errors
///
/// Returns [`TreeError::NotFound`] if `parent_value` is not in the tree.
pub(crate) fn replace_child<T: Ord + Clone>(
    root: &Link<T>,
    parent_value: &T,
    side: Side,
    child: Link<T>,
) -> Result<Link<T>, TreeError> {
    let parent = find(root, parent_value)?;
    let rebuilt = Link::from_node(parent.with_child(side, child));
    path_copy_replace(root, parent_value, rebuilt)
}

/// The leftmost (smallest) node of a subtree.
pub(crate) fn leftmost<T>(node: &ReferenceCounter<Node<T>>) -> &ReferenceCounter<Node<T>> {
    let mut current = node;
    while let Some(left) = current.left.node() {
        current = left;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::node::Colour;
    use rstest::{fixture, rstest};

    fn branch(value: i32, colour: Colour, left: Link<i32>, right: Link<i32>) -> Link<i32> {
        Link::from_node(Node::new(value, colour, left, right))
    }

    fn leaf(value: i32) -> Link<i32> {
        branch(value, Colour::Black, Link::Empty, Link::Empty)
    }

    //         4
    //      2     6
    //     1 3   5 7
    #[fixture]
    fn seven() -> Link<i32> {
        branch(
            4,
            Colour::Black,
            branch(2, Colour::Red, leaf(1), leaf(3)),
            branch(6, Colour::Red, leaf(5), leaf(7)),
        )
    }

    #[rstest]
    #[case(4)]
    #[case(1)]
    #[case(7)]
    fn test_find_present(seven: Link<i32>, #[case] value: i32) {
        assert_eq!(find(&seven, &value).map(|node| node.value), Ok(value));
    }

    #[rstest]
    fn test_find_absent(seven: Link<i32>) {
        assert_eq!(find(&seven, &8).err(), Some(TreeError::NotFound));
        assert_eq!(
            find(&Link::<i32>::Empty, &1).err(),
            Some(TreeError::NotFound)
        );
    }

    #[rstest]
    fn test_find_parent_of_root_is_none(seven: Link<i32>) {
        assert!(find_parent(&seven, &4).unwrap().is_none());
    }

    #[rstest]
    #[case(2, 4, Side::Left)]
    #[case(6, 4, Side::Right)]
    #[case(3, 2, Side::Right)]
    #[case(5, 6, Side::Left)]
    fn test_find_parent(
        seven: Link<i32>,
        #[case] value: i32,
        #[case] parent: i32,
        #[case] side: Side,
    ) {
        let (found, found_side) = find_parent(&seven, &value).unwrap().unwrap();
        assert_eq!(found.value, parent);
        assert_eq!(found_side, side);
    }

    #[rstest]
    fn test_find_parent_absent(seven: Link<i32>) {
        assert_eq!(find_parent(&seven, &10).err(), Some(TreeError::NotFound));
    }

    #[rstest]
    fn test_path_copy_replace_shares_off_path_subtrees(seven: Link<i32>) {
        let replaced = path_copy_replace(&seven, &3, leaf(3)).unwrap();

        let old_root = seven.node().unwrap();
        let new_root = replaced.node().unwrap();
        assert!(!ReferenceCounter::ptr_eq(old_root, new_root));
        // right subtree untouched
        assert!(ReferenceCounter::ptr_eq(
            old_root.right.node().unwrap(),
            new_root.right.node().unwrap()
        ));
        // 2 is on the path, 1 is not
        let old_two = old_root.left.node().unwrap();
        let new_two = new_root.left.node().unwrap();
        assert!(!ReferenceCounter::ptr_eq(old_two, new_two));
        assert!(ReferenceCounter::ptr_eq(
            old_two.left.node().unwrap(),
            new_two.left.node().unwrap()
        ));
        assert_eq!(new_two.colour, Colour::Red);
    }

    #[rstest]
    fn test_path_copy_replace_at_root(seven: Link<i32>) {
        let replaced = path_copy_replace(&seven, &4, leaf(4)).unwrap();
        assert!(replaced.node().unwrap().is_leaf());
        assert!(!seven.node().unwrap().is_leaf());
    }

    #[rstest]
    fn test_path_copy_replace_absent(seven: Link<i32>) {
        assert_eq!(
            path_copy_replace(&seven, &9, leaf(9)).err(),
            Some(TreeError::NotFound)
        );
    }

    #[rstest]
    fn test_replace_child(seven: Link<i32>) {
        let replaced = replace_child(&seven, &6, Side::Left, Link::Nil).unwrap();
        let six = find(&replaced, &6).unwrap();
        assert!(six.left.is_nil());
        assert_eq!(six.right.node().unwrap().value, 7);
        assert!(find(&seven, &5).is_ok());
    }

    #[rstest]
    fn test_leftmost(seven: Link<i32>) {
        let root = seven.node().unwrap();
        assert_eq!(leftmost(root).value, 1);
        assert_eq!(leftmost(root.right.node().unwrap()).value, 5);
    }
}
