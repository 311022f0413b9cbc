//! Red-black invariant checking.
//!
//! Validation is independent of the balancing code and is never run as part
//! of a mutation; it exists for tests and operational self-checks.

use super::node::Link;
use crate::error::InvariantViolation;

/// Checks every red-black invariant on the tree rooted at `root`.
///
/// Logs the first violation found at `warn` level.
///
/// # Errors
///
/// Returns the first [`InvariantViolation`] encountered.
pub(crate) fn check<T: Ord>(root: &Link<T>) -> Result<(), InvariantViolation> {
    let result = check_root(root);
    if let Err(violation) = &result {
        tracing::warn!(%violation, "red-black validation failed");
    }
    result
}

fn check_root<T: Ord>(root: &Link<T>) -> Result<(), InvariantViolation> {
    if root.is_red() {
        return Err(InvariantViolation::RedRoot);
    }
    subtree_black_height(root)?;
    check_order(root, &mut None)
}

/// Black height of a subtree including its top node, verifying along the
/// way that no red node has a red child and that no sentinel is attached.
fn subtree_black_height<T>(link: &Link<T>) -> Result<usize, InvariantViolation> {
    match link {
        Link::Empty => Ok(0),
        Link::Nil => Err(InvariantViolation::SentinelReachable),
        Link::Node(node) => {
            if node.is_red() && (node.left.is_red() || node.right.is_red()) {
                return Err(InvariantViolation::RedRedEdge);
            }
            let left = subtree_black_height(&node.left)?;
            let right = subtree_black_height(&node.right)?;
            if left != right {
                return Err(InvariantViolation::BlackHeightMismatch { left, right });
            }
            Ok(left + usize::from(node.is_black()))
        }
    }
}

fn check_order<'a, T: Ord>(
    link: &'a Link<T>,
    previous: &mut Option<&'a T>,
) -> Result<(), InvariantViolation> {
    if let Some(node) = link.node() {
        check_order(&node.left, previous)?;
        if previous.is_some_and(|previous| *previous >= node.value) {
            return Err(InvariantViolation::OutOfOrder);
        }
        *previous = Some(&node.value);
        check_order(&node.right, previous)?;
    }
    Ok(())
}

/// Number of black nodes on the leftmost path, counting the top node.
///
/// Only meaningful as a diagnostic; it does not verify balance.
pub(crate) fn leftmost_black_height<T>(link: &Link<T>) -> usize {
    let mut count = 0;
    let mut current = link;
    while let Some(node) = current.node() {
        count += usize::from(node.is_black());
        current = &node.left;
    }
    count
}
