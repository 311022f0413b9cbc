//! Immutable red-black tree nodes and the primitives that rebuild them.
//!
//! Nodes never change after construction. Every primitive in this module
//! (recolouring, rotation, child replacement) returns a *new* node and
//! shares the untouched children of the input through [`ReferenceCounter`].
//! Nodes carry no parent reference; ancestry is re-derived by searching
//! from a root (see [`super::search`]).

use super::ReferenceCounter;
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Colour and Side
// =============================================================================

/// The colour of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Colour {
    /// A red node. Red nodes never have red children.
    Red,
    /// A black node. Absent children also count as black.
    Black,
}

impl Colour {
    /// Returns the opposite colour.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::persistent::Colour;
    ///
    /// assert_eq!(Colour::Red.switch(), Colour::Black);
    /// assert_eq!(Colour::Black.switch(), Colour::Red);
    /// ```
    #[inline]
    #[must_use]
    pub const fn switch(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Single-letter tag used by the structural dump.
    pub(crate) const fn tag(self) -> &'static str {
        match self {
            Self::Red => "r",
            Self::Black => "b",
        }
    }
}

/// Which child slot of a parent a subtree hangs from.
///
/// Every mirrored rebalancing case is written once in terms of a `Side`
/// and its [`opposite`](Side::opposite).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The side a search for `value` descends into below `node_value`,
    /// or `None` when the two are equal.
    pub(crate) fn toward<T: Ord>(value: &T, node_value: &T) -> Option<Self> {
        match value.cmp(node_value) {
            Ordering::Less => Some(Self::Left),
            Ordering::Greater => Some(Self::Right),
            Ordering::Equal => None,
        }
    }
}

// =============================================================================
// Link Definition
// =============================================================================

/// A child slot (or a root).
///
/// `Nil` is the double-black sentinel: a black placeholder standing in for
/// a removed black leaf while delete rebalancing runs. It is one black node
/// shorter than a real black node and is always detached back to `Empty`
/// before a version is committed.
pub(crate) enum Link<T> {
    Empty,
    Nil,
    Node(ReferenceCounter<Node<T>>),
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Nil => Self::Nil,
            Self::Node(node) => Self::Node(node.clone()),
        }
    }
}

impl<T> Link<T> {
    /// Wraps a freshly built node.
    pub(crate) fn from_node(node: Node<T>) -> Self {
        Self::Node(ReferenceCounter::new(node))
    }

    /// The real node behind this link, if any.
    pub(crate) const fn node(&self) -> Option<&ReferenceCounter<Node<T>>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Empty | Self::Nil => None,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.node().is_some_and(|node| node.is_red())
    }

    /// Absent children and the sentinel are black.
    pub(crate) fn is_black(&self) -> bool {
        !self.is_red()
    }

    pub(crate) const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Writes `value+colour[left,right]`, or `null` for an absent subtree.
    pub(crate) fn write_structure(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        T: fmt::Display,
    {
        match self {
            Self::Empty | Self::Nil => write!(formatter, "null"),
            Self::Node(node) => {
                write!(formatter, "{}{}[", node.value, node.colour.tag())?;
                node.left.write_structure(formatter)?;
                write!(formatter, ",")?;
                node.right.write_structure(formatter)?;
                write!(formatter, "]")
            }
        }
    }
}

impl<T: Clone> Link<T> {
    /// The same subtree with a black top. Used for roots and for a red node
    /// that absorbs a missing black.
    pub(crate) fn into_black(self) -> Self {
        let recoloured = self
            .node()
            .filter(|node| node.is_red())
            .map(|node| Self::from_node(node.recolour(Colour::Black)));
        recoloured.unwrap_or(self)
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// Internal immutable node.
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) colour: Colour,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> Node<T> {
    pub(crate) const fn new(value: T, colour: Colour, left: Link<T>, right: Link<T>) -> Self {
        Self {
            value,
            colour,
            left,
            right,
        }
    }

    /// Creates a new red node with no children.
    pub(crate) const fn red_leaf(value: T) -> Self {
        Self::new(value, Colour::Red, Link::Empty, Link::Empty)
    }

    pub(crate) fn is_red(&self) -> bool {
        self.colour == Colour::Red
    }

    pub(crate) fn is_black(&self) -> bool {
        self.colour == Colour::Black
    }

    /// A node is a leaf when neither slot holds a real node.
    pub(crate) const fn is_leaf(&self) -> bool {
        self.left.node().is_none() && self.right.node().is_none()
    }

    pub(crate) const fn child(&self, side: Side) -> &Link<T> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl<T: Ord> Node<T> {
    /// Null-safe three-way comparison.
    ///
    /// Comparing against an absent node yields [`Ordering::Greater`].
    pub(crate) fn compare(&self, other: Option<&Self>) -> Ordering {
        other.map_or(Ordering::Greater, |other| self.value.cmp(&other.value))
    }
}

impl<T: Clone> Node<T> {
    /// Creates a copy of this node with a new colour.
    pub(crate) fn recolour(&self, colour: Colour) -> Self {
        Self::new(
            self.value.clone(),
            colour,
            self.left.clone(),
            self.right.clone(),
        )
    }

    pub(crate) fn switch_colour(&self) -> Self {
        self.recolour(self.colour.switch())
    }

    /// Creates a copy of this node with one child slot replaced.
    pub(crate) fn with_child(&self, side: Side, child: Link<T>) -> Self {
        match side {
            Side::Left => Self::new(self.value.clone(), self.colour, child, self.right.clone()),
            Side::Right => Self::new(self.value.clone(), self.colour, self.left.clone(), child),
        }
    }

    /// Creates a copy of this node holding a different value.
    pub(crate) fn with_value(&self, value: T) -> Self {
        Self::new(value, self.colour, self.left.clone(), self.right.clone())
    }

    /// Rotates left: the right child rises and keeps its colour, this node
    /// descends to its left holding the right child's former left subtree.
    ///
    /// Returns an unchanged copy when there is no right child to raise.
    pub(crate) fn rotate_left(&self) -> Self {
        let Some(right) = self.right.node() else {
            return self.recolour(self.colour);
        };
        let descended = Self::new(
            self.value.clone(),
            self.colour,
            self.left.clone(),
            right.left.clone(),
        );
        Self::new(
            right.value.clone(),
            right.colour,
            Link::from_node(descended),
            right.right.clone(),
        )
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    pub(crate) fn rotate_right(&self) -> Self {
        let Some(left) = self.left.node() else {
            return self.recolour(self.colour);
        };
        let descended = Self::new(
            self.value.clone(),
            self.colour,
            left.right.clone(),
            self.right.clone(),
        );
        Self::new(
            left.value.clone(),
            left.colour,
            left.left.clone(),
            Link::from_node(descended),
        )
    }

    /// Rotates so that this node descends towards `direction`.
    pub(crate) fn rotate(&self, direction: Side) -> Self {
        match direction {
            Side::Left => self.rotate_left(),
            Side::Right => self.rotate_right(),
        }
    }
}

impl<T: Ord + Clone> Node<T> {
    /// The other child of `parent`, or `Empty` when there is no parent.
    pub(crate) fn sibling(&self, parent: Option<&Self>) -> Link<T> {
        parent.map_or(Link::Empty, |parent| match parent.compare(Some(self)) {
            Ordering::Greater => parent.right.clone(),
            Ordering::Less => parent.left.clone(),
            Ordering::Equal => Link::Empty,
        })
    }
}

// =============================================================================
// NodeHandle Definition
// =============================================================================

/// A read-only handle to a node of some version.
///
/// Handles keep the node (and everything below it) alive. Two handles
/// refer to the same physical node exactly when [`ptr_eq`](Self::ptr_eq)
/// holds, which is how structural sharing between versions is observed.
pub struct NodeHandle<T> {
    node: ReferenceCounter<Node<T>>,
}

impl<T> Clone for NodeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T> NodeHandle<T> {
    pub(crate) const fn new(node: ReferenceCounter<Node<T>>) -> Self {
        Self { node }
    }

    pub(crate) fn from_link(link: &Link<T>) -> Option<Self> {
        link.node().cloned().map(Self::new)
    }

    /// Returns the value stored in this node.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &T {
        &self.node.value
    }

    /// Returns the colour of this node.
    #[inline]
    #[must_use]
    pub fn colour(&self) -> Colour {
        self.node.colour
    }

    /// Returns the left child, if present.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        Self::from_link(&self.node.left)
    }

    /// Returns the right child, if present.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        Self::from_link(&self.node.right)
    }

    /// Returns `true` if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Returns `true` if this node is red.
    #[must_use]
    pub fn is_red(&self) -> bool {
        self.node.is_red()
    }

    /// Returns `true` if this node is black.
    #[must_use]
    pub fn is_black(&self) -> bool {
        self.node.is_black()
    }

    /// Returns `true` if both handles point at the same physical node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use versioned_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::new().insert(2).unwrap();
    /// let first = tree.find(&2).unwrap();
    /// let second = tree.find(&2).unwrap();
    /// assert!(first.ptr_eq(&second));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.node, &other.node)
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeHandle<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeHandle")
            .field("value", &self.node.value)
            .field("colour", &self.node.colour)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
