//! Label primitives shared across the spreading passes.

use core::fmt;

/// Cluster label carried by each point in the dataset.
///
/// Label `0` is reserved for "unlabelled"; positive values identify regions
/// discovered by the second spreading pass.
///
/// # Examples
/// ```
/// use otoro_core::Label;
///
/// let label = Label::new(3);
/// assert_eq!(label.get(), 3);
/// assert!(!label.is_unlabelled());
/// assert!(Label::UNLABELLED.is_unlabelled());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Label(u32);

impl Label {
    /// The reserved "no label assigned yet" value.
    pub const UNLABELLED: Self = Self(0);

    /// Creates a new label.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the underlying numeric label.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    /// Returns whether the label is the reserved unlabelled value.
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_unlabelled(self) -> bool { self.0 == 0 }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
