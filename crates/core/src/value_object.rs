//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `Money` is the
/// canonical example in this workspace: `Money::from_cents(250)` is equal to
/// any other `Money::from_cents(250)`, and "changing" an amount produces a new
/// value rather than mutating the old one.
///
/// ```ignore
/// let a = Money::from_cents(250);
/// let b = Money::parse("2.50")?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
