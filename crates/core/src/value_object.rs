//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Two
/// instances holding the same values are interchangeable, unlike entities whose
/// identity decides equality.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
