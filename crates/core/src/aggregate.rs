//! Aggregate root trait for state-stored domain models.

/// Aggregate root marker + minimal interface.
///
/// This is intentionally small so domain modules can decide how they model
/// state transitions without bringing in any infrastructure concerns.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Increases by one per recorded mutation. Persistence adapters use this
    /// for optimistic concurrency: a save whose version does not advance past
    /// the stored version is a stale read-modify-write and must be rejected.
    fn version(&self) -> u64;
}
