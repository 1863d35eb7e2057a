//! Line sampler trait and snapshot types.

/// Raw levels of one port's five lines, in asserted polarity.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub button: bool,
}

/// One sample of all ten input lines, taken in a single poll.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub ports: [PortSnapshot; 2],
}

/// Source of raw line samples.
///
/// Implementations read the electrical level of all ten lines in one go and
/// convert the active-low pad levels into asserted-high booleans, so the
/// engine never deals in electrical conventions.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap
/// allocation.
pub trait LineSampler {
    /// Take one snapshot of every line's current raw level.
    fn sample(&mut self) -> Snapshot;
}
