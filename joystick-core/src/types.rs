//! Core joystick types: PortId, Direction, JoystickReport.

/// Identifies one of the two physical DB9 joystick ports.
///
/// Each port is an independent logical report channel on the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortId {
    One,
    Two,
}

impl PortId {
    /// Both ports, in dispatch order. Port 1 is always processed first so
    /// that traces are reproducible.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Zero-based index for table lookups.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Eight compass directions plus center, as reported to the host.
///
/// The wire encoding counts clockwise from north: 0 = center, 1 = N, 2 = NE,
/// 3 = E, 4 = SE, 5 = S, 6 = SW, 7 = W, 8 = NW.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Encode the four directional line states of one port.
    ///
    /// Up is tested before Down, and within the chosen vertical Right before
    /// Left. An opposite-pair fault (both Up and Down asserted) therefore
    /// reads as the first-tested axis: Up+Down gives North, Up+Right gives
    /// the NE diagonal. The mapping is total over all 16 combinations.
    #[must_use]
    pub const fn from_lines(up: bool, down: bool, left: bool, right: bool) -> Self {
        if up {
            if right {
                Self::NorthEast
            } else if left {
                Self::NorthWest
            } else {
                Self::North
            }
        } else if down {
            if right {
                Self::SouthEast
            } else if left {
                Self::SouthWest
            } else {
                Self::South
            }
        } else if right {
            Self::East
        } else if left {
            Self::West
        } else {
            Self::Center
        }
    }

    /// Wire code (0-8).
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Center => 0,
            Self::North => 1,
            Self::NorthEast => 2,
            Self::East => 3,
            Self::SouthEast => 4,
            Self::South => 5,
            Self::SouthWest => 6,
            Self::West => 7,
            Self::NorthWest => 8,
        }
    }
}

/// The (direction, button) pair transmitted to the host for one port.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    pub direction: Direction,
    pub button: bool,
}

impl JoystickReport {
    /// Size of the wire payload in bytes.
    pub const SIZE: usize = 2;

    /// Report with the stick centered and the button released.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            direction: Direction::Center,
            button: false,
        }
    }

    /// Wire payload: direction code, then the button mask (bit 0).
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; Self::SIZE] {
        [self.direction.code(), self.button as u8]
    }
}
