//! Party ids for the three-party ring.

use thiserror::Error;

/// An enum representing the party id.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Hash)]
pub enum PartyID {
    /// Party 0
    ID0 = 0,
    /// Party 1
    ID1 = 1,
    /// Party 2
    ID2 = 2,
}

/// Error for ids outside of `0..3`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid party id: {0}, expected (0,1,2)")]
pub struct InvalidPartyId(pub usize);

impl PartyID {
    /// Returns the id of the next party in the ring (`self + 1 mod 3`).
    pub fn next_id(&self) -> Self {
        match *self {
            PartyID::ID0 => PartyID::ID1,
            PartyID::ID1 => PartyID::ID2,
            PartyID::ID2 => PartyID::ID0,
        }
    }

    /// Returns the id of the previous party in the ring (`self + 2 mod 3`).
    pub fn prev_id(&self) -> Self {
        match *self {
            PartyID::ID0 => PartyID::ID2,
            PartyID::ID1 => PartyID::ID0,
            PartyID::ID2 => PartyID::ID1,
        }
    }
}

impl TryFrom<usize> for PartyID {
    type Error = InvalidPartyId;

    fn try_from(other: usize) -> Result<Self, Self::Error> {
        match other {
            0 => Ok(PartyID::ID0),
            1 => Ok(PartyID::ID1),
            2 => Ok(PartyID::ID2),
            i => Err(InvalidPartyId(i)),
        }
    }
}

impl From<PartyID> for usize {
    #[inline(always)]
    fn from(other: PartyID) -> Self {
        other as usize
    }
}

impl std::fmt::Display for PartyID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as usize)
    }
}
