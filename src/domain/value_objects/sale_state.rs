use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Sale state as stored by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaleState {
    Waiting = 0,
    Listed = 1,
    Canceled = 2,
    Sold = 3,
}

impl TryFrom<i16> for SaleState {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SaleState::Waiting),
            1 => Ok(SaleState::Listed),
            2 => Ok(SaleState::Canceled),
            3 => Ok(SaleState::Sold),
            other => Err(DomainError::InvalidSaleState(other.to_string())),
        }
    }
}

/// Offer state as stored by the indexer. Only `Pending` matters for sales.
pub const OFFER_STATE_PENDING: i16 = 0;

/// Sale state as exposed by the API.
///
/// `Invalid` has no stored counterpart: it is a listed sale whose backing
/// offer is no longer pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum SaleApiState {
    Waiting = 0,
    Listed = 1,
    Canceled = 2,
    Sold = 3,
    Invalid = 4,
}

impl SaleApiState {
    pub const VALUES: &'static [&'static str] = &["0", "1", "2", "3", "4"];

    pub fn from_stored(sale_state: i16, offer_state: Option<i16>) -> Result<Self, DomainError> {
        Ok(match SaleState::try_from(sale_state)? {
            SaleState::Waiting => SaleApiState::Waiting,
            SaleState::Listed if offer_state == Some(OFFER_STATE_PENDING) => SaleApiState::Listed,
            SaleState::Listed => SaleApiState::Invalid,
            SaleState::Canceled => SaleApiState::Canceled,
            SaleState::Sold => SaleApiState::Sold,
        })
    }

    /// Stored state this API state is derived from.
    pub fn stored(self) -> SaleState {
        match self {
            SaleApiState::Waiting => SaleState::Waiting,
            SaleApiState::Listed | SaleApiState::Invalid => SaleState::Listed,
            SaleApiState::Canceled => SaleState::Canceled,
            SaleApiState::Sold => SaleState::Sold,
        }
    }
}

impl From<SaleApiState> for i16 {
    fn from(state: SaleApiState) -> Self {
        state as i16
    }
}

impl TryFrom<i16> for SaleApiState {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SaleApiState::Waiting),
            1 => Ok(SaleApiState::Listed),
            2 => Ok(SaleApiState::Canceled),
            3 => Ok(SaleApiState::Sold),
            4 => Ok(SaleApiState::Invalid),
            other => Err(DomainError::InvalidSaleState(other.to_string())),
        }
    }
}

impl std::str::FromStr for SaleApiState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: i16 = s
            .parse()
            .map_err(|_| DomainError::InvalidSaleState(s.to_string()))?;

        Self::try_from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_with_pending_offer() {
        let state = SaleApiState::from_stored(1, Some(OFFER_STATE_PENDING)).unwrap();
        assert_eq!(state, SaleApiState::Listed);
    }

    #[test]
    fn test_listed_with_dead_offer_is_invalid() {
        assert_eq!(
            SaleApiState::from_stored(1, Some(2)).unwrap(),
            SaleApiState::Invalid
        );
        assert_eq!(
            SaleApiState::from_stored(1, None).unwrap(),
            SaleApiState::Invalid
        );
    }

    #[test]
    fn test_unknown_stored_state() {
        assert!(SaleApiState::from_stored(9, None).is_err());
    }

    #[test]
    fn test_stored_state_round_trip() {
        assert_eq!(SaleApiState::Invalid.stored(), SaleState::Listed);
        assert_eq!(SaleApiState::Sold.stored() as i16, 3);
        assert!(SaleState::try_from(4).is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&SaleApiState::Sold).unwrap();
        assert_eq!(json, "3");
    }
}
