use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradedesk_core::policy::{require_present, require_upper_alnum};
use tradedesk_core::{AggregateId, AggregateRoot, DomainError, DomainResult};

use crate::party::{BaseParty, PartyId};

/// Trading status. Only active parties can transact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    Active,
    Inactive,
}

/// Whether prices quoted to this party include VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    VatIncluded,
    VatExcluded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTradingParty {
    pub base_party_id: PartyId,
    pub code: String,
    pub name: String,
    pub price_policy: String,
    pub price_type: PriceType,
    pub status: PartyStatus,
}

impl NewTradingParty {
    /// Terms for `party`, reusing its code and name.
    pub fn for_party(party: &BaseParty, price_policy: &str, price_type: PriceType) -> Self {
        Self {
            base_party_id: party.id_typed(),
            code: party.code().to_string(),
            name: party.name().to_string(),
            price_policy: price_policy.to_string(),
            price_type,
            status: PartyStatus::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPartySnapshot {
    pub id: PartyId,
    pub base_party_id: PartyId,
    pub code: String,
    pub name: String,
    pub price_policy: String,
    pub price_type: PriceType,
    pub status: PartyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate root: TradingParty.
///
/// Copy-on-write like the other aggregates. It stages no domain events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingParty {
    state: TradingPartySnapshot,
}

impl TradingParty {
    pub fn create(new: NewTradingParty) -> DomainResult<Self> {
        let now = Utc::now();
        Self::of(TradingPartySnapshot {
            id: PartyId::new(AggregateId::new()),
            base_party_id: new.base_party_id,
            code: new.code,
            name: new.name,
            price_policy: new.price_policy,
            price_type: new.price_type,
            status: new.status,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn of(state: TradingPartySnapshot) -> DomainResult<Self> {
        if state.id == state.base_party_id {
            return Err(DomainError::invariant(
                "a trading party cannot be its own base party",
            ));
        }
        require_present(&state.code, "party code")?;
        require_upper_alnum(&state.code, "party code")?;
        require_present(&state.name, "party name")?;
        require_present(&state.price_policy, "price policy")?;
        Ok(Self { state })
    }

    pub fn to_snapshot(&self) -> TradingPartySnapshot {
        self.state.clone()
    }

    pub fn id_typed(&self) -> PartyId {
        self.state.id
    }

    pub fn base_party_id(&self) -> PartyId {
        self.state.base_party_id
    }

    pub fn code(&self) -> &str {
        &self.state.code
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn price_policy(&self) -> &str {
        &self.state.price_policy
    }

    pub fn price_type(&self) -> PriceType {
        self.state.price_type
    }

    pub fn status(&self) -> PartyStatus {
        self.state.status
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.updated_at
    }

    pub fn can_transact(&self) -> bool {
        self.state.status == PartyStatus::Active
    }

    pub fn activate(&self) -> DomainResult<Self> {
        self.with_status(PartyStatus::Active)
    }

    pub fn deactivate(&self) -> DomainResult<Self> {
        self.with_status(PartyStatus::Inactive)
    }

    pub fn change_price_terms(&self, price_policy: &str, price_type: PriceType) -> DomainResult<Self> {
        let mut state = self.state.clone();
        state.price_policy = price_policy.to_string();
        state.price_type = price_type;
        state.updated_at = Utc::now();
        Self::of(state)
    }

    fn with_status(&self, status: PartyStatus) -> DomainResult<Self> {
        if self.state.status == status {
            return Err(DomainError::conflict(format!(
                "trading party is already {}",
                match status {
                    PartyStatus::Active => "active",
                    PartyStatus::Inactive => "inactive",
                }
            )));
        }
        let mut state = self.state.clone();
        state.status = status;
        state.updated_at = Utc::now();
        Self::of(state)
    }
}

impl AggregateRoot for TradingParty {
    type Id = PartyId;
    type Event = Infallible;

    fn id(&self) -> &Self::Id {
        &self.state.id
    }

    fn pending_events(&self) -> &[Infallible] {
        &[]
    }

    fn clear_events(&mut self) -> Vec<Infallible> {
        Vec::new()
    }
}
