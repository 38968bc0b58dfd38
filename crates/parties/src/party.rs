use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradedesk_core::policy::{require_max_chars, require_present, require_upper_alnum};
use tradedesk_core::{AggregateId, DomainResult, Entity};
use tradedesk_staff::{PhoneNumber, StaffPolicy};

pub const MAX_PARTY_NAME_LEN: usize = 100;

/// Party identifier, shared by base and trading records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(pub AggregateId);

impl PartyId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PartyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    Individual,
    Organization,
}

/// Input for [`BaseParty::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParty {
    pub code: String,
    pub name: String,
    pub party_type: PartyType,
    pub phone: PhoneNumber,
    pub alias: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub business_number: Option<String>,
    pub business_type: Option<String>,
    pub note: Option<String>,
}

/// Persisted form of a [`BaseParty`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub id: PartyId,
    pub code: String,
    pub name: String,
    pub party_type: PartyType,
    pub phone: PhoneNumber,
    pub alias: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub business_number: Option<String>,
    pub business_type: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who a business partner is: identity and contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseParty {
    state: PartySnapshot,
}

impl BaseParty {
    pub fn create(new: NewParty) -> DomainResult<Self> {
        let now = Utc::now();
        Self::of(PartySnapshot {
            id: PartyId::new(AggregateId::new()),
            code: new.code,
            name: new.name,
            party_type: new.party_type,
            phone: new.phone,
            alias: new.alias,
            address: new.address,
            email: new.email,
            business_number: new.business_number,
            business_type: new.business_type,
            note: new.note,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild from stored state; validated like `create`.
    pub fn of(mut state: PartySnapshot) -> DomainResult<Self> {
        require_present(&state.code, "party code")?;
        require_upper_alnum(&state.code, "party code")?;
        state.name = require_present(&state.name, "party name")?.trim().to_string();
        require_max_chars(&state.name, MAX_PARTY_NAME_LEN, "party name")?;
        if let Some(email) = &state.email {
            StaffPolicy::validate_email(email)?;
        }
        if let Some(note) = &state.note {
            StaffPolicy::validate_note(note)?;
        }
        Ok(Self { state })
    }

    pub fn to_snapshot(&self) -> PartySnapshot {
        self.state.clone()
    }

    pub fn id_typed(&self) -> PartyId {
        self.state.id
    }

    pub fn code(&self) -> &str {
        &self.state.code
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn party_type(&self) -> PartyType {
        self.state.party_type
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.state.phone
    }

    pub fn alias(&self) -> Option<&str> {
        self.state.alias.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.state.address.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.state.email.as_deref()
    }

    pub fn business_number(&self) -> Option<&str> {
        self.state.business_number.as_deref()
    }

    pub fn business_type(&self) -> Option<&str> {
        self.state.business_type.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.state.note.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.updated_at
    }
}

impl Entity for BaseParty {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.state.id
    }
}
