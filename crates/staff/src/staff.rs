use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tradedesk_core::{AggregateId, AggregateRoot, DomainError, DomainResult, EventQueue};

use crate::events::{StaffCreated, StaffEvent, StaffStatusChanged};
use crate::phone::PhoneNumber;
use crate::policy::StaffPolicy;
use crate::role::Role;

/// Staff identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(pub AggregateId);

impl StaffId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for StaffId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Staff status lifecycle: `Active ⇄ Inactive → Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    Active,
    Inactive,
    Deleted,
}

/// Input for [`Staff::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaff {
    pub name: String,
    pub phone: PhoneNumber,
    pub roles: Vec<Role>,
    pub birthday: NaiveDate,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Partial update for [`Staff::update_information`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffInfo {
    pub name: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSnapshot {
    pub id: StaffId,
    pub name: String,
    pub phone: PhoneNumber,
    pub roles: Vec<Role>,
    pub status: StaffStatus,
    pub birthday: NaiveDate,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate root: Staff.
///
/// Copy-on-write: mutators leave `self` untouched and return a validated copy
/// with a fresh `updated_at`. Every status transition stages
/// `StaffStatusChanged`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staff {
    state: StaffSnapshot,
    events: EventQueue<StaffEvent>,
}

impl Staff {
    /// Register new staff as `Active` and stage `StaffCreated`.
    pub fn create(new: NewStaff) -> DomainResult<Self> {
        let now = Utc::now();
        let state = StaffSnapshot {
            id: StaffId::new(AggregateId::new()),
            name: new.name,
            phone: new.phone,
            roles: new.roles,
            status: StaffStatus::Active,
            birthday: new.birthday,
            email: new.email,
            address: new.address,
            note: new.note,
            created_at: now,
            updated_at: now,
        };

        let mut staff = Self::build(state, EventQueue::new())?;
        let created = StaffCreated {
            staff_id: staff.state.id,
            staff: staff.to_snapshot(),
            occurred_at: now,
        };
        staff.events.record(StaffEvent::StaffCreated(created));
        Ok(staff)
    }

    pub fn from_snapshot(snapshot: StaffSnapshot) -> DomainResult<Self> {
        Self::build(snapshot, EventQueue::new())
    }

    pub fn to_snapshot(&self) -> StaffSnapshot {
        self.state.clone()
    }

    pub fn id_typed(&self) -> StaffId {
        self.state.id
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.state.phone
    }

    pub fn roles(&self) -> &[Role] {
        &self.state.roles
    }

    pub fn has_role(&self, code: &str) -> bool {
        self.state.roles.iter().any(|r| r.code() == code)
    }

    pub fn status(&self) -> StaffStatus {
        self.state.status
    }

    pub fn is_active(&self) -> bool {
        self.state.status == StaffStatus::Active
    }

    pub fn birthday(&self) -> NaiveDate {
        self.state.birthday
    }

    pub fn email(&self) -> Option<&str> {
        self.state.email.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.state.address.as_deref()
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

impl AggregateRoot for Staff {
    type Id = StaffId;
    type Event = StaffEvent;

    fn id(&self) -> &Self::Id {
        &self.state.id
    }

    fn pending_events(&self) -> &[StaffEvent] {
        self.events.as_slice()
    }

    fn clear_events(&mut self) -> Vec<StaffEvent> {
        self.events.drain()
    }
}

impl Staff {
    pub fn update_information(&self, info: StaffInfo) -> DomainResult<Self> {
        self.evolve(|s| {
            if let Some(name) = info.name {
                s.name = name;
            }
            if let Some(phone) = info.phone {
                s.phone = phone;
            }
            if info.email.is_some() {
                s.email = info.email;
            }
            if info.address.is_some() {
                s.address = info.address;
            }
            if info.note.is_some() {
                s.note = info.note;
            }
        })
    }

    /// `None` or an empty name leaves the staff unchanged.
    pub fn update_name(&self, name: Option<&str>) -> DomainResult<Self> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(self.clone());
        };
        self.evolve(|s| s.name = name.to_string())
    }

    pub fn assign_role(&self, role: Role) -> DomainResult<Self> {
        if self.has_role(role.code()) {
            return Err(DomainError::validation(format!(
                "role {} is already assigned",
                role.code()
            )));
        }
        self.evolve(|s| s.roles.push(role))
    }

    pub fn remove_role(&self, code: &str) -> DomainResult<Self> {
        if !self.has_role(code) {
            return Err(DomainError::validation(format!(
                "role {code} is not assigned"
            )));
        }
        self.evolve(|s| s.roles.retain(|r| r.code() != code))
    }

    pub fn activate(&self, reason: Option<&str>) -> DomainResult<Self> {
        self.transition(StaffStatus::Active, reason)
    }

    pub fn deactivate(&self, reason: Option<&str>) -> DomainResult<Self> {
        self.transition(StaffStatus::Inactive, reason)
    }

    /// Terminal; the record is kept with status `Deleted`.
    pub fn delete(&self, reason: Option<&str>) -> DomainResult<Self> {
        self.transition(StaffStatus::Deleted, reason)
    }

    fn transition(&self, to: StaffStatus, reason: Option<&str>) -> DomainResult<Self> {
        let from = self.state.status;
        if from == to {
            return Err(DomainError::conflict(format!(
                "staff is already {}",
                status_label(to)
            )));
        }
        if from == StaffStatus::Deleted {
            return Err(DomainError::invariant("deleted staff cannot change status"));
        }

        let mut next = self.evolve(|s| s.status = to)?;
        next.events
            .record(StaffEvent::StaffStatusChanged(StaffStatusChanged {
                staff_id: self.state.id,
                from,
                to,
                reason: reason.map(str::to_string),
                occurred_at: next.state.updated_at,
            }));
        Ok(next)
    }

    fn evolve(&self, change: impl FnOnce(&mut StaffSnapshot)) -> DomainResult<Self> {
        let mut state = self.state.clone();
        change(&mut state);
        state.updated_at = Utc::now();
        Self::build(state, self.events.clone())
    }

    fn build(mut state: StaffSnapshot, events: EventQueue<StaffEvent>) -> DomainResult<Self> {
        state.name = StaffPolicy::validate_name(&state.name)?;
        if let Some(email) = &state.email {
            StaffPolicy::validate_email(email)?;
        }
        if let Some(note) = &state.note {
            StaffPolicy::validate_note(note)?;
        }

        let mut codes = HashSet::with_capacity(state.roles.len());
        for role in &state.roles {
            if !codes.insert(role.code()) {
                return Err(DomainError::validation(format!(
                    "role {} is listed more than once",
                    role.code()
                )));
            }
        }

        Ok(Self { state, events })
    }
}

fn status_label(status: StaffStatus) -> &'static str {
    match status {
        StaffStatus::Active => "active",
        StaffStatus::Inactive => "inactive",
        StaffStatus::Deleted => "deleted",
    }
}
