//! Staff domain events.

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradedesk_events::DomainEvent;

use crate::staff::{StaffId, StaffSnapshot, StaffStatus};

pub const STAFF_CREATED: &str = "staff.staff.created";
pub const STAFF_STATUS_CHANGED: &str = "staff.staff.status_changed";

/// Event: StaffCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffCreated {
    pub staff_id: StaffId,
    pub staff: StaffSnapshot,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StaffStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffStatusChanged {
    pub staff_id: StaffId,
    pub from: StaffStatus,
    pub to: StaffStatus,
    /// Optional human-readable reason for the change.
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffEvent {
    StaffCreated(StaffCreated),
    StaffStatusChanged(StaffStatusChanged),
}

impl StaffEvent {
    pub fn staff_id(&self) -> StaffId {
        match self {
            StaffEvent::StaffCreated(e) => e.staff_id,
            StaffEvent::StaffStatusChanged(e) => e.staff_id,
        }
    }
}

impl DomainEvent for StaffEvent {
    fn event_type(&self) -> &str {
        match self {
            StaffEvent::StaffCreated(_) => STAFF_CREATED,
            StaffEvent::StaffStatusChanged(_) => STAFF_STATUS_CHANGED,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StaffEvent::StaffCreated(e) => e.occurred_at,
            StaffEvent::StaffStatusChanged(e) => e.occurred_at,
        }
    }

    fn aggregate_id(&self) -> String {
        self.staff_id().to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
