use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradedesk_core::{DomainError, DomainResult};

use crate::policy::RolePolicy;

/// A role that can be assigned to staff. Identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoleRecord")]
pub struct Role {
    code: String,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RoleRecord {
    code: String,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoleRecord> for Role {
    type Error = DomainError;

    fn try_from(r: RoleRecord) -> Result<Self, Self::Error> {
        Role::of(r.code, r.name, r.description, r.created_at, r.updated_at)
    }
}

impl Role {
    pub fn create(code: &str, name: &str, description: Option<&str>) -> DomainResult<Self> {
        let now = Utc::now();
        Self::of(
            code.to_string(),
            name.to_string(),
            description.map(str::to_string),
            now,
            now,
        )
    }

    /// Rebuild a stored role; validated like `create`.
    pub fn of(
        code: String,
        name: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let code = RolePolicy::validate_code(&code)?;
        let name = RolePolicy::validate_name(&name)?;
        let description = description
            .as_deref()
            .map(RolePolicy::validate_description)
            .transpose()?;

        Ok(Self {
            code,
            name,
            description,
            created_at,
            updated_at,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
