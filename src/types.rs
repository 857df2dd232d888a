//! Common types used throughout the contact aggregator
//!
//! This module contains the contact record shapes shared by the upstream
//! client, the aggregator, and the listing service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Contact Source
// ============================================================================

/// Origin label attached to every aggregated contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactSource {
    /// The Kenect Labs contacts API
    #[default]
    KenectLabs,
}

impl ContactSource {
    /// Every recognized source, in declaration order
    pub const ALL: &'static [ContactSource] = &[ContactSource::KenectLabs];

    /// Wire value of this source
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactSource::KenectLabs => "KENECT_LABS",
        }
    }

    /// Comma-separated list of all wire values
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(ContactSource::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ContactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|source| source.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Valid values are: {}", Self::valid_values()))
    }
}

// ============================================================================
// Upstream Contact
// ============================================================================

/// Raw contact as returned by the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpstreamContact {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Contact Record
// ============================================================================

/// Contact as served to callers, tagged with its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub source: ContactSource,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContactRecord {
    /// Map an upstream contact into a record from the given source
    pub fn from_upstream(contact: UpstreamContact, source: ContactSource) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            source,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}
