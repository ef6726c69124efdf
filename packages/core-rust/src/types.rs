//! Resource identity types.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identity of one monitored resource: the agent that hosts it plus its
/// local id, with a derived display key.
///
/// Resources come from two places -- backend discovery, or keys typed in
/// by a user -- but both collapse into this one flat value. The engine
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    /// Id of the agent hosting the resource.
    pub agent_id: i32,
    /// Resource id local to the agent.
    pub resource_id: i32,
    /// Display identity, `"{agent_id}/{resource_id}"`.
    pub key: String,
}

impl ResourceRef {
    /// Creates a reference for a discovered resource, deriving the key.
    #[must_use]
    pub fn new(agent_id: i32, resource_id: i32) -> Self {
        Self {
            agent_id,
            resource_id,
            key: format!("{agent_id}/{resource_id}"),
        }
    }

    /// Parses a user-supplied `"agent/resource"` key.
    ///
    /// Tolerates surrounding whitespace. Returns `None` for anything that
    /// is not exactly two integer parts.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let trimmed = key.trim();
        let (agent, resource) = trimmed.split_once('/')?;
        let agent_id: i32 = agent.trim().parse().ok()?;
        let resource_id: i32 = resource.trim().parse().ok()?;
        Some(Self {
            agent_id,
            resource_id,
            key: trimmed.to_string(),
        })
    }

    /// Parses a `,`- or `;`-separated list of resource keys.
    ///
    /// Malformed entries are logged and skipped; blank entries are
    /// ignored silently. Input order is preserved.
    #[must_use]
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split([',', ';'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let parsed = Self::parse(entry);
                if parsed.is_none() {
                    warn!(entry = %entry, "invalid resource key, expected 'agent/resource'");
                }
                parsed
            })
            .collect()
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
