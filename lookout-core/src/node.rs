//! Graph node types.
//!
//! A `GraphNode` is one entity of the explore graph as the host hands it
//! to us: a user, computer, group, tenant and so on. Nodes are read-only
//! here. Every field is always present; missing JSON fields become empty
//! strings so the matcher never has to care about absence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Mapping of node id to node, as supplied by the host.
///
/// Keys are unique. Iteration order carries no meaning; search results
/// are always sorted.
pub type GraphNodes = HashMap<String, GraphNode>;

/// The type tag of a node.
///
/// Only used to pick an icon. Tags we don't know are kept verbatim in
/// `Unknown` so nothing is lost on a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    #[default]
    Base,
    User,
    Computer,
    Group,
    Gpo,
    Ou,
    Container,
    Domain,
    LocalGroup,
    LocalUser,
    CertTemplate,
    EnterpriseCa,
    AzUser,
    AzGroup,
    AzTenant,
    AzApp,
    AzServicePrincipal,
    AzDevice,
    AzRole,
    AzSubscription,
    AzResourceGroup,
    AzVm,
    AzKeyVault,
    Unknown(String),
}

impl NodeKind {
    /// Returns the schema tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Base => "Base",
            Self::User => "User",
            Self::Computer => "Computer",
            Self::Group => "Group",
            Self::Gpo => "GPO",
            Self::Ou => "OU",
            Self::Container => "Container",
            Self::Domain => "Domain",
            Self::LocalGroup => "ADLocalGroup",
            Self::LocalUser => "ADLocalUser",
            Self::CertTemplate => "CertTemplate",
            Self::EnterpriseCa => "EnterpriseCA",
            Self::AzUser => "AZUser",
            Self::AzGroup => "AZGroup",
            Self::AzTenant => "AZTenant",
            Self::AzApp => "AZApp",
            Self::AzServicePrincipal => "AZServicePrincipal",
            Self::AzDevice => "AZDevice",
            Self::AzRole => "AZRole",
            Self::AzSubscription => "AZSubscription",
            Self::AzResourceGroup => "AZResourceGroup",
            Self::AzVm => "AZVM",
            Self::AzKeyVault => "AZKeyVault",
            Self::Unknown(tag) => tag,
        }
    }

    /// A short glyph for list rendering.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::User | Self::LocalUser | Self::AzUser => "👤",
            Self::Group | Self::LocalGroup | Self::AzGroup => "👥",
            Self::Computer | Self::AzDevice | Self::AzVm => "🖥",
            Self::Domain | Self::AzTenant => "🌐",
            Self::Gpo => "📜",
            Self::Ou | Self::Container | Self::AzSubscription | Self::AzResourceGroup => "📁",
            Self::CertTemplate | Self::EnterpriseCa => "🔏",
            Self::AzApp | Self::AzServicePrincipal => "🧩",
            Self::AzRole => "🎭",
            Self::AzKeyVault => "🔑",
            Self::Base | Self::Unknown(_) => "•",
        }
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        match tag {
            "Base" => Self::Base,
            "User" => Self::User,
            "Computer" => Self::Computer,
            "Group" => Self::Group,
            "GPO" => Self::Gpo,
            "OU" => Self::Ou,
            "Container" => Self::Container,
            "Domain" => Self::Domain,
            "ADLocalGroup" => Self::LocalGroup,
            "ADLocalUser" => Self::LocalUser,
            "CertTemplate" => Self::CertTemplate,
            "EnterpriseCA" => Self::EnterpriseCa,
            "AZUser" => Self::AzUser,
            "AZGroup" => Self::AzGroup,
            "AZTenant" => Self::AzTenant,
            "AZApp" => Self::AzApp,
            "AZServicePrincipal" => Self::AzServicePrincipal,
            "AZDevice" => Self::AzDevice,
            "AZRole" => Self::AzRole,
            "AZSubscription" => Self::AzSubscription,
            "AZResourceGroup" => Self::AzResourceGroup,
            "AZVM" => Self::AzVm,
            "AZKeyVault" => Self::AzKeyVault,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Unknown(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node of the explore graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Display name. May be empty.
    #[serde(default)]
    pub label: String,

    /// Type tag, used for the icon only.
    #[serde(default)]
    pub kind: NodeKind,

    /// Secondary identifier (SID, GUID, tenant id...). Searchable.
    #[serde(default)]
    pub object_id: String,

    /// Highest-privilege asset flag. Carried, never filtered on.
    #[serde(default)]
    pub is_tier_zero: bool,

    /// Last collection timestamp as served. Carried, never filtered on.
    #[serde(default)]
    pub last_seen: String,
}

impl GraphNode {
    /// Creates a node with the given label, kind and object id.
    pub fn new(
        label: impl Into<String>,
        kind: impl Into<NodeKind>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            kind: kind.into(),
            object_id: object_id.into(),
            is_tier_zero: false,
            last_seen: String::new(),
        }
    }

    /// Marks the node as tier zero.
    pub fn with_tier_zero(mut self, tier_zero: bool) -> Self {
        self.is_tier_zero = tier_zero;
        self
    }

    /// Sets the last-seen timestamp.
    pub fn with_last_seen(mut self, last_seen: impl Into<String>) -> Self {
        self.last_seen = last_seen.into();
        self
    }

    /// The text shown for this node: the label, or the object id when the
    /// label is empty.
    pub fn display_text(&self) -> &str {
        if self.label.is_empty() {
            &self.object_id
        } else {
            &self.label
        }
    }

    /// Parses `last_seen` as an RFC 3339 timestamp.
    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        if self.last_seen.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(&self.last_seen)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}
