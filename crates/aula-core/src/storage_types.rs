use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage provider that owns an asset.
///
/// Known at dispatch time for every new upload and persisted next to the
/// reference. Only legacy records need it re-derived from the reference shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProviderId {
    /// CDN-backed object store (images)
    #[serde(rename = "cdn")]
    Cdn,
    /// Application-local file store (documents, legacy assets)
    #[serde(rename = "local")]
    LocalStore,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Cdn => "cdn",
            ProviderId::LocalStore => "local",
        }
    }
}

impl FromStr for ProviderId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cdn" => Ok(ProviderId::Cdn),
            "local" | "local-store" | "localstore" => Ok(ProviderId::LocalStore),
            _ => Err(anyhow::anyhow!("Invalid storage provider: {}", s)),
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
