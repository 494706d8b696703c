use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Currency symbol as used by exchange balance queries, eg/ "KAS", "USDT".
#[derive(
    Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct AssetName(SmolStr);

impl AssetName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for AssetName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for AssetName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
