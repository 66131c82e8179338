//! Model value object naming the remote text-generation model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Remote models the gateway can address (Value Object)
///
/// Unknown identifiers are preserved verbatim in [`Model::Custom`] so a newer
/// model can be selected from configuration without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Claude35Sonnet,
    Claude35Haiku,
    Claude3Opus,
    Claude3Haiku,
    Custom(String),
}

impl Model {
    /// Get the wire identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Claude35Sonnet => "claude-3-5-sonnet-20240620",
            Model::Claude35Haiku => "claude-3-5-haiku-20241022",
            Model::Claude3Opus => "claude-3-opus-20240229",
            Model::Claude3Haiku => "claude-3-haiku-20240307",
            Model::Custom(s) => s,
        }
    }

    /// Models known to this build, in display order
    pub fn known_models() -> Vec<Model> {
        vec![
            Model::Claude35Sonnet,
            Model::Claude35Haiku,
            Model::Claude3Opus,
            Model::Claude3Haiku,
        ]
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Claude35Sonnet
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "claude-3-5-sonnet-20240620" | "sonnet" => Model::Claude35Sonnet,
            "claude-3-5-haiku-20241022" => Model::Claude35Haiku,
            "claude-3-opus-20240229" | "opus" => Model::Claude3Opus,
            "claude-3-haiku-20240307" | "haiku" => Model::Claude3Haiku,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
