use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// which catalog a movie id belongs to, ids are only unique within one of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum MovieType {
    /// external catalog (tmdb ids)
    Tmdb,
    /// regional kurdish catalog hosted by us
    Kurdish,
}

impl MovieType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tmdb => "tmdb",
            Self::Kurdish => "kurdish",
        }
    }
}

impl fmt::Display for MovieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tmdb" => Ok(Self::Tmdb),
            "kurdish" => Ok(Self::Kurdish),
            other => Err(format!("unknown movie type '{}'", other)),
        }
    }
}
