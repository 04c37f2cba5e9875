use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::TariffError;

#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Summer,
    Winter,
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Summer => "summer",
            Self::Winter => "winter",
        })
    }
}

impl FromStr for Season {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summer" => Ok(Self::Summer),
            "winter" => Ok(Self::Winter),
            _ => Err(TariffError::UnsupportedSeason(s.to_owned())),
        }
    }
}
