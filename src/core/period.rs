use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::TariffError;

/// Time-of-use pricing window.
///
/// The municipal tariffs use the `on_peak` family, the PG&E subscription uses `peak` and
/// `super_off_peak`. `off_peak` is shared.
#[derive(Debug, Hash, PartialOrd, Ord, Serialize, Deserialize, enumset::EnumSetType)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    OnPeak,
    PartialPeak,
    OffPeak,
    Peak,
    SuperOffPeak,
}

impl Period {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnPeak => "on_peak",
            Self::PartialPeak => "partial_peak",
            Self::OffPeak => "off_peak",
            Self::Peak => "peak",
            Self::SuperOffPeak => "super_off_peak",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on_peak" => Ok(Self::OnPeak),
            "partial_peak" => Ok(Self::PartialPeak),
            "off_peak" => Ok(Self::OffPeak),
            "peak" => Ok(Self::Peak),
            "super_off_peak" => Ok(Self::SuperOffPeak),
            _ => Err(TariffError::UnknownPeriod(s.trim().to_owned())),
        }
    }
}
