//! Rate plans and the bill calculation of every supported utility.

pub mod merced;
pub mod modesto;
pub mod pge;

use serde::{Deserialize, Serialize};

use crate::{core::Season, error::TariffError};

/// Seasonal variants of a rate plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonalRates<P> {
    pub summer: P,
    pub winter: P,
}

impl<P> SeasonalRates<P> {
    pub const fn get(&self, season: Season) -> &P {
        match season {
            Season::Summer => &self.summer,
            Season::Winter => &self.winter,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Season, &P)> {
        [(Season::Summer, &self.summer), (Season::Winter, &self.winter)].into_iter()
    }
}

/// Rates and charges must be finite and non-negative.
fn ensure_rate(plan: &str, field: &'static str, value: f64) -> Result<(), TariffError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TariffError::InvalidRate { plan: plan.to_owned(), field, value })
    }
}
