use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    #[must_use]
    pub fn to_proportion(self) -> f64 {
        0.01 * self.0
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
