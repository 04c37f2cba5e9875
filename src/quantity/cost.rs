use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// US dollars.
pub type Cost = Quantity<f64, 0, 0, 1>;

impl Cost {
    /// Round the cost to whole cents, for presentation only.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_abs_diff_eq!(Cost::from(51_758.455_1).round_to_cents().0, 51_758.46);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::from(39_902.1).to_string(), "$39902.10");
    }
}
