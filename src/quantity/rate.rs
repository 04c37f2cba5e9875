use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Dollars per kilowatt-hour, the energy charge.
pub type KilowattHourRate = Quantity<f64, -1, -1, 1>;

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.5}/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:?}/kWh", self.0)
    }
}

/// Dollars per kilowatt of peak demand, the demand charge and overage fee.
pub type KilowattRate = Quantity<f64, -1, 0, 1>;

impl Display for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}/kW", self.0)
    }
}

impl Debug for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:?}/kW", self.0)
    }
}
