use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Cost, rate::KilowattRate};

pub type Kilowatts = Quantity<f64, 1, 0, 0>;

impl Kilowatts {
    /// How many whole `block`s fit into the power.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn whole_blocks_of(self, block: Self) -> u32 {
        (self.0 / block.0).floor() as u32
    }
}

impl Display for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0} kW", self.0)
    }
}

impl Debug for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}kW", self.0)
    }
}

impl Mul<KilowattRate> for Kilowatts {
    type Output = Cost;

    fn mul(self, rhs: KilowattRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_blocks_of() {
        assert_eq!(Kilowatts::from(150.0).whole_blocks_of(Kilowatts::from(10.0)), 15);
        assert_eq!(Kilowatts::from(150.0).whole_blocks_of(Kilowatts::from(50.0)), 3);
        assert_eq!(Kilowatts::from(150.0).whole_blocks_of(Kilowatts::from(40.0)), 3);
        assert_eq!(Kilowatts::from(150.0).whole_blocks_of(Kilowatts::from(200.0)), 0);
    }
}
