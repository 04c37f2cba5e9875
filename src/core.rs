mod demand;
mod distribution;
mod location;
mod period;
mod season;

pub(crate) use self::demand::ensure_positive;
pub use self::{
    demand::{SessionProfile, Site},
    distribution::SessionDistribution,
    location::Location,
    period::Period,
    season::Season,
};
