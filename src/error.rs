use crate::core::{Location, Period};

/// Everything that can go wrong while estimating a bill.
///
/// None of these are transient: the calculation is aborted and the error is handed back as is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TariffError {
    #[error("unsupported location `{0}`, expected one of: Modesto, Merced, PG&E")]
    UnsupportedLocation(String),

    #[error("unsupported season `{0}`, expected `summer` or `winter`")]
    UnsupportedSeason(String),

    #[error("unsupported subscription type `{0}`, expected one of: BEV-2-S, BEV-1, BEV-2-P")]
    UnsupportedSubscriptionType(String),

    #[error("unknown time-of-use period `{0}`")]
    UnknownPeriod(String),

    #[error("malformed session distribution entry `{0}`, expected `period=fraction`")]
    MalformedDistribution(String),

    #[error("session distribution has no `{0}` period")]
    MissingDistributionKey(Period),

    #[error("`{0}` is listed more than once in the session distribution")]
    DuplicatePeriod(Period),

    #[error("fraction {fraction} of `{period}` sessions is outside of [0, 1]")]
    InvalidFraction { period: Period, fraction: f64 },

    #[error("invalid `{field}` parameter: {value}")]
    InvalidParameter { field: &'static str, value: f64 },

    #[error("worst case is requested, but the number of installed chargers is not configured")]
    UnknownInstalledChargers,

    #[error("{parameters} parameters cannot be billed by {location}")]
    LocationMismatch { location: Location, parameters: Location },

    #[error("invalid `{field}` in the {plan} rate plan: {value}")]
    InvalidRate { plan: String, field: &'static str, value: f64 },
}
