#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod catalog;
pub mod core;
pub mod error;
pub mod estimator;
pub mod prelude;
pub mod quantity;
pub mod tariff;

pub use self::{
    catalog::{RateCatalog, RateSchedule},
    error::TariffError,
    estimator::{CostBreakdown, Estimator, Parameters},
};
