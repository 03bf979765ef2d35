//! Domain definitions.

pub mod charge;
pub mod vehicle;

pub use self::{
    charge::{Charge, Stay, Tariff},
    vehicle::Vehicle,
};
