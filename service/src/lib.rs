//! Service contains the business logic of the parking lot.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use common::{money::Currency, Money};
use rust_decimal::Decimal;
use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Database;

use self::domain::{vehicle, Tariff};
pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// [`Tariff`] to bill parked vehicles with.
    #[default(default_tariff())]
    pub tariff: Tariff,

    /// Total number of parking spaces.
    #[default(50)]
    pub capacity: usize,
}

/// Returns the [`Tariff`] with the standard hourly rates in Colombian pesos.
fn default_tariff() -> Tariff {
    Tariff::new(
        [
            (vehicle::Class::Moto, 2000),
            (vehicle::Class::Carro, 3500),
            (vehicle::Class::Camioneta, 4000),
        ]
        .map(|(class, amount)| {
            (
                class,
                Money {
                    amount: Decimal::from(amount),
                    currency: Currency::Cop,
                },
            )
        }),
    )
    .unwrap_or_else(|e| unreachable!("standard rates are valid: {e}"))
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }
}
