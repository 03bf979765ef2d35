//! [`Config`]-related definitions.

use common::{money::Currency, Money};
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use rust_decimal::Decimal;
use serde::Deserialize;
use service::domain::{charge::TariffError, vehicle, Tariff};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Parking lot configuration.
    pub parking: Parking,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Parking lot configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Parking {
    /// Total number of parking spaces.
    #[default(50)]
    pub capacity: usize,

    /// [`Currency`] of the hourly rates.
    #[default(Currency::Cop)]
    pub currency: Currency,

    /// Hourly rates per vehicle class.
    pub rates: Rates,
}

impl TryFrom<Parking> for service::Config {
    type Error = TariffError;

    fn try_from(value: Parking) -> Result<Self, Self::Error> {
        let Parking {
            capacity,
            currency,
            rates:
                Rates {
                    moto,
                    carro,
                    camioneta,
                },
        } = value;

        let tariff = Tariff::new(
            [
                (vehicle::Class::Moto, moto),
                (vehicle::Class::Carro, carro),
                (vehicle::Class::Camioneta, camioneta),
            ]
            .map(|(class, amount)| {
                (class, Money { amount, currency })
            }),
        )?;

        Ok(Self { tariff, capacity })
    }
}

/// Hourly rates per vehicle class.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Rates {
    /// Hourly rate of a motorcycle.
    #[default(Decimal::from(2000))]
    pub moto: Decimal,

    /// Hourly rate of a car.
    #[default(Decimal::from(3500))]
    pub carro: Decimal,

    /// Hourly rate of a pickup truck or van.
    #[default(Decimal::from(4000))]
    pub camioneta: Decimal,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;
    use service::domain::vehicle::Class;

    use super::{Config, Parking, Rates};

    #[test]
    fn defaults_without_file() {
        let config = Config::new("definitely/missing/config").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.parking.capacity, 50);
        assert_eq!(config.parking.currency, Currency::Cop);
        assert_eq!(
            tracing::Level::from(config.log.level),
            tracing::Level::INFO,
        );
    }

    #[test]
    fn converts_into_service_config() {
        let config = service::Config::try_from(Parking {
            capacity: 10,
            currency: Currency::Usd,
            rates: Rates {
                moto: Decimal::from(1),
                ..Rates::default()
            },
        })
        .unwrap();

        assert_eq!(config.capacity, 10);
        assert_eq!(
            config.tariff.rate(Class::Moto),
            Some(Money {
                amount: Decimal::from(1),
                currency: Currency::Usd,
            }),
        );
        assert_eq!(
            config.tariff.rate(Class::Camioneta),
            Some(Money {
                amount: Decimal::from(4000),
                currency: Currency::Usd,
            }),
        );
    }

    #[test]
    fn rejects_negative_rates() {
        let parking = Parking {
            rates: Rates {
                carro: Decimal::from(-1),
                ..Rates::default()
            },
            ..Parking::default()
        };

        assert!(service::Config::try_from(parking).is_err());
    }
}
