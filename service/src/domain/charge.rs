//! Parking fee calculation.
//!
//! A [`Stay`] is billed in [`FRACTION_MINUTES`]-long fractions of the hourly
//! rate of the [`Tariff`]. Any started fraction is billed as a whole one,
//! while a zero-length [`Stay`] consumes no fractions at all.

use std::{collections::HashMap, fmt, time::Duration};

#[cfg(doc)]
use common::money::Currency;
use common::{DateTimeOf, Money};
use derive_more::{Display, Error};
use rust_decimal::{Decimal, RoundingStrategy};

use super::vehicle::Class;

/// Length of a single billable fraction, in minutes.
pub const FRACTION_MINUTES: u64 = 15;

/// Number of billable fractions in an hour.
const FRACTIONS_PER_HOUR: u64 = 60 / FRACTION_MINUTES;

/// Hourly rates of each vehicle [`Class`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tariff {
    /// Hourly rate per [`Class`].
    rates: HashMap<Class, Money>,
}

impl Tariff {
    /// Creates a new [`Tariff`] out of the provided hourly `rates`.
    ///
    /// A [`Class`] missing from the `rates` cannot be billed.
    ///
    /// # Errors
    ///
    /// - [`TariffError::NegativeRate`] if any rate is below zero.
    /// - [`TariffError::MixedCurrencies`] if the rates are not all in the
    ///   same [`Currency`].
    pub fn new(
        rates: impl IntoIterator<Item = (Class, Money)>,
    ) -> Result<Self, TariffError> {
        let rates: HashMap<_, _> = rates.into_iter().collect();

        let mut currency = None;
        for (&class, rate) in &rates {
            if rate.is_negative() {
                return Err(TariffError::NegativeRate(class));
            }
            if *currency.get_or_insert(rate.currency) != rate.currency {
                return Err(TariffError::MixedCurrencies);
            }
        }

        Ok(Self { rates })
    }

    /// Returns the hourly rate of the provided [`Class`], if any.
    #[must_use]
    pub fn rate(&self, class: Class) -> Option<Money> {
        self.rates.get(&class).copied()
    }

    /// Computes the [`Stay`] between the `entry` and `exit` times, and the
    /// [`Charge`] for it at the hourly rate of the provided [`Class`].
    ///
    /// # Errors
    ///
    /// - [`ChargeError::NoRate`] if this [`Tariff`] has no rate for the
    ///   [`Class`].
    /// - [`ChargeError::NegativeStay`] if the `exit` precedes the `entry`.
    /// - [`ChargeError::Overflow`] if the amount is too large to represent.
    pub fn charge<EntryOf: ?Sized, ExitOf: ?Sized>(
        &self,
        class: Class,
        entry: &DateTimeOf<EntryOf>,
        exit: &DateTimeOf<ExitOf>,
    ) -> Result<(Stay, Charge), ChargeError> {
        let stay = Stay::between(entry, exit).ok_or(ChargeError::NegativeStay)?;
        let rate = self.rate(class).ok_or(ChargeError::NoRate(class))?;
        let charge = Charge::new(stay, rate).ok_or(ChargeError::Overflow)?;
        Ok((stay, charge))
    }
}

/// Error of creating a [`Tariff`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum TariffError {
    /// Hourly rate of a [`Class`] is negative.
    #[display("hourly rate of `{_0}` is negative")]
    NegativeRate(#[error(not(source))] Class),

    /// Hourly rates use different [`Currency`]s.
    #[display("hourly rates must be in the same currency")]
    MixedCurrencies,
}

/// Error of computing a [`Charge`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum ChargeError {
    /// [`Tariff`] has no hourly rate for a [`Class`].
    #[display("no hourly rate for `{_0}` vehicles")]
    NoRate(#[error(not(source))] Class),

    /// Exit time precedes entry time.
    #[display("exit time precedes entry time")]
    NegativeStay,

    /// Amount due exceeds the representable range.
    #[display("amount due is too large")]
    Overflow,
}

/// Time a vehicle spent in the parking lot, in whole minutes.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Stay {
    /// Elapsed minutes, rounded down.
    total_minutes: u64,
}

impl Stay {
    /// Creates a new [`Stay`] lasting the provided number of minutes.
    #[must_use]
    pub const fn from_minutes(total_minutes: u64) -> Self {
        Self { total_minutes }
    }

    /// Computes the [`Stay`] between the `entry` and `exit` times, dropping
    /// any incomplete minute.
    ///
    /// [`None`] is returned if the `exit` precedes the `entry`.
    #[must_use]
    pub fn between<EntryOf: ?Sized, ExitOf: ?Sized>(
        entry: &DateTimeOf<EntryOf>,
        exit: &DateTimeOf<ExitOf>,
    ) -> Option<Self> {
        exit.duration_since(entry).map(Self::from)
    }

    /// Returns the total number of elapsed minutes.
    #[must_use]
    pub const fn total_minutes(&self) -> u64 {
        self.total_minutes
    }

    /// Returns the number of whole hours.
    #[must_use]
    pub const fn hours(&self) -> u64 {
        self.total_minutes / 60
    }

    /// Returns the minutes remaining after the whole [`hours`].
    ///
    /// [`hours`]: Stay::hours
    #[must_use]
    pub const fn minutes(&self) -> u64 {
        self.total_minutes % 60
    }

    /// Returns the number of billable fractions consumed, counting any
    /// started fraction as a whole one.
    #[must_use]
    pub const fn fractions(&self) -> u64 {
        self.total_minutes.div_ceil(FRACTION_MINUTES)
    }
}

impl Display for Stay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours(), self.minutes())
    }
}

impl From<Duration> for Stay {
    fn from(elapsed: Duration) -> Self {
        Self::from_minutes(elapsed.as_secs() / 60)
    }
}

/// Amount billed for a [`Stay`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Charge {
    /// Number of billable fractions consumed.
    pub fractions: u64,

    /// Price of a single fraction.
    pub fraction_price: Money,

    /// Total amount due, rounded to a whole number.
    pub amount: Money,
}

impl Charge {
    /// Computes the [`Charge`] for the provided [`Stay`] at the given hourly
    /// `rate`.
    ///
    /// [`None`] is returned if the amount overflows [`Decimal`].
    #[must_use]
    pub fn new(stay: Stay, rate: Money) -> Option<Self> {
        let fractions = stay.fractions();
        let fraction_price = rate.amount / Decimal::from(FRACTIONS_PER_HOUR);
        let amount = Decimal::from(fractions)
            .checked_mul(fraction_price)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        Some(Self {
            fractions,
            fraction_price: Money {
                amount: fraction_price,
                currency: rate.currency,
            },
            amount: Money {
                amount,
                currency: rate.currency,
            },
        })
    }
}
