//! [`Query`] collection computing [`Charge`]s.

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{charge::ChargeError, vehicle, Charge, Stay, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Query;

/// Computes the [`Charge`] for a [`Stay`] of a [`vehicle::Class`] between
/// the provided times, with no [`Vehicle`] involved.
#[derive(Clone, Copy, Debug)]
pub struct ComputeCharge {
    /// [`vehicle::Class`] to bill.
    pub class: vehicle::Class,

    /// Time the [`Stay`] starts at.
    pub entry: DateTime,

    /// Time the [`Stay`] ends at.
    ///
    /// Defaults to now, if [`None`].
    pub exit: Option<DateTime>,
}

impl<Db> Query<ComputeCharge> for Service<Db> {
    type Ok = (Stay, Charge);
    type Err = Traced<ChargeError>;

    async fn execute(
        &self,
        query: ComputeCharge,
    ) -> Result<Self::Ok, Self::Err> {
        let ComputeCharge { class, entry, exit } = query;

        self.config()
            .tariff
            .charge(class, &entry, &exit.unwrap_or_else(DateTime::now))
            .map_err(tracerr::wrap!())
    }
}

/// Quotes the [`Charge`] a parked [`Vehicle`] would pay when leaving at the
/// provided time, without registering its exit.
#[derive(Clone, Debug)]
pub struct QuoteCharge {
    /// [`vehicle::Plate`] of the parked [`Vehicle`].
    pub plate: vehicle::Plate,

    /// Time to quote the [`Charge`] at.
    ///
    /// Defaults to now, if [`None`].
    pub at: Option<DateTime>,
}

/// [`Charge`] quoted for a parked [`Vehicle`].
#[derive(Clone, Debug)]
pub struct Quote {
    /// Parked [`Vehicle`].
    pub vehicle: Vehicle,

    /// [`Stay`] of the [`Vehicle`] so far.
    pub stay: Stay,

    /// [`Charge`] for the [`Stay`].
    pub charge: Charge,
}

impl<Db> Query<QuoteCharge> for Service<Db>
where
    Db: Database<
        Select<By<Option<Vehicle>, vehicle::Plate>>,
        Ok = Option<Vehicle>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Quote;
    type Err = Traced<QuoteError>;

    async fn execute(
        &self,
        query: QuoteCharge,
    ) -> Result<Self::Ok, Self::Err> {
        use QuoteError as E;

        let QuoteCharge { plate, at } = query;

        let vehicle = self
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(plate.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotParked(plate))
            .map_err(tracerr::wrap!())?;

        let at = at.unwrap_or_else(DateTime::now);
        let (stay, charge) = self
            .config()
            .tariff
            .charge(vehicle.class, &vehicle.entered_at, &at)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        Ok(Quote {
            vehicle,
            stay,
            charge,
        })
    }
}

/// Error of [`QuoteCharge`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum QuoteError {
    /// [`Charge`] cannot be computed.
    #[display("cannot compute `Charge`: {_0}")]
    #[from]
    Charge(ChargeError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// No [`Vehicle`] with the [`vehicle::Plate`] is parked.
    #[display("`Vehicle(plate: {_0})` is not parked")]
    NotParked(#[error(not(source))] vehicle::Plate),
}
