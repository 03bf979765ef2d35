//! [`Command`] for registering a [`Vehicle`] leaving the parking lot.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{charge::ChargeError, vehicle, Charge, Stay, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a [`Vehicle`] leaving the parking lot.
///
/// The [`Vehicle`] is billed for its [`Stay`] up to now.
#[derive(Clone, Debug)]
pub struct RegisterExit {
    /// [`vehicle::Plate`] of the leaving [`Vehicle`].
    pub plate: vehicle::Plate,
}

/// [`Vehicle`] that left the parking lot.
#[derive(Clone, Debug)]
pub struct Departure {
    /// Departed [`Vehicle`].
    pub vehicle: Vehicle,

    /// [`Stay`] of the [`Vehicle`].
    pub stay: Stay,

    /// [`Charge`] for the [`Stay`].
    pub charge: Charge,
}

impl<Db> Command<RegisterExit> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Vehicle>, vehicle::Plate>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Insert<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Departure;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all, fields(plate = %cmd.plate))]
    async fn execute(&self, cmd: RegisterExit) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterExit { plate } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(plate.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotParked(plate))
            .map_err(tracerr::wrap!())?;

        let exited_at = DateTime::now().coerce();
        let (stay, charge) = self
            .config()
            .tariff
            .charge(vehicle.class, &vehicle.entered_at, &exited_at)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        vehicle.exited_at = Some(exited_at);
        vehicle.charge = Some(charge);

        tx.execute(Insert(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            code = %vehicle.code,
            stay = %stay,
            amount = %charge.amount,
            "vehicle exited"
        );

        Ok(Departure {
            vehicle,
            stay,
            charge,
        })
    }
}

/// Error of [`RegisterExit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
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
