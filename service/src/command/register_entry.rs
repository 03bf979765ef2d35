//! [`Command`] for registering a [`Vehicle`] entering the parking lot.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    read::vehicle::ParkedCount,
    Service,
};

use super::Command;

/// [`Command`] for registering a [`Vehicle`] entering the parking lot.
#[derive(Clone, Debug)]
pub struct RegisterEntry {
    /// [`vehicle::Plate`] of the entering [`Vehicle`].
    pub plate: vehicle::Plate,

    /// [`vehicle::Class`] of the entering [`Vehicle`].
    pub class: vehicle::Class,

    /// [`vehicle::Owner`] of the entering [`Vehicle`].
    pub owner: vehicle::Owner,

    /// [`vehicle::Phone`] of the [`vehicle::Owner`].
    pub phone: vehicle::Phone,
}

impl<Db> Command<RegisterEntry> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<ParkedCount, ()>>,
            Ok = ParkedCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Plate>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Insert<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(
        skip_all,
        fields(plate = %cmd.plate, class = %cmd.class),
    )]
    async fn execute(&self, cmd: RegisterEntry) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterEntry {
            plate,
            class,
            owner,
            phone,
        } = cmd;

        if self.config().tariff.rate(class).is_none() {
            return Err(tracerr::new!(E::NoRate(class)));
        }

        // Avoid concurrent entries overflowing the lot or duplicating a plate.
        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let parked: usize = tx
            .execute(Select(By::<ParkedCount, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into();
        let capacity = self.config().capacity;
        if parked >= capacity {
            return Err(tracerr::new!(E::LotFull(capacity)));
        }

        let existing = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(plate.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::AlreadyParked(plate)));
        }

        let vehicle = Vehicle {
            id: vehicle::Id::new(),
            plate,
            class,
            owner,
            phone,
            code: vehicle::VerificationCode::generate(),
            entered_at: DateTime::now().coerce(),
            exited_at: None,
            charge: None,
        };

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
            parked = parked + 1,
            "vehicle entered"
        );

        Ok(vehicle)
    }
}

/// Error of [`RegisterEntry`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Vehicle`] with the same [`vehicle::Plate`] is parked already.
    #[display("`Vehicle(plate: {_0})` is parked already")]
    AlreadyParked(#[error(not(source))] vehicle::Plate),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// All the parking spaces are taken.
    #[display("all {_0} parking spaces are taken")]
    LotFull(#[error(not(source))] usize),

    /// [`vehicle::Class`] has no hourly rate configured.
    #[display("no hourly rate for `{_0}` vehicles")]
    NoRate(#[error(not(source))] vehicle::Class),
}
