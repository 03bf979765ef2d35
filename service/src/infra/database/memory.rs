//! In-memory [`Database`] implementation.
//!
//! All the data lives in a single [`State`] guarded by an async [`Mutex`].
//! A [`Transaction`] holds that lock exclusively until it's dropped, working
//! on its own copy of the [`State`] which replaces the shared one on
//! [`Commit`].

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Commit, Insert, Select, Transact};
use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    read::vehicle::{history, Parked, ParkedCount},
};

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared [`State`] of this [`Memory`].
    state: Arc<Mutex<State>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// [`Memory`] database contents.
#[derive(Clone, Debug, Default)]
struct State {
    /// [`Vehicle`]s currently in the parking lot.
    parked: HashMap<vehicle::Plate, Vehicle>,

    /// [`Vehicle`]s that left the parking lot, in order of leaving.
    history: Vec<Vehicle>,
}

impl State {
    /// Returns the parked [`Vehicle`] with the provided [`vehicle::Plate`].
    fn parked_by_plate(&self, plate: &vehicle::Plate) -> Option<Vehicle> {
        self.parked.get(plate).cloned()
    }

    /// Returns all the parked [`Vehicle`]s in order of their entry.
    fn parked(&self) -> Vec<Vehicle> {
        let mut parked = self.parked.values().cloned().collect::<Vec<_>>();
        parked.sort_by(|a, b| {
            a.entered_at.cmp(&b.entered_at).then_with(|| a.plate.cmp(&b.plate))
        });
        parked
    }

    /// Returns the departed [`Vehicle`]s matching the provided
    /// [`history::Filter`], the most recently departed first.
    fn history(&self, filter: &history::Filter) -> Vec<Vehicle> {
        let mut history = self
            .history
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect::<Vec<_>>();
        history.sort_by(|a, b| b.exited_at.cmp(&a.exited_at));
        history
    }

    /// Stores the provided [`Vehicle`] either as a parked or as a departed
    /// one, depending on whether it has left.
    fn store(&mut self, vehicle: Vehicle) {
        if vehicle.is_parked() {
            drop(self.parked.insert(vehicle.plate.clone(), vehicle));
        } else {
            drop(self.parked.remove(&vehicle.plate));
            self.history.push(vehicle);
        }
    }
}

impl Database<Transact> for Memory {
    type Ok = Transaction;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = State::clone(&guard);
        Ok(Transaction {
            pending: Mutex::new(Some(Pending { guard, working })),
        })
    }
}

impl Database<Select<By<Option<Vehicle>, vehicle::Plate>>> for Memory {
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::Plate>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.lock().await.parked_by_plate(by.inner()))
    }
}

impl Database<Select<By<Vec<Vehicle>, Parked>>> for Memory {
    type Ok = Vec<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Vehicle>, Parked>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.lock().await.parked())
    }
}

impl Database<Select<By<Vec<Vehicle>, history::Filter>>> for Memory {
    type Ok = Vec<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Vehicle>, history::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.lock().await.history(by.inner()))
    }
}

impl Database<Select<By<ParkedCount, ()>>> for Memory {
    type Ok = ParkedCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<ParkedCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.lock().await.parked.len().into())
    }
}

/// [`Memory`] database transaction.
///
/// Dropping a [`Transaction`] without [`Commit`]ting it discards all the
/// changes made within it.
#[derive(Debug)]
pub struct Transaction {
    /// [`Pending`] changes, or [`None`] once committed.
    pending: Mutex<Option<Pending>>,
}

/// Changes of a [`Transaction`] not committed yet.
#[derive(Debug)]
struct Pending {
    /// Exclusive lock of the shared [`State`].
    guard: OwnedMutexGuard<State>,

    /// Copy of the [`State`] the [`Transaction`] works on.
    working: State,
}

impl Transaction {
    /// Runs the provided function on the working [`State`] of this
    /// [`Transaction`].
    async fn with<T>(
        &self,
        f: impl FnOnce(&mut State) -> T,
    ) -> Result<T, Traced<database::Error>> {
        self.pending
            .lock()
            .await
            .as_mut()
            .map(|p| f(&mut p.working))
            .ok_or_else(|| tracerr::new!(database::Error::from(
                Error::TransactionFinished,
            )))
    }
}

impl Database<Select<By<Option<Vehicle>, vehicle::Plate>>> for Transaction {
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::Plate>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| s.parked_by_plate(by.inner()))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Select<By<ParkedCount, ()>>> for Transaction {
    type Ok = ParkedCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<ParkedCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| s.parked.len().into())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Insert<Vehicle>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(vehicle): Insert<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| s.store(vehicle))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Commit> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let Pending { mut guard, working } = self
            .pending
            .lock()
            .await
            .take()
            .ok_or_else(|| tracerr::new!(database::Error::from(
                Error::TransactionFinished,
            )))?;
        *guard = working;
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Transaction`] has been committed already.
    #[display("`Transaction` is finished already")]
    TransactionFinished,
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        DateTime, Handler as _,
    };

    use crate::{
        domain::{vehicle, Vehicle},
        read::vehicle::{history, Parked, ParkedCount},
    };

    use super::Memory;

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle {
            id: vehicle::Id::new(),
            plate: vehicle::Plate::new(plate).unwrap(),
            class: vehicle::Class::Carro,
            owner: vehicle::Owner::new("Owner").unwrap(),
            phone: vehicle::Phone::new("3001234567").unwrap(),
            code: vehicle::VerificationCode::generate(),
            entered_at: DateTime::now().coerce(),
            exited_at: None,
            charge: None,
        }
    }

    async fn parked_count(db: &Memory) -> usize {
        db.execute(Select(By::<ParkedCount, _>::new(())))
            .await
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn committed_changes_are_visible() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(vehicle("AAA111"))).await.unwrap();
        tx.execute(Commit).await.unwrap();
        drop(tx);

        assert_eq!(parked_count(&db).await, 1);
        assert!(db
            .execute(Select(By::<Option<Vehicle>, _>::new(
                vehicle::Plate::new("aaa111").unwrap(),
            )))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn dropped_transaction_is_rolled_back() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(vehicle("AAA111"))).await.unwrap();
        assert_eq!(
            usize::from(
                tx.execute(Select(By::<ParkedCount, _>::new(())))
                    .await
                    .unwrap(),
            ),
            1,
        );
        drop(tx);

        assert_eq!(parked_count(&db).await, 0);
    }

    #[tokio::test]
    async fn finished_transaction_errors() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Commit).await.unwrap();

        assert!(tx.execute(Insert(vehicle("AAA111"))).await.is_err());
        assert!(tx.execute(Commit).await.is_err());
    }

    #[tokio::test]
    async fn departed_vehicle_moves_to_history() {
        let db = Memory::new();
        let mut car = vehicle("BBB222");

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(car.clone())).await.unwrap();
        tx.execute(Insert(vehicle("CCC333"))).await.unwrap();
        tx.execute(Commit).await.unwrap();
        drop(tx);

        car.exited_at = Some(DateTime::now().coerce());
        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(car)).await.unwrap();
        tx.execute(Commit).await.unwrap();
        drop(tx);

        let parked = db
            .execute(Select(By::<Vec<Vehicle>, _>::new(Parked)))
            .await
            .unwrap();
        assert_eq!(parked.len(), 1);
        assert_eq!(parked[0].plate.to_string(), "CCC333");

        let history = db
            .execute(Select(By::<Vec<Vehicle>, _>::new(
                history::Filter::default(),
            )))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].plate.to_string(), "BBB222");
    }
}
