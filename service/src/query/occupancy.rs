//! [`Query`] for the parking lot [`read::vehicle::Occupancy`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    read::{self, vehicle::ParkedCount},
    Service,
};

use super::Query;

/// Queries the current [`read::vehicle::Occupancy`] of the parking lot.
#[derive(Clone, Copy, Debug, Default)]
pub struct Occupancy;

impl<Db> Query<Occupancy> for Service<Db>
where
    Db: Database<
        Select<By<ParkedCount, ()>>,
        Ok = ParkedCount,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::vehicle::Occupancy;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Occupancy) -> Result<Self::Ok, Self::Err> {
        let parked = self
            .database()
            .execute(Select(By::<ParkedCount, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(read::vehicle::Occupancy::new(parked, self.config().capacity))
    }
}

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{
        command::{RegisterEntry, RegisterExit},
        domain::vehicle::{Class, Owner, Phone, Plate},
        infra::Memory,
        read, Config, Service,
    };

    use super::Occupancy;

    #[tokio::test]
    async fn counts_parked_vehicles() {
        let config = Config {
            capacity: 3,
            ..Config::default()
        };
        let service = Service::new(config, Memory::new());

        for plate in ["AAA001", "AAA002"] {
            _ = service
                .execute(RegisterEntry {
                    plate: Plate::new(plate).unwrap(),
                    class: Class::Moto,
                    owner: Owner::new("Pedro").unwrap(),
                    phone: Phone::new("3001112233").unwrap(),
                })
                .await
                .unwrap();
        }
        _ = service
            .execute(RegisterExit {
                plate: Plate::new("AAA001").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(
            service.execute(Occupancy).await.unwrap(),
            read::vehicle::Occupancy {
                parked: 1,
                capacity: 3,
                available: 2,
            },
        );
    }
}
