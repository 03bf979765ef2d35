//! [`Vehicle`] read models definitions.

use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::Vehicle;

/// Selector of the [`Vehicle`]s currently in the parking lot.
#[derive(Clone, Copy, Debug, Default)]
pub struct Parked;

/// Number of [`Vehicle`]s currently in the parking lot.
#[derive(Clone, Copy, Debug, Default, Eq, From, Hash, Into, PartialEq)]
pub struct ParkedCount(usize);

/// Occupancy of the parking lot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Occupancy {
    /// Number of parked [`Vehicle`]s.
    pub parked: usize,

    /// Total number of parking spaces.
    pub capacity: usize,

    /// Number of free parking spaces.
    pub available: usize,
}

impl Occupancy {
    /// Creates a new [`Occupancy`] of the provided `capacity`.
    #[must_use]
    pub fn new(ParkedCount(parked): ParkedCount, capacity: usize) -> Self {
        Self {
            parked,
            capacity,
            available: capacity.saturating_sub(parked),
        }
    }
}

pub mod history {
    //! History of [`Vehicle`]s that left the parking lot.

    use common::{DateTime, DateTimeOf};

    use crate::domain::{vehicle, Vehicle};

    /// Filter of the departed [`Vehicle`]s.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Part of the [`vehicle::Plate`] to search for.
        pub plate: Option<String>,

        /// [`vehicle::Class`] to match.
        pub class: Option<vehicle::Class>,

        /// Earliest exit time (inclusive).
        pub from: Option<DateTime>,

        /// Latest exit time (inclusive).
        pub to: Option<DateTime>,
    }

    impl Filter {
        /// Checks whether the provided [`Vehicle`] left the parking lot and
        /// satisfies this [`Filter`].
        #[must_use]
        pub fn matches(&self, vehicle: &Vehicle) -> bool {
            let Some(exited_at): Option<DateTime> =
                vehicle.exited_at.map(DateTimeOf::coerce)
            else {
                return false;
            };

            self.plate
                .as_ref()
                .is_none_or(|part| vehicle.plate.contains(part))
                && self.class.is_none_or(|class| vehicle.class == class)
                && self.from.is_none_or(|from| exited_at >= from)
                && self.to.is_none_or(|to| exited_at <= to)
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::domain::{vehicle, Vehicle};

    use super::{history::Filter, Occupancy, ParkedCount};

    fn departed(plate: &str, class: vehicle::Class, exit: &str) -> Vehicle {
        let exited_at = DateTime::from_rfc3339(exit).unwrap();
        Vehicle {
            id: vehicle::Id::new(),
            plate: vehicle::Plate::new(plate).unwrap(),
            class,
            owner: vehicle::Owner::new("Owner").unwrap(),
            phone: vehicle::Phone::new("3001234567").unwrap(),
            code: vehicle::VerificationCode::generate(),
            entered_at: (exited_at - Duration::from_secs(3600)).coerce(),
            exited_at: Some(exited_at.coerce()),
            charge: None,
        }
    }

    #[test]
    fn empty_filter_matches_only_departed() {
        let mut car =
            departed("ABC123", vehicle::Class::Carro, "2024-05-10T10:00:00Z");

        assert!(Filter::default().matches(&car));

        car.exited_at = None;
        assert!(!Filter::default().matches(&car));
    }

    #[test]
    fn filters_by_plate_part_and_class() {
        let car =
            departed("ABC123", vehicle::Class::Carro, "2024-05-10T10:00:00Z");

        let by_plate = |part: &str| Filter {
            plate: Some(part.to_owned()),
            ..Filter::default()
        };
        assert!(by_plate("bc1").matches(&car));
        assert!(!by_plate("XYZ").matches(&car));

        let by_class = |class| Filter {
            class: Some(class),
            ..Filter::default()
        };
        assert!(by_class(vehicle::Class::Carro).matches(&car));
        assert!(!by_class(vehicle::Class::Moto).matches(&car));
    }

    #[test]
    fn filters_by_inclusive_exit_range() {
        let car =
            departed("ABC123", vehicle::Class::Carro, "2024-05-10T10:00:00Z");
        let range = |from: &str, to: &str| Filter {
            from: Some(DateTime::from_rfc3339(from).unwrap()),
            to: Some(DateTime::from_rfc3339(to).unwrap()),
            ..Filter::default()
        };

        assert!(range("2024-05-10T10:00:00Z", "2024-05-10T10:00:00Z")
            .matches(&car));
        assert!(range("2024-05-10T00:00:00Z", "2024-05-10T23:59:59Z")
            .matches(&car));
        assert!(!range("2024-05-11T00:00:00Z", "2024-05-11T23:59:59Z")
            .matches(&car));
        assert!(!range("2024-05-09T00:00:00Z", "2024-05-10T09:59:59Z")
            .matches(&car));
    }

    #[test]
    fn occupancy_never_goes_negative() {
        assert_eq!(Occupancy::new(ParkedCount::from(3), 50).available, 47);
        assert_eq!(Occupancy::new(ParkedCount::from(60), 50).available, 0);
    }
}
