//! [`Vehicle`] definitions.

use std::{str::FromStr, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use rand::Rng as _;
use regex::Regex;
use uuid::Uuid;

use super::Charge;

/// Vehicle visiting the parking lot.
///
/// A [`Vehicle`] is parked while it has no [`exited_at`] time. Once it leaves,
/// the [`Charge`] computed for its stay is recorded alongside.
///
/// [`exited_at`]: Vehicle::exited_at
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// ID of this [`Vehicle`] visit.
    pub id: Id,

    /// [`Plate`] of this [`Vehicle`].
    pub plate: Plate,

    /// [`Class`] of this [`Vehicle`].
    pub class: Class,

    /// [`Owner`] of this [`Vehicle`].
    pub owner: Owner,

    /// [`Phone`] of the [`Owner`].
    pub phone: Phone,

    /// [`VerificationCode`] printed on the entry ticket.
    pub code: VerificationCode,

    /// [`DateTime`] when this [`Vehicle`] entered the parking lot.
    pub entered_at: EntryDateTime,

    /// [`DateTime`] when this [`Vehicle`] left the parking lot, if it did.
    pub exited_at: Option<ExitDateTime>,

    /// [`Charge`] paid on leaving the parking lot, if it did.
    pub charge: Option<Charge>,
}

impl Vehicle {
    /// Indicates whether this [`Vehicle`] is still in the parking lot.
    #[must_use]
    pub fn is_parked(&self) -> bool {
        self.exited_at.is_none()
    }
}

/// ID of a [`Vehicle`] visit.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

/// License plate of a [`Vehicle`].
///
/// Always upper-cased, so lookups by [`Plate`] are case-insensitive.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[as_ref(forward)]
pub struct Plate(String);

impl Plate {
    /// Creates a new [`Plate`] out of the given `plate`, trimming and
    /// upper-casing it.
    ///
    /// [`None`] is returned if the normalized `plate` is not valid.
    #[must_use]
    pub fn new(plate: impl AsRef<str>) -> Option<Self> {
        let plate = plate.as_ref().trim().to_uppercase();
        Self::check(&plate).then_some(Self(plate))
    }

    /// Checks whether the given `plate` is a valid [`Plate`].
    fn check(plate: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Plate`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Z0-9](?:[A-Z0-9 -]{0,14}[A-Z0-9])?$")
                .expect("valid regex")
        });

        REGEX.is_match(plate.as_ref())
    }

    /// Indicates whether this [`Plate`] contains the provided `part`,
    /// ignoring its case.
    #[must_use]
    pub fn contains(&self, part: impl AsRef<str>) -> bool {
        self.0.contains(&part.as_ref().trim().to_uppercase())
    }
}

impl FromStr for Plate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Plate`")
    }
}

define_kind! {
    #[doc = "Class of a [`Vehicle`] determining its hourly rate."]
    #[case = "lowercase"]
    enum Class {
        #[doc = "Motorcycle."]
        Moto = 1,

        #[doc = "Car."]
        Carro = 2,

        #[doc = "Pickup truck or van."]
        Camioneta = 3,
    }
}

/// Name of a [`Vehicle`] owner.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Owner(String);

impl Owner {
    /// Creates a new [`Owner`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        (!name.is_empty() && name.chars().count() <= 256)
            .then(|| Self(name.to_owned()))
    }
}

impl FromStr for Owner {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Owner`")
    }
}

/// Contact phone of a [`Vehicle`] owner.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let number = number.as_ref().trim();
        Self::check(number).then(|| Self(number.to_owned()))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[0-9][0-9 -]{5,18}[0-9]$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Code printed on an entry ticket in `AAA-0000` format.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Number of leading letters.
    const LETTERS: usize = 3;

    /// Number of trailing digits.
    const DIGITS: usize = 4;

    /// Generates a new random [`VerificationCode`].
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut code = String::with_capacity(Self::LETTERS + Self::DIGITS + 1);
        code.extend(
            (0..Self::LETTERS).map(|_| char::from(rng.gen_range(b'A'..=b'Z'))),
        );
        code.push('-');
        code.extend(
            (0..Self::DIGITS).map(|_| char::from(rng.gen_range(b'0'..=b'9'))),
        );
        Self(code)
    }

    /// Checks whether the given `code` is a valid [`VerificationCode`].
    fn check(code: impl AsRef<str>) -> bool {
        /// Regular expression checking [`VerificationCode`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Z]{3}-[0-9]{4}$").expect("valid regex")
        });

        REGEX.is_match(code.as_ref())
    }
}

impl FromStr for VerificationCode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::check(s)
            .then(|| Self(s.to_owned()))
            .ok_or("invalid `VerificationCode`")
    }
}

/// [`DateTime`] when a [`Vehicle`] entered the parking lot.
pub type EntryDateTime = DateTimeOf<(Vehicle, unit::Entry)>;

/// [`DateTime`] when a [`Vehicle`] left the parking lot.
pub type ExitDateTime = DateTimeOf<(Vehicle, unit::Exit)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::{Class, Owner, Phone, Plate, VerificationCode};

    #[test]
    fn plate_is_normalized() {
        assert_eq!(Plate::new("  abc123 ").unwrap().to_string(), "ABC123");
        assert_eq!(Plate::new("ab-12 c").unwrap().to_string(), "AB-12 C");
        assert_eq!(Plate::new("abc123"), Plate::new("ABC123"));
    }

    #[test]
    fn plate_rejects_garbage() {
        assert!(Plate::new("").is_none());
        assert!(Plate::new("   ").is_none());
        assert!(Plate::new("-ABC").is_none());
        assert!(Plate::new("ABC_123").is_none());
        assert!(Plate::new("A".repeat(17)).is_none());
        assert!(Plate::new("A".repeat(16)).is_some());
    }

    #[test]
    fn plate_contains_ignores_case() {
        let plate = Plate::new("XYZ789").unwrap();

        assert!(plate.contains("yz7"));
        assert!(plate.contains(""));
        assert!(!plate.contains("ABC"));
    }

    #[test]
    fn class_parses_lowercase() {
        assert_eq!(Class::from_str("moto").unwrap(), Class::Moto);
        assert_eq!(Class::from_str("carro").unwrap(), Class::Carro);
        assert_eq!(Class::from_str("camioneta").unwrap(), Class::Camioneta);
        assert!(Class::from_str("bus").is_err());
        assert!(Class::from_str("Carro").is_err());
        assert_eq!(Class::Camioneta.to_string(), "camioneta");
    }

    #[test]
    fn owner_and_phone_are_required() {
        assert!(Owner::new("  ").is_none());
        assert_eq!(
            Owner::new(" Ana Pérez ").unwrap().to_string(),
            "Ana Pérez",
        );

        assert!(Phone::new("").is_none());
        assert!(Phone::new("call me").is_none());
        assert!(Phone::new("300 123 4567").is_some());
        assert!(Phone::new("+57 300-123-4567").is_some());
    }

    #[test]
    fn phone_accepts_only_ascii_digits() {
        assert!(Phone::new("٣٠٠١٢٣٤٥٦٧").is_none());
        assert!(Phone::new("３００１２３４５６７").is_none());
        assert!(Phone::new("300\u{2003}123\u{2003}4567").is_none());
        assert!(Phone::new("3001234567").is_some());
    }

    #[test]
    fn verification_code_format() {
        for _ in 0..100 {
            let code = VerificationCode::generate();

            assert_eq!(
                VerificationCode::from_str(&code.to_string()).unwrap(),
                code,
            );
        }

        assert!(VerificationCode::from_str("AB-1234").is_err());
        assert!(VerificationCode::from_str("abc-1234").is_err());
        assert!(VerificationCode::from_str("ABC-12345").is_err());
    }
}
