//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Variants are parsed from and displayed as strings in the provided `case`
/// (any of the [`strum`] `serialize_all` cases).
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     #[case = "lowercase"]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = 1,
///
///         #[doc = "A sphere"]
///         Sphere = 2,
///     }
/// }
///
/// assert_eq!(Kind::Cube.to_string(), "cube");
/// assert_eq!("sphere".parse::<Kind>().unwrap(), Kind::Sphere);
/// ```
///
/// [`strum`]: crate::private::strum
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        #[case = $case:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumIter,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = $case)]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }

            /// Returns an [`Iterator`] over all the variants.
            pub fn all() -> impl Iterator<Item = Self> {
                <Self as $crate::private::strum::IntoEnumIterator>::iter()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $(
                        v if Self::$variant.u8() == v => Ok(Self::$variant),
                    )*
                    v => Err(v),
                }
            }
        }
    };
}

#[cfg(test)]
mod spec {
    crate::define_kind! {
        #[doc = "Test kind."]
        #[case = "SCREAMING_SNAKE_CASE"]
        enum Shape {
            #[doc = "Cube."]
            Cube = 1,

            #[doc = "Sphere of some kind."]
            BigSphere = 2,
        }
    }

    #[test]
    fn displays_in_case() {
        assert_eq!(Shape::Cube.to_string(), "CUBE");
        assert_eq!(Shape::BigSphere.to_string(), "BIG_SPHERE");
    }

    #[test]
    fn parses_in_case() {
        assert_eq!("BIG_SPHERE".parse::<Shape>().unwrap(), Shape::BigSphere);
        assert!("big_sphere".parse::<Shape>().is_err());
        assert!("CYLINDER".parse::<Shape>().is_err());
    }

    #[test]
    fn converts_from_u8() {
        assert_eq!(Shape::try_from(1), Ok(Shape::Cube));
        assert_eq!(Shape::try_from(2), Ok(Shape::BigSphere));
        assert_eq!(Shape::try_from(3), Err(3));
    }

    #[test]
    fn iterates_all() {
        assert_eq!(
            Shape::all().collect::<Vec<_>>(),
            [Shape::Cube, Shape::BigSphere],
        );
    }
}
