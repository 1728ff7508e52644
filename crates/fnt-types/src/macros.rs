/// Defines a closed `u8`-backed enum that serializes as its discriminant.
///
/// Persisted documents store kinds and chart tags as plain integers, so the
/// generated `Serialize`/`Deserialize` impls go through `u8` and reject any
/// value outside the listed variants.
macro_rules! define_numeric_enum {
    (
        $(#[$meta:meta])*
        pub enum $Name:ident {
            $( $(#[$vmeta:meta])* $Variant:ident = $value:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $Name {
            $( $(#[$vmeta])* $Variant = $value, )*
        }

        impl $Name {
            /// Every variant, in discriminant order.
            pub const ALL: &'static [$Name] = &[$($Name::$Variant),*];

            pub fn from_u8(value: u8) -> Result<$Name, $crate::error::TypeError> {
                match value {
                    $( $value => Ok($Name::$Variant), )*
                    _ => Err($crate::error::TypeError::UnknownDiscriminant {
                        ty: stringify!($Name),
                        value,
                    }),
                }
            }

            pub fn as_u8(self) -> u8 {
                self as u8
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( $Name::$Variant => stringify!($Variant), )*
                }
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $Name {
            type Err = $crate::error::TypeError;

            fn from_str(s: &str) -> Result<$Name, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case(stringify!($Variant)) {
                        return Ok($Name::$Variant);
                    }
                )*
                Err($crate::error::TypeError::UnknownName {
                    ty: stringify!($Name),
                    name: s.to_string(),
                })
            }
        }

        impl serde::Serialize for $Name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.as_u8())
            }
        }

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<$Name, D::Error> {
                let value = <u8 as serde::Deserialize>::deserialize(deserializer)?;
                $Name::from_u8(value).map_err(serde::de::Error::custom)
            }
        }
    };
}
