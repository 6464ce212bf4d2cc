//! Helper macro for enums persisted as `TEXT` columns.
//!
//! Each generated enum serializes as its snake_case database string, exposes
//! `as_str` / `from_str_db`, and lists every variant in `ALL` so validators
//! and error messages stay in sync with the definition.

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Convert to the database-compatible string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse a value read from the database or a query string.
            pub fn from_str_db(s: &str) -> Result<Self, $crate::error::CoreError> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    _ => {
                        let valid: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        Err($crate::error::CoreError::Validation(format!(
                            "Invalid {} '{}'. Must be one of: {}",
                            $label,
                            s,
                            valid.join(", ")
                        )))
                    }
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
