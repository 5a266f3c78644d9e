//! Domain models for the PawRx system.

use thiserror::Error;

/// A field failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Declares a fieldless enum stored as a fixed string tag.
///
/// Generates serde renames, `as_str`, `Display` and a `FromStr` that rejects
/// unknown tags with a [`ValidationError`].
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $tag)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($tag => Ok($name::$variant),)+
                    _ => Err($crate::models::ValidationError(format!(
                        "Invalid {}: {}",
                        stringify!($name),
                        s
                    ))),
                }
            }
        }
    };
}

mod appointment;
mod catalog;
mod check;
mod interaction;
mod medication;
mod pet;
mod species;

pub use appointment::*;
pub use catalog::*;
pub use check::*;
pub use interaction::*;
pub use medication::*;
pub use pet::*;
pub use species::*;
