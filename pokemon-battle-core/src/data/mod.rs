//! Static game data: species, moves, types, abilities and items.
//!
//! Every table is immutable for the lifetime of the process. Identifiers are
//! resolved once (when a state is built or decoded) into the enums and
//! handles defined here; lookups that fail surface as
//! [`EngineError::UnknownIdentifier`](crate::error::EngineError).

/// Lowercases a name and strips everything but ASCII letters and digits, so
/// `"Stealth Rock"`, `"stealth-rock"` and `"STEALTHROCK"` all map to the same
/// identifier.
pub fn normalize_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Declares a fieldless identifier enum together with its canonical id
/// strings, a cached reverse lookup and `Display`/`Serialize` impls.
macro_rules! id_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident [$kind:expr] {
            $($variant:ident => $id:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            pub fn from_id(raw: &str) -> Result<Self, $crate::error::EngineError> {
                static LOOKUP: once_cell::sync::Lazy<std::collections::HashMap<&'static str, $name>> =
                    once_cell::sync::Lazy::new(|| {
                        $name::ALL.iter().map(|value| (value.as_str(), *value)).collect()
                    });
                let id = $crate::data::normalize_id(raw);
                LOOKUP
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| $crate::error::EngineError::unknown($kind, raw))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

pub mod abilities;
pub mod conditions;
pub mod items;
pub mod moves;
pub mod species;
pub mod types;

#[cfg(test)]
mod tests;
