//! Macro for opaque, non-blank string identifiers.
//!
//! Employee and record identifiers are assigned by the host application and
//! are never interpreted by the engine. The only invariant is that they are
//! not blank, which is what lets the engine report "missing employee" as
//! invalid input instead of silently grouping records under `""`.

macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s)
                    .ok_or_else(|| serde::de::Error::custom(concat!(stringify!($Name), " must not be blank")))
            }
        }

        impl $Name {
            /// Create a new identifier, panicking if it is blank.
            ///
            /// Prefer [`try_new`](Self::try_new) for untrusted input.
            pub fn new(id: impl Into<String>) -> Self {
                Self::try_new(id).expect(concat!(stringify!($Name), " must not be blank"))
            }

            /// Create a new identifier, returning `None` if it is blank.
            pub fn try_new(id: impl Into<String>) -> Option<Self> {
                let s = id.into();
                if s.trim().is_empty() { None } else { Some(Self(s)) }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $Name {
            type Err = crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_new(s).ok_or_else(|| {
                    crate::error::CoreError::invalid_input(concat!(stringify!($Name), " must not be blank"))
                })
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_identifier;
