//! Stored record types and their payloads.
//!
//! Each record implements [`ActorEntity`](forkline_actor::ActorEntity) in its
//! `*_actor::entity` module.

/// Declares a type-safe `u32` identifier that renders as `<prefix>_<n>`.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod user;

pub use menu_item::*;
pub use order::*;
pub use restaurant::*;
pub use user::*;
