// User persistence: lazy provisioning, phone ownership lookups, transactional saves.

#[cfg(test)]
pub mod memory;
pub mod store;

pub use store::{PgUserStore, UserStore};
