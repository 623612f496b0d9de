// Implementations of the guild config store.

#[cfg(test)]
pub mod in_memory;
pub mod json_store;

#[cfg(test)]
pub use in_memory::InMemoryGuildConfigStore;
pub use json_store::JsonGuildConfigStore;
