// Adapters layer: concrete implementations of the domain ports (storage, stores, seed data).

pub mod memory;
pub mod seed;
pub mod snapshot;
pub mod storage;
