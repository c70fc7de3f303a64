// Adapters layer: concrete implementations of the domain ports (backend REST, places lookup, storage)

pub mod http;
pub mod places;
pub mod storage;
