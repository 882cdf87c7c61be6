/// Database model definitions.
pub mod models;
/// Participant storage and retrieval operations.
pub mod participant_store;
/// Storage abstraction layer for database operations.
pub mod storage;
