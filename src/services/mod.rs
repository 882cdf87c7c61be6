/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// CSV parsing for bulk participant import.
pub mod import;
/// Roster refresh and participant mutations.
pub mod participant_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection lifecycle and degraded-mode tracking.
pub mod storage_supervisor;
/// Random participant generation.
pub mod test_data;
