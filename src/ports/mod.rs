/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports are the driven interfaces the application core uses to
/// reach the worker substrate, the store and the console.
pub mod outbound;
