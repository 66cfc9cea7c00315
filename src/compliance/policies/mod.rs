mod failure_policy;
mod provides_disambiguation;

pub use failure_policy::FailurePolicy;
pub use provides_disambiguation::ProvidesDisambiguation;
