/// Network adapters for the worker substrate
mod flower_dispatcher;

pub use flower_dispatcher::FlowerTaskDispatcher;
