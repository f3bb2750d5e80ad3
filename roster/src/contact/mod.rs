mod aggregator;
mod controller;
mod directory;
mod filter;
mod listener;
mod search;
mod selection;
mod source;

pub use aggregator::*;
pub use controller::*;
pub use directory::*;
pub use filter::*;
pub use listener::*;
pub use search::*;
pub use selection::*;
pub use source::*;
