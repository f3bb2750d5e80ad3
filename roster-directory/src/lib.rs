mod client;
mod display_name;
mod error;
mod host;
mod memory;
mod user_id;

pub use client::*;
pub use display_name::*;
pub use error::*;
pub use host::*;
pub use memory::*;
pub use user_id::*;
