mod contact;
mod room;

pub use contact::*;
pub use room::*;
