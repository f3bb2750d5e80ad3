mod assembler;
mod banner;
mod provider;

pub use assembler::*;
pub use banner::*;
pub use provider::*;
