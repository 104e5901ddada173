pub mod mover;
pub mod need;
pub mod offer;
pub mod plate;
pub mod stock;

pub use mover::*;
pub use need::*;
pub use offer::*;
pub use plate::*;
pub use stock::*;
