pub mod meta;
pub mod needs;
pub mod offers;
pub mod prices;
pub mod stock;
