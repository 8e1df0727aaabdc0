pub mod error;
pub mod harbor;
pub mod history;
pub mod model;
pub mod sim;

pub use error::HarborError;

#[cfg(test)]
mod test;
