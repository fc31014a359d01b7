pub mod driver;

pub use driver::{HttpDriver, HttpNodeClient};
