pub mod types;

pub use types::{Filter, Operator};
