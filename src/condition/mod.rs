pub mod coercion;
pub mod evaluator;
pub mod json_logic;
pub mod types;

pub use evaluator::*;
pub use json_logic::{FlatCondition, from_json_logic, to_json_logic};
pub use types::*;
