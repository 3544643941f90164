pub mod array;
pub mod rounding;

pub use array::{NestedArray, NumericArray};
pub use rounding::round_to_places;
