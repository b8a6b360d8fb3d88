/// Small vector and rotation helpers
pub mod computations;
mod keyed_vec;

pub use computations::*;
pub use keyed_vec::KeyedVec;
