pub mod atoms;
pub mod compute;
pub mod error;
pub mod group;
pub mod modify;
pub mod parallel;
pub mod prelude;
pub mod region;
pub mod simulation;
pub mod units;
pub mod utils;

pub use atoms::{Atoms, Ellipsoid};
pub use compute::{Compute, ComputeHandle, TempAsphere, TempPartial, TempRegion};
pub use error::Error;
pub use group::{Group, Groups};
pub use modify::{Fix, Modify};
pub use parallel::*;
pub use simulation::{Dimension, Simulation, SimulationConfig};
pub use units::{UnitStyle, Units};
