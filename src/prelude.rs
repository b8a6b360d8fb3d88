pub use super::atoms::{Atoms, Ellipsoid};
pub use super::compute::{
    BiasKind, Compute, DofTarget, TempAsphere, TempAsphereConfig, TempPartial, TempRegion,
    TemperatureBias,
};
pub use super::error::Error;
pub use super::group::{Group, Groups};
pub use super::modify::Fix;
pub use super::parallel::{Communicator, SerialComm, ThreadComm, World};
pub use super::region::{Rect, Region};
pub use super::simulation::{Dimension, Simulation, SimulationConfig};
pub use super::units::{UnitStyle, Units};
