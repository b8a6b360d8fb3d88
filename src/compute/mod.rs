use std::{cell::RefCell, rc::Rc};

use crate::{Error, Group, Simulation};

pub mod bias;
pub mod dof;
mod temp_asphere;
mod temp_partial;
mod temp_region;

pub use bias::{BiasKind, BiasScope, DofTarget, TemperatureBias};
pub use dof::DofAccountant;
pub use temp_asphere::{TempAsphere, TempAsphereConfig};
pub use temp_partial::TempPartial;
pub use temp_region::TempRegion;

/// Shared handle to a compute stored in the registry
pub type ComputeHandle = Rc<RefCell<dyn Compute>>;

/// Symmetric tensor in Voigt order: xx, yy, zz, xy, xz, yz
pub type Tensor6 = [f64; 6];

/// A diagnostic evaluated on the atoms of one group
pub trait Compute {
    fn id(&self) -> &str;
    fn style(&self) -> &str;
    fn group(&self) -> &Group;

    /// Whether the scalar is a temperature
    fn tempflag(&self) -> bool {
        false
    }
    /// Velocity-bias capability, if this compute provides one
    fn bias(&self) -> Option<&dyn TemperatureBias> {
        None
    }
    fn bias_mut(&mut self) -> Option<&mut dyn TemperatureBias> {
        None
    }
    fn tempbias(&self) -> bool {
        self.bias().is_some()
    }

    /// Prepare for evaluation. Collective.
    fn init(&mut self, sim: &Simulation) -> Result<(), Error>;
    /// Evaluate the scalar for the current timestep. Collective.
    fn compute_scalar(&mut self, sim: &mut Simulation) -> Result<f64, Error>;
    /// Evaluate the tensor for the current timestep. Collective.
    fn compute_vector(&mut self, sim: &mut Simulation) -> Result<Tensor6, Error>;
    /// Timestep of the last scalar evaluation
    fn invoked_scalar(&self) -> Option<u64>;
    /// Timestep of the last tensor evaluation
    fn invoked_vector(&self) -> Option<u64>;
}
