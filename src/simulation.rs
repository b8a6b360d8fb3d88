use serde::Deserialize;

use crate::{
    compute::{Compute, ComputeHandle, Tensor6},
    modify::{Fix, Modify},
    parallel::Communicator,
    Atoms, Error, Groups, UnitStyle, Units,
};

/// Spatial dimensionality of the simulation
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum Dimension {
    #[serde(rename = "2d")]
    Two,
    #[default]
    #[serde(rename = "3d")]
    Three,
}
impl Dimension {
    pub fn count(&self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

/// Settings fixed when the simulation is created
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub units: UnitStyle,
    pub dimension: Dimension,
}

/// Everything a compute needs to see on one process
pub struct Simulation<'a> {
    pub atoms: Atoms,
    pub groups: Groups,
    units: Units,
    dimension: Dimension,
    ntimestep: u64,
    comm: &'a dyn Communicator,
    modify: Modify,
}
impl<'a> Simulation<'a> {
    /// Create a new three-dimensional simulation in reduced units
    pub fn new(comm: &'a dyn Communicator) -> Self {
        Self::from_config(&SimulationConfig::default(), comm)
    }
    pub fn from_config(config: &SimulationConfig, comm: &'a dyn Communicator) -> Self {
        Self {
            atoms: Atoms::new(),
            groups: Groups::new(),
            units: Units::new(config.units),
            dimension: config.dimension,
            ntimestep: 0,
            comm,
            modify: Modify::new(),
        }
    }

    // Getters
    pub fn units(&self) -> &Units {
        &self.units
    }
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }
    pub fn ntimestep(&self) -> u64 {
        self.ntimestep
    }
    pub fn comm(&self) -> &'a dyn Communicator {
        self.comm
    }
    pub fn modify(&self) -> &Modify {
        &self.modify
    }

    // Setters
    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }
    pub fn set_dimension(&mut self, dimension: Dimension) {
        self.dimension = dimension;
    }
    pub fn set_ntimestep(&mut self, ntimestep: u64) {
        self.ntimestep = ntimestep;
    }
    /// Move the clock forward by one step
    pub fn advance(&mut self) {
        self.ntimestep += 1;
    }
    pub fn add_compute<C: Compute + 'static>(&mut self, compute: C) -> Result<ComputeHandle, Error> {
        self.modify.add_compute(compute)
    }
    pub fn add_fix(&mut self, fix: Box<dyn Fix>) {
        self.modify.add_fix(fix);
    }

    /// Initialize every compute in the order they were added. Collective.
    pub fn init(&mut self) -> Result<(), Error> {
        let handles: Vec<ComputeHandle> = self.modify.computes().cloned().collect();
        for handle in handles {
            let mut compute = handle
                .try_borrow_mut()
                .map_err(|_| Error::ComputeBusy(String::from("init")))?;
            compute.init(self)?;
        }
        Ok(())
    }

    /// Evaluate the scalar of the compute with the given id. Collective.
    pub fn compute_scalar(&mut self, id: &str) -> Result<f64, Error> {
        let handle = self.modify.find_compute(id)?;
        let mut compute = handle
            .try_borrow_mut()
            .map_err(|_| Error::ComputeBusy(String::from(id)))?;
        compute.compute_scalar(self)
    }
    /// Evaluate the tensor of the compute with the given id. Collective.
    pub fn compute_vector(&mut self, id: &str) -> Result<Tensor6, Error> {
        let handle = self.modify.find_compute(id)?;
        let mut compute = handle
            .try_borrow_mut()
            .map_err(|_| Error::ComputeBusy(String::from(id)))?;
        compute.compute_vector(self)
    }
}
