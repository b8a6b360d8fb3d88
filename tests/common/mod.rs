#![allow(dead_code)]

use std::{cell::Cell, rc::Rc};

use asphere::compute::{BiasKind, DofTarget, Tensor6, TemperatureBias};
use asphere::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform bias subtracting a constant streaming velocity
pub struct Drift {
    id: String,
    group: Group,
    stream: [f64; 3],
    evaluations: Rc<Cell<usize>>,
    invoked_scalar: Option<u64>,
    invoked_vector: Option<u64>,
}
impl Drift {
    pub fn new(id: &str, group: Group, stream: [f64; 3]) -> Self {
        Self {
            id: String::from(id),
            group,
            stream,
            evaluations: Rc::new(Cell::new(0)),
            invoked_scalar: None,
            invoked_vector: None,
        }
    }
    /// Shared count of scalar and tensor evaluations
    pub fn evaluations(&self) -> Rc<Cell<usize>> {
        self.evaluations.clone()
    }
}
impl TemperatureBias for Drift {
    fn kind(&self) -> BiasKind {
        BiasKind::Uniform
    }
    fn dof_remove(&self, _atoms: &Atoms, _target: DofTarget) -> usize {
        1
    }
    fn remove_bias(&mut self, _atoms: &Atoms, _i: usize, v: &mut [f64; 3]) {
        for k in 0..3 {
            v[k] -= self.stream[k];
        }
    }
    fn restore_bias(&mut self, _atoms: &Atoms, _i: usize, v: &mut [f64; 3]) {
        for k in 0..3 {
            v[k] += self.stream[k];
        }
    }
    fn remove_bias_all(&mut self, atoms: &mut Atoms) {
        let bit = self.group.bit();
        for i in 0..atoms.nlocal {
            if atoms.in_group(i, bit) {
                for k in 0..3 {
                    atoms.velocities[i][k] -= self.stream[k];
                }
            }
        }
    }
    fn restore_bias_all(&mut self, atoms: &mut Atoms) {
        let bit = self.group.bit();
        for i in 0..atoms.nlocal {
            if atoms.in_group(i, bit) {
                for k in 0..3 {
                    atoms.velocities[i][k] += self.stream[k];
                }
            }
        }
    }
}
impl Compute for Drift {
    fn id(&self) -> &str {
        &self.id
    }
    fn style(&self) -> &str {
        "drift"
    }
    fn group(&self) -> &Group {
        &self.group
    }
    fn tempflag(&self) -> bool {
        true
    }
    fn bias(&self) -> Option<&dyn TemperatureBias> {
        Some(self)
    }
    fn bias_mut(&mut self) -> Option<&mut dyn TemperatureBias> {
        Some(self)
    }
    fn init(&mut self, _sim: &Simulation) -> Result<(), Error> {
        Ok(())
    }
    fn compute_scalar(&mut self, sim: &mut Simulation) -> Result<f64, Error> {
        self.invoked_scalar = Some(sim.ntimestep());
        self.evaluations.set(self.evaluations.get() + 1);
        Ok(0.0)
    }
    fn compute_vector(&mut self, sim: &mut Simulation) -> Result<Tensor6, Error> {
        self.invoked_vector = Some(sim.ntimestep());
        self.evaluations.set(self.evaluations.get() + 1);
        Ok([0.0; 6])
    }
    fn invoked_scalar(&self) -> Option<u64> {
        self.invoked_scalar
    }
    fn invoked_vector(&self) -> Option<u64> {
        self.invoked_vector
    }
}

/// Counts group atoms; not a temperature
pub struct Census {
    id: String,
    group: Group,
    invoked: Option<u64>,
}
impl Census {
    pub fn new(id: &str, group: Group) -> Self {
        Self {
            id: String::from(id),
            group,
            invoked: None,
        }
    }
}
impl Compute for Census {
    fn id(&self) -> &str {
        &self.id
    }
    fn style(&self) -> &str {
        "census"
    }
    fn group(&self) -> &Group {
        &self.group
    }
    fn init(&mut self, _sim: &Simulation) -> Result<(), Error> {
        Ok(())
    }
    fn compute_scalar(&mut self, sim: &mut Simulation) -> Result<f64, Error> {
        self.invoked = Some(sim.ntimestep());
        Ok(sim.groups.count(&self.group, &sim.atoms, sim.comm())? as f64)
    }
    fn compute_vector(&mut self, _sim: &mut Simulation) -> Result<Tensor6, Error> {
        Ok([0.0; 6])
    }
    fn invoked_scalar(&self) -> Option<u64> {
        self.invoked
    }
    fn invoked_vector(&self) -> Option<u64> {
        None
    }
}

/// Constraint removing a fixed number of degrees of freedom from every group
pub struct Freeze {
    pub dof: usize,
}
impl Fix for Freeze {
    fn id(&self) -> &str {
        "freeze"
    }
    fn dof(&self, _group: &Group) -> usize {
        self.dof
    }
}

/// `n` randomly shaped, oriented and placed ellipsoids with thermal velocities
pub fn random_ellipsoids(n: usize, seed: u64) -> Atoms {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut atoms = Atoms::new();
    for _ in 0..n {
        let shape = [
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
        ];
        let q: [f64; 4] = [
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        let norm = q.iter().map(|x| x * x).sum::<f64>().sqrt();
        let quat = q.map(|x| x / norm);
        let position = [
            rng.gen_range(0.0..10.0),
            rng.gen_range(0.0..10.0),
            rng.gen_range(0.0..10.0),
        ];
        let mass = rng.gen_range(1.0..3.0);
        atoms.add_ellipsoid(position, mass, Ellipsoid::new(shape, quat), 1);
    }
    atoms.set_temperature(1.5, &mut rng);
    atoms
}
