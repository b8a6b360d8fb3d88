use tracing::info;

use super::{
    bias::{BiasKind, DofTarget, TemperatureBias},
    dof::DofAccountant,
    Compute, Tensor6,
};
use crate::{Atoms, Dimension, Error, Group, Simulation};

const STYLE: &str = "temp/partial";

/// Translational temperature using only some velocity components.
///
/// The excluded components are its velocity bias.
pub struct TempPartial {
    id: String,
    group: Group,
    /// Whether each of x, y and z is kept
    keep: [bool; 3],
    dimension: Dimension,
    dof: DofAccountant,
    vbias: [f64; 3],
    vbiasall: Vec<[f64; 3]>,
    scalar: f64,
    vector: Tensor6,
    invoked_scalar: Option<u64>,
    invoked_vector: Option<u64>,
}
impl TempPartial {
    pub fn new(id: &str, group: Group, keep: [bool; 3]) -> Self {
        Self {
            id: String::from(id),
            group,
            keep,
            dimension: Dimension::Three,
            dof: DofAccountant::new(),
            vbias: [0.0; 3],
            vbiasall: Vec::new(),
            scalar: 0.0,
            vector: [0.0; 6],
            invoked_scalar: None,
            invoked_vector: None,
        }
    }

    pub fn dof(&self) -> f64 {
        self.dof.dof()
    }
    pub fn set_extra_dof(&mut self, extra_dof: f64) {
        self.dof.set_extra_dof(extra_dof);
    }
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dof.set_dynamic(dynamic);
    }

    /// 1.0 for kept components, 0.0 for removed ones
    fn weights(&self) -> [f64; 3] {
        self.keep.map(|k| if k { 1.0 } else { 0.0 })
    }
    fn nper(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    fn dof_compute(&mut self, sim: &Simulation) -> Result<(), Error> {
        let natoms = sim.groups.count(&self.group, &sim.atoms, sim.comm())?;
        let nper = self.nper();
        // fixes remove dof from every dimension evenly
        let fix_share = self.dof.fix_dof() * (1.0 - nper as f64 / self.dimension.count() as f64);
        self.dof.update((nper * natoms) as f64, -fix_share, sim.units());
        Ok(())
    }
}

impl TemperatureBias for TempPartial {
    fn kind(&self) -> BiasKind {
        BiasKind::Uniform
    }
    fn dof_remove(&self, _atoms: &Atoms, _target: DofTarget) -> usize {
        self.dimension.count().saturating_sub(self.nper())
    }
    fn remove_bias(&mut self, _atoms: &Atoms, _i: usize, v: &mut [f64; 3]) {
        for k in 0..3 {
            if !self.keep[k] {
                self.vbias[k] = v[k];
                v[k] = 0.0;
            }
        }
    }
    fn restore_bias(&mut self, _atoms: &Atoms, _i: usize, v: &mut [f64; 3]) {
        for k in 0..3 {
            if !self.keep[k] {
                v[k] += self.vbias[k];
            }
        }
    }
    fn remove_bias_all(&mut self, atoms: &mut Atoms) {
        let bit = self.group.bit();
        self.vbiasall.resize(atoms.nlocal, [0.0; 3]);
        for i in 0..atoms.nlocal {
            if !atoms.in_group(i, bit) {
                continue;
            }
            for k in 0..3 {
                if !self.keep[k] {
                    self.vbiasall[i][k] = atoms.velocities[i][k];
                    atoms.velocities[i][k] = 0.0;
                }
            }
        }
    }
    fn restore_bias_all(&mut self, atoms: &mut Atoms) {
        let bit = self.group.bit();
        for i in 0..atoms.nlocal {
            if !atoms.in_group(i, bit) {
                continue;
            }
            for k in 0..3 {
                if !self.keep[k] {
                    atoms.velocities[i][k] += self.vbiasall[i][k];
                }
            }
        }
    }
}

impl Compute for TempPartial {
    fn id(&self) -> &str {
        &self.id
    }
    fn style(&self) -> &str {
        STYLE
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

    fn init(&mut self, sim: &Simulation) -> Result<(), Error> {
        self.dimension = sim.dimension();
        if self.dimension == Dimension::Two {
            self.keep[2] = false;
        }
        self.dof.set_fix_dof(sim.modify().fix_dof(&self.group) as f64);
        self.dof_compute(sim)?;
        info!(
            "Compute {} ({}) on group {}: dof = {}",
            self.id,
            STYLE,
            self.group.name(),
            self.dof.dof()
        );
        Ok(())
    }

    fn compute_scalar(&mut self, sim: &mut Simulation) -> Result<f64, Error> {
        self.invoked_scalar = Some(sim.ntimestep());
        let w = self.weights();
        let bit = self.group.bit();
        let atoms = &sim.atoms;
        let t: f64 = (0..atoms.nlocal)
            .filter(|&i| atoms.in_group(i, bit))
            .map(|i| {
                let v = &atoms.velocities[i];
                atoms.mass(i) * (w[0] * v[0] * v[0] + w[1] * v[1] * v[1] + w[2] * v[2] * v[2])
            })
            .sum();

        let total = sim.comm().all_reduce_sum(&[t])?;
        if self.dof.dynamic() {
            self.dof_compute(sim)?;
        }
        self.scalar = total[0] * self.dof.tfactor();
        Ok(self.scalar)
    }

    fn compute_vector(&mut self, sim: &mut Simulation) -> Result<Tensor6, Error> {
        self.invoked_vector = Some(sim.ntimestep());
        let w = self.weights();
        let bit = self.group.bit();
        let atoms = &sim.atoms;
        let mut t = [0.0; 6];
        for i in (0..atoms.nlocal).filter(|&i| atoms.in_group(i, bit)) {
            let massone = atoms.mass(i);
            let v = &atoms.velocities[i];
            t[0] += massone * w[0] * v[0] * v[0];
            t[1] += massone * w[1] * v[1] * v[1];
            t[2] += massone * w[2] * v[2] * v[2];
            t[3] += massone * w[0] * w[1] * v[0] * v[1];
            t[4] += massone * w[0] * w[2] * v[0] * v[2];
            t[5] += massone * w[1] * w[2] * v[1] * v[2];
        }

        let total = sim.comm().all_reduce_sum(&t)?;
        let mvv2e = sim.units().mvv2e;
        for (v, t) in self.vector.iter_mut().zip(total) {
            *v = t * mvv2e;
        }
        Ok(self.vector)
    }

    fn invoked_scalar(&self) -> Option<u64> {
        self.invoked_scalar
    }
    fn invoked_vector(&self) -> Option<u64> {
        self.invoked_vector
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{atoms::Ellipsoid, parallel::SerialComm};

    fn two_atoms(comm: &SerialComm) -> Simulation<'_> {
        let mut sim = Simulation::new(comm);
        for v in [[1.0, 2.0, 3.0], [-1.0, 0.5, 2.0]] {
            let i = sim
                .atoms
                .add_ellipsoid([0.0; 3], 2.0, Ellipsoid::sphere(1.0), 1);
            sim.atoms.set_velocity(i, v);
        }
        sim
    }

    #[test]
    fn drops_excluded_components() {
        let comm = SerialComm::new();
        let mut sim = two_atoms(&comm);
        let mut temp = TempPartial::new("p", sim.groups.all(), [true, true, false]);
        temp.init(&sim).unwrap();
        assert_eq!(temp.dof(), 4.0);
        assert_eq!(temp.dof_remove(&sim.atoms, DofTarget::All), 1);

        // 2 * (1 + 4) + 2 * (1 + 0.25)
        let scalar = temp.compute_scalar(&mut sim).unwrap();
        assert_relative_eq!(scalar, 12.5 / 4.0);

        let vector = temp.compute_vector(&mut sim).unwrap();
        assert_eq!(vector[2], 0.0);
        assert_eq!(vector[4], 0.0);
        assert_relative_eq!(vector[3], 2.0 * 2.0 + 2.0 * -0.5);
    }

    #[test]
    fn bias_round_trip_is_exact() {
        let comm = SerialComm::new();
        let mut sim = two_atoms(&comm);
        let before = sim.atoms.velocities.clone();
        let mut temp = TempPartial::new("p", sim.groups.all(), [false, true, true]);
        temp.init(&sim).unwrap();

        temp.remove_bias_all(&mut sim.atoms);
        assert_eq!(sim.atoms.velocities[0], [0.0, 2.0, 3.0]);
        temp.restore_bias_all(&mut sim.atoms);
        assert_eq!(sim.atoms.velocities, before);

        let mut v = before[1];
        temp.remove_bias(&sim.atoms, 1, &mut v);
        assert_eq!(v, [0.0, 0.5, 2.0]);
        temp.restore_bias(&sim.atoms, 1, &mut v);
        assert_eq!(v, before[1]);
    }

    #[test]
    fn two_dimensions_ignore_z() {
        let comm = SerialComm::new();
        let mut sim = two_atoms(&comm);
        sim.set_dimension(Dimension::Two);
        let mut temp = TempPartial::new("p", sim.groups.all(), [true, false, true]);
        temp.init(&sim).unwrap();
        assert_eq!(temp.dof(), 2.0);
        assert_eq!(temp.dof_remove(&sim.atoms, DofTarget::All), 1);
    }
}
