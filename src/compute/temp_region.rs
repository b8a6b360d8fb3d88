use tracing::info;

use super::{
    bias::{BiasKind, DofTarget, TemperatureBias},
    dof::DofAccountant,
    Compute, Tensor6,
};
use crate::{region::Region, utils::length_squared, Atoms, Error, Group, Simulation};

const STYLE: &str = "temp/region";

/// Translational temperature of the group atoms inside a region.
///
/// The whole velocity of atoms outside the region is its velocity bias, so
/// the degrees of freedom it removes depend on where each atom is.
pub struct TempRegion {
    id: String,
    group: Group,
    region: Box<dyn Region>,
    nper: usize,
    dof: DofAccountant,
    vbias: [f64; 3],
    vbiasall: Vec<[f64; 3]>,
    scalar: f64,
    vector: Tensor6,
    invoked_scalar: Option<u64>,
    invoked_vector: Option<u64>,
}
impl TempRegion {
    pub fn new(id: &str, group: Group, region: Box<dyn Region>) -> Self {
        Self {
            id: String::from(id),
            group,
            region,
            nper: 3,
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

    fn inside(&self, atoms: &Atoms, i: usize) -> bool {
        self.region.contains(&atoms.positions[i])
    }
}

impl TemperatureBias for TempRegion {
    fn kind(&self) -> BiasKind {
        BiasKind::Regional
    }
    fn dof_remove(&self, atoms: &Atoms, target: DofTarget) -> usize {
        match target {
            DofTarget::All => 0,
            DofTarget::Atom(i) => usize::from(!self.inside(atoms, i)),
        }
    }
    fn remove_bias(&mut self, atoms: &Atoms, i: usize, v: &mut [f64; 3]) {
        if self.inside(atoms, i) {
            self.vbias = [0.0; 3];
        } else {
            self.vbias = *v;
            *v = [0.0; 3];
        }
    }
    fn restore_bias(&mut self, _atoms: &Atoms, _i: usize, v: &mut [f64; 3]) {
        for k in 0..3 {
            v[k] += self.vbias[k];
        }
    }
    fn remove_bias_all(&mut self, atoms: &mut Atoms) {
        let bit = self.group.bit();
        self.vbiasall.resize(atoms.nlocal, [0.0; 3]);
        for i in 0..atoms.nlocal {
            if atoms.in_group(i, bit) && !self.inside(atoms, i) {
                self.vbiasall[i] = atoms.velocities[i];
                atoms.velocities[i] = [0.0; 3];
            }
        }
    }
    fn restore_bias_all(&mut self, atoms: &mut Atoms) {
        let bit = self.group.bit();
        // positions do not move between removal and restoration
        for i in 0..atoms.nlocal {
            if atoms.in_group(i, bit) && !self.inside(atoms, i) {
                for k in 0..3 {
                    atoms.velocities[i][k] += self.vbiasall[i][k];
                }
            }
        }
    }
}

impl Compute for TempRegion {
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
        self.nper = sim.dimension().count();
        info!(
            "Compute {} ({}) on group {}",
            self.id,
            STYLE,
            self.group.name()
        );
        Ok(())
    }

    fn compute_scalar(&mut self, sim: &mut Simulation) -> Result<f64, Error> {
        self.invoked_scalar = Some(sim.ntimestep());
        let bit = self.group.bit();
        let atoms = &sim.atoms;
        let mut count = 0.0;
        let mut t = 0.0;
        for i in (0..atoms.nlocal).filter(|&i| atoms.in_group(i, bit) && self.inside(atoms, i)) {
            count += 1.0;
            t += atoms.mass(i) * length_squared(&atoms.velocities[i]);
        }

        // the atom count changes as atoms cross the region boundary
        let total = sim.comm().all_reduce_sum(&[count, t])?;
        self.dof.update(self.nper as f64 * total[0], 0.0, sim.units());
        self.scalar = total[1] * self.dof.tfactor();
        Ok(self.scalar)
    }

    fn compute_vector(&mut self, sim: &mut Simulation) -> Result<Tensor6, Error> {
        self.invoked_vector = Some(sim.ntimestep());
        let bit = self.group.bit();
        let atoms = &sim.atoms;
        let mut t = [0.0; 6];
        for i in (0..atoms.nlocal).filter(|&i| atoms.in_group(i, bit) && self.inside(atoms, i)) {
            let massone = atoms.mass(i);
            let v = &atoms.velocities[i];
            t[0] += massone * v[0] * v[0];
            t[1] += massone * v[1] * v[1];
            t[2] += massone * v[2] * v[2];
            t[3] += massone * v[0] * v[1];
            t[4] += massone * v[0] * v[2];
            t[5] += massone * v[1] * v[2];
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
