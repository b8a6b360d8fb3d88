use serde::Deserialize;
use tracing::{debug, info};

use super::{
    bias::{BiasKind, BiasScope, TemperatureBias},
    dof::{bias_dof_removed, DofAccountant},
    Compute, ComputeHandle, Tensor6,
};
use crate::{
    atoms::Ellipsoid,
    utils::{length_squared, quat_to_mat, transpose_matvec},
    Atoms, Dimension, Error, Group, Groups, Simulation,
};

const STYLE: &str = "temp/asphere";

/// Construction settings for [`TempAsphere`]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TempAsphereConfig {
    pub id: String,
    pub group: String,
    /// Id of a temperature compute whose velocity bias is removed first
    #[serde(default)]
    pub bias: Option<String>,
    #[serde(default)]
    pub extra_dof: f64,
    #[serde(default)]
    pub dynamic: bool,
}

/// Temperature of a group of rigid ellipsoids, counting translational and
/// rotational kinetic energy.
pub struct TempAsphere {
    id: String,
    group: Group,
    bias_id: Option<String>,
    bias: Option<ComputeHandle>,
    bias_kind: Option<BiasKind>,
    dof: DofAccountant,
    initialized: bool,
    scalar: f64,
    vector: Tensor6,
    invoked_scalar: Option<u64>,
    invoked_vector: Option<u64>,
}
impl TempAsphere {
    pub fn new(id: &str, group: Group, bias_id: Option<&str>) -> Self {
        Self {
            id: String::from(id),
            group,
            bias_id: bias_id.map(String::from),
            bias: None,
            bias_kind: None,
            dof: DofAccountant::new(),
            initialized: false,
            scalar: 0.0,
            vector: [0.0; 6],
            invoked_scalar: None,
            invoked_vector: None,
        }
    }

    /// Build from command words: `ID group temp/asphere [bias-ID]`
    pub fn from_args(args: &[&str], groups: &Groups) -> Result<Self, Error> {
        let illegal = |reason: &str| Error::IllegalCommand {
            style: String::from(STYLE),
            reason: String::from(reason),
        };
        if args.len() != 3 && args.len() != 4 {
            return Err(illegal("expected: ID group temp/asphere [bias-ID]"));
        }
        if args[2] != STYLE {
            return Err(illegal("style should be temp/asphere"));
        }
        let group = groups.find(args[1])?;
        Ok(Self::new(args[0], group, args.get(3).copied()))
    }

    pub fn from_config(config: &TempAsphereConfig, groups: &Groups) -> Result<Self, Error> {
        let group = groups.find(&config.group)?;
        let mut compute = Self::new(&config.id, group, config.bias.as_deref());
        compute.set_extra_dof(config.extra_dof);
        compute.set_dynamic(config.dynamic);
        Ok(compute)
    }

    // Getters
    pub fn dof(&self) -> f64 {
        self.dof.dof()
    }
    pub fn tfactor(&self) -> f64 {
        self.dof.tfactor()
    }
    pub fn bias_id(&self) -> Option<&str> {
        self.bias_id.as_deref()
    }
    pub fn bias_kind(&self) -> Option<BiasKind> {
        self.bias_kind
    }

    // Setters
    pub fn set_extra_dof(&mut self, extra_dof: f64) {
        self.dof.set_extra_dof(extra_dof);
    }
    /// Recount the group atoms on every evaluation
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dof.set_dynamic(dynamic);
    }

    /// Scalar temperature, reusing the result if it was already computed this timestep
    pub fn scalar(&mut self, sim: &mut Simulation) -> Result<f64, Error> {
        if self.invoked_scalar == Some(sim.ntimestep()) {
            return Ok(self.scalar);
        }
        self.compute_scalar(sim)
    }
    /// Kinetic energy tensor, reusing the result if it was already computed this timestep
    pub fn vector(&mut self, sim: &mut Simulation) -> Result<Tensor6, Error> {
        if self.invoked_vector == Some(sim.ntimestep()) {
            return Ok(self.vector);
        }
        self.compute_vector(sim)
    }

    /// Remove the delegate's bias from the velocity `v` of atom `i`.
    ///
    /// Does nothing without a bias.
    pub fn remove_bias(&self, atoms: &Atoms, i: usize, v: &mut [f64; 3]) -> Result<(), Error> {
        if let Some(handle) = &self.bias {
            let mut bias = handle
                .try_borrow_mut()
                .map_err(|_| Error::ComputeBusy(self.bias_id.clone().unwrap_or_default()))?;
            if let Some(b) = bias.bias_mut() {
                b.remove_bias(atoms, i, v);
            }
        }
        Ok(())
    }
    /// Add back the bias taken by the last [`TempAsphere::remove_bias`]
    pub fn restore_bias(&self, atoms: &Atoms, i: usize, v: &mut [f64; 3]) -> Result<(), Error> {
        if let Some(handle) = &self.bias {
            let mut bias = handle
                .try_borrow_mut()
                .map_err(|_| Error::ComputeBusy(self.bias_id.clone().unwrap_or_default()))?;
            if let Some(b) = bias.bias_mut() {
                b.restore_bias(atoms, i, v);
            }
        }
        Ok(())
    }

    fn nper(dimension: Dimension) -> usize {
        match dimension {
            Dimension::Three => 6,
            Dimension::Two => 3,
        }
    }

    fn dof_compute(
        &mut self,
        sim: &Simulation,
        bias: Option<&dyn TemperatureBias>,
    ) -> Result<(), Error> {
        let natoms = sim.groups.count(&self.group, &sim.atoms, sim.comm())?;
        let nper = Self::nper(sim.dimension());
        let removed = bias_dof_removed(bias, &sim.atoms, &self.group, nper, natoms, sim.comm())?;
        self.dof.update((nper * natoms) as f64, removed, sim.units());
        Ok(())
    }

    /// Check that every local group member is a non-degenerate ellipsoid.
    /// Collective, so that every process fails together.
    fn check_particles(&self, sim: &Simulation) -> Result<(), Error> {
        let atoms = &sim.atoms;
        let bit = self.group.bit();
        let mut first = None;
        let mut bad = 0;
        for i in (0..atoms.nlocal).filter(|&i| atoms.in_group(i, bit)) {
            if let Err(e) = self.particle(atoms, i) {
                first.get_or_insert(e);
                bad += 1;
            }
        }
        self.agree(sim.comm().all_reduce_count(bad)?, first)
    }

    /// Turn a global count of bad particles into a result on every process
    fn agree(&self, bad_all: usize, local: Option<Error>) -> Result<(), Error> {
        match (bad_all, local) {
            (0, _) => Ok(()),
            (_, Some(e)) => Err(e),
            (count, None) => Err(Error::ParticleCheckFailed {
                compute: self.id.clone(),
                count,
            }),
        }
    }

    /// Ellipsoid and principal moments of atom `i`
    fn particle<'b>(&self, atoms: &'b Atoms, i: usize) -> Result<(&'b Ellipsoid, [f64; 3]), Error> {
        let ellipsoid = atoms.ellipsoid(i).ok_or_else(|| Error::PointParticle {
            compute: self.id.clone(),
            id: atoms.ids[i],
        })?;
        let inertia = ellipsoid.inertia(atoms.mass(i));
        if inertia.iter().any(|&m| !(m > 0.0 && m.is_finite())) {
            return Err(Error::DegenerateShape {
                compute: self.id.clone(),
                id: atoms.ids[i],
            });
        }
        Ok((ellipsoid, inertia))
    }

    /// Angular velocity of atom `i` in its body frame
    fn wbody(atoms: &Atoms, i: usize, ellipsoid: &Ellipsoid, inertia: &[f64; 3]) -> [f64; 3] {
        let rot = quat_to_mat(&ellipsoid.quat);
        let mut wbody = transpose_matvec(&rot, &atoms.angmom[i]);
        wbody[0] /= inertia[0];
        wbody[1] /= inertia[1];
        wbody[2] /= inertia[2];
        wbody
    }

    /// Local sum of m v^2 + I w^2, and the number of atoms that could not be summed
    fn scalar_sum(&self, atoms: &Atoms) -> (f64, Option<Error>, usize) {
        let bit = self.group.bit();
        let mut t = 0.0;
        let mut first = None;
        let mut bad = 0;
        for i in (0..atoms.nlocal).filter(|&i| atoms.in_group(i, bit)) {
            let (ellipsoid, inertia) = match self.particle(atoms, i) {
                Ok(p) => p,
                Err(e) => {
                    first.get_or_insert(e);
                    bad += 1;
                    continue;
                }
            };
            t += length_squared(&atoms.velocities[i]) * atoms.mass(i);

            let wbody = Self::wbody(atoms, i, ellipsoid, &inertia);
            t += inertia[0] * wbody[0] * wbody[0]
                + inertia[1] * wbody[1] * wbody[1]
                + inertia[2] * wbody[2] * wbody[2];
        }
        (t, first, bad)
    }

    /// Local kinetic energy tensor, and the number of atoms that could not be summed
    fn vector_sum(&self, atoms: &Atoms) -> (Tensor6, Option<Error>, usize) {
        let bit = self.group.bit();
        let mut t = [0.0; 6];
        let mut first = None;
        let mut bad = 0;
        for i in (0..atoms.nlocal).filter(|&i| atoms.in_group(i, bit)) {
            let (ellipsoid, inertia) = match self.particle(atoms, i) {
                Ok(p) => p,
                Err(e) => {
                    first.get_or_insert(e);
                    bad += 1;
                    continue;
                }
            };

            // translational
            let massone = atoms.mass(i);
            let v = &atoms.velocities[i];
            t[0] += massone * v[0] * v[0];
            t[1] += massone * v[1] * v[1];
            t[2] += massone * v[2] * v[2];
            t[3] += massone * v[0] * v[1];
            t[4] += massone * v[0] * v[2];
            t[5] += massone * v[1] * v[2];

            // rotational
            let wbody = Self::wbody(atoms, i, ellipsoid, &inertia);
            t[0] += inertia[0] * wbody[0] * wbody[0];
            t[1] += inertia[1] * wbody[1] * wbody[1];
            t[2] += inertia[2] * wbody[2] * wbody[2];
            t[3] += inertia[0] * wbody[0] * wbody[1];
            t[4] += inertia[1] * wbody[0] * wbody[2];
            t[5] += inertia[2] * wbody[1] * wbody[2];
        }
        (t, first, bad)
    }

    /// Sum `local` over processes, with the bad particle count riding along
    /// in the last slot so every process learns of a failure together.
    fn reduce(
        &self,
        sim: &Simulation,
        local: &[f64],
        first: Option<Error>,
        bad: usize,
    ) -> Result<Vec<f64>, Error> {
        let mut buf = local.to_vec();
        buf.push(bad as f64);
        let mut total = sim.comm().all_reduce_sum(&buf)?;
        let bad_all = total.pop().unwrap_or_default() as usize;
        self.agree(bad_all, first)?;
        Ok(total)
    }

    fn check_initialized(&self) -> Result<(), Error> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized(self.id.clone()))
        }
    }
}

impl Compute for TempAsphere {
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

    fn init(&mut self, sim: &Simulation) -> Result<(), Error> {
        // no point particles allowed, spheres are fine
        self.check_particles(sim)?;

        self.bias = None;
        self.bias_kind = None;
        if let Some(bias_id) = &self.bias_id {
            if *bias_id == self.id {
                return Err(Error::BiasSelfReference(self.id.clone()));
            }
            let handle = sim.modify().find_compute(bias_id)?;
            {
                let mut bias = handle
                    .try_borrow_mut()
                    .map_err(|_| Error::ComputeBusy(bias_id.clone()))?;
                if !bias.tempflag() {
                    return Err(Error::BiasNotTemperature(bias_id.clone()));
                }
                if !bias.tempbias() {
                    return Err(Error::BiasWithoutVelocityBias(bias_id.clone()));
                }
                if bias.group() != &self.group {
                    return Err(Error::BiasGroupMismatch {
                        bias: bias_id.clone(),
                        bias_group: String::from(bias.group().name()),
                        group: String::from(self.group.name()),
                    });
                }
                bias.init(sim)?;
                self.bias_kind = bias.bias().map(|b| b.kind());
            }
            debug!("{} uses {} as {:?} bias", self.id, bias_id, self.bias_kind);
            self.bias = Some(handle);
        }

        let fix_dof = sim.modify().fix_dof(&self.group);
        self.dof.set_fix_dof(fix_dof as f64);

        let bias = self.bias.clone();
        let bias_ref = match &bias {
            Some(h) => Some(
                h.try_borrow()
                    .map_err(|_| Error::ComputeBusy(self.bias_id.clone().unwrap_or_default()))?,
            ),
            None => None,
        };
        self.dof_compute(sim, bias_ref.as_ref().and_then(|b| b.bias()))?;
        self.initialized = true;

        info!(
            "Compute {} ({}) on group {}: dof = {}, tfactor = {}",
            self.id,
            STYLE,
            self.group.name(),
            self.dof.dof(),
            self.dof.tfactor()
        );
        Ok(())
    }

    fn compute_scalar(&mut self, sim: &mut Simulation) -> Result<f64, Error> {
        self.check_initialized()?;
        let ntimestep = sim.ntimestep();
        self.invoked_scalar = Some(ntimestep);

        let handle = self.bias.clone();
        let mut bias = match &handle {
            Some(h) => Some(
                h.try_borrow_mut()
                    .map_err(|_| Error::ComputeBusy(self.bias_id.clone().unwrap_or_default()))?,
            ),
            None => None,
        };
        if let Some(b) = bias.as_mut() {
            if b.invoked_scalar() != Some(ntimestep) {
                b.compute_scalar(sim)?;
            }
        }

        // sum translational and rotational energy for each particle
        let (t, first, bad) = {
            let scope = BiasScope::remove(bias.as_mut().and_then(|b| b.bias_mut()), &mut sim.atoms);
            self.scalar_sum(&scope)
        };

        let total = self.reduce(sim, &[t], first, bad)?;
        if self.dof.dynamic() || self.bias_kind == Some(BiasKind::Regional) {
            self.dof_compute(sim, bias.as_ref().and_then(|b| b.bias()))?;
        }
        self.scalar = total[0] * self.dof.tfactor();
        Ok(self.scalar)
    }

    fn compute_vector(&mut self, sim: &mut Simulation) -> Result<Tensor6, Error> {
        self.check_initialized()?;
        let ntimestep = sim.ntimestep();
        self.invoked_vector = Some(ntimestep);

        let handle = self.bias.clone();
        let mut bias = match &handle {
            Some(h) => Some(
                h.try_borrow_mut()
                    .map_err(|_| Error::ComputeBusy(self.bias_id.clone().unwrap_or_default()))?,
            ),
            None => None,
        };
        if let Some(b) = bias.as_mut() {
            if b.invoked_vector() != Some(ntimestep) {
                b.compute_vector(sim)?;
            }
        }

        let (t, first, bad) = {
            let scope = BiasScope::remove(bias.as_mut().and_then(|b| b.bias_mut()), &mut sim.atoms);
            self.vector_sum(&scope)
        };
        drop(bias);

        let total = self.reduce(sim, &t, first, bad)?;
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
