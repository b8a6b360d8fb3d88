use tracing::{debug, warn};

use super::bias::{BiasKind, DofTarget, TemperatureBias};
use crate::{parallel::Communicator, Atoms, Group, Units};

/// Degree-of-freedom bookkeeping shared by the temperature computes
#[derive(Clone, Debug, PartialEq)]
pub struct DofAccountant {
    extra_dof: f64,
    fix_dof: f64,
    dynamic: bool,
    dof: f64,
    tfactor: f64,
}
impl DofAccountant {
    pub fn new() -> Self {
        Self {
            extra_dof: 0.0,
            fix_dof: 0.0,
            dynamic: false,
            dof: 0.0,
            tfactor: 0.0,
        }
    }

    pub fn dof(&self) -> f64 {
        self.dof
    }
    /// Factor turning a sum of m*v^2 terms into a temperature
    pub fn tfactor(&self) -> f64 {
        self.tfactor
    }
    pub fn extra_dof(&self) -> f64 {
        self.extra_dof
    }
    pub fn fix_dof(&self) -> f64 {
        self.fix_dof
    }
    /// Whether the atom count must be redone on every evaluation
    pub fn dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn set_extra_dof(&mut self, extra_dof: f64) {
        self.extra_dof = extra_dof;
    }
    pub fn set_fix_dof(&mut self, fix_dof: f64) {
        self.fix_dof = fix_dof;
    }
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    /// Set the count to `base - removed - extra - fix` and refresh the
    /// calibration factor, which is zero whenever the count is not positive.
    pub fn update(&mut self, base: f64, removed: f64, units: &Units) {
        self.dof = base - removed - self.extra_dof - self.fix_dof;
        if self.dof > 0.0 {
            self.tfactor = units.mvv2e / (self.dof * units.boltz);
        } else {
            warn!("Non-positive degrees of freedom ({}), temperature is zero", self.dof);
            self.tfactor = 0.0;
        }
        debug!(
            "dof = {} (base {}, bias {}, extra {}, fixes {}), tfactor = {}",
            self.dof, base, removed, self.extra_dof, self.fix_dof, self.tfactor
        );
    }
}
impl Default for DofAccountant {
    fn default() -> Self {
        Self::new()
    }
}

/// Degrees of freedom a bias removes from a group of `natoms` atoms with
/// `nper` degrees of freedom each.
///
/// A regional bias is asked atom by atom, which makes this a collective call.
pub fn bias_dof_removed(
    bias: Option<&dyn TemperatureBias>,
    atoms: &Atoms,
    group: &Group,
    nper: usize,
    natoms: usize,
    comm: &dyn Communicator,
) -> Result<f64, crate::Error> {
    let bias = match bias {
        Some(b) => b,
        None => return Ok(0.0),
    };
    match bias.kind() {
        BiasKind::Uniform => Ok((bias.dof_remove(atoms, DofTarget::All) * natoms) as f64),
        BiasKind::Regional => {
            let bit = group.bit();
            let count = (0..atoms.nlocal)
                .filter(|&i| atoms.in_group(i, bit))
                .filter(|&i| bias.dof_remove(atoms, DofTarget::Atom(i)) > 0)
                .count();
            let count_all = comm.all_reduce_count(count)?;
            Ok((nper * count_all) as f64)
        }
    }
}
