use std::ops::Deref;

use crate::Atoms;

/// How a bias decides which degrees of freedom it takes away
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiasKind {
    /// Removes the same number of degrees of freedom from every atom
    Uniform,
    /// Removes degrees of freedom from some atoms only, depending on where they are
    Regional,
}

/// Which degrees of freedom a bias is asked about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DofTarget {
    /// Per atom, for the system as a whole
    All,
    /// The atom at this local index
    Atom(usize),
}

/// A temperature compute that can take a reference velocity out of its atoms
/// and put it back afterwards.
///
/// `restore_bias_all` must follow every `remove_bias_all`, with no other
/// change to the velocities in between.
pub trait TemperatureBias {
    fn kind(&self) -> BiasKind;
    /// Number of degrees of freedom removed for `target`
    fn dof_remove(&self, atoms: &Atoms, target: DofTarget) -> usize;
    /// Remove the bias from the velocity `v` of atom `i`
    fn remove_bias(&mut self, atoms: &Atoms, i: usize, v: &mut [f64; 3]);
    /// Add back the bias taken by the last `remove_bias`
    fn restore_bias(&mut self, atoms: &Atoms, i: usize, v: &mut [f64; 3]);
    fn remove_bias_all(&mut self, atoms: &mut Atoms);
    fn restore_bias_all(&mut self, atoms: &mut Atoms);
}

/// Atoms with their bias removed for as long as the scope lives.
///
/// The bias is restored when the scope is dropped, including on early returns.
pub struct BiasScope<'a> {
    bias: Option<&'a mut dyn TemperatureBias>,
    atoms: &'a mut Atoms,
}
impl<'a> BiasScope<'a> {
    pub fn remove(mut bias: Option<&'a mut dyn TemperatureBias>, atoms: &'a mut Atoms) -> Self {
        if let Some(b) = bias.as_mut() {
            b.remove_bias_all(atoms);
        }
        Self { bias, atoms }
    }
}
impl Deref for BiasScope<'_> {
    type Target = Atoms;
    fn deref(&self) -> &Atoms {
        self.atoms
    }
}
impl Drop for BiasScope<'_> {
    fn drop(&mut self) {
        if let Some(b) = self.bias.as_mut() {
            b.restore_bias_all(self.atoms);
        }
    }
}
