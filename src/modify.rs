use std::{cell::RefCell, rc::Rc};

use crate::{
    compute::{Compute, ComputeHandle},
    utils::KeyedVec,
    Error, Group,
};

/// A constraint that removes degrees of freedom from the atoms it acts on
pub trait Fix {
    fn id(&self) -> &str;
    /// Degrees of freedom this fix removes from atoms of `group`
    fn dof(&self, group: &Group) -> usize;
}

/// Registry of the computes and fixes defined for a simulation
pub struct Modify {
    computes: KeyedVec<String, ComputeHandle>,
    fixes: Vec<Box<dyn Fix>>,
}
impl Modify {
    pub fn new() -> Self {
        Self {
            computes: KeyedVec::new(),
            fixes: Vec::new(),
        }
    }

    pub fn add_compute<C: Compute + 'static>(&mut self, compute: C) -> Result<ComputeHandle, Error> {
        let id = String::from(compute.id());
        let handle: ComputeHandle = Rc::new(RefCell::new(compute));
        self.computes
            .add(id, handle.clone())
            .map_err(|(id, _)| Error::DuplicateCompute(id))?;
        Ok(handle)
    }
    pub fn find_compute(&self, id: &str) -> Result<ComputeHandle, Error> {
        self.computes
            .get(&String::from(id))
            .cloned()
            .ok_or_else(|| Error::ComputeNotFound(String::from(id)))
    }
    pub fn computes(&self) -> impl Iterator<Item = &ComputeHandle> {
        self.computes.values()
    }

    pub fn add_fix(&mut self, fix: Box<dyn Fix>) {
        self.fixes.push(fix);
    }
    pub fn fixes(&self) -> &Vec<Box<dyn Fix>> {
        &self.fixes
    }
    /// Degrees of freedom removed from `group` by all fixes together
    pub fn fix_dof(&self, group: &Group) -> usize {
        self.fixes.iter().map(|f| f.dof(group)).sum()
    }
}
impl Default for Modify {
    fn default() -> Self {
        Self::new()
    }
}
