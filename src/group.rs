use crate::{parallel::Communicator, Atoms, Error};

const MAX_GROUP: usize = 32;

/// A named set of atoms, identified on each atom by one bit of its mask
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    name: String,
    index: usize,
}
impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn bit(&self) -> u32 {
        1 << self.index
    }
}

/// Registry of group names, with "all" always defined as group 0
#[derive(Clone, Debug)]
pub struct Groups {
    names: Vec<String>,
}
impl Groups {
    pub fn new() -> Self {
        Self {
            names: vec![String::from("all")],
        }
    }
    /// Define a new group or return the existing one with this name
    pub fn define(&mut self, name: &str) -> Result<Group, Error> {
        if let Ok(group) = self.find(name) {
            return Ok(group);
        }
        if self.names.len() == MAX_GROUP {
            return Err(Error::GroupLimit(MAX_GROUP));
        }
        self.names.push(String::from(name));
        Ok(Group {
            name: String::from(name),
            index: self.names.len() - 1,
        })
    }
    pub fn find(&self, name: &str) -> Result<Group, Error> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| Group {
                name: String::from(name),
                index,
            })
            .ok_or_else(|| Error::UnknownGroup(String::from(name)))
    }
    pub fn all(&self) -> Group {
        Group {
            name: String::from("all"),
            index: 0,
        }
    }

    /// Number of atoms in the group across every process.
    ///
    /// This is a collective call.
    pub fn count(
        &self,
        group: &Group,
        atoms: &Atoms,
        comm: &dyn Communicator,
    ) -> Result<usize, Error> {
        let bit = group.bit();
        let local = (0..atoms.nlocal)
            .filter(|&i| atoms.in_group(i, bit))
            .count();
        comm.all_reduce_count(local)
    }
}
impl Default for Groups {
    fn default() -> Self {
        Self::new()
    }
}
