//! Name-indexed set of faults sharing one grid.

use std::ops::Index;

use rustc_hash::FxHashMap;

use super::face::FaultRecord;
use super::fault::Fault;
use crate::error::{FaultError, Result};
use crate::grid::Grid;

/// Faults in insertion order with lookup by name.
#[derive(Clone, Debug, Default)]
pub struct FaultCollection<'g> {
    faults: Vec<Fault<'g>>,
    index: FxHashMap<String, usize>,
}

impl<'g> FaultCollection<'g> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Fault<'g>> {
        self.index.get(name).map(|&i| &self.faults[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Fault<'g>> {
        self.index.get(name).map(|&i| &mut self.faults[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Fault<'g>> {
        self.faults.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fault<'g>> {
        self.faults.iter()
    }

    pub fn add_fault(&mut self, fault: Fault<'g>) -> Result<()> {
        if self.contains(fault.name()) {
            return Err(FaultError::DuplicateFault(fault.name().to_string()));
        }
        self.index.insert(fault.name().to_string(), self.faults.len());
        self.faults.push(fault);
        Ok(())
    }

    /// Add `record` to the fault called `name`, creating the fault on first
    /// use. An invalid record leaves the collection unchanged.
    pub fn add_record(
        &mut self,
        grid: &'g dyn Grid,
        name: &str,
        record: &FaultRecord,
    ) -> Result<()> {
        if let Some(fault) = self.get_mut(name) {
            return fault.add_record(record);
        }
        let mut fault = Fault::new(grid, name);
        fault.add_record(record)?;
        self.add_fault(fault)
    }
}

impl<'g> Index<&str> for FaultCollection<'g> {
    type Output = Fault<'g>;

    fn index(&self, name: &str) -> &Self::Output {
        match self.get(name) {
            Some(fault) => fault,
            None => panic!("no fault named {name}"),
        }
    }
}

impl<'a, 'g> IntoIterator for &'a FaultCollection<'g> {
    type Item = &'a Fault<'g>;
    type IntoIter = std::slice::Iter<'a, Fault<'g>>;

    fn into_iter(self) -> Self::IntoIter {
        self.faults.iter()
    }
}
