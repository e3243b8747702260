//! Multi-phase molar flow storage.

use crate::chemicals::Chemicals;
use crate::error::{ThermoError, ThermoResult};
use crate::indexer::{FlowData, check_lengths, index_error};
use crate::phase::{Phase, PhaseSet};
use std::cell::RefCell;
use std::rc::Rc;

/// Molar flows [kmol/hr] by phase and chemical.
///
/// Stored row-major: one row per phase of the phase set, in its canonical
/// order. Cloning aliases the storage.
#[derive(Debug, Clone)]
pub struct MaterialIndexer {
    chemicals: Rc<Chemicals>,
    phases: Rc<PhaseSet>,
    data: FlowData,
}

impl MaterialIndexer {
    pub fn new(chemicals: Rc<Chemicals>, phases: PhaseSet) -> Self {
        let data = vec![0.0; chemicals.len() * phases.len()];
        Self {
            chemicals,
            phases: Rc::new(phases),
            data: Rc::new(RefCell::new(data)),
        }
    }

    pub fn chemicals(&self) -> &Rc<Chemicals> {
        &self.chemicals
    }

    pub fn phases(&self) -> &PhaseSet {
        &self.phases
    }

    pub fn data_handle(&self) -> &FlowData {
        &self.data
    }

    pub fn phases_handle(&self) -> &Rc<PhaseSet> {
        &self.phases
    }

    fn width(&self) -> usize {
        self.chemicals.len()
    }

    pub fn phase_row(&self, phase: Phase) -> ThermoResult<Vec<f64>> {
        let row = self.phases.position(phase)?;
        let n = self.width();
        Ok(self.data.borrow()[row * n..(row + 1) * n].to_vec())
    }

    pub fn set_phase_row(&self, phase: Phase, values: &[f64]) -> ThermoResult<()> {
        let row = self.phases.position(phase)?;
        let n = self.width();
        check_lengths(n, values.len())?;
        self.data.borrow_mut()[row * n..(row + 1) * n].copy_from_slice(values);
        Ok(())
    }

    pub(crate) fn add_to_row(&self, row: usize, values: &[f64]) {
        let n = self.width();
        let mut data = self.data.borrow_mut();
        for (slot, v) in data[row * n..(row + 1) * n].iter_mut().zip(values) {
            *slot += v;
        }
    }

    pub fn get(&self, phase: Phase, index: usize) -> ThermoResult<f64> {
        let row = self.phases.position(phase)?;
        let n = self.width();
        if index >= n {
            return Err(index_error(index, n));
        }
        Ok(self.data.borrow()[row * n + index])
    }

    pub fn set(&self, phase: Phase, index: usize, value: f64) -> ThermoResult<()> {
        let row = self.phases.position(phase)?;
        let n = self.width();
        if index >= n {
            return Err(index_error(index, n));
        }
        self.data.borrow_mut()[row * n + index] = value;
        Ok(())
    }

    /// Per-chemical flows summed over phases.
    pub fn total_by_chemical(&self) -> Vec<f64> {
        let n = self.width();
        let mut totals = vec![0.0; n];
        for row in self.data.borrow().chunks(n) {
            for (t, v) in totals.iter_mut().zip(row) {
                *t += v;
            }
        }
        totals
    }

    pub fn phase_total(&self, phase: Phase) -> ThermoResult<f64> {
        Ok(self.phase_row(phase)?.iter().sum())
    }

    pub fn total(&self) -> f64 {
        self.data.borrow().iter().sum()
    }

    /// Phases with a nonzero net flow, paired with their rows.
    pub fn nonzero_phases(&self) -> Vec<(Phase, Vec<f64>)> {
        let n = self.width();
        let data = self.data.borrow();
        self.phases
            .iter()
            .zip(data.chunks(n))
            .filter(|(_, row)| row.iter().sum::<f64>() != 0.0)
            .map(|(phase, row)| (phase, row.to_vec()))
            .collect()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.borrow().clone()
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&self, factor: f64) {
        self.data.borrow_mut().iter_mut().for_each(|v| *v *= factor);
    }

    /// Zero every entry.
    pub fn clear(&self) {
        self.data.borrow_mut().iter_mut().for_each(|v| *v = 0.0);
    }

    /// New storage over `phases`. Rows of retained phases are carried over;
    /// rows of dropped phases are added to the first phase of the new set.
    pub fn reshape(&self, phases: &PhaseSet) -> MaterialIndexer {
        let reshaped = MaterialIndexer::new(Rc::clone(&self.chemicals), phases.clone());
        let n = self.width();
        let data = self.data.borrow();
        for (phase, row) in self.phases.iter().zip(data.chunks(n)) {
            let target = phases.position(phase).unwrap_or(0);
            reshaped.add_to_row(target, row);
        }
        reshaped
    }

    pub fn shares_data_with(&self, other: &MaterialIndexer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn shares_phases_with(&self, other: &MaterialIndexer) -> bool {
        Rc::ptr_eq(&self.phases, &other.phases)
    }

    fn check_layout(&self, other: &MaterialIndexer) -> ThermoResult<()> {
        if self.phases != other.phases || self.chemicals.len() != other.chemicals.len() {
            return Err(ThermoError::InvalidArg {
                what: format!(
                    "storage layouts differ: {} vs {}",
                    self.phases, other.phases
                ),
            });
        }
        Ok(())
    }

    pub fn link_data(&mut self, other: &MaterialIndexer) -> ThermoResult<()> {
        self.check_layout(other)?;
        self.data = Rc::clone(&other.data);
        Ok(())
    }

    pub fn link_phases(&mut self, other: &MaterialIndexer) -> ThermoResult<()> {
        self.check_layout(other)?;
        self.phases = Rc::clone(&other.phases);
        Ok(())
    }

    pub fn detach(&mut self) {
        let data = self.to_vec();
        self.data = Rc::new(RefCell::new(data));
        self.phases = Rc::new(PhaseSet::clone(&self.phases));
    }

    pub fn copy(&self) -> MaterialIndexer {
        let mut copy = self.clone();
        copy.detach();
        copy
    }

    /// Overwrite values in place, keeping every handle.
    pub fn copy_like(&self, other: &MaterialIndexer) -> ThermoResult<()> {
        self.check_layout(other)?;
        if !self.shares_data_with(other) {
            let values = other.to_vec();
            self.data.borrow_mut().copy_from_slice(&values);
        }
        Ok(())
    }
}
