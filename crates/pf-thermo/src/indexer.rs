//! Molar flow storage with cached mass and volumetric views.
//!
//! Every facet of an indexer (molar data, phase tag, view cache) is a
//! reference-counted handle, so several indexers can alias any subset of
//! them. A cached view records the handles it was built from and is only
//! reused while the indexer still holds those same handles.

use crate::chemicals::Chemicals;
use crate::error::{ThermoError, ThermoResult};
use crate::material::MaterialIndexer;
use crate::mixture::Mixture;
use crate::phase::{Phase, PhaseSet};
use crate::thermal::ThermalHandle;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub type FlowData = Rc<RefCell<Vec<f64>>>;
pub type PhaseHandle = Rc<RefCell<Phase>>;

/// Identity comparison that also works for trait objects.
pub fn same_handle<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Flow basis of a derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    /// kmol/hr
    Molar,
    /// kg/hr
    Mass,
    /// m³/hr
    Volumetric,
}

impl Basis {
    pub fn canonical_units(self) -> &'static str {
        match self {
            Basis::Molar => "kmol/hr",
            Basis::Mass => "kg/hr",
            Basis::Volumetric => "m3/hr",
        }
    }
}

#[derive(Debug)]
enum Factors {
    Constant(Vec<f64>),
    Volume {
        phase: PhaseHandle,
        thermal: ThermalHandle,
        mixture: Rc<dyn Mixture>,
    },
}

/// A mass or volumetric view over molar data.
///
/// Reads multiply the molar entries by a per-chemical factor; writes divide
/// by it and land in the molar data.
#[derive(Debug)]
pub struct FlowView {
    basis: Basis,
    data: FlowData,
    factors: Factors,
}

impl FlowView {
    pub fn basis(&self) -> Basis {
        self.basis
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the view reads from `data`.
    pub fn is_bound_to(&self, data: &FlowData) -> bool {
        Rc::ptr_eq(&self.data, data)
    }

    fn factors(&self) -> ThermoResult<Vec<f64>> {
        match &self.factors {
            Factors::Constant(f) => Ok(f.clone()),
            Factors::Volume {
                phase,
                thermal,
                mixture,
            } => {
                let tc = *thermal.borrow();
                let volumes = mixture.molar_volumes(*phase.borrow(), tc.t, tc.p)?;
                // m³/mol -> m³/kmol
                Ok(volumes.into_iter().map(|v| 1000.0 * v).collect())
            }
        }
    }

    pub fn to_vec(&self) -> ThermoResult<Vec<f64>> {
        let factors = self.factors()?;
        Ok(self
            .data
            .borrow()
            .iter()
            .zip(&factors)
            .map(|(n, f)| n * f)
            .collect())
    }

    pub fn get(&self, index: usize) -> ThermoResult<f64> {
        let factors = self.factors()?;
        let data = self.data.borrow();
        match (data.get(index), factors.get(index)) {
            (Some(n), Some(f)) => Ok(n * f),
            _ => Err(index_error(index, data.len())),
        }
    }

    pub fn values_at(&self, indices: &[usize]) -> ThermoResult<Vec<f64>> {
        let all = self.to_vec()?;
        indices
            .iter()
            .map(|&i| all.get(i).copied().ok_or_else(|| index_error(i, all.len())))
            .collect()
    }

    pub fn sum(&self) -> ThermoResult<f64> {
        Ok(self.to_vec()?.iter().sum())
    }

    pub fn set(&self, index: usize, value: f64) -> ThermoResult<()> {
        self.set_values_at(&[index], &[value])
    }

    pub fn set_values_at(&self, indices: &[usize], values: &[f64]) -> ThermoResult<()> {
        check_lengths(indices.len(), values.len())?;
        let factors = self.factors()?;
        let mut data = self.data.borrow_mut();
        for (&i, v) in indices.iter().zip(values) {
            let len = data.len();
            let f = factors.get(i).copied().ok_or_else(|| index_error(i, len))?;
            data[i] = v / f;
        }
        Ok(())
    }

    pub fn set_all(&self, values: &[f64]) -> ThermoResult<()> {
        let indices: Vec<usize> = (0..self.len()).collect();
        self.set_values_at(&indices, values)
    }
}

#[derive(Debug, Default)]
pub struct ViewCache {
    mass: Option<Rc<FlowView>>,
    volume: Option<Rc<FlowView>>,
}

impl ViewCache {
    pub fn is_empty(&self) -> bool {
        self.mass.is_none() && self.volume.is_none()
    }
}

/// Single-phase molar flows [kmol/hr] over a chemical registry.
///
/// Cloning aliases every facet; use [`MolarFlowIndexer::copy`] for
/// independent storage.
#[derive(Debug, Clone)]
pub struct MolarFlowIndexer {
    chemicals: Rc<Chemicals>,
    data: FlowData,
    phase: PhaseHandle,
    cache: Rc<RefCell<ViewCache>>,
}

impl MolarFlowIndexer {
    /// All-zero flows.
    pub fn new(chemicals: Rc<Chemicals>, phase: Phase) -> Self {
        let data = vec![0.0; chemicals.len()];
        Self::build(chemicals, data, phase)
    }

    pub fn from_data(chemicals: Rc<Chemicals>, data: Vec<f64>, phase: Phase) -> ThermoResult<Self> {
        check_lengths(chemicals.len(), data.len())?;
        Ok(Self::build(chemicals, data, phase))
    }

    fn build(chemicals: Rc<Chemicals>, data: Vec<f64>, phase: Phase) -> Self {
        Self {
            chemicals,
            data: Rc::new(RefCell::new(data)),
            phase: Rc::new(RefCell::new(phase)),
            cache: Rc::default(),
        }
    }

    pub fn chemicals(&self) -> &Rc<Chemicals> {
        &self.chemicals
    }

    pub fn len(&self) -> usize {
        self.chemicals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chemicals.is_empty()
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Write the phase tag in place, visible to every indexer sharing it.
    pub fn set_phase(&self, phase: Phase) {
        *self.phase.borrow_mut() = phase;
    }

    pub fn data(&self) -> Ref<'_, Vec<f64>> {
        self.data.borrow()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.borrow().clone()
    }

    pub fn get(&self, index: usize) -> ThermoResult<f64> {
        let data = self.data.borrow();
        data.get(index)
            .copied()
            .ok_or_else(|| index_error(index, data.len()))
    }

    pub fn set(&self, index: usize, value: f64) -> ThermoResult<()> {
        self.set_values_at(&[index], &[value])
    }

    pub fn values_at(&self, indices: &[usize]) -> ThermoResult<Vec<f64>> {
        indices.iter().map(|&i| self.get(i)).collect()
    }

    pub fn set_values_at(&self, indices: &[usize], values: &[f64]) -> ThermoResult<()> {
        check_lengths(indices.len(), values.len())?;
        let mut data = self.data.borrow_mut();
        for (&i, v) in indices.iter().zip(values) {
            let len = data.len();
            *data.get_mut(i).ok_or_else(|| index_error(i, len))? = *v;
        }
        Ok(())
    }

    pub fn set_all(&self, values: &[f64]) -> ThermoResult<()> {
        check_lengths(self.len(), values.len())?;
        self.data.borrow_mut().copy_from_slice(values);
        Ok(())
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&self, factor: f64) {
        self.data.borrow_mut().iter_mut().for_each(|n| *n *= factor);
    }

    pub fn total(&self) -> f64 {
        self.data.borrow().iter().sum()
    }

    pub fn data_handle(&self) -> &FlowData {
        &self.data
    }

    pub fn phase_handle(&self) -> &PhaseHandle {
        &self.phase
    }

    pub fn shares_data_with(&self, other: &MolarFlowIndexer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn shares_phase_with(&self, other: &MolarFlowIndexer) -> bool {
        Rc::ptr_eq(&self.phase, &other.phase)
    }

    pub fn shares_cache_with(&self, other: &MolarFlowIndexer) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }

    /// Alias `other`'s molar data.
    pub fn link_data(&mut self, other: &MolarFlowIndexer) {
        self.data = Rc::clone(&other.data);
    }

    /// Alias `other`'s phase tag.
    pub fn link_phase(&mut self, other: &MolarFlowIndexer) {
        self.phase = Rc::clone(&other.phase);
    }

    pub fn share_cache_with(&mut self, other: &MolarFlowIndexer) {
        self.cache = Rc::clone(&other.cache);
    }

    /// Drop the cached views, for every indexer sharing this cache.
    pub fn clear_cache(&self) {
        *self.cache.borrow_mut() = ViewCache::default();
    }

    /// Switch to a fresh cache that is not shared with anyone.
    pub fn reset_cache(&mut self) {
        self.cache = Rc::default();
    }

    /// Replace every handle with an independent copy of its current value.
    pub fn detach(&mut self) {
        let data = self.to_vec();
        let phase = self.phase();
        self.data = Rc::new(RefCell::new(data));
        self.phase = Rc::new(RefCell::new(phase));
        self.cache = Rc::default();
    }

    /// Independent indexer with the same values.
    pub fn copy(&self) -> MolarFlowIndexer {
        Self::build(Rc::clone(&self.chemicals), self.to_vec(), self.phase())
    }

    /// Overwrite values in place, keeping every handle.
    pub fn copy_like(&self, other: &MolarFlowIndexer) -> ThermoResult<()> {
        if !Rc::ptr_eq(&self.data, &other.data) {
            let values = other.to_vec();
            self.set_all(&values)?;
        }
        self.set_phase(other.phase());
        Ok(())
    }

    /// Mass view [kg/hr], cached while the data and phase handles are unchanged.
    pub fn by_mass(&self) -> Rc<FlowView> {
        if let Some(view) = &self.cache.borrow().mass {
            if view.is_bound_to(&self.data) {
                return Rc::clone(view);
            }
        }
        tracing::trace!("building mass flow view");
        let view = Rc::new(FlowView {
            basis: Basis::Mass,
            data: Rc::clone(&self.data),
            factors: Factors::Constant(self.chemicals.mw()),
        });
        self.cache.borrow_mut().mass = Some(Rc::clone(&view));
        view
    }

    /// Volumetric view [m³/hr] evaluated at the state behind `thermal`.
    pub fn by_volume(&self, thermal: &ThermalHandle, mixture: &Rc<dyn Mixture>) -> Rc<FlowView> {
        if let Some(view) = &self.cache.borrow().volume {
            if let Factors::Volume {
                phase,
                thermal: tc,
                mixture: mix,
            } = &view.factors
            {
                if view.is_bound_to(&self.data)
                    && Rc::ptr_eq(phase, &self.phase)
                    && Rc::ptr_eq(tc, thermal)
                    && same_handle(mix, mixture)
                {
                    return Rc::clone(view);
                }
            }
        }
        tracing::trace!("building volumetric flow view");
        let view = Rc::new(FlowView {
            basis: Basis::Volumetric,
            data: Rc::clone(&self.data),
            factors: Factors::Volume {
                phase: Rc::clone(&self.phase),
                thermal: Rc::clone(thermal),
                mixture: Rc::clone(mixture),
            },
        });
        self.cache.borrow_mut().volume = Some(Rc::clone(&view));
        view
    }

    pub fn has_cached_views(&self) -> bool {
        !self.cache.borrow().is_empty()
    }

    /// Multi-phase storage holding this indexer's flows in the row of its
    /// phase, or in the first row when the phase is not part of `phases`.
    pub fn to_material_indexer(&self, phases: &PhaseSet) -> MaterialIndexer {
        let imol = MaterialIndexer::new(Rc::clone(&self.chemicals), phases.clone());
        let row = phases.position(self.phase()).unwrap_or(0);
        imol.add_to_row(row, &self.data.borrow());
        imol
    }
}

pub(crate) fn check_lengths(expected: usize, actual: usize) -> ThermoResult<()> {
    if expected != actual {
        return Err(ThermoError::InvalidArg {
            what: format!("expected {expected} values, got {actual}"),
        });
    }
    Ok(())
}

pub(crate) fn index_error(index: usize, len: usize) -> ThermoError {
    ThermoError::InvalidArg {
        what: format!("index {index} out of range for {len} chemicals"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixture::IdealMixture;
    use crate::thermal::ThermalCondition;

    fn chems() -> Rc<Chemicals> {
        Rc::new(Chemicals::from_catalog(&["Water", "Ethanol"]).unwrap())
    }

    fn indexer(values: &[f64]) -> MolarFlowIndexer {
        MolarFlowIndexer::from_data(chems(), values.to_vec(), Phase::Liquid).unwrap()
    }

    #[test]
    fn mass_view_reads_and_writes_through() {
        let imol = indexer(&[10.0, 5.0]);
        let mass = imol.by_mass();
        let expected = 10.0 * 18.015_28;
        assert!((mass.get(0).unwrap() - expected).abs() < 1e-9);

        mass.set(1, 46.068_44).unwrap();
        assert!((imol.get(1).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mass_view_is_cached_until_data_handle_changes() {
        let mut imol = indexer(&[1.0, 2.0]);
        let first = imol.by_mass();
        assert!(Rc::ptr_eq(&first, &imol.by_mass()));

        let other = indexer(&[3.0, 4.0]);
        imol.link_data(&other);
        let rebuilt = imol.by_mass();
        assert!(!Rc::ptr_eq(&first, &rebuilt));
        assert!((rebuilt.get(0).unwrap() - 3.0 * 18.015_28).abs() < 1e-9);
    }

    #[test]
    fn volume_view_tracks_phase_and_state() {
        let imol = indexer(&[1.0, 0.0]);
        let thermal = ThermalCondition::default().into_handle();
        let mixture: Rc<dyn Mixture> = Rc::new(IdealMixture::new(Rc::clone(imol.chemicals())));
        let vol = imol.by_volume(&thermal, &mixture);
        assert!((vol.get(0).unwrap() - 1000.0 * 1.807e-5).abs() < 1e-12);

        imol.set_phase(Phase::Gas);
        let v_gas = vol.get(0).unwrap();
        assert!((v_gas - 1000.0 * 8.314_462_618 * 298.15 / 101_325.0).abs() < 1e-9);
        assert!(Rc::ptr_eq(&vol, &imol.by_volume(&thermal, &mixture)));

        let other_thermal = ThermalCondition::default().into_handle();
        assert!(!Rc::ptr_eq(&vol, &imol.by_volume(&other_thermal, &mixture)));
    }

    #[test]
    fn link_and_detach() {
        let a = indexer(&[1.0, 2.0]);
        let mut b = indexer(&[0.0, 0.0]);
        b.link_data(&a);
        b.link_phase(&a);
        assert!(b.shares_data_with(&a) && b.shares_phase_with(&a));

        a.set(0, 7.0).unwrap();
        assert_eq!(b.get(0).unwrap(), 7.0);

        b.detach();
        assert!(!b.shares_data_with(&a));
        a.set(0, 8.0).unwrap();
        assert_eq!(b.get(0).unwrap(), 7.0);
    }

    #[test]
    fn reset_cache_unshares() {
        let a = indexer(&[1.0, 2.0]);
        let mut b = indexer(&[1.0, 2.0]);
        b.share_cache_with(&a);
        assert!(b.shares_cache_with(&a));
        b.reset_cache();
        assert!(!b.shares_cache_with(&a));
    }

    #[test]
    fn clear_cache_empties_shared_cache() {
        let a = indexer(&[1.0, 2.0]);
        let mut b = indexer(&[1.0, 2.0]);
        b.share_cache_with(&a);
        a.by_mass();
        assert!(b.has_cached_views());
        b.clear_cache();
        assert!(!a.has_cached_views());
    }

    #[test]
    fn copy_like_preserves_aliases() {
        let a = indexer(&[0.0, 0.0]);
        let alias = a.clone();
        let src = indexer(&[4.0, 5.0]);
        src.set_phase(Phase::Gas);
        a.copy_like(&src).unwrap();
        assert_eq!(alias.to_vec(), vec![4.0, 5.0]);
        assert_eq!(alias.phase(), Phase::Gas);
        assert!(!a.shares_data_with(&src));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(MolarFlowIndexer::from_data(chems(), vec![1.0], Phase::Liquid).is_err());
        let imol = indexer(&[1.0, 2.0]);
        assert!(imol.set_values_at(&[0, 1], &[1.0]).is_err());
        assert!(imol.get(5).is_err());
    }

    #[test]
    fn material_indexer_from_single_phase() {
        let imol = indexer(&[1.0, 2.0]);
        let multi = imol.to_material_indexer(&PhaseSet::vle());
        assert_eq!(multi.phase_row(Phase::Liquid).unwrap(), vec![1.0, 2.0]);
        assert_eq!(multi.phase_row(Phase::Gas).unwrap(), vec![0.0, 0.0]);

        imol.set_phase(Phase::Solid);
        let multi = imol.to_material_indexer(&PhaseSet::vle());
        assert_eq!(multi.phase_row(Phase::Gas).unwrap(), vec![1.0, 2.0]);
    }
}
