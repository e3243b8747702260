//! The material stream and its flow accessors.

use crate::builder::StreamBuilder;
use crate::error::{StreamError, StreamResult};
use crate::resolver::resolve;
use pf_thermo::{
    Basis, Chemicals, MaterialIndexer, MolarFlowIndexer, Phase, ThermalCondition, ThermalHandle,
    Thermo, Vle,
};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Capability set of a stream. A stream starts single-phase and may be cast
/// to multi-phase once; the cast is never undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Single,
    Multi,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Single => write!(f, "Stream"),
            StreamKind::Multi => write!(f, "MultiStream"),
        }
    }
}

#[derive(Debug)]
pub(crate) enum FlowStore {
    Single(MolarFlowIndexer),
    Multi {
        imol: MaterialIndexer,
        vle: Option<Rc<Vle>>,
    },
}

/// A material flow: molar flows over a chemical registry, a phase, and a
/// thermal condition.
///
/// The thermal condition, the molar data and the phase tag are handles that
/// can be shared with other streams through [`Stream::link`]. Cloning is not
/// offered; use [`Stream::copy`] for an independent stream.
#[derive(Debug)]
pub struct Stream {
    pub(crate) id: Option<String>,
    pub(crate) thermo: Thermo,
    pub(crate) thermal: ThermalHandle,
    pub(crate) store: FlowStore,
    pub(crate) price: Cell<f64>,
    pub(crate) source: Option<String>,
    pub(crate) sink: Option<String>,
}

impl Stream {
    pub fn builder() -> StreamBuilder {
        StreamBuilder::default()
    }

    pub(crate) fn from_parts(
        id: Option<String>,
        thermo: Thermo,
        thermal: ThermalCondition,
        imol: MolarFlowIndexer,
        price: f64,
    ) -> Self {
        Self {
            id,
            thermo,
            thermal: thermal.into_handle(),
            store: FlowStore::Single(imol),
            price: Cell::new(price),
            source: None,
            sink: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// Name of the unit operation producing this stream, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, source: Option<String>) {
        self.source = source;
    }

    /// Name of the unit operation consuming this stream, if any.
    pub fn sink(&self) -> Option<&str> {
        self.sink.as_deref()
    }

    pub fn set_sink(&mut self, sink: Option<String>) {
        self.sink = sink;
    }

    /// Unit price [USD/kg].
    pub fn price(&self) -> f64 {
        self.price.get()
    }

    pub fn set_price(&self, price: f64) {
        self.price.set(price);
    }

    pub fn thermo(&self) -> &Thermo {
        &self.thermo
    }

    pub fn chemicals(&self) -> &Rc<Chemicals> {
        self.thermo.chemicals()
    }

    pub fn kind(&self) -> StreamKind {
        match self.store {
            FlowStore::Single(_) => StreamKind::Single,
            FlowStore::Multi { .. } => StreamKind::Multi,
        }
    }

    // Thermal condition

    /// Temperature [K].
    pub fn t(&self) -> f64 {
        self.thermal.borrow().t
    }

    pub fn set_t(&self, t: f64) -> StreamResult<()> {
        let tc = ThermalCondition::new(t, self.p())?;
        self.thermal.borrow_mut().copy_like(&tc);
        Ok(())
    }

    /// Pressure [Pa].
    pub fn p(&self) -> f64 {
        self.thermal.borrow().p
    }

    pub fn set_p(&self, p: f64) -> StreamResult<()> {
        let tc = ThermalCondition::new(self.t(), p)?;
        self.thermal.borrow_mut().copy_like(&tc);
        Ok(())
    }

    pub fn thermal_condition(&self) -> ThermalCondition {
        *self.thermal.borrow()
    }

    pub fn thermal_handle(&self) -> &ThermalHandle {
        &self.thermal
    }

    // Phase

    /// Phase tag. A multi-phase stream reports the phase holding the most
    /// flow, or the first of its phase set when empty.
    pub fn phase(&self) -> Phase {
        match &self.store {
            FlowStore::Single(imol) => imol.phase(),
            FlowStore::Multi { imol, .. } => imol
                .nonzero_phases()
                .into_iter()
                .map(|(phase, row)| (phase, row.iter().sum::<f64>()))
                .fold(None, |best: Option<(Phase, f64)>, (phase, total)| match best {
                    Some((_, b)) if b >= total => best,
                    _ => Some((phase, total)),
                })
                .map_or_else(|| imol.phases().first(), |(phase, _)| phase),
        }
    }

    pub fn set_phase(&self, phase: Phase) -> StreamResult<()> {
        match &self.store {
            FlowStore::Single(imol) => {
                imol.set_phase(phase);
                Ok(())
            }
            FlowStore::Multi { .. } => Err(StreamError::NotSupported {
                what: "setting a single phase on a multi-phase stream",
            }),
        }
    }

    // Storage

    /// Single-phase flow storage.
    pub fn indexer(&self) -> StreamResult<&MolarFlowIndexer> {
        match &self.store {
            FlowStore::Single(imol) => Ok(imol),
            FlowStore::Multi { .. } => Err(StreamError::NotSupported {
                what: "single-phase storage of a multi-phase stream",
            }),
        }
    }

    /// Multi-phase flow storage.
    pub fn material(&self) -> StreamResult<&MaterialIndexer> {
        match &self.store {
            FlowStore::Single(_) => Err(StreamError::MissingPhases),
            FlowStore::Multi { imol, .. } => Ok(imol),
        }
    }

    /// Molar flows [kmol/hr], summed over phases for multi-phase streams.
    pub fn mol(&self) -> Vec<f64> {
        match &self.store {
            FlowStore::Single(imol) => imol.to_vec(),
            FlowStore::Multi { imol, .. } => imol.total_by_chemical(),
        }
    }

    pub fn set_mol(&self, mol: &[f64]) -> StreamResult<()> {
        match &self.store {
            FlowStore::Single(imol) => Ok(imol.set_all(mol)?),
            FlowStore::Multi { .. } => Err(StreamError::NotSupported {
                what: "writing flat flows of a multi-phase stream",
            }),
        }
    }

    /// Mass flows [kg/hr].
    pub fn mass(&self) -> StreamResult<Vec<f64>> {
        self.basis_values(Basis::Mass)
    }

    /// Volumetric flows [m³/hr].
    pub fn vol(&self) -> StreamResult<Vec<f64>> {
        self.basis_values(Basis::Volumetric)
    }

    /// Per-phase molar rows. A single-phase stream yields its one phase even
    /// when empty; a multi-phase stream yields only phases carrying flow.
    pub(crate) fn phase_flows(&self) -> Vec<(Phase, Vec<f64>)> {
        match &self.store {
            FlowStore::Single(imol) => vec![(imol.phase(), imol.to_vec())],
            FlowStore::Multi { imol, .. } => imol.nonzero_phases(),
        }
    }

    /// Multiply every molar flow by `factor`, in place.
    pub(crate) fn scale_flows(&self, factor: f64) {
        match &self.store {
            FlowStore::Single(imol) => imol.scale(factor),
            FlowStore::Multi { imol, .. } => imol.scale(factor),
        }
    }

    pub(crate) fn basis_values(&self, basis: Basis) -> StreamResult<Vec<f64>> {
        match &self.store {
            FlowStore::Single(imol) => Ok(match basis {
                Basis::Molar => imol.to_vec(),
                Basis::Mass => imol.by_mass().to_vec()?,
                Basis::Volumetric => imol
                    .by_volume(&self.thermal, self.thermo.mixture())
                    .to_vec()?,
            }),
            FlowStore::Multi { imol, .. } => match basis {
                Basis::Molar => Ok(imol.total_by_chemical()),
                Basis::Mass => {
                    let mw = self.chemicals().mw();
                    Ok(imol
                        .total_by_chemical()
                        .iter()
                        .zip(&mw)
                        .map(|(n, m)| n * m)
                        .collect())
                }
                Basis::Volumetric => {
                    let tc = self.thermal_condition();
                    let mut vol = vec![0.0; self.chemicals().len()];
                    for (phase, row) in imol.nonzero_phases() {
                        let volumes = self.thermo.mixture().molar_volumes(phase, tc.t, tc.p)?;
                        for ((slot, n), v) in vol.iter_mut().zip(&row).zip(&volumes) {
                            *slot += 1000.0 * n * v;
                        }
                    }
                    Ok(vol)
                }
            },
        }
    }

    fn indices_of(&self, ids: Option<&[&str]>) -> StreamResult<Vec<usize>> {
        Ok(match ids {
            Some(ids) => self.chemicals().indices(ids)?,
            None => (0..self.chemicals().len()).collect(),
        })
    }

    // Unit-aware flow access

    /// Flows of `ids` (all chemicals when `None`) in `units`.
    pub fn get_flow(&self, units: &str, ids: Option<&[&str]>) -> StreamResult<Vec<f64>> {
        let (basis, factor) = resolve(units)?;
        let indices = self.indices_of(ids)?;
        let values = self.basis_values(basis)?;
        Ok(indices.iter().map(|&i| values[i] * factor).collect())
    }

    /// Write flows of `ids` (all chemicals when `None`) given in `units`.
    /// Mass and volumetric values are converted to molar flows.
    pub fn set_flow(&self, values: &[f64], units: &str, ids: Option<&[&str]>) -> StreamResult<()> {
        let (basis, factor) = resolve(units)?;
        let indices = self.indices_of(ids)?;
        let canonical: Vec<f64> = values.iter().map(|v| v / factor).collect();
        let imol = match &self.store {
            FlowStore::Single(imol) => imol,
            FlowStore::Multi { .. } => {
                return Err(StreamError::NotSupported {
                    what: "writing flat flows of a multi-phase stream",
                });
            }
        };
        match basis {
            Basis::Molar => imol.set_values_at(&indices, &canonical)?,
            Basis::Mass => imol.by_mass().set_values_at(&indices, &canonical)?,
            Basis::Volumetric => imol
                .by_volume(&self.thermal, self.thermo.mixture())
                .set_values_at(&indices, &canonical)?,
        }
        Ok(())
    }

    /// Net flow in `units`.
    pub fn get_total_flow(&self, units: &str) -> StreamResult<f64> {
        Ok(self.get_flow(units, None)?.iter().sum())
    }

    /// Rescale the composition so the net flow in `units` equals `value`.
    pub fn set_total_flow(&self, value: f64, units: &str) -> StreamResult<()> {
        let value = pf_core::ensure_finite(value, "total flow")?;
        let current = self.get_total_flow(units)?;
        if current == 0.0 {
            return Err(StreamError::ZeroFlow { what: "total flow" });
        }
        self.scale_flows(value / current);
        Ok(())
    }

    /// True when every molar flow is zero.
    pub fn is_empty(&self) -> bool {
        self.mol().iter().all(|n| *n == 0.0)
    }
}
