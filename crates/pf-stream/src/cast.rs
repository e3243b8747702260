//! One-way promotion of a stream to multi-phase storage.

use crate::error::{StreamError, StreamResult};
use crate::stream::{FlowStore, Stream};
use pf_thermo::{PhaseSet, Vle};
use std::rc::Rc;
use tracing::debug;

impl Stream {
    /// Phase set of a multi-phase stream.
    pub fn phases(&self) -> StreamResult<&PhaseSet> {
        match &self.store {
            FlowStore::Single(_) => Err(StreamError::MissingPhases),
            FlowStore::Multi { imol, .. } => Ok(imol.phases()),
        }
    }

    /// Assign a phase set.
    ///
    /// A single-phase stream is cast in place: its flows move into the row
    /// of its phase (or the first row when the phase is not in `phases`).
    /// The cast cannot be undone. A multi-phase stream with a different
    /// phase set is reshaped; flows of dropped phases move to the first
    /// phase of the new set. Either way the stream gets new flow storage,
    /// so earlier flow links are released.
    pub fn set_phases(&mut self, phases: PhaseSet) -> StreamResult<()> {
        let reshaped = match &self.store {
            FlowStore::Single(imol) => imol.to_material_indexer(&phases),
            FlowStore::Multi { imol, .. } => {
                if *imol.phases() == phases {
                    return Ok(());
                }
                imol.reshape(&phases)
            }
        };
        debug!(id = ?self.id, from = %self.kind(), phases = %phases, "cast stream phases");
        self.store = FlowStore::Multi {
            imol: reshaped,
            vle: None,
        };
        Ok(())
    }

    /// Vapor-liquid equilibrium handle over this stream's storage and
    /// thermal condition.
    ///
    /// An uncast stream is first cast to gas + liquid. The handle is kept
    /// and handed out again until the storage or thermal condition it was
    /// created for is replaced.
    pub fn vle(&mut self) -> StreamResult<Rc<Vle>> {
        if matches!(self.store, FlowStore::Single(_)) {
            self.set_phases(PhaseSet::vle())?;
        }
        let thermal = Rc::clone(&self.thermal);
        match &mut self.store {
            FlowStore::Multi { imol, vle } => {
                if let Some(handle) = vle {
                    if handle.is_bound_to(imol, &thermal) {
                        return Ok(Rc::clone(handle));
                    }
                }
                let handle = Rc::new(Vle::new(imol.clone(), thermal)?);
                *vle = Some(Rc::clone(&handle));
                Ok(handle)
            }
            FlowStore::Single(_) => Err(StreamError::MissingPhases),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamKind;
    use pf_thermo::{Phase, Thermo};

    fn stream() -> Stream {
        Stream::builder()
            .id("s1")
            .thermo(Thermo::from_catalog(&["Water", "Ethanol"]).unwrap())
            .flow(vec![3.0, 1.0])
            .build()
            .unwrap()
    }

    #[test]
    fn uncast_stream_has_no_phase_set() {
        let s = stream();
        assert_eq!(s.phases().unwrap_err(), StreamError::MissingPhases);
    }

    #[test]
    fn cast_keeps_flows_and_identity() {
        let mut s = stream();
        s.set_phases(PhaseSet::vle()).unwrap();
        assert_eq!(s.kind(), StreamKind::Multi);
        assert_eq!(s.id(), Some("s1"));
        assert_eq!(s.phases().unwrap(), &PhaseSet::vle());
        assert_eq!(s.mol(), vec![3.0, 1.0]);
        let imol = s.material().unwrap();
        assert_eq!(imol.phase_row(Phase::Liquid).unwrap(), vec![3.0, 1.0]);
        assert_eq!(imol.phase_row(Phase::Gas).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn reshape_of_multi_phase_stream() {
        let mut s = stream();
        s.set_phases(PhaseSet::vle()).unwrap();
        s.set_phases("gs".parse().unwrap()).unwrap();
        let imol = s.material().unwrap();
        assert_eq!(imol.phase_row(Phase::Gas).unwrap(), vec![3.0, 1.0]);
        assert_eq!(s.kind(), StreamKind::Multi);
    }

    #[test]
    fn vle_casts_and_is_reused() {
        let mut s = stream();
        let first = s.vle().unwrap();
        assert_eq!(s.kind(), StreamKind::Multi);
        let second = s.vle().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        s.unlink();
        let third = s.vle().unwrap();
        assert!(!Rc::ptr_eq(&first, &third));
    }

    #[test]
    fn vle_flash_writes_stream_rows() {
        let mut s = stream();
        s.set_t(368.0).unwrap();
        let vle = s.vle().unwrap();
        let v = vle.flash().unwrap();
        assert!(v > 0.0 && v < 1.0);
        let imol = s.material().unwrap();
        assert!(imol.phase_total(Phase::Gas).unwrap() > 0.0);
        assert!((s.mol().iter().sum::<f64>() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn vle_requires_gas_and_liquid() {
        let mut s = stream();
        s.set_phases("ls".parse().unwrap()).unwrap();
        assert!(s.vle().is_err());
    }
}
