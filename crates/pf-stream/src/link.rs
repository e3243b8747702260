//! Selective aliasing of stream facets.
//!
//! A stream has three shareable facets: the thermal condition, the molar
//! flow data and the phase tag (the phase set, once cast). Linking makes the
//! selected facets of one stream point at the storage of another; writes
//! through either party are then visible to both.

use crate::error::{StreamError, StreamResult};
use crate::stream::{FlowStore, Stream, StreamKind};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Which facets two streams share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Facets {
    pub thermal: bool,
    pub flow: bool,
    pub phase: bool,
}

impl Facets {
    pub const ALL: Facets = Facets {
        thermal: true,
        flow: true,
        phase: true,
    };

    pub const NONE: Facets = Facets {
        thermal: false,
        flow: false,
        phase: false,
    };

    pub fn is_all(self) -> bool {
        self == Facets::ALL
    }

    pub fn is_none(self) -> bool {
        self == Facets::NONE
    }
}

impl Stream {
    /// Alias the selected facets of `other`.
    ///
    /// Sharing every facet also shares the derived-view cache. Any partial
    /// link leaves `self` with a fresh cache and clears the cache of `other`.
    pub fn link(&mut self, other: &Stream, facets: Facets) -> StreamResult<()> {
        self.check_linkable(other)?;

        match (&mut self.store, &other.store) {
            (FlowStore::Single(imol), FlowStore::Single(theirs)) => {
                if facets.flow {
                    imol.link_data(theirs);
                }
                if facets.phase {
                    imol.link_phase(theirs);
                }
                if facets.is_all() {
                    imol.share_cache_with(theirs);
                } else {
                    imol.reset_cache();
                    theirs.clear_cache();
                }
            }
            (FlowStore::Multi { imol, vle }, FlowStore::Multi { imol: theirs, .. }) => {
                if facets.flow {
                    imol.link_data(theirs)?;
                }
                if facets.phase {
                    imol.link_phases(theirs)?;
                }
                *vle = None;
            }
            _ => {
                return Err(StreamError::IncompatibleLink {
                    reason: "streams differ in kind".into(),
                });
            }
        }
        if facets.thermal {
            self.thermal = Rc::clone(&other.thermal);
        }
        debug!(
            id = ?self.id,
            other = ?other.id,
            thermal = facets.thermal,
            flow = facets.flow,
            phase = facets.phase,
            "linked stream"
        );
        Ok(())
    }

    /// [`Stream::link`] with the facets given as flags.
    pub fn link_with(
        &mut self,
        other: &Stream,
        thermal: bool,
        flow: bool,
        phase: bool,
    ) -> StreamResult<()> {
        self.link(other, Facets { thermal, flow, phase })
    }

    fn check_linkable(&self, other: &Stream) -> StreamResult<()> {
        if self.kind() != other.kind() {
            return Err(StreamError::IncompatibleLink {
                reason: format!("{} and {} differ in kind", self.kind(), other.kind()),
            });
        }
        if !self.thermo.same_chemicals(&other.thermo) {
            return Err(StreamError::IncompatibleLink {
                reason: "chemical registries differ".into(),
            });
        }
        if let (FlowStore::Multi { imol, .. }, FlowStore::Multi { imol: theirs, .. }) =
            (&self.store, &other.store)
        {
            if imol.phases() != theirs.phases() {
                return Err(StreamError::IncompatibleLink {
                    reason: format!("phase sets {} and {} differ", imol.phases(), theirs.phases()),
                });
            }
        }
        Ok(())
    }

    /// Replace every facet with an independent copy of its current value.
    /// Calling it on an unlinked stream only drops cached views.
    pub fn unlink(&mut self) {
        let tc = self.thermal_condition();
        self.thermal = Rc::new(RefCell::new(tc));
        match &mut self.store {
            FlowStore::Single(imol) => imol.detach(),
            FlowStore::Multi { imol, vle } => {
                imol.detach();
                *vle = None;
            }
        }
        debug!(id = ?self.id, "unlinked stream");
    }

    /// Independent stream with the same composition, phase and state. The
    /// copy has no id and no connections.
    pub fn copy(&self) -> Stream {
        let store = match &self.store {
            FlowStore::Single(imol) => FlowStore::Single(imol.copy()),
            FlowStore::Multi { imol, .. } => FlowStore::Multi {
                imol: imol.copy(),
                vle: None,
            },
        };
        Stream {
            id: None,
            thermo: self.thermo.clone(),
            thermal: self.thermal_condition().into_handle(),
            store,
            price: self.price.clone(),
            source: None,
            sink: None,
        }
    }

    /// Overwrite flows, phase and thermal condition with the values of
    /// `other`, keeping every handle of `self` in place.
    ///
    /// A single-phase `self` is cast when `other` is multi-phase. A
    /// multi-phase `self` keeps its phase set; flows of `other` in phases
    /// outside it land in the first phase.
    pub fn copy_like(&mut self, other: &Stream) -> StreamResult<()> {
        if !self.thermo.same_chemicals(&other.thermo) {
            return Err(StreamError::InvalidArg {
                what: "cannot copy flows between different chemical registries".into(),
            });
        }
        if let (StreamKind::Single, FlowStore::Multi { imol, .. }) = (self.kind(), &other.store) {
            self.set_phases(imol.phases().clone())?;
        }

        match (&self.store, &other.store) {
            (FlowStore::Single(imol), FlowStore::Single(theirs)) => imol.copy_like(theirs)?,
            (FlowStore::Multi { imol, .. }, FlowStore::Single(theirs)) => {
                imol.copy_like(&theirs.to_material_indexer(imol.phases()))?
            }
            (FlowStore::Multi { imol, .. }, FlowStore::Multi { imol: theirs, .. }) => {
                if imol.phases() == theirs.phases() {
                    imol.copy_like(theirs)?
                } else {
                    imol.copy_like(&theirs.reshape(imol.phases()))?
                }
            }
            (FlowStore::Single(_), FlowStore::Multi { .. }) => {
                return Err(StreamError::NotSupported {
                    what: "copying multi-phase flows into single-phase storage",
                });
            }
        }

        let tc = other.thermal_condition();
        self.thermal.borrow_mut().copy_like(&tc);
        Ok(())
    }

    /// Facets currently aliased between `self` and `other`.
    pub fn sharing(&self, other: &Stream) -> Facets {
        let thermal = Rc::ptr_eq(&self.thermal, &other.thermal);
        let (flow, phase) = match (&self.store, &other.store) {
            (FlowStore::Single(a), FlowStore::Single(b)) => {
                (a.shares_data_with(b), a.shares_phase_with(b))
            }
            (FlowStore::Multi { imol: a, .. }, FlowStore::Multi { imol: b, .. }) => {
                (a.shares_data_with(b), a.shares_phases_with(b))
            }
            _ => (false, false),
        };
        Facets {
            thermal,
            flow,
            phase,
        }
    }

    /// True when both single-phase streams use one derived-view cache.
    pub fn shares_cache_with(&self, other: &Stream) -> bool {
        match (&self.store, &other.store) {
            (FlowStore::Single(a), FlowStore::Single(b)) => a.shares_cache_with(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::{Phase, PhaseSet, Thermo};

    fn pair() -> (Stream, Stream) {
        let thermo = Thermo::from_catalog(&["Water", "Ethanol"]).unwrap();
        let a = Stream::builder()
            .id("a")
            .thermo(thermo.clone())
            .flow(vec![10.0, 5.0])
            .build()
            .unwrap();
        let b = Stream::builder()
            .id("b")
            .thermo(thermo)
            .flow(vec![1.0, 1.0])
            .t(350.0)
            .build()
            .unwrap();
        (a, b)
    }

    #[test]
    fn full_link_shares_everything() {
        let (mut a, b) = pair();
        a.link(&b, Facets::ALL).unwrap();
        assert!(a.sharing(&b).is_all());
        assert!(a.shares_cache_with(&b));
        b.set_mol(&[4.0, 4.0]).unwrap();
        assert_eq!(a.mol(), vec![4.0, 4.0]);
        a.set_t(320.0).unwrap();
        assert_eq!(b.t(), 320.0);
    }

    #[test]
    fn flow_only_link_keeps_state_independent() {
        let (mut a, b) = pair();
        a.link_with(&b, false, true, false).unwrap();
        assert_eq!(
            a.sharing(&b),
            Facets {
                thermal: false,
                flow: true,
                phase: false
            }
        );
        assert!(!a.shares_cache_with(&b));
        a.set_t(300.0).unwrap();
        assert_eq!(b.t(), 350.0);
        a.set_mol(&[2.0, 3.0]).unwrap();
        assert_eq!(b.mol(), vec![2.0, 3.0]);
        b.set_phase(Phase::Gas).unwrap();
        assert_eq!(a.phase(), Phase::Liquid);
    }

    #[test]
    fn partial_link_drops_cached_views() {
        let (mut a, b) = pair();
        b.mass().unwrap();
        a.link_with(&b, true, true, false).unwrap();
        assert!(!b.indexer().unwrap().has_cached_views());
        assert!(!a.indexer().unwrap().has_cached_views());
    }

    #[test]
    fn unlink_is_idempotent_and_independent() {
        let (mut a, b) = pair();
        a.link(&b, Facets::ALL).unwrap();
        a.unlink();
        assert!(a.sharing(&b).is_none());
        assert!(!a.shares_cache_with(&b));
        assert_eq!(a.mol(), vec![1.0, 1.0]);
        assert_eq!(a.t(), 350.0);
        a.unlink();
        assert_eq!(a.mol(), vec![1.0, 1.0]);
        b.set_mol(&[7.0, 7.0]).unwrap();
        assert_eq!(a.mol(), vec![1.0, 1.0]);
    }

    #[test]
    fn cross_kind_link_is_rejected() {
        let (mut a, mut b) = pair();
        b.set_phases(PhaseSet::vle()).unwrap();
        let err = a.link(&b, Facets::ALL).unwrap_err();
        assert!(matches!(err, StreamError::IncompatibleLink { .. }));
    }

    #[test]
    fn different_registries_are_rejected() {
        let (mut a, _) = pair();
        let other = Stream::builder()
            .thermo(Thermo::from_catalog(&["Water", "Methanol"]).unwrap())
            .build()
            .unwrap();
        assert!(matches!(
            a.link(&other, Facets::ALL),
            Err(StreamError::IncompatibleLink { .. })
        ));
    }

    #[test]
    fn copy_never_aliases() {
        let (a, _) = pair();
        let c = a.copy();
        assert_eq!(c.id(), None);
        assert!(c.sharing(&a).is_none());
        a.set_mol(&[0.0, 0.0]).unwrap();
        assert_eq!(c.mol(), vec![10.0, 5.0]);
    }

    #[test]
    fn copy_like_keeps_links_of_self() {
        let (mut a, b) = pair();
        let (mut watcher, _) = pair();
        watcher.link(&a, Facets::ALL).unwrap();
        a.copy_like(&b).unwrap();
        assert_eq!(watcher.mol(), vec![1.0, 1.0]);
        assert_eq!(watcher.t(), 350.0);
        assert!(a.sharing(&b).is_none());
    }

    #[test]
    fn copy_like_casts_to_multi_phase() {
        let (mut a, mut b) = pair();
        b.set_phases(PhaseSet::vle()).unwrap();
        a.copy_like(&b).unwrap();
        assert_eq!(a.kind(), StreamKind::Multi);
        assert_eq!(a.mol(), vec![1.0, 1.0]);
    }
}
