//! Mass and energy balances between streams.

use crate::error::{StreamError, StreamResult};
use crate::stream::{FlowStore, Stream, StreamKind};
use tracing::trace;

impl Stream {
    /// Overwrite this stream with the mixture of `others`: flows are summed,
    /// pressure is the lowest inlet pressure, and temperature closes the
    /// enthalpy balance. Nothing is solved when the mixture has no flow.
    /// Inlets are checked and the enthalpy summed before any write.
    pub fn mix_from(&mut self, others: &[&Stream]) -> StreamResult<()> {
        if others.is_empty() {
            self.empty();
            return Ok(());
        }
        if others.iter().any(|s| !self.thermo.same_chemicals(&s.thermo)) {
            return Err(StreamError::InvalidArg {
                what: "cannot mix streams with different chemical registries".into(),
            });
        }

        let n = self.chemicals().len();
        let mut h = 0.0;
        let mut p = f64::INFINITY;
        let mut t_guess = None;
        for other in others {
            h += other.h()?;
            p = p.min(other.p());
            if t_guess.is_none() && !other.is_empty() {
                t_guess = Some(other.t());
            }
        }

        match &self.store {
            FlowStore::Single(imol) => {
                let mut mol = vec![0.0; n];
                for other in others {
                    for (slot, v) in mol.iter_mut().zip(other.mol()) {
                        *slot += v;
                    }
                }
                imol.set_all(&mol)?;
            }
            FlowStore::Multi { imol, .. } => {
                let phases = imol.phases().clone();
                let mut rows = vec![vec![0.0; n]; phases.len()];
                for other in others {
                    for (phase, row) in other.phase_flows() {
                        let target = phases.position(phase).unwrap_or(0);
                        for (slot, v) in rows[target].iter_mut().zip(row) {
                            *slot += v;
                        }
                    }
                }
                for (phase, row) in phases.iter().zip(&rows) {
                    imol.set_phase_row(phase, row)?;
                }
            }
        }

        self.set_p(p)?;
        if self.is_empty() {
            return Ok(());
        }
        if let Some(t) = t_guess {
            self.set_t(t)?;
        }
        self.set_h(h)?;
        trace!(id = ?self.id, inlets = others.len(), t = self.t(), "mixed streams");
        Ok(())
    }

    /// Split this stream's flows between `top` and `bottom`: `top` receives
    /// `split[i]` of chemical `i` and `bottom` the rest. A single split
    /// fraction applies to every chemical. Both outlets take this stream's
    /// temperature, pressure and phase. Outlets are checked before either
    /// is written.
    pub fn split_to(&self, top: &Stream, bottom: &Stream, split: &[f64]) -> StreamResult<()> {
        for outlet in [top, bottom] {
            if outlet.kind() != StreamKind::Single {
                return Err(StreamError::NotSupported {
                    what: "splitting into a multi-phase stream",
                });
            }
            if !self.thermo.same_chemicals(&outlet.thermo) {
                return Err(StreamError::InvalidArg {
                    what: "split outlets must share the chemical registry".into(),
                });
            }
        }
        let mol = self.mol();
        let fractions: Vec<f64> = match split.len() {
            1 => vec![split[0]; mol.len()],
            n if n == mol.len() => split.to_vec(),
            n => {
                return Err(StreamError::InvalidArg {
                    what: format!("{n} split fractions for {} chemicals", mol.len()),
                });
            }
        };
        let top_mol: Vec<f64> = mol.iter().zip(&fractions).map(|(n, f)| n * f).collect();
        let bottom_mol: Vec<f64> = mol.iter().zip(&top_mol).map(|(n, t)| n - t).collect();
        let tc = self.thermal_condition();
        let phase = self.phase();
        for (outlet, values) in [(top, &top_mol), (bottom, &bottom_mol)] {
            outlet.set_mol(values)?;
            outlet.set_phase(phase)?;
            outlet.thermal.borrow_mut().copy_like(&tc);
        }
        Ok(())
    }

    /// Zero every flow.
    pub fn empty(&self) {
        match &self.store {
            FlowStore::Single(imol) => imol.data_handle().borrow_mut().fill(0.0),
            FlowStore::Multi { imol, .. } => imol.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::{Phase, PhaseSet, Thermo};

    fn water(thermo: &Thermo, flow: f64, t: f64, p: f64) -> Stream {
        Stream::builder()
            .thermo(thermo.clone())
            .flow(vec![flow, 0.0])
            .t(t)
            .p(p)
            .build()
            .unwrap()
    }

    fn thermo() -> Thermo {
        Thermo::from_catalog(&["Water", "Ethanol"]).unwrap()
    }

    #[test]
    fn mixing_balances_mass_and_energy() {
        let thermo = thermo();
        let a = water(&thermo, 10.0, 300.0, 2.0e5);
        let b = water(&thermo, 10.0, 350.0, 1.5e5);
        let mut out = water(&thermo, 0.0, 298.15, 101_325.0);
        out.mix_from(&[&a, &b]).unwrap();
        assert_eq!(out.mol(), vec![20.0, 0.0]);
        assert_eq!(out.p(), 1.5e5);
        assert!((out.t() - 325.0).abs() < 1e-3, "T = {}", out.t());
    }

    #[test]
    fn mixing_empty_inlets_skips_the_solve() {
        let thermo = thermo();
        let a = water(&thermo, 0.0, 400.0, 2.0e5);
        let mut out = water(&thermo, 5.0, 310.0, 101_325.0);
        out.mix_from(&[&a]).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.t(), 310.0);
        assert_eq!(out.p(), 2.0e5);
    }

    #[test]
    fn mixing_into_multi_phase_stream_keeps_phase_rows() {
        let thermo = thermo();
        let liquid = water(&thermo, 4.0, 320.0, 101_325.0);
        let vapor = Stream::builder()
            .thermo(thermo.clone())
            .flow(vec![0.0, 1.0])
            .phase(Phase::Gas)
            .t(400.0)
            .build()
            .unwrap();
        let mut out = water(&thermo, 0.0, 298.15, 101_325.0);
        out.set_phases(PhaseSet::vle()).unwrap();
        out.mix_from(&[&liquid, &vapor]).unwrap();
        let imol = out.material().unwrap();
        assert_eq!(imol.phase_row(Phase::Gas).unwrap(), vec![0.0, 1.0]);
        assert_eq!(imol.phase_row(Phase::Liquid).unwrap(), vec![4.0, 0.0]);
        let h_in = liquid.h().unwrap() + vapor.h().unwrap();
        assert!((out.h().unwrap() - h_in).abs() < 1e-3);
    }

    #[test]
    fn split_with_scalar_and_vector_fractions() {
        let thermo = thermo();
        let feed = Stream::builder()
            .thermo(thermo.clone())
            .flow(vec![10.0, 4.0])
            .t(330.0)
            .build()
            .unwrap();
        let top = water(&thermo, 0.0, 298.15, 101_325.0);
        let bottom = water(&thermo, 0.0, 298.15, 101_325.0);
        feed.split_to(&top, &bottom, &[0.25]).unwrap();
        assert_eq!(top.mol(), vec![2.5, 1.0]);
        assert_eq!(bottom.mol(), vec![7.5, 3.0]);
        assert_eq!(top.t(), 330.0);

        feed.split_to(&top, &bottom, &[1.0, 0.0]).unwrap();
        assert_eq!(top.mol(), vec![10.0, 0.0]);
        assert_eq!(bottom.mol(), vec![0.0, 4.0]);

        assert!(matches!(
            feed.split_to(&top, &bottom, &[0.1, 0.2, 0.3]),
            Err(StreamError::InvalidArg { .. })
        ));
    }

    #[test]
    fn rejected_split_leaves_both_outlets_untouched() {
        let thermo = thermo();
        let feed = water(&thermo, 10.0, 330.0, 101_325.0);
        let top = water(&thermo, 1.0, 298.15, 101_325.0);
        let mut bottom = water(&thermo, 2.0, 298.15, 101_325.0);
        bottom.set_phases(PhaseSet::vle()).unwrap();
        assert!(matches!(
            feed.split_to(&top, &bottom, &[0.5]),
            Err(StreamError::NotSupported { .. })
        ));
        assert_eq!(top.mol(), vec![1.0, 0.0]);
        assert_eq!(top.t(), 298.15);

        let other = Stream::builder()
            .thermo(Thermo::from_catalog(&["Water", "Methanol"]).unwrap())
            .build()
            .unwrap();
        let bottom = water(&thermo, 2.0, 298.15, 101_325.0);
        assert!(matches!(
            feed.split_to(&top, &other, &[0.5]),
            Err(StreamError::InvalidArg { .. })
        ));
        assert!(feed.split_to(&other, &bottom, &[0.5]).is_err());
        assert_eq!(top.mol(), vec![1.0, 0.0]);
        assert_eq!(bottom.mol(), vec![2.0, 0.0]);
    }

    #[test]
    fn mixing_rejects_foreign_inlets_before_writing() {
        let thermo = thermo();
        let a = water(&thermo, 3.0, 300.0, 101_325.0);
        let foreign = Stream::builder()
            .thermo(Thermo::from_catalog(&["Water", "Methanol"]).unwrap())
            .flow(vec![1.0, 1.0])
            .build()
            .unwrap();
        let mut out = water(&thermo, 5.0, 310.0, 2.0e5);
        assert!(out.mix_from(&[&a, &foreign]).is_err());
        assert_eq!(out.mol(), vec![5.0, 0.0]);
        assert_eq!((out.t(), out.p()), (310.0, 2.0e5));
    }

    #[test]
    fn empty_zeroes_flows() {
        let thermo = thermo();
        let s = water(&thermo, 3.0, 300.0, 101_325.0);
        s.empty();
        assert!(s.is_empty());
        assert_eq!(s.f_mol(), 0.0);
    }
}
