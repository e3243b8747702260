//! Stream construction.

use crate::error::{StreamError, StreamResult};
use crate::stream::Stream;
use pf_core::constants::{P_REF_PA, T_REF_K};
use pf_thermo::{MolarFlowIndexer, Phase, ThermalCondition, Thermo, settings};
use std::rc::Rc;

/// Builder for [`Stream`].
///
/// Flows come from exactly one of: a pre-built indexer, a flat vector in
/// registry order, or per-chemical quantities. Without `units`, flows are
/// molar (kmol/hr). A pre-built indexer's values are reinterpreted in
/// `units` when given, and its phase is overwritten by an explicit `phase`.
#[derive(Debug, Clone)]
pub struct StreamBuilder {
    id: Option<String>,
    indexer: Option<MolarFlowIndexer>,
    flow: Option<Vec<f64>>,
    quantities: Vec<(String, f64)>,
    phase: Option<Phase>,
    t: f64,
    p: f64,
    units: Option<String>,
    price: f64,
    thermo: Option<Thermo>,
}

impl Default for StreamBuilder {
    fn default() -> Self {
        Self {
            id: None,
            indexer: None,
            flow: None,
            quantities: Vec::new(),
            phase: None,
            t: T_REF_K,
            p: P_REF_PA,
            units: None,
            price: 0.0,
            thermo: None,
        }
    }
}

impl StreamBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Use an existing flow indexer as storage. Its phase tag is kept unless
    /// `phase` is also given.
    pub fn indexer(mut self, indexer: MolarFlowIndexer) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Flat flows in registry order.
    pub fn flow(mut self, flow: Vec<f64>) -> Self {
        self.flow = Some(flow);
        self
    }

    /// Flow of a single chemical. May be called repeatedly.
    pub fn chemical(mut self, id: impl Into<String>, value: f64) -> Self {
        self.quantities.push((id.into(), value));
        self
    }

    /// Phase of the new stream; liquid by default.
    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Temperature [K].
    pub fn t(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// Pressure [Pa].
    pub fn p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    /// Units of the flat or per-chemical flows.
    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Unit price [USD/kg].
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Thermodynamic context; defaults to [`settings::get_thermo`].
    pub fn thermo(mut self, thermo: Thermo) -> Self {
        self.thermo = Some(thermo);
        self
    }

    pub fn build(self) -> StreamResult<Stream> {
        if self.flow.is_some() && !self.quantities.is_empty() {
            return Err(StreamError::InvalidArg {
                what: "flat flows and per-chemical quantities are mutually exclusive".into(),
            });
        }
        if self.indexer.is_some() && (self.flow.is_some() || !self.quantities.is_empty()) {
            return Err(StreamError::InvalidArg {
                what: "a pre-built indexer excludes other flow inputs".into(),
            });
        }

        let thermo = match self.thermo {
            Some(thermo) => thermo,
            None => settings::get_thermo()?,
        };
        let thermal = ThermalCondition::new(self.t, self.p)?;

        let imol = match self.indexer {
            Some(imol) => {
                let same = Rc::ptr_eq(imol.chemicals(), thermo.chemicals())
                    || **imol.chemicals() == **thermo.chemicals();
                if !same {
                    return Err(StreamError::InvalidArg {
                        what: "indexer chemicals differ from the thermo context".into(),
                    });
                }
                if let Some(phase) = self.phase {
                    imol.set_phase(phase);
                }
                imol
            }
            None => MolarFlowIndexer::new(
                Rc::clone(thermo.chemicals()),
                self.phase.unwrap_or(Phase::Liquid),
            ),
        };

        let stream = Stream::from_parts(self.id, thermo, thermal, imol, self.price);
        let units = self.units.as_deref().unwrap_or("kmol/hr");
        if let Some(flow) = &self.flow {
            stream.set_flow(flow, units, None)?;
        } else if !self.quantities.is_empty() {
            let ids: Vec<&str> = self.quantities.iter().map(|(id, _)| id.as_str()).collect();
            let values: Vec<f64> = self.quantities.iter().map(|(_, v)| *v).collect();
            stream.set_flow(&values, units, Some(&ids))?;
        } else if let Some(units) = &self.units {
            let values = stream.mol();
            stream.set_flow(&values, units, None)?;
        }
        tracing::trace!(id = ?stream.id(), "stream built");
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thermo() -> Thermo {
        Thermo::from_catalog(&["Water", "Ethanol"]).unwrap()
    }

    #[test]
    fn per_chemical_quantities() {
        let s = Stream::builder()
            .thermo(thermo())
            .chemical("Ethanol", 5.0)
            .build()
            .unwrap();
        assert_eq!(s.mol(), vec![0.0, 5.0]);
        assert_eq!(s.id(), None);
    }

    #[test]
    fn flat_flow_in_mass_units() {
        let s = Stream::builder()
            .thermo(thermo())
            .flow(vec![18.015_28, 0.0])
            .units("kg/hr")
            .build()
            .unwrap();
        assert!((s.mol()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flat_and_per_chemical_are_exclusive() {
        let err = Stream::builder()
            .thermo(thermo())
            .flow(vec![1.0, 1.0])
            .chemical("Water", 1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, StreamError::InvalidArg { .. }));
    }

    #[test]
    fn non_flow_units_are_rejected() {
        let err = Stream::builder()
            .thermo(thermo())
            .chemical("Water", 1.0)
            .units("kg")
            .build()
            .unwrap_err();
        assert!(matches!(err, StreamError::DimensionMismatch { .. }));
    }

    #[test]
    fn prebuilt_indexer_is_used_as_is() {
        let thermo = thermo();
        let chemicals = Rc::clone(thermo.chemicals());
        let imol = MolarFlowIndexer::from_data(chemicals, vec![1.0, 2.0], Phase::Gas).unwrap();
        let s = Stream::builder().thermo(thermo).indexer(imol.clone()).build().unwrap();
        assert_eq!(s.phase(), Phase::Gas);
        assert!(s.indexer().unwrap().shares_data_with(&imol));
    }

    #[test]
    fn prebuilt_indexer_takes_explicit_phase_and_units() {
        let thermo = thermo();
        let chemicals = Rc::clone(thermo.chemicals());
        let imol =
            MolarFlowIndexer::from_data(chemicals, vec![18.015_28, 0.0], Phase::Gas).unwrap();
        let s = Stream::builder()
            .thermo(thermo)
            .indexer(imol.clone())
            .phase(Phase::Liquid)
            .units("kg/hr")
            .build()
            .unwrap();
        assert_eq!(s.phase(), Phase::Liquid);
        assert_eq!(imol.phase(), Phase::Liquid);
        assert!((s.mol()[0] - 1.0).abs() < 1e-12);
        assert!(s.indexer().unwrap().shares_data_with(&imol));
    }

    #[test]
    fn units_without_flows_are_validated() {
        let err = Stream::builder()
            .thermo(thermo())
            .units("kg")
            .build()
            .unwrap_err();
        assert!(matches!(err, StreamError::DimensionMismatch { .. }));
    }

    #[test]
    fn missing_default_thermo() {
        settings::clear_thermo();
        let err = Stream::builder().build().unwrap_err();
        assert_eq!(err, StreamError::Thermo(pf_thermo::ThermoError::NoThermo));
    }

    #[test]
    fn default_thermo_is_used() {
        settings::set_thermo(thermo());
        let s = Stream::builder().chemical("Water", 1.0).build().unwrap();
        assert_eq!(s.chemicals().len(), 2);
        settings::clear_thermo();
    }
}
