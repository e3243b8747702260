//! Ordered chemical registry shared by flow indexers and streams.

use crate::chemical::Chemical;
use crate::error::{ThermoError, ThermoResult};
use std::collections::HashMap;

/// An ordered, immutable set of chemicals.
///
/// The registry order fixes the layout of every flow vector built on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Chemicals {
    chemicals: Vec<Chemical>,
    index: HashMap<String, usize>,
}

impl Chemicals {
    /// Build a registry. Identifiers must be unique and the list non-empty.
    pub fn new(chemicals: Vec<Chemical>) -> ThermoResult<Self> {
        if chemicals.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "chemical registry must not be empty".into(),
            });
        }
        let mut index = HashMap::with_capacity(chemicals.len());
        for (i, chem) in chemicals.iter().enumerate() {
            if index.insert(chem.id.clone(), i).is_some() {
                return Err(ThermoError::InvalidArg {
                    what: format!("duplicate chemical '{}'", chem.id),
                });
            }
        }
        Ok(Self { chemicals, index })
    }

    /// Build a registry from built-in catalog identifiers.
    pub fn from_catalog(ids: &[&str]) -> ThermoResult<Self> {
        let chemicals = ids
            .iter()
            .map(|id| Chemical::from_catalog(id))
            .collect::<ThermoResult<Vec<_>>>()?;
        Self::new(chemicals)
    }

    pub fn len(&self) -> usize {
        self.chemicals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chemicals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chemical> {
        self.chemicals.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Chemical> {
        self.chemicals.get(index)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.chemicals.iter().map(|c| c.id.as_str())
    }

    /// Position of `id` in the registry.
    pub fn index(&self, id: &str) -> ThermoResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ThermoError::UndefinedChemical { id: id.to_string() })
    }

    /// Positions of several identifiers, in the order given.
    pub fn indices(&self, ids: &[&str]) -> ThermoResult<Vec<usize>> {
        ids.iter().map(|id| self.index(id)).collect()
    }

    /// Molecular weights [g/mol] in registry order.
    pub fn mw(&self) -> Vec<f64> {
        self.chemicals.iter().map(|c| c.mw).collect()
    }

    /// Heats of formation [J/mol] in registry order.
    pub fn hf(&self) -> Vec<f64> {
        self.chemicals.iter().map(|c| c.hf).collect()
    }

    /// Heats of combustion [J/mol] in registry order.
    pub fn hc(&self) -> Vec<f64> {
        self.chemicals.iter().map(|c| c.hc).collect()
    }

    /// Indices of volatile chemicals with a nonzero flow in `mol`.
    pub fn equilibrium_indices(&self, mol: &[f64]) -> Vec<usize> {
        self.chemicals
            .iter()
            .zip(mol)
            .enumerate()
            .filter(|(_, (chem, n))| chem.is_volatile() && **n != 0.0)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_ethanol_glucose() -> Chemicals {
        Chemicals::from_catalog(&["Water", "Ethanol", "Glucose"]).unwrap()
    }

    #[test]
    fn lookup_by_id() {
        let chems = water_ethanol_glucose();
        assert_eq!(chems.len(), 3);
        assert_eq!(chems.index("Ethanol").unwrap(), 1);
        assert_eq!(chems.indices(&["Glucose", "Water"]).unwrap(), vec![2, 0]);
        assert_eq!(
            chems.index("Octanol"),
            Err(ThermoError::UndefinedChemical {
                id: "Octanol".into()
            })
        );
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        assert!(Chemicals::from_catalog(&["Water", "H2O"]).is_err());
        assert!(Chemicals::new(Vec::new()).is_err());
    }

    #[test]
    fn equilibrium_indices_skip_absent_and_nonvolatile() {
        let chems = water_ethanol_glucose();
        assert_eq!(chems.equilibrium_indices(&[1.0, 0.0, 2.0]), vec![0]);
        assert_eq!(chems.equilibrium_indices(&[1.0, 1.0, 1.0]), vec![0, 1]);
    }

    #[test]
    fn property_vectors_follow_registry_order() {
        let chems = water_ethanol_glucose();
        let mw = chems.mw();
        assert!((mw[0] - 18.015).abs() < 1e-3);
        assert!((mw[2] - 180.156).abs() < 1e-9);
        assert_eq!(chems.ids().collect::<Vec<_>>(), ["Water", "Ethanol", "Glucose"]);
    }
}
