//! Thermodynamic context: chemicals, mixture model and root solver.

use crate::chemical::Chemical;
use crate::chemicals::Chemicals;
use crate::error::ThermoResult;
use crate::indexer::same_handle;
use crate::mixture::{IdealMixture, Mixture};
use crate::solver::{RootSolver, Secant};
use std::rc::Rc;

/// Bundle of collaborators every stream needs. Cheap to clone; clones share
/// the same registry and models.
#[derive(Debug, Clone)]
pub struct Thermo {
    chemicals: Rc<Chemicals>,
    mixture: Rc<dyn Mixture>,
    solver: Rc<dyn RootSolver>,
}

impl Thermo {
    pub fn new(mixture: Rc<dyn Mixture>, solver: Rc<dyn RootSolver>) -> Self {
        Self {
            chemicals: Rc::clone(mixture.chemicals()),
            mixture,
            solver,
        }
    }

    /// Ideal mixture with secant temperature solves.
    pub fn ideal(chemicals: Chemicals) -> Self {
        let chemicals = Rc::new(chemicals);
        Self::new(
            Rc::new(IdealMixture::new(chemicals)),
            Rc::new(Secant::default()),
        )
    }

    pub fn from_chemicals(chemicals: Vec<Chemical>) -> ThermoResult<Self> {
        Ok(Self::ideal(Chemicals::new(chemicals)?))
    }

    pub fn from_catalog(ids: &[&str]) -> ThermoResult<Self> {
        Ok(Self::ideal(Chemicals::from_catalog(ids)?))
    }

    /// Replace the root solver used for temperature solves.
    pub fn with_solver(mut self, solver: Rc<dyn RootSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn chemicals(&self) -> &Rc<Chemicals> {
        &self.chemicals
    }

    pub fn mixture(&self) -> &Rc<dyn Mixture> {
        &self.mixture
    }

    pub fn solver(&self) -> &dyn RootSolver {
        self.solver.as_ref()
    }

    /// Same chemical registry, by identity or by content.
    pub fn same_chemicals(&self, other: &Thermo) -> bool {
        Rc::ptr_eq(&self.chemicals, &other.chemicals) || *self.chemicals == *other.chemicals
    }

    /// Same mixture model instance.
    pub fn same_mixture(&self, other: &Thermo) -> bool {
        same_handle(&self.mixture, &other.mixture)
    }
}
