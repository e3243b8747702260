//! pf-thermo: thermodynamic collaborators for procflow streams.
//!
//! Provides:
//! - Chemical data records and a small built-in catalog
//! - Ordered chemical registries
//! - Phase tags and phase sets
//! - Thermal condition (T, P) handles
//! - Flow storage: single-phase `MolarFlowIndexer` with cached mass and
//!   volumetric views, multi-phase `MaterialIndexer`
//! - `Mixture` trait for property models, with an ideal-mixture backend
//! - Pluggable root solvers
//! - Bubble/dew points and an isothermal VLE flash
//! - A process-wide default `Thermo` context
//!
//! # Example
//!
//! ```
//! use pf_thermo::{MolarFlowIndexer, Phase, Thermo};
//! use std::rc::Rc;
//!
//! let thermo = Thermo::from_catalog(&["Water", "Ethanol"]).unwrap();
//! let imol = MolarFlowIndexer::from_data(
//!     Rc::clone(thermo.chemicals()),
//!     vec![10.0, 5.0],
//!     Phase::Liquid,
//! )
//! .unwrap();
//! let kg_per_hr = imol.by_mass().sum().unwrap();
//! assert!((kg_per_hr - 410.5).abs() < 0.1);
//! ```

pub mod chemical;
pub mod chemicals;
pub mod equilibrium;
pub mod error;
pub mod indexer;
pub mod material;
pub mod mixture;
pub mod phase;
pub mod settings;
pub mod solver;
pub mod thermal;
pub mod thermo;

pub use chemical::{Antoine, CATALOG_IDS, Chemical};
pub use chemicals::Chemicals;
pub use equilibrium::{BubblePoint, DewPoint, SaturationPoint, Vle};
pub use error::{ThermoError, ThermoResult};
pub use indexer::{Basis, FlowData, FlowView, MolarFlowIndexer, PhaseHandle, same_handle};
pub use material::MaterialIndexer;
pub use mixture::{IdealMixture, Mixture};
pub use phase::{Phase, PhaseSet};
pub use solver::{Bisection, RootSolver, Secant};
pub use thermal::{ThermalCondition, ThermalHandle};
pub use thermo::Thermo;
