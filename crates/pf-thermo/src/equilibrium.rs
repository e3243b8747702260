//! Vapor-liquid equilibrium under Raoult's law.
//!
//! `BubblePoint` and `DewPoint` operate on mole fractions of a subset of
//! volatile chemicals. `Vle` flashes a multi-phase material indexer in place.

use crate::chemical::Chemical;
use crate::chemicals::Chemicals;
use crate::error::{ThermoError, ThermoResult};
use crate::indexer::same_handle;
use crate::material::MaterialIndexer;
use crate::phase::Phase;
use crate::solver::{Bisection, RootSolver};
use crate::thermal::{ThermalCondition, ThermalHandle};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Result of a bubble or dew point calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct SaturationPoint {
    /// Temperature [K]
    pub t: f64,
    /// Pressure [Pa]
    pub p: f64,
    /// Composition of the incipient phase (vapor at bubble, liquid at dew).
    pub composition: Vec<f64>,
}

fn volatile_subset(chemicals: &Chemicals, indices: &[usize]) -> ThermoResult<Vec<Chemical>> {
    indices
        .iter()
        .map(|&i| {
            let chem = chemicals.get(i).ok_or_else(|| ThermoError::InvalidArg {
                what: format!("index {i} out of range for {} chemicals", chemicals.len()),
            })?;
            if chem.is_volatile() {
                Ok(chem.clone())
            } else {
                Err(ThermoError::InvalidArg {
                    what: format!("'{}' has no vapor pressure", chem.id),
                })
            }
        })
        .collect()
}

fn check_fractions(n: usize, z: &[f64]) -> ThermoResult<()> {
    if z.len() != n {
        return Err(ThermoError::InvalidArg {
            what: format!("expected {n} mole fractions, got {}", z.len()),
        });
    }
    if z.iter().sum::<f64>() <= 0.0 {
        return Err(ThermoError::InvalidArg {
            what: "mole fractions must have a positive sum".into(),
        });
    }
    Ok(())
}

fn check_positive(value: f64, what: &'static str) -> ThermoResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ThermoError::NonPhysical { what })
    }
}

/// Temperature bracket spanned by the pure-component saturation
/// temperatures at `p`. Raoult bubble and dew temperatures lie inside it.
fn tsat_bracket(chemicals: &[Chemical], p: f64) -> (f64, f64) {
    chemicals
        .iter()
        .filter_map(|c| c.antoine.map(|a| a.tsat(p)))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        })
}

fn solve_in_bracket(
    mut residual: impl FnMut(f64) -> f64,
    bracket: (f64, f64),
    what: &'static str,
) -> ThermoResult<f64> {
    let (lo, hi) = bracket;
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(ThermoError::ConvergenceFailed { what });
    }
    if hi - lo < 1e-9 {
        return Ok(0.5 * (lo + hi));
    }
    let mut f = |t: f64| -> ThermoResult<f64> { Ok(residual(t)) };
    Bisection::default()
        .solve(&mut f, lo, (lo - 1e-6, hi + 1e-6))
        .map_err(|_| ThermoError::ConvergenceFailed { what })
}

/// Bubble point of an ideal liquid.
#[derive(Debug, Clone)]
pub struct BubblePoint {
    chemicals: Vec<Chemical>,
}

impl BubblePoint {
    pub fn new(chemicals: &Chemicals, indices: &[usize]) -> ThermoResult<Self> {
        Ok(Self {
            chemicals: volatile_subset(chemicals, indices)?,
        })
    }

    /// Bubble pressure at `t`; composition is the vapor.
    pub fn solve_p(&self, z: &[f64], t: f64) -> ThermoResult<SaturationPoint> {
        check_fractions(self.chemicals.len(), z)?;
        check_positive(t, "bubble point temperature")?;
        let z = pf_core::normalize_or_copy(z);
        let partial: Vec<f64> = self
            .chemicals
            .iter()
            .zip(&z)
            .map(|(c, x)| x * c.psat(t))
            .collect();
        let p: f64 = partial.iter().sum();
        let composition = partial.iter().map(|pi| pi / p).collect();
        Ok(SaturationPoint { t, p, composition })
    }

    /// Bubble temperature at `p`; composition is the vapor.
    pub fn solve_t(&self, z: &[f64], p: f64) -> ThermoResult<SaturationPoint> {
        check_fractions(self.chemicals.len(), z)?;
        check_positive(p, "bubble point pressure")?;
        let zn = pf_core::normalize_or_copy(z);
        let bracket = tsat_bracket(&self.chemicals, p);
        let chemicals = &self.chemicals;
        let t = solve_in_bracket(
            |t| {
                let p_bubble: f64 = chemicals.iter().zip(&zn).map(|(c, x)| x * c.psat(t)).sum();
                (p_bubble / p).ln()
            },
            bracket,
            "bubble point temperature",
        )?;
        let mut point = self.solve_p(&zn, t)?;
        point.p = p;
        Ok(point)
    }
}

/// Dew point of an ideal vapor.
#[derive(Debug, Clone)]
pub struct DewPoint {
    chemicals: Vec<Chemical>,
}

impl DewPoint {
    pub fn new(chemicals: &Chemicals, indices: &[usize]) -> ThermoResult<Self> {
        Ok(Self {
            chemicals: volatile_subset(chemicals, indices)?,
        })
    }

    /// Dew pressure at `t`; composition is the liquid.
    pub fn solve_p(&self, y: &[f64], t: f64) -> ThermoResult<SaturationPoint> {
        check_fractions(self.chemicals.len(), y)?;
        check_positive(t, "dew point temperature")?;
        let y = pf_core::normalize_or_copy(y);
        let inv: f64 = self
            .chemicals
            .iter()
            .zip(&y)
            .map(|(c, yi)| yi / c.psat(t))
            .sum();
        let p = 1.0 / inv;
        let composition = self
            .chemicals
            .iter()
            .zip(&y)
            .map(|(c, yi)| yi * p / c.psat(t))
            .collect();
        Ok(SaturationPoint { t, p, composition })
    }

    /// Dew temperature at `p`; composition is the liquid.
    pub fn solve_t(&self, y: &[f64], p: f64) -> ThermoResult<SaturationPoint> {
        check_fractions(self.chemicals.len(), y)?;
        check_positive(p, "dew point pressure")?;
        let yn = pf_core::normalize_or_copy(y);
        let bracket = tsat_bracket(&self.chemicals, p);
        let chemicals = &self.chemicals;
        let t = solve_in_bracket(
            |t| {
                let sum: f64 = chemicals
                    .iter()
                    .zip(&yn)
                    .map(|(c, yi)| yi * p / c.psat(t))
                    .sum();
                -sum.ln()
            },
            bracket,
            "dew point temperature",
        )?;
        let mut point = self.solve_p(&yn, t)?;
        point.p = p;
        Ok(point)
    }
}

fn rachford_rice(z: &[f64], k: &[f64]) -> f64 {
    let residual = |v: f64| -> f64 {
        z.iter()
            .zip(k)
            .map(|(zi, ki)| zi * (ki - 1.0) / (1.0 + v * (ki - 1.0)))
            .sum()
    };
    if residual(0.0) <= 0.0 {
        return 0.0;
    }
    if residual(1.0) >= 0.0 {
        return 1.0;
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if residual(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-12 {
            break;
        }
    }
    0.5 * (lo + hi)
}

/// Isothermal flash of a vapor-liquid material indexer.
///
/// The handle keeps aliases of the storage and thermal condition it was
/// created for; a flash rewrites the gas and liquid rows in place.
#[derive(Debug)]
pub struct Vle {
    imol: MaterialIndexer,
    thermal: ThermalHandle,
    chemicals: Rc<Chemicals>,
    vapor_fraction: Cell<f64>,
}

impl Vle {
    pub fn new(imol: MaterialIndexer, thermal: ThermalHandle) -> ThermoResult<Self> {
        let phases = imol.phases();
        if !(phases.contains(Phase::Gas) && phases.contains(Phase::Liquid)) {
            return Err(ThermoError::NotSupported {
                what: "vapor-liquid equilibrium requires gas and liquid phases",
            });
        }
        let chemicals = Rc::clone(imol.chemicals());
        Ok(Self {
            imol,
            thermal,
            chemicals,
            vapor_fraction: Cell::new(0.0),
        })
    }

    /// True when the handle operates on exactly this storage and state.
    pub fn is_bound_to(&self, imol: &MaterialIndexer, thermal: &ThermalHandle) -> bool {
        imol.shares_data_with(&self.imol)
            && imol.shares_phases_with(&self.imol)
            && same_handle(thermal, &self.thermal)
    }

    pub fn imol(&self) -> &MaterialIndexer {
        &self.imol
    }

    pub fn thermal_condition(&self) -> ThermalCondition {
        *self.thermal.borrow()
    }

    /// Molar vapor fraction of the equilibrium chemicals after the last flash.
    pub fn vapor_fraction(&self) -> f64 {
        self.vapor_fraction.get()
    }

    /// Flash at `t` [K] and `p` [Pa], updating the thermal condition and the
    /// phase rows. Returns the molar vapor fraction.
    pub fn flash_tp(&self, t: f64, p: f64) -> ThermoResult<f64> {
        let tc = ThermalCondition::new(t, p)?;
        self.thermal.borrow_mut().copy_like(&tc);

        let totals = self.imol.total_by_chemical();
        let eq = self.chemicals.equilibrium_indices(&totals);
        let mut gas = vec![0.0; totals.len()];
        let mut liquid = totals.clone();

        let n_eq: f64 = eq.iter().map(|&i| totals[i]).sum();
        let v = if eq.is_empty() || n_eq <= 0.0 {
            0.0
        } else {
            let z: Vec<f64> = eq.iter().map(|&i| totals[i] / n_eq).collect();
            let k: Vec<f64> = eq
                .iter()
                .map(|&i| self.chemicals.get(i).map_or(0.0, |c| c.psat(t)) / p)
                .collect();
            let v = rachford_rice(&z, &k);
            for ((&i, zi), ki) in eq.iter().zip(&z).zip(&k) {
                let x = zi / (1.0 + v * (ki - 1.0));
                gas[i] = n_eq * v * ki * x;
                liquid[i] = n_eq * (1.0 - v) * x;
            }
            v
        };

        self.imol.set_phase_row(Phase::Gas, &gas)?;
        self.imol.set_phase_row(Phase::Liquid, &liquid)?;
        for phase in self.imol.phases().iter() {
            if phase != Phase::Gas && phase != Phase::Liquid {
                self.imol.set_phase_row(phase, &vec![0.0; totals.len()])?;
            }
        }
        self.vapor_fraction.set(v);
        debug!(t, p, vapor_fraction = v, "vle flash");
        Ok(v)
    }

    /// Flash at the current thermal condition.
    pub fn flash(&self) -> ThermoResult<f64> {
        let tc = self.thermal_condition();
        self.flash_tp(tc.t, tc.p)
    }
}
