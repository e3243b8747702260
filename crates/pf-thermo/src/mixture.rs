//! Mixture property models.
//!
//! Flow-weighted methods take molar flows in kmol/hr and return extensive
//! rates (kJ/hr, kJ/(K·hr)); passing mole fractions instead yields the
//! per-mole intensive value (J/mol, J/(mol·K)). Mixing-rule methods
//! (`mu`, `kappa`, `sigma`, `epsilon`) expect mole fractions.

use crate::chemicals::Chemicals;
use crate::error::{ThermoError, ThermoResult};
use crate::phase::Phase;
use crate::solver::RootSolver;
use pf_core::constants::{P_REF_PA, R_J_PER_MOL_K, T_REF_K};
use std::fmt;
use std::rc::Rc;

/// Temperature window [K] searched when solving T from enthalpy.
pub const T_SOLVE_BOUNDS: (f64, f64) = (10.0, 5000.0);

/// Thermodynamic property model for mixtures of a fixed chemical registry.
pub trait Mixture: fmt::Debug {
    fn name(&self) -> &str;

    fn chemicals(&self) -> &Rc<Chemicals>;

    /// Enthalpy relative to liquid at the reference temperature.
    fn h(&self, phase: Phase, mol: &[f64], t: f64, p: f64) -> ThermoResult<f64>;

    fn s(&self, phase: Phase, mol: &[f64], t: f64, p: f64) -> ThermoResult<f64>;

    /// Constant-pressure heat capacity.
    fn cn(&self, phase: Phase, mol: &[f64], t: f64) -> ThermoResult<f64>;

    /// Molar volume of each chemical [m³/mol] in registry order.
    fn molar_volumes(&self, phase: Phase, t: f64, p: f64) -> ThermoResult<Vec<f64>>;

    /// Flow-weighted molar volume: `Σ n_i·V_i`.
    fn v(&self, phase: Phase, mol: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        let volumes = self.molar_volumes(phase, t, p)?;
        Ok(mol.iter().zip(&volumes).map(|(n, v)| n * v).sum())
    }

    /// Dynamic viscosity [Pa·s].
    fn mu(&self, phase: Phase, z: &[f64], t: f64, p: f64) -> ThermoResult<f64>;

    /// Thermal conductivity [W/(m·K)].
    fn kappa(&self, phase: Phase, z: &[f64], t: f64, p: f64) -> ThermoResult<f64>;

    /// Surface tension [N/m].
    fn sigma(&self, z: &[f64], t: f64, p: f64) -> ThermoResult<f64>;

    /// Relative permittivity.
    fn epsilon(&self, z: &[f64], t: f64, p: f64) -> ThermoResult<f64>;

    /// Enthalpy of vaporization (flow-weighted).
    fn hvap(&self, mol: &[f64], t: f64, p: f64) -> ThermoResult<f64>;

    /// Temperature at which `h(phase, mol, T, p)` equals `h_target`.
    fn solve_t(
        &self,
        phase: Phase,
        mol: &[f64],
        h_target: f64,
        t_guess: f64,
        p: f64,
        solver: &dyn RootSolver,
    ) -> ThermoResult<f64> {
        let mut residual =
            |t: f64| -> ThermoResult<f64> { Ok(self.h(phase, mol, t, p)? - h_target) };
        let t = solver.solve(&mut residual, t_guess, T_SOLVE_BOUNDS)?;
        tracing::trace!(solver = solver.name(), t, h_target, "solved temperature from enthalpy");
        Ok(t)
    }
}

/// Ideal mixing of pure-component correlations.
///
/// Heat capacities are constant per phase; the gas branch of a volatile
/// chemical passes through its normal boiling point with a constant heat of
/// vaporization. Gas volumes follow the ideal-gas law.
#[derive(Debug, Clone)]
pub struct IdealMixture {
    chemicals: Rc<Chemicals>,
}

impl IdealMixture {
    pub fn new(chemicals: Rc<Chemicals>) -> Self {
        Self { chemicals }
    }

    fn check_len(&self, mol: &[f64]) -> ThermoResult<()> {
        if mol.len() != self.chemicals.len() {
            return Err(ThermoError::InvalidArg {
                what: format!(
                    "flow vector has {} entries, registry has {}",
                    mol.len(),
                    self.chemicals.len()
                ),
            });
        }
        Ok(())
    }

    fn check_state(t: f64, p: f64) -> ThermoResult<()> {
        if !(t.is_finite() && t > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if !(p.is_finite() && p > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    fn gas_branch(phase: Phase, tb: Option<f64>) -> Option<f64> {
        if phase.is_gas() { tb } else { None }
    }
}

impl Mixture for IdealMixture {
    fn name(&self) -> &str {
        "ideal"
    }

    fn chemicals(&self) -> &Rc<Chemicals> {
        &self.chemicals
    }

    fn h(&self, phase: Phase, mol: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        self.check_len(mol)?;
        Self::check_state(t, p)?;
        let h = self
            .chemicals
            .iter()
            .zip(mol)
            .filter(|(_, n)| **n != 0.0)
            .map(|(chem, n)| {
                let h_i = match Self::gas_branch(phase, chem.tb) {
                    Some(tb) => chem.cn_l * (tb - T_REF_K) + chem.hvap + chem.cn_g * (t - tb),
                    None => chem.cn_l * (t - T_REF_K),
                };
                n * h_i
            })
            .sum();
        Ok(h)
    }

    fn s(&self, phase: Phase, mol: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        self.check_len(mol)?;
        Self::check_state(t, p)?;
        let total: f64 = mol.iter().sum();
        let mut s = 0.0;
        for (chem, n) in self.chemicals.iter().zip(mol) {
            if *n == 0.0 {
                continue;
            }
            let s_i = match Self::gas_branch(phase, chem.tb) {
                Some(tb) => {
                    chem.cn_l * (tb / T_REF_K).ln()
                        + chem.hvap / tb
                        + chem.cn_g * (t / tb).ln()
                        - R_J_PER_MOL_K * (p / P_REF_PA).ln()
                }
                None => chem.cn_l * (t / T_REF_K).ln(),
            };
            s += n * s_i;
            if total > 0.0 && *n > 0.0 {
                s -= R_J_PER_MOL_K * n * (n / total).ln();
            }
        }
        Ok(s)
    }

    fn cn(&self, phase: Phase, mol: &[f64], t: f64) -> ThermoResult<f64> {
        self.check_len(mol)?;
        Self::check_state(t, P_REF_PA)?;
        let cn = self
            .chemicals
            .iter()
            .zip(mol)
            .map(|(chem, n)| {
                let c = match Self::gas_branch(phase, chem.tb) {
                    Some(_) => chem.cn_g,
                    None => chem.cn_l,
                };
                n * c
            })
            .sum();
        Ok(cn)
    }

    fn molar_volumes(&self, phase: Phase, t: f64, p: f64) -> ThermoResult<Vec<f64>> {
        Self::check_state(t, p)?;
        let v_gas = R_J_PER_MOL_K * t / p;
        Ok(self
            .chemicals
            .iter()
            .map(|chem| {
                if Self::gas_branch(phase, chem.tb).is_some() {
                    v_gas
                } else {
                    chem.v_l
                }
            })
            .collect())
    }

    fn mu(&self, phase: Phase, z: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        self.check_len(z)?;
        Self::check_state(t, p)?;
        let mu: f64 = if phase.is_gas() {
            self.chemicals.iter().zip(z).map(|(c, x)| x * c.mu_g).sum()
        } else {
            let ln_mu: f64 = self
                .chemicals
                .iter()
                .zip(z)
                .filter(|(_, x)| **x != 0.0)
                .map(|(c, x)| x * c.mu_l.ln())
                .sum();
            ln_mu.exp()
        };
        Ok(mu)
    }

    fn kappa(&self, phase: Phase, z: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        self.check_len(z)?;
        Self::check_state(t, p)?;
        Ok(self
            .chemicals
            .iter()
            .zip(z)
            .map(|(c, x)| x * if phase.is_gas() { c.kappa_g } else { c.kappa_l })
            .sum())
    }

    fn sigma(&self, z: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        self.check_len(z)?;
        Self::check_state(t, p)?;
        Ok(self.chemicals.iter().zip(z).map(|(c, x)| x * c.sigma).sum())
    }

    fn epsilon(&self, z: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        self.check_len(z)?;
        Self::check_state(t, p)?;
        Ok(self.chemicals.iter().zip(z).map(|(c, x)| x * c.epsilon).sum())
    }

    fn hvap(&self, mol: &[f64], t: f64, p: f64) -> ThermoResult<f64> {
        self.check_len(mol)?;
        Self::check_state(t, p)?;
        Ok(self
            .chemicals
            .iter()
            .zip(mol)
            .filter(|(c, _)| c.is_volatile())
            .map(|(c, n)| n * c.hvap)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Secant;

    fn water_ethanol() -> IdealMixture {
        IdealMixture::new(Rc::new(
            Chemicals::from_catalog(&["Water", "Ethanol"]).unwrap(),
        ))
    }

    #[test]
    fn liquid_enthalpy_is_zero_at_reference() {
        let mix = water_ethanol();
        let h = mix.h(Phase::Liquid, &[10.0, 5.0], T_REF_K, P_REF_PA).unwrap();
        assert_eq!(h, 0.0);
    }

    #[test]
    fn liquid_enthalpy_is_linear_in_flow() {
        let mix = water_ethanol();
        let h1 = mix.h(Phase::Liquid, &[1.0, 0.0], 308.15, P_REF_PA).unwrap();
        let h2 = mix.h(Phase::Liquid, &[2.0, 0.0], 308.15, P_REF_PA).unwrap();
        assert!((h1 - 753.0).abs() < 1e-9);
        assert!((h2 - 2.0 * h1).abs() < 1e-9);
    }

    #[test]
    fn gas_enthalpy_includes_vaporization() {
        let mix = water_ethanol();
        let tb = 373.124;
        let h_l = mix.h(Phase::Liquid, &[1.0, 0.0], tb, P_REF_PA).unwrap();
        let h_g = mix.h(Phase::Gas, &[1.0, 0.0], tb, P_REF_PA).unwrap();
        assert!((h_g - h_l - 40_650.0).abs() < 1e-6);
    }

    #[test]
    fn solve_t_inverts_enthalpy() {
        let mix = water_ethanol();
        let mol = [10.0, 5.0];
        let h = mix.h(Phase::Liquid, &mol, 330.0, P_REF_PA).unwrap();
        let t = mix
            .solve_t(Phase::Liquid, &mol, h, T_REF_K, P_REF_PA, &Secant::default())
            .unwrap();
        assert!((t - 330.0).abs() < 1e-6, "t = {t}");
    }

    #[test]
    fn gas_volume_is_ideal() {
        let mix = water_ethanol();
        let v = mix.molar_volumes(Phase::Gas, 300.0, 1e5).unwrap();
        assert!((v[0] - R_J_PER_MOL_K * 300.0 / 1e5).abs() < 1e-15);
        let v_l = mix.molar_volumes(Phase::Liquid, 300.0, 1e5).unwrap();
        assert_eq!(v_l[0], 1.807e-5);
    }

    #[test]
    fn pure_viscosity_is_recovered() {
        let mix = water_ethanol();
        let mu = mix.mu(Phase::Liquid, &[1.0, 0.0], 300.0, 1e5).unwrap();
        assert!((mu - 8.9e-4).abs() < 1e-15);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let mix = water_ethanol();
        assert!(mix.h(Phase::Liquid, &[1.0], 300.0, 1e5).is_err());
    }

    #[test]
    fn nonphysical_state_is_rejected() {
        let mix = water_ethanol();
        assert!(matches!(
            mix.h(Phase::Liquid, &[1.0, 1.0], -5.0, 1e5),
            Err(ThermoError::NonPhysical { .. })
        ));
    }
}
