//! Derived stream properties.
//!
//! Every property is computed on demand from the current flows and thermal
//! condition; nothing is cached here.
//!
//! Extensive properties are flow rates:
//! - `f_mol` [kmol/hr], `f_mass` [kg/hr], `f_vol` [m³/hr]
//! - `h`, `hf`, `hc`, `hvap` [kJ/hr]; `s`, `c` [kJ/(K·hr)]
//! - `cost` [USD/hr]
//!
//! Intensive properties come from the normalized composition. A stream with
//! no flow reports 0 for all of them (and all-zero `z_*` vectors) without
//! consulting the mixture model. Multi-phase values are weighted by the
//! molar fraction of each phase.

use crate::error::{StreamError, StreamResult};
use crate::stream::Stream;
use pf_core::{ensure_finite, normalize_or_copy, ratio_or_zero};
use pf_thermo::mixture::T_SOLVE_BOUNDS;
use pf_thermo::{Basis, Phase, ThermoResult};

impl Stream {
    // Extensive

    /// Total molar flow [kmol/hr].
    pub fn f_mol(&self) -> f64 {
        self.mol().iter().sum()
    }

    /// Total mass flow [kg/hr].
    pub fn f_mass(&self) -> StreamResult<f64> {
        Ok(self.mass()?.iter().sum())
    }

    /// Total volumetric flow [m³/hr].
    pub fn f_vol(&self) -> StreamResult<f64> {
        Ok(self.vol()?.iter().sum())
    }

    pub fn set_f_mol(&self, value: f64) -> StreamResult<()> {
        self.rescale(self.f_mol(), value, "F_mol")
    }

    pub fn set_f_mass(&self, value: f64) -> StreamResult<()> {
        self.rescale(self.f_mass()?, value, "F_mass")
    }

    pub fn set_f_vol(&self, value: f64) -> StreamResult<()> {
        self.rescale(self.f_vol()?, value, "F_vol")
    }

    fn rescale(&self, current: f64, target: f64, what: &'static str) -> StreamResult<()> {
        let target = ensure_finite(target, what)?;
        if current == 0.0 {
            return Err(StreamError::ZeroFlow { what });
        }
        self.scale_flows(target / current);
        Ok(())
    }

    /// Enthalpy flow [kJ/hr] relative to liquid at the reference temperature.
    pub fn h(&self) -> StreamResult<f64> {
        let (t, p) = (self.t(), self.p());
        self.sum_over_phases(|phase, mol| self.thermo.mixture().h(phase, mol, t, p))
    }

    /// Set the enthalpy flow [kJ/hr] by solving for temperature at fixed
    /// composition, pressure and phase.
    pub fn set_h(&self, h: f64) -> StreamResult<()> {
        if self.is_empty() {
            if h == 0.0 {
                return Ok(());
            }
            return Err(StreamError::ZeroFlow { what: "H" });
        }
        let (t0, p) = (self.t(), self.p());
        let mixture = self.thermo.mixture();
        let solver = self.thermo.solver();
        let t = match self.phase_flows().as_slice() {
            [(phase, mol)] => mixture.solve_t(*phase, mol, h, t0, p, solver)?,
            flows => {
                let mut residual = |t: f64| -> ThermoResult<f64> {
                    let mut total = -h;
                    for (phase, mol) in flows {
                        total += mixture.h(*phase, mol, t, p)?;
                    }
                    Ok(total)
                };
                solver.solve(&mut residual, t0, T_SOLVE_BOUNDS)?
            }
        };
        self.set_t(t)
    }

    /// Entropy flow [kJ/(K·hr)].
    pub fn s(&self) -> StreamResult<f64> {
        let (t, p) = (self.t(), self.p());
        self.sum_over_phases(|phase, mol| self.thermo.mixture().s(phase, mol, t, p))
    }

    /// Heat capacity flow [kJ/(K·hr)].
    pub fn c(&self) -> StreamResult<f64> {
        let t = self.t();
        self.sum_over_phases(|phase, mol| self.thermo.mixture().cn(phase, mol, t))
    }

    /// Enthalpy of formation flow [kJ/hr].
    pub fn hf(&self) -> f64 {
        dot(&self.mol(), &self.chemicals().hf())
    }

    /// Enthalpy of combustion flow [kJ/hr].
    pub fn hc(&self) -> f64 {
        dot(&self.mol(), &self.chemicals().hc())
    }

    /// Enthalpy of vaporization flow [kJ/hr]. Extensive like `h`, so flows
    /// that cancel still contribute.
    pub fn hvap(&self) -> StreamResult<f64> {
        let mol = self.mol();
        if mol.iter().all(|n| *n == 0.0) {
            return Ok(0.0);
        }
        Ok(self.thermo.mixture().hvap(&mol, self.t(), self.p())?)
    }

    /// Cost flow [USD/hr].
    pub fn cost(&self) -> StreamResult<f64> {
        Ok(self.price() * self.f_mass()?)
    }

    // Composition

    pub fn z_mol(&self) -> Vec<f64> {
        normalize_or_copy(&self.mol())
    }

    pub fn z_mass(&self) -> StreamResult<Vec<f64>> {
        Ok(normalize_or_copy(&self.basis_values(Basis::Mass)?))
    }

    pub fn z_vol(&self) -> StreamResult<Vec<f64>> {
        Ok(normalize_or_copy(&self.basis_values(Basis::Volumetric)?))
    }

    // Intensive

    /// Molecular weight [g/mol].
    pub fn mw(&self) -> StreamResult<f64> {
        Ok(ratio_or_zero(self.f_mass()?, self.f_mol()))
    }

    /// Molar volume [m³/mol].
    pub fn v(&self) -> StreamResult<f64> {
        let (t, p) = (self.t(), self.p());
        self.phase_weighted(|phase, z| self.thermo.mixture().v(phase, z, t, p))
    }

    /// Molar heat capacity [J/(mol·K)].
    pub fn cn(&self) -> StreamResult<f64> {
        let t = self.t();
        self.phase_weighted(|phase, z| self.thermo.mixture().cn(phase, z, t))
    }

    /// Density [kg/m³].
    pub fn rho(&self) -> StreamResult<f64> {
        if self.f_mol() == 0.0 {
            return Ok(0.0);
        }
        Ok(ratio_or_zero(self.f_mass()?, self.f_vol()?))
    }

    /// Specific heat capacity [J/(g·K)].
    pub fn cp(&self) -> StreamResult<f64> {
        Ok(ratio_or_zero(self.cn()?, self.mw()?))
    }

    /// Dynamic viscosity [Pa·s].
    pub fn mu(&self) -> StreamResult<f64> {
        let (t, p) = (self.t(), self.p());
        self.phase_weighted(|phase, z| self.thermo.mixture().mu(phase, z, t, p))
    }

    /// Thermal conductivity [W/(m·K)].
    pub fn kappa(&self) -> StreamResult<f64> {
        let (t, p) = (self.t(), self.p());
        self.phase_weighted(|phase, z| self.thermo.mixture().kappa(phase, z, t, p))
    }

    /// Kinematic viscosity [m²/s].
    pub fn nu(&self) -> StreamResult<f64> {
        Ok(ratio_or_zero(self.mu()?, self.rho()?))
    }

    /// Thermal diffusivity [m²/s].
    pub fn alpha(&self) -> StreamResult<f64> {
        // Cp in J/(g·K) -> J/(kg·K)
        let rho_cp = self.rho()? * self.cp()? * 1000.0;
        Ok(ratio_or_zero(self.kappa()?, rho_cp))
    }

    /// Prandtl number.
    pub fn pr(&self) -> StreamResult<f64> {
        let cp_mu = self.cp()? * 1000.0 * self.mu()?;
        Ok(ratio_or_zero(cp_mu, self.kappa()?))
    }

    /// Surface tension [N/m].
    pub fn sigma(&self) -> StreamResult<f64> {
        if self.f_mol() == 0.0 {
            return Ok(0.0);
        }
        Ok(self.thermo.mixture().sigma(&self.z_mol(), self.t(), self.p())?)
    }

    /// Relative permittivity.
    pub fn epsilon(&self) -> StreamResult<f64> {
        if self.f_mol() == 0.0 {
            return Ok(0.0);
        }
        Ok(self.thermo.mixture().epsilon(&self.z_mol(), self.t(), self.p())?)
    }

    fn sum_over_phases<F>(&self, f: F) -> StreamResult<f64>
    where
        F: Fn(Phase, &[f64]) -> ThermoResult<f64>,
    {
        let mut total = 0.0;
        for (phase, mol) in self.phase_flows() {
            total += f(phase, &mol)?;
        }
        Ok(total)
    }

    /// `Σ_phase (N_phase / N) · f(phase, z_phase)`, or 0 without flow.
    fn phase_weighted<F>(&self, f: F) -> StreamResult<f64>
    where
        F: Fn(Phase, &[f64]) -> ThermoResult<f64>,
    {
        let total = self.f_mol();
        if total == 0.0 {
            return Ok(0.0);
        }
        let mut value = 0.0;
        for (phase, mol) in self.phase_flows() {
            let n: f64 = mol.iter().sum();
            if n == 0.0 {
                continue;
            }
            let z: Vec<f64> = mol.iter().map(|m| m / n).collect();
            value += n / total * f(phase, &z)?;
        }
        Ok(value)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
