//! Pure-component data records.

use crate::error::{ThermoError, ThermoResult};
use serde::{Deserialize, Serialize};

const PA_PER_MMHG: f64 = 133.322_368;

/// Antoine vapor-pressure coefficients: `log10(P/mmHg) = a - b / (c + T/°C)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Antoine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Antoine {
    /// Saturation pressure [Pa] at `t_k`.
    pub fn psat(&self, t_k: f64) -> f64 {
        let t_c = t_k - 273.15;
        PA_PER_MMHG * 10f64.powf(self.a - self.b / (self.c + t_c))
    }

    /// Saturation temperature [K] at `p_pa` (closed-form inverse).
    pub fn tsat(&self, p_pa: f64) -> f64 {
        let log_p = (p_pa / PA_PER_MMHG).log10();
        self.b / (self.a - log_p) - self.c + 273.15
    }
}

/// Data for one chemical species.
///
/// Units: MW [g/mol], temperatures [K], heat capacities [J/(mol·K)],
/// enthalpies [J/mol], molar volume [m³/mol], viscosity [Pa·s],
/// thermal conductivity [W/(m·K)], surface tension [N/m].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chemical {
    pub id: String,
    pub mw: f64,
    #[serde(default)]
    pub tb: Option<f64>,
    #[serde(default)]
    pub antoine: Option<Antoine>,
    pub cn_l: f64,
    pub cn_g: f64,
    #[serde(default)]
    pub hvap: f64,
    pub v_l: f64,
    pub mu_l: f64,
    pub mu_g: f64,
    pub kappa_l: f64,
    pub kappa_g: f64,
    #[serde(default)]
    pub sigma: f64,
    #[serde(default)]
    pub epsilon: f64,
    #[serde(default)]
    pub hf: f64,
    #[serde(default)]
    pub hc: f64,
}

impl Chemical {
    /// Whether the chemical can partition into a vapor phase.
    pub fn is_volatile(&self) -> bool {
        self.antoine.is_some() && self.tb.is_some()
    }

    /// Saturation pressure [Pa], or zero for non-volatile chemicals.
    pub fn psat(&self, t_k: f64) -> f64 {
        self.antoine.map_or(0.0, |a| a.psat(t_k))
    }

    /// Look up a chemical in the built-in catalog by identifier or common alias.
    pub fn from_catalog(id: &str) -> ThermoResult<Chemical> {
        let key = id.trim().to_ascii_lowercase();
        let chemical = match key.as_str() {
            "water" | "h2o" => Chemical {
                id: "Water".into(),
                mw: 18.015_28,
                tb: Some(373.124),
                antoine: Some(Antoine {
                    a: 8.071_31,
                    b: 1730.63,
                    c: 233.426,
                }),
                cn_l: 75.3,
                cn_g: 33.6,
                hvap: 40_650.0,
                v_l: 1.807e-5,
                mu_l: 8.9e-4,
                mu_g: 1.0e-5,
                kappa_l: 0.607,
                kappa_g: 0.025,
                sigma: 0.072,
                epsilon: 78.4,
                hf: -285_830.0,
                hc: 0.0,
            },
            "ethanol" | "etoh" => Chemical {
                id: "Ethanol".into(),
                mw: 46.068_44,
                tb: Some(351.44),
                antoine: Some(Antoine {
                    a: 8.204_17,
                    b: 1642.89,
                    c: 230.3,
                }),
                cn_l: 112.4,
                cn_g: 65.6,
                hvap: 38_560.0,
                v_l: 5.84e-5,
                mu_l: 1.07e-3,
                mu_g: 9.0e-6,
                kappa_l: 0.167,
                kappa_g: 0.015,
                sigma: 0.022,
                epsilon: 24.5,
                hf: -277_690.0,
                hc: -1_366_800.0,
            },
            "methanol" | "meoh" => Chemical {
                id: "Methanol".into(),
                mw: 32.041_86,
                tb: Some(337.8),
                antoine: Some(Antoine {
                    a: 8.080_97,
                    b: 1582.271,
                    c: 239.726,
                }),
                cn_l: 81.1,
                cn_g: 44.1,
                hvap: 35_210.0,
                v_l: 4.05e-5,
                mu_l: 5.4e-4,
                mu_g: 9.7e-6,
                kappa_l: 0.2,
                kappa_g: 0.016,
                sigma: 0.0226,
                epsilon: 32.7,
                hf: -238_400.0,
                hc: -726_000.0,
            },
            "benzene" | "c6h6" => Chemical {
                id: "Benzene".into(),
                mw: 78.111_84,
                tb: Some(353.2),
                antoine: Some(Antoine {
                    a: 6.905_65,
                    b: 1211.033,
                    c: 220.79,
                }),
                cn_l: 136.0,
                cn_g: 82.4,
                hvap: 30_720.0,
                v_l: 8.9e-5,
                mu_l: 6.0e-4,
                mu_g: 7.5e-6,
                kappa_l: 0.141,
                kappa_g: 0.011,
                sigma: 0.0289,
                epsilon: 2.28,
                hf: 49_100.0,
                hc: -3_267_600.0,
            },
            "toluene" => Chemical {
                id: "Toluene".into(),
                mw: 92.138_42,
                tb: Some(383.8),
                antoine: Some(Antoine {
                    a: 6.954_64,
                    b: 1344.8,
                    c: 219.482,
                }),
                cn_l: 157.0,
                cn_g: 103.7,
                hvap: 33_180.0,
                v_l: 1.066e-4,
                mu_l: 5.6e-4,
                mu_g: 7.0e-6,
                kappa_l: 0.131,
                kappa_g: 0.011,
                sigma: 0.028,
                epsilon: 2.38,
                hf: 12_400.0,
                hc: -3_910_000.0,
            },
            "octane" | "n-octane" => Chemical {
                id: "Octane".into(),
                mw: 114.228_5,
                tb: Some(398.8),
                antoine: Some(Antoine {
                    a: 6.918_68,
                    b: 1351.99,
                    c: 209.155,
                }),
                cn_l: 254.6,
                cn_g: 188.9,
                hvap: 34_410.0,
                v_l: 1.625e-4,
                mu_l: 5.1e-4,
                mu_g: 5.8e-6,
                kappa_l: 0.128,
                kappa_g: 0.012,
                sigma: 0.0216,
                epsilon: 1.95,
                hf: -250_100.0,
                hc: -5_430_000.0,
            },
            "nitrogen" | "n2" => Chemical {
                id: "N2".into(),
                mw: 28.013_4,
                tb: Some(77.355),
                antoine: Some(Antoine {
                    a: 6.494_57,
                    b: 255.68,
                    c: 266.55,
                }),
                cn_l: 56.0,
                cn_g: 29.1,
                hvap: 5_570.0,
                v_l: 3.47e-5,
                mu_l: 1.6e-4,
                mu_g: 1.78e-5,
                kappa_l: 0.14,
                kappa_g: 0.026,
                sigma: 0.0089,
                epsilon: 1.43,
                hf: 0.0,
                hc: 0.0,
            },
            "glucose" => Chemical {
                id: "Glucose".into(),
                mw: 180.156,
                tb: None,
                antoine: None,
                cn_l: 218.6,
                cn_g: 218.6,
                hvap: 0.0,
                v_l: 1.15e-4,
                mu_l: 1.0e-3,
                mu_g: 1.0e-3,
                kappa_l: 0.3,
                kappa_g: 0.3,
                sigma: 0.0,
                epsilon: 0.0,
                hf: -1_273_300.0,
                hc: -2_805_000.0,
            },
            _ => return Err(ThermoError::UnknownCatalogEntry { id: id.to_string() }),
        };
        Ok(chemical)
    }
}

/// Identifiers available through [`Chemical::from_catalog`].
pub const CATALOG_IDS: [&str; 8] = [
    "Water", "Ethanol", "Methanol", "Benzene", "Toluene", "Octane", "N2", "Glucose",
];
