//! Human-readable stream reports.
//!
//! ```text
//! Stream: feed
//!  phase: 'l', T: 298.15 K, P: 101325 Pa
//!  flow (kmol/hr): Water    10
//!                  Ethanol  5
//! ```

use crate::error::{StreamError, StreamResult};
use crate::resolver::resolve;
use crate::stream::{FlowStore, Stream, StreamKind};
use pf_core::{conversion_factor, convert_temperature, sig};
use pf_thermo::{Basis, Phase};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Units and truncation used when rendering a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayUnits {
    /// Temperature units (K, degC, degF, degR).
    pub t: String,
    pub p: String,
    /// Any molar, mass or volumetric flow units.
    pub flow: String,
    /// Maximum number of chemicals listed per block; 0 lists them all.
    pub n: usize,
}

impl Default for DisplayUnits {
    fn default() -> Self {
        Self {
            t: "K".into(),
            p: "Pa".into(),
            flow: "kmol/hr".into(),
            n: 5,
        }
    }
}

impl Stream {
    /// Render the report with `units`.
    pub fn show(&self, units: &DisplayUnits) -> StreamResult<String> {
        let mut out = match self.id() {
            Some(id) => format!("{}: {}\n", self.kind(), id),
            None => format!("{}\n", self.kind()),
        };

        let t = convert_temperature(self.t(), "K", &units.t)
            .map_err(|e| StreamError::from_unit(&units.t, e))?;
        let p = self.p()
            * conversion_factor("Pa", &units.p).map_err(|e| StreamError::from_unit(&units.p, e))?;
        let phase = match &self.store {
            FlowStore::Single(imol) => format!("phase: '{}'", imol.phase()),
            FlowStore::Multi { imol, .. } => format!("phases: {}", imol.phases()),
        };
        out.push_str(&format!(
            " {phase}, T: {} {}, P: {} {}\n",
            sig(t, 5),
            units.t,
            sig(p, 6),
            units.p
        ));

        let (basis, factor) = resolve(&units.flow)?;
        let mut blocks = Vec::new();
        for (phase, mol) in self.phase_flows() {
            let values = self.phase_basis_values(phase, &mol, basis)?;
            let entries: Vec<(&str, f64)> = self
                .chemicals()
                .ids()
                .zip(values)
                .filter(|(_, v)| *v != 0.0)
                .map(|(id, v)| (id, v * factor))
                .collect();
            if !entries.is_empty() {
                blocks.push((phase, entries));
            }
        }

        if blocks.is_empty() {
            out.push_str(" flow: 0");
            return Ok(out);
        }

        let beginning = format!(" flow ({}): ", units.flow);
        let indent = " ".repeat(beginning.chars().count());
        out.push_str(&beginning);
        match self.kind() {
            StreamKind::Single => {
                let lines = flow_lines(&blocks[0].1, units.n);
                out.push_str(&lines.join(&format!("\n{indent}")));
            }
            StreamKind::Multi => {
                let inner = format!("{indent}    ");
                let rendered: Vec<String> = blocks
                    .iter()
                    .map(|(phase, entries)| {
                        let lines = flow_lines(entries, units.n);
                        format!("({phase}) {}", lines.join(&format!("\n{inner}")))
                    })
                    .collect();
                out.push_str(&rendered.join(&format!("\n{indent}")));
            }
        }
        Ok(out)
    }

    /// One phase row expressed in the canonical units of `basis`.
    fn phase_basis_values(
        &self,
        phase: Phase,
        mol: &[f64],
        basis: Basis,
    ) -> StreamResult<Vec<f64>> {
        Ok(match basis {
            Basis::Molar => mol.to_vec(),
            Basis::Mass => mol
                .iter()
                .zip(self.chemicals().mw())
                .map(|(n, mw)| n * mw)
                .collect(),
            Basis::Volumetric => {
                let volumes = self
                    .thermo
                    .mixture()
                    .molar_volumes(phase, self.t(), self.p())?;
                mol.iter()
                    .zip(volumes)
                    .map(|(n, v)| 1000.0 * n * v)
                    .collect()
            }
        })
    }
}

/// `id  value` lines padded to the longest id. Past `n` entries, the list
/// keeps the first `n - 1`, an ellipsis, and the last entry. `n == 0` never
/// truncates.
fn flow_lines(entries: &[(&str, f64)], n: usize) -> Vec<String> {
    let width = entries.iter().map(|(id, _)| id.chars().count()).max().unwrap_or(0);
    let line = |(id, value): &(&str, f64)| format!("{id:<width$}  {}", sig(*value, 3));
    if n == 0 || entries.len() <= n {
        return entries.iter().map(line).collect();
    }
    let head = n - 1;
    let mut lines: Vec<String> = entries[..head].iter().map(line).collect();
    lines.push("...".into());
    if let Some(last) = entries.last() {
        lines.push(line(last));
    }
    lines
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.show(&DisplayUnits::default()).map_err(|_| fmt::Error)?;
        f.write_str(&report)
    }
}
