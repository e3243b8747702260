//! YAML stream description.

use crate::error::{CliError, CliResult};
use pf_stream::{DisplayUnits, Stream};
use pf_thermo::{Chemical, Phase, PhaseSet, Thermo};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A chemical given by catalog id or as a full inline record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChemicalSpec {
    Catalog(String),
    Inline(Chemical),
}

impl ChemicalSpec {
    fn resolve(&self) -> CliResult<Chemical> {
        match self {
            ChemicalSpec::Catalog(id) => Ok(Chemical::from_catalog(id)?),
            ChemicalSpec::Inline(chemical) => Ok(chemical.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub phase: Option<Phase>,
    /// Temperature [K]
    #[serde(default)]
    pub t: Option<f64>,
    /// Pressure [Pa]
    #[serde(default)]
    pub p: Option<f64>,
    /// Units of `flows`; kmol/hr when omitted.
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub flows: BTreeMap<String, f64>,
    /// Phase set to cast to, e.g. `gl`.
    #[serde(default)]
    pub phases: Option<String>,
    /// Run an isothermal VLE flash after building.
    #[serde(default)]
    pub flash: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    /// Canonical units of the property when omitted.
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamFile {
    pub chemicals: Vec<ChemicalSpec>,
    pub stream: StreamSpec,
    #[serde(default)]
    pub display: DisplayUnits,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

pub fn load(path: &Path) -> CliResult<StreamFile> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

pub fn parse(text: &str) -> CliResult<StreamFile> {
    Ok(serde_yaml::from_str(text)?)
}

impl StreamFile {
    pub fn thermo(&self) -> CliResult<Thermo> {
        if self.chemicals.is_empty() {
            return Err(CliError::InvalidInput("no chemicals listed".into()));
        }
        let chemicals = self
            .chemicals
            .iter()
            .map(ChemicalSpec::resolve)
            .collect::<CliResult<Vec<_>>>()?;
        Ok(Thermo::from_chemicals(chemicals)?)
    }

    pub fn build_stream(&self) -> CliResult<Stream> {
        let spec = &self.stream;
        let mut builder = Stream::builder().thermo(self.thermo()?).price(spec.price);
        if let Some(id) = &spec.id {
            builder = builder.id(id.clone());
        }
        if let Some(phase) = spec.phase {
            builder = builder.phase(phase);
        }
        if let Some(t) = spec.t {
            builder = builder.t(t);
        }
        if let Some(p) = spec.p {
            builder = builder.p(p);
        }
        if let Some(units) = &spec.units {
            builder = builder.units(units.clone());
        }
        for (id, value) in &spec.flows {
            builder = builder.chemical(id.clone(), *value);
        }
        let mut stream = builder.build()?;

        if let Some(phases) = &spec.phases {
            let phases: PhaseSet = phases.parse()?;
            stream.set_phases(phases)?;
        }
        if spec.flash {
            let vapor_fraction = stream.vle()?.flash()?;
            tracing::info!(vapor_fraction, "flashed stream");
        }
        Ok(stream)
    }
}
