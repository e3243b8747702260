use pf_stream::{DisplayUnits, PROPERTY_UNITS, Stream, StreamError};
use pf_thermo::{Phase, Thermo};

fn feed() -> Stream {
    Stream::builder()
        .id("feed")
        .thermo(Thermo::from_catalog(&["Water", "Ethanol", "Glucose"]).unwrap())
        .chemical("Water", 10.0)
        .chemical("Ethanol", 5.0)
        .price(0.2)
        .build()
        .unwrap()
}

#[test]
fn named_properties_match_accessors() {
    let s = feed();
    assert_eq!(s.get_property("F_mol", "kmol/hr").unwrap(), s.f_mol());
    assert_eq!(s.get_property("H", "kJ/hr").unwrap(), s.h().unwrap());
    assert_eq!(s.get_property("cost", "USD/hr").unwrap(), s.cost().unwrap());
    let h_mj = s.get_property("H", "MJ/hr").unwrap();
    assert!((h_mj * 1000.0 - s.h().unwrap()).abs() < 1e-9);
    for (name, units) in PROPERTY_UNITS {
        s.get_property(name, units).unwrap();
    }
}

#[test]
fn zero_flow_intensive_properties() {
    let s = Stream::builder()
        .thermo(Thermo::from_catalog(&["Water", "Ethanol"]).unwrap())
        .phase(Phase::Gas)
        .build()
        .unwrap();
    for name in [
        "MW", "V", "rho", "Cn", "Cp", "mu", "kappa", "nu", "alpha", "Pr", "sigma", "epsilon",
    ] {
        let units = pf_stream::canonical_units(name).unwrap();
        assert_eq!(s.get_property(name, units).unwrap(), 0.0, "{name}");
    }
    assert_eq!(s.z_mass().unwrap(), vec![0.0, 0.0]);
}

#[test]
fn enthalpy_set_by_name() {
    let s = feed();
    s.set_property("T", 70.0, "degC").unwrap();
    let h = s.get_property("H", "kJ/hr").unwrap();
    s.set_property("T", 300.0, "K").unwrap();
    s.set_property("H", h, "kJ/hr").unwrap();
    assert!((s.get_property("T", "degC").unwrap() - 70.0).abs() < 1e-3);
}

#[test]
fn property_errors() {
    let s = feed();
    assert!(matches!(
        s.get_property("Tb", "K"),
        Err(StreamError::UnknownProperty { .. })
    ));
    assert!(matches!(
        s.set_property("MW", 18.0, "g/mol"),
        Err(StreamError::ReadOnlyProperty { .. })
    ));
    assert!(matches!(
        s.get_property("P", "kg/hr"),
        Err(StreamError::DimensionMismatch { .. })
    ));
}

#[test]
fn report_with_yaml_display_units() {
    let units: DisplayUnits = serde_yaml::from_str("t: degC\nflow: kg/hr\nn: 1\n").unwrap();
    assert_eq!(units.p, "Pa");
    let report = feed().show(&units).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Stream: feed");
    assert_eq!(lines[1], " phase: 'l', T: 25 degC, P: 101325 Pa");
    assert_eq!(lines[2], " flow (kg/hr): ...");
    assert_eq!(lines[3].trim_start(), "Ethanol  230");
}
