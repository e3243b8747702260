use pf_core::{Tolerances, nearly_equal};
use pf_thermo::{
    BubblePoint, DewPoint, MolarFlowIndexer, Phase, PhaseSet, ThermalCondition, Thermo, Vle,
};
use std::rc::Rc;

fn thermo() -> Thermo {
    Thermo::from_catalog(&["Water", "Ethanol", "Glucose"]).unwrap()
}

fn tol() -> Tolerances {
    Tolerances {
        abs: 1e-9,
        rel: 1e-6,
    }
}

#[test]
fn views_follow_shared_data() {
    let thermo = thermo();
    let a = MolarFlowIndexer::from_data(
        Rc::clone(thermo.chemicals()),
        vec![10.0, 5.0, 0.0],
        Phase::Liquid,
    )
    .unwrap();
    let mut b = MolarFlowIndexer::new(Rc::clone(thermo.chemicals()), Phase::Liquid);
    b.link_data(&a);

    let mass_b = b.by_mass();
    a.set(2, 1.0).unwrap();
    assert!(nearly_equal(mass_b.get(2).unwrap(), 180.156, tol()));

    let thermal = ThermalCondition::default().into_handle();
    let vol = b.by_volume(&thermal, thermo.mixture());
    vol.set_all(&[1.0, 0.0, 0.0]).unwrap();
    assert!(nearly_equal(a.get(0).unwrap(), 1.0 / (1000.0 * 1.807e-5), tol()));
}

#[test]
fn flash_respects_bubble_and_dew_points() {
    let thermo = thermo();
    let chems = thermo.chemicals();
    let imol = MolarFlowIndexer::from_data(Rc::clone(chems), vec![3.0, 1.0, 0.5], Phase::Liquid)
        .unwrap()
        .to_material_indexer(&PhaseSet::vle());
    let thermal = ThermalCondition::default().into_handle();
    let vle = Vle::new(imol.clone(), Rc::clone(&thermal)).unwrap();

    let eq = chems.equilibrium_indices(&imol.total_by_chemical());
    assert_eq!(eq, vec![0, 1]);
    let z = [0.75, 0.25];
    let bubble = BubblePoint::new(chems, &eq).unwrap().solve_t(&z, 101_325.0).unwrap();
    let dew = DewPoint::new(chems, &eq).unwrap().solve_t(&z, 101_325.0).unwrap();

    let below = vle.flash_tp(bubble.t - 1.0, 101_325.0).unwrap();
    assert_eq!(below, 0.0);
    let above = vle.flash_tp(dew.t + 1.0, 101_325.0).unwrap();
    assert_eq!(above, 1.0);
    // Glucose never leaves the liquid.
    assert_eq!(imol.get(Phase::Gas, 2).unwrap(), 0.0);
    assert_eq!(imol.get(Phase::Liquid, 2).unwrap(), 0.5);

    let mid = vle.flash_tp(0.5 * (bubble.t + dew.t), 101_325.0).unwrap();
    assert!(mid > 0.0 && mid < 1.0);
    let totals = imol.total_by_chemical();
    assert!(nearly_equal(totals[0], 3.0, tol()));
    assert!(nearly_equal(totals[1], 1.0, tol()));
    assert!(vle.is_bound_to(&imol, &thermal));
}

#[test]
fn enthalpy_solve_uses_context_solver() {
    let thermo = thermo();
    let mol = [2.0, 1.0, 0.0];
    let h = thermo.mixture().h(Phase::Gas, &mol, 420.0, 101_325.0).unwrap();
    let t = thermo
        .mixture()
        .solve_t(Phase::Gas, &mol, h, 298.15, 101_325.0, thermo.solver())
        .unwrap();
    assert!((t - 420.0).abs() < 1e-5, "t = {t}");
}
