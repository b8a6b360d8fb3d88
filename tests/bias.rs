mod common;

use approx::assert_relative_eq;
use asphere::prelude::*;
use common::{random_ellipsoids, Census, Drift, Freeze};

fn single_sphere(comm: &SerialComm, v: [f64; 3]) -> Simulation<'_> {
    let mut sim = Simulation::new(comm);
    let i = sim
        .atoms
        .add_ellipsoid([1.0, 1.0, 1.0], 1.0, Ellipsoid::sphere(1.0), 1);
    sim.atoms.set_velocity(i, v);
    sim
}

#[test]
fn streaming_bias_removes_translation() {
    let comm = SerialComm::new();
    let mut sim = single_sphere(&comm, [1.0, 0.0, 0.0]);
    let all = sim.groups.all();
    sim.add_compute(Drift::new("flow", all.clone(), [1.0, 0.0, 0.0]))
        .unwrap();

    let mut temp = TempAsphere::new("t", all, Some("flow"));
    temp.init(&sim).unwrap();
    assert_eq!(temp.dof(), 5.0);
    assert_eq!(temp.bias_kind(), Some(BiasKind::Uniform));
    assert_eq!(temp.compute_scalar(&mut sim).unwrap(), 0.0);
    assert_eq!(temp.compute_vector(&mut sim).unwrap(), [0.0; 6]);
    assert_eq!(sim.atoms.velocities[0], [1.0, 0.0, 0.0]);
}

#[test]
fn per_atom_bias_round_trip() {
    let comm = SerialComm::new();
    let mut sim = single_sphere(&comm, [1.0, 0.5, 0.0]);
    let all = sim.groups.all();
    sim.add_compute(Drift::new("flow", all.clone(), [1.0, 0.5, 0.0]))
        .unwrap();
    let mut temp = TempAsphere::new("t", all, Some("flow"));
    temp.init(&sim).unwrap();

    let mut v = sim.atoms.velocities[0];
    temp.remove_bias(&sim.atoms, 0, &mut v).unwrap();
    assert_eq!(v, [0.0; 3]);
    temp.restore_bias(&sim.atoms, 0, &mut v).unwrap();
    assert_eq!(v, sim.atoms.velocities[0]);
}

#[test]
fn uniform_bias_never_adds_dof() {
    let comm = SerialComm::new();
    let mut sim = Simulation::new(&comm);
    sim.atoms = random_ellipsoids(10, 7);
    let all = sim.groups.all();
    sim.add_compute(Drift::new("flow", all.clone(), [0.0; 3]))
        .unwrap();
    sim.add_compute(TempPartial::new("p", all.clone(), [false; 3]))
        .unwrap();

    let mut plain = TempAsphere::new("plain", all.clone(), None);
    plain.init(&sim).unwrap();
    assert_eq!(plain.dof(), 60.0);

    let mut drift = TempAsphere::new("drift", all.clone(), Some("flow"));
    drift.init(&sim).unwrap();
    assert_eq!(drift.dof(), 50.0);

    let mut partial = TempAsphere::new("partial", all, Some("p"));
    partial.init(&sim).unwrap();
    assert_eq!(partial.dof(), 30.0);
}

#[test]
fn velocities_survive_evaluation_unchanged() {
    let comm = SerialComm::new();
    let mut sim = Simulation::new(&comm);
    sim.atoms = random_ellipsoids(20, 11);
    let mobile = sim.groups.define("mobile").unwrap();
    for i in (0..20).step_by(2) {
        sim.atoms.set_mask_bits(i, mobile.bit());
    }
    sim.add_compute(TempPartial::new("p", mobile.clone(), [true, false, true]))
        .unwrap();
    let region = Rect::new(0.0, 5.0, 0.0, 10.0, 0.0, 10.0);
    sim.add_compute(TempRegion::new("r", sim.groups.all(), Box::new(region)))
        .unwrap();
    let before = sim.atoms.velocities.clone();

    let mut partial = TempAsphere::new("tp", mobile, Some("p"));
    partial.init(&sim).unwrap();
    partial.compute_scalar(&mut sim).unwrap();
    partial.compute_vector(&mut sim).unwrap();
    assert_eq!(sim.atoms.velocities, before);

    let mut regional = TempAsphere::new("tr", sim.groups.all(), Some("r"));
    regional.init(&sim).unwrap();
    regional.compute_scalar(&mut sim).unwrap();
    regional.compute_vector(&mut sim).unwrap();
    assert_eq!(sim.atoms.velocities, before);
}

#[test]
fn regional_bias_recounts_every_evaluation() {
    let comm = SerialComm::new();
    let mut sim = Simulation::new(&comm);
    for (x, v) in [(1.0, [1.0, 0.0, 0.0]), (7.0, [0.0, 3.0, 0.0])] {
        let i = sim
            .atoms
            .add_ellipsoid([x, 1.0, 1.0], 1.0, Ellipsoid::sphere(1.0), 1);
        sim.atoms.set_velocity(i, v);
    }
    let region = Rect::new(0.0, 5.0, 0.0, 10.0, 0.0, 10.0);
    sim.add_compute(TempRegion::new("r", sim.groups.all(), Box::new(region)))
        .unwrap();

    let mut temp = TempAsphere::new("t", sim.groups.all(), Some("r"));
    temp.init(&sim).unwrap();
    assert_eq!(temp.bias_kind(), Some(BiasKind::Regional));
    assert_eq!(temp.dof(), 6.0);
    assert_relative_eq!(temp.compute_scalar(&mut sim).unwrap(), 1.0 / 6.0);

    // second atom drifts into the region
    sim.atoms.positions[1][0] = 2.0;
    sim.advance();
    assert_relative_eq!(temp.compute_scalar(&mut sim).unwrap(), 10.0 / 12.0);
    assert_eq!(temp.dof(), 12.0);
}

#[test]
fn fixes_reduce_dof() {
    let comm = SerialComm::new();
    let mut sim = single_sphere(&comm, [1.0, 0.0, 0.0]);
    sim.add_fix(Box::new(Freeze { dof: 2 }));
    let mut temp = TempAsphere::new("t", sim.groups.all(), None);
    temp.init(&sim).unwrap();
    assert_eq!(temp.dof(), 4.0);
    assert_relative_eq!(temp.compute_scalar(&mut sim).unwrap(), 0.25);
}

#[test]
fn stale_bias_is_evaluated_once_per_step() {
    let comm = SerialComm::new();
    let mut sim = single_sphere(&comm, [1.0, 0.0, 0.0]);
    let drift = Drift::new("flow", sim.groups.all(), [0.5, 0.0, 0.0]);
    let evaluations = drift.evaluations();
    sim.add_compute(drift).unwrap();
    let mut temp = TempAsphere::new("t", sim.groups.all(), Some("flow"));
    temp.init(&sim).unwrap();
    assert_eq!(evaluations.get(), 0);

    temp.compute_scalar(&mut sim).unwrap();
    temp.compute_scalar(&mut sim).unwrap();
    assert_eq!(evaluations.get(), 1);
    temp.compute_vector(&mut sim).unwrap();
    assert_eq!(evaluations.get(), 2);

    sim.advance();
    temp.compute_scalar(&mut sim).unwrap();
    assert_eq!(evaluations.get(), 3);
}

#[test]
fn bias_binding_errors() {
    let comm = SerialComm::new();
    let mut sim = single_sphere(&comm, [1.0, 0.0, 0.0]);
    let all = sim.groups.all();
    let mobile = sim.groups.define("mobile").unwrap();
    sim.add_compute(Census::new("census", all.clone())).unwrap();
    sim.add_compute(TempAsphere::new("other", all.clone(), None))
        .unwrap();
    sim.add_compute(TempPartial::new("p", mobile, [true; 3]))
        .unwrap();

    let init = |bias: &str| TempAsphere::new("t", all.clone(), Some(bias)).init(&sim);
    assert_eq!(
        init("missing"),
        Err(Error::ComputeNotFound(String::from("missing")))
    );
    assert_eq!(
        init("census"),
        Err(Error::BiasNotTemperature(String::from("census")))
    );
    assert_eq!(
        init("other"),
        Err(Error::BiasWithoutVelocityBias(String::from("other")))
    );
    assert_eq!(
        init("p"),
        Err(Error::BiasGroupMismatch {
            bias: String::from("p"),
            bias_group: String::from("mobile"),
            group: String::from("all"),
        })
    );
    assert_eq!(init("t"), Err(Error::BiasSelfReference(String::from("t"))));
}

#[test]
fn registry_evaluates_by_id() {
    let comm = SerialComm::new();
    let mut sim = single_sphere(&comm, [1.0, 2.0, 2.0]);
    let all = sim.groups.all();
    sim.add_compute(TempPartial::new("p", all.clone(), [true, false, false]))
        .unwrap();
    sim.add_compute(TempAsphere::new("t", all.clone(), Some("p")))
        .unwrap();
    assert_eq!(
        sim.add_compute(TempAsphere::new("t", all, None)).err(),
        Some(Error::DuplicateCompute(String::from("t")))
    );

    sim.init().unwrap();
    assert_relative_eq!(sim.compute_scalar("t").unwrap(), 0.25);
    assert_eq!(sim.compute_vector("t").unwrap()[0], 1.0);
    assert_eq!(sim.atoms.velocities[0], [1.0, 2.0, 2.0]);
    assert_eq!(
        sim.compute_scalar("nope"),
        Err(Error::ComputeNotFound(String::from("nope")))
    );
}
