use asphere::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

const NPROCS: usize = 4;

fn run(comm: &ThreadComm, atoms: &Atoms) -> Result<(), Error> {
    let mut sim = Simulation::new(comm);
    sim.atoms = atoms.clone();
    let all = sim.groups.all();

    // measure without the z motion, which a wall would drive
    sim.add_compute(TempPartial::new("xy", all.clone(), [true, true, false]))?;
    sim.add_compute(TempAsphere::new("plain", all.clone(), None))?;
    sim.add_compute(TempAsphere::new("thermal", all, Some("xy")))?;
    sim.init()?;

    for _ in 0..5 {
        let plain = sim.compute_scalar("plain")?;
        let thermal = sim.compute_scalar("thermal")?;
        let tensor = sim.compute_vector("thermal")?;
        if comm.rank() == 0 {
            println!(
                "{:>4} {:>10.5} {:>10.5} {:>10.5} {:>10.5} {:>10.5}",
                sim.ntimestep(),
                plain,
                thermal,
                tensor[0],
                tensor[1],
                tensor[2]
            );
        }
        for i in 0..sim.atoms.nlocal {
            sim.atoms.increment_velocity(i, [0.0, 0.0, 0.1]);
        }
        sim.advance();
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut rng = StdRng::seed_from_u64(2024);
    let mut atoms = Atoms::new();
    for _ in 0..1000 {
        let shape = [rng.gen_range(0.5..1.5), rng.gen_range(0.5..1.5), 1.0];
        let angle: f64 = rng.gen_range(0.0..std::f64::consts::PI);
        let quat = [(angle / 2.0).cos(), 0.0, 0.0, (angle / 2.0).sin()];
        let position = [
            rng.gen_range(0.0..20.0),
            rng.gen_range(0.0..20.0),
            rng.gen_range(0.0..20.0),
        ];
        atoms.add_ellipsoid(position, 1.0, Ellipsoid::new(shape, quat), 1);
    }
    atoms.set_temperature(1.0, &mut rng);

    println!("step      plain    thermal         xx         yy         zz");
    let parts = atoms.partition(NPROCS);
    World::run(NPROCS, |comm| run(comm, &parts[comm.rank()]))?
        .into_iter()
        .collect()
}
