use rand::Rng;
use rand_distr::Distribution;

/// Shape and orientation carried by an extended (ellipsoidal) particle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-axis lengths along the body x, y and z axes
    pub shape: [f64; 3],
    /// Unit quaternion (w, i, j, k) rotating the body frame into the space frame
    pub quat: [f64; 4],
}
impl Ellipsoid {
    pub fn new(shape: [f64; 3], quat: [f64; 4]) -> Self {
        Self { shape, quat }
    }
    /// A sphere of the given radius in the identity orientation
    pub fn sphere(radius: f64) -> Self {
        Self::new([radius; 3], [1.0, 0.0, 0.0, 0.0])
    }

    /// Principal moments of inertia of a uniform solid ellipsoid of mass `mass`
    pub fn inertia(&self, mass: f64) -> [f64; 3] {
        let [a, b, c] = self.shape;
        [
            mass * (b * b + c * c) / 5.0,
            mass * (a * a + c * c) / 5.0,
            mass * (a * a + b * b) / 5.0,
        ]
    }
}

/// Per-particle properties owned by one process
#[derive(Clone, Debug, Default)]
pub struct Atoms {
    pub ids: Vec<usize>,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Vec<[f64; 3]>,
    pub angmom: Vec<[f64; 3]>,
    pub masses: Vec<f64>,
    pub masks: Vec<u32>,
    /// `None` marks a point particle
    pub ellipsoids: Vec<Option<Ellipsoid>>,
    pub nlocal: usize,
}
impl Atoms {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn num_atoms(&self) -> usize {
        self.ids.len()
    }
    pub fn num_local_atoms(&self) -> usize {
        self.nlocal
    }
    pub fn ids(&self) -> &Vec<usize> {
        &self.ids
    }
    pub fn id_to_idx(&self, id: usize) -> Option<usize> {
        self.ids.iter().position(|x| *x == id)
    }
    pub fn positions(&self) -> &Vec<[f64; 3]> {
        &self.positions
    }
    pub fn velocities(&self) -> &Vec<[f64; 3]> {
        &self.velocities
    }
    pub fn mass(&self, idx: usize) -> f64 {
        self.masses[idx]
    }
    pub fn ellipsoid(&self, idx: usize) -> Option<&Ellipsoid> {
        self.ellipsoids[idx].as_ref()
    }
    pub fn in_group(&self, idx: usize, groupbit: u32) -> bool {
        self.masks[idx] & groupbit != 0
    }

    /// Add one extended particle at rest, belonging only to the group with bit `mask`
    pub fn add_ellipsoid(
        &mut self,
        position: [f64; 3],
        mass: f64,
        ellipsoid: Ellipsoid,
        mask: u32,
    ) -> usize {
        self.push(position, mass, Some(ellipsoid), mask)
    }
    /// Add one point particle at rest
    pub fn add_point(&mut self, position: [f64; 3], mass: f64, mask: u32) -> usize {
        self.push(position, mass, None, mask)
    }
    fn push(
        &mut self,
        position: [f64; 3],
        mass: f64,
        ellipsoid: Option<Ellipsoid>,
        mask: u32,
    ) -> usize {
        assert!(mass > 0.0, "Mass should be positive, found {}", mass);
        let atom_id = match self.ids().iter().max() {
            Some(j) => j + 1,
            None => 0,
        };
        self.ids.push(atom_id);
        self.positions.push(position);
        self.velocities.push([0.0, 0.0, 0.0]);
        self.angmom.push([0.0, 0.0, 0.0]);
        self.masses.push(mass);
        self.masks.push(mask);
        self.ellipsoids.push(ellipsoid);
        self.nlocal += 1;
        self.nlocal - 1
    }

    pub fn set_velocity(&mut self, i: usize, new_vel: [f64; 3]) {
        self.velocities[i] = new_vel;
    }
    pub fn set_angmom(&mut self, i: usize, new_angmom: [f64; 3]) {
        self.angmom[i] = new_angmom;
    }
    pub fn increment_velocity(&mut self, i: usize, increment: [f64; 3]) {
        self.velocities[i][0] += increment[0];
        self.velocities[i][1] += increment[1];
        self.velocities[i][2] += increment[2];
    }
    pub fn set_mask_bits(&mut self, i: usize, bits: u32) {
        self.masks[i] |= bits;
    }

    /// Draw Maxwell-Boltzmann velocities and angular momenta for the local atoms
    /// in reduced units at the given temperature.
    pub fn set_temperature<R: Rng>(&mut self, temperature: f64, rng: &mut R) {
        let dist = rand_distr::Normal::new(0.0, temperature.sqrt()).expect("Invalid temperature");
        let sqrt_ke: Vec<f64> = dist.sample_iter(&mut *rng).take(self.nlocal * 6).collect();
        for i in 0..self.nlocal {
            let sqrt_mass = self.masses[i].sqrt();
            self.velocities[i] = [
                sqrt_ke[6 * i] / sqrt_mass,
                sqrt_ke[6 * i + 1] / sqrt_mass,
                sqrt_ke[6 * i + 2] / sqrt_mass,
            ];
            if let Some(ellipsoid) = self.ellipsoids[i] {
                let inertia = ellipsoid.inertia(self.masses[i]);
                self.angmom[i] = [
                    sqrt_ke[6 * i + 3] * inertia[0].sqrt(),
                    sqrt_ke[6 * i + 4] * inertia[1].sqrt(),
                    sqrt_ke[6 * i + 5] * inertia[2].sqrt(),
                ];
            }
        }
    }

    /// Split the atoms into `nparts` stores, atom `i` landing in store `i % nparts`.
    pub fn partition(&self, nparts: usize) -> Vec<Atoms> {
        assert!(nparts > 0, "Should partition into at least one part");
        let mut parts = vec![Atoms::new(); nparts];
        for i in 0..self.nlocal {
            let part = &mut parts[i % nparts];
            part.ids.push(self.ids[i]);
            part.positions.push(self.positions[i]);
            part.velocities.push(self.velocities[i]);
            part.angmom.push(self.angmom[i]);
            part.masses.push(self.masses[i]);
            part.masks.push(self.masks[i]);
            part.ellipsoids.push(self.ellipsoids[i]);
            part.nlocal += 1;
        }
        parts
    }
}
