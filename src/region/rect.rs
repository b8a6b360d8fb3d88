use super::Region;

/// Axis-aligned box, inclusive of its faces
#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    lo: [f64; 3],
    hi: [f64; 3],
}
impl Rect {
    pub fn new(xlo: f64, xhi: f64, ylo: f64, yhi: f64, zlo: f64, zhi: f64) -> Self {
        assert!(
            xlo <= xhi && ylo <= yhi && zlo <= zhi,
            "Lower bounds should not exceed upper bounds"
        );
        Self {
            lo: [xlo, ylo, zlo],
            hi: [xhi, yhi, zhi],
        }
    }
    pub fn lo(&self) -> &[f64; 3] {
        &self.lo
    }
    pub fn hi(&self) -> &[f64; 3] {
        &self.hi
    }
    pub fn lx(&self) -> f64 {
        self.hi[0] - self.lo[0]
    }
    pub fn ly(&self) -> f64 {
        self.hi[1] - self.lo[1]
    }
    pub fn lz(&self) -> f64 {
        self.hi[2] - self.lo[2]
    }
}
impl Region for Rect {
    fn contains(&self, coord: &[f64; 3]) -> bool {
        (0..3).all(|k| self.lo[k] <= coord[k] && coord[k] <= self.hi[k])
    }
}
