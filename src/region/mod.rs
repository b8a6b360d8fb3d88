pub mod rect;
pub use rect::Rect;

/// A volume of space that atoms are either inside of or outside of
pub trait Region {
    fn contains(&self, coord: &[f64; 3]) -> bool;
}
