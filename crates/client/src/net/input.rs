/// Pointer offset from the viewport center, in screen pixels. Supplied each
/// tick by the external input layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerInput {
    pub dx: f32,
    pub dy: f32,
}

impl PointerInput {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Desired heading in integer degrees, range roughly [-180, 180].
    /// Screen y grows downward, so it is negated to get a world heading.
    pub fn heading_degrees(&self) -> i32 {
        (-self.dy).atan2(self.dx).to_degrees() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_headings() {
        assert_eq!(PointerInput::new(100.0, 0.0).heading_degrees(), 0);
        assert_eq!(PointerInput::new(0.0, -100.0).heading_degrees(), 90);
        assert_eq!(PointerInput::new(-100.0, 0.0).heading_degrees(), 180);
        assert_eq!(PointerInput::new(0.0, 100.0).heading_degrees(), -90);
    }

    #[test]
    fn test_diagonal_heading_truncates_to_integer() {
        assert_eq!(PointerInput::new(100.0, -100.0).heading_degrees(), 45);
        assert_eq!(PointerInput::new(100.0, 100.0).heading_degrees(), -45);
    }
}
