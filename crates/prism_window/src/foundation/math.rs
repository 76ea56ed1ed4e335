//! Small 2D vector value types used across the window and video subsystems

/// 2D vector of signed integers (screen positions, frame insets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vector2i {
    /// Horizontal component
    pub x: i32,
    /// Vertical component
    pub y: i32,
}

impl Vector2i {
    /// Create a new vector from components
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 2D vector of unsigned integers (window sizes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vector2u {
    /// Horizontal component
    pub x: u32,
    /// Vertical component
    pub y: u32,
}

impl Vector2u {
    /// Create a new vector from components
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2u> for Vector2i {
    fn from(v: Vector2u) -> Self {
        Self::new(v.x as i32, v.y as i32)
    }
}
