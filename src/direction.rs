use macroquad::prelude::*;

/// One of the four grid directions, in the order direction key sets use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
}

impl Direction {
    /// All directions: left, right, up, down.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector in screen space (y grows downwards).
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Left => vec2(-1.0, 0.0),
            Direction::Right => vec2(1.0, 0.0),
            Direction::Up => vec2(0.0, -1.0),
            Direction::Down => vec2(0.0, 1.0),
        }
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Axis-aligned direction of a delta, `None` for zero or diagonal deltas.
    pub fn from_delta(delta: Vec2) -> Option<Direction> {
        match (delta.x, delta.y) {
            (x, y) if x < 0.0 && y == 0.0 => Some(Direction::Left),
            (x, y) if x > 0.0 && y == 0.0 => Some(Direction::Right),
            (x, y) if x == 0.0 && y < 0.0 => Some(Direction::Up),
            (x, y) if x == 0.0 && y > 0.0 => Some(Direction::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_delta_inverts_vector() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_delta(dir.vector() * 32.0), Some(dir));
        }
        assert_eq!(Direction::from_delta(vec2(1.0, 1.0)), None);
        assert_eq!(Direction::from_delta(Vec2::ZERO), None);
    }
}
