#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vector2D) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Point `distance` away along `angle`, with y growing downwards on screen
    /// while angles follow the y-up convention (pi/2 points up).
    pub fn offset(&self, angle: f64, distance: f64) -> Self {
        Vector2D::new(
            self.x + distance * angle.cos(),
            self.y - distance * angle.sin(),
        )
    }
}

/// Unit velocity in screen space for a y-up heading.
pub fn heading(angle: f64) -> Vector2D {
    Vector2D::new(angle.cos(), -angle.sin())
}

/// Toroidal wrap that lets an entity slide `margin` past the edge before it
/// reappears on the opposite side.
pub fn wrap_coordinate(value: f64, max: f64, margin: f64) -> f64 {
    if value < -margin {
        max + margin
    } else if value > max + margin {
        -margin
    } else {
        value
    }
}

pub fn circles_overlap(a: Vector2D, ra: f64, b: Vector2D, rb: f64) -> bool {
    a.distance(b) < ra + rb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn distance_is_euclidean() {
        let a = Vector2D::new(0.0, 0.0);
        assert_eq!(a.distance(Vector2D::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn offset_uses_y_up_angles() {
        let p = Vector2D::new(10.0, 10.0).offset(FRAC_PI_2, 5.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_teleports_past_margin_only() {
        assert_eq!(wrap_coordinate(-5.0, 100.0, 10.0), -5.0);
        assert_eq!(wrap_coordinate(-10.5, 100.0, 10.0), 110.0);
        assert_eq!(wrap_coordinate(110.5, 100.0, 10.0), -10.0);
        assert_eq!(wrap_coordinate(-0.1, 100.0, 0.0), 100.0);
    }

    #[test]
    fn touching_circles_do_not_overlap() {
        let a = Vector2D::new(0.0, 0.0);
        assert!(!circles_overlap(a, 1.0, Vector2D::new(2.0, 0.0), 1.0));
        assert!(circles_overlap(a, 1.0, Vector2D::new(1.9, 0.0), 1.0));
    }
}
