/// Axis-aligned window in world (lon/lat) coordinates.
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Screen x for world `x` on an area `area_width` pixels wide.
    pub fn to_screen_x(&self, x: f64, area_width: f64) -> f64 {
        (x - self.min_x) / self.width() * area_width
    }

    /// Screen y for world `y`; latitude grows upward, screen y downward.
    pub fn to_screen_y(&self, y: f64, area_height: f64) -> f64 {
        (1.0 - (y - self.min_y) / self.height()) * area_height
    }

    /// World x under screen `sx`.
    pub fn world_x(&self, sx: f64, area_width: f64) -> f64 {
        self.min_x + sx / area_width * self.width()
    }

    /// World y under screen `sy`.
    pub fn world_y(&self, sy: f64, area_height: f64) -> f64 {
        self.max_y - sy / area_height * self.height()
    }
}

/// The smoothed center/radius pair the view animates toward.
#[derive(Debug)]
pub struct FocusRange {
    center_x: f64,
    center_y: f64,
    center_goal_x: f64,
    center_goal_y: f64,
    move_smooth_factor: f64,
    zoom_smooth_factor: f64,
    radius: f64,
    radius_goal: f64,
    move_scale: f64,
}

impl FocusRange {
    pub fn new(center_x: f64, center_y: f64, radius: f64, move_scale: f64) -> Self {
        Self {
            center_x,
            center_y,
            center_goal_x: center_x,
            center_goal_y: center_y,
            move_smooth_factor: 0.5,
            zoom_smooth_factor: 0.5,
            radius,
            radius_goal: radius,
            move_scale,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn move_center(&mut self, dx: f64, dy: f64) {
        self.center_goal_x += dx * self.move_scale;
        self.center_goal_y += dy * self.move_scale;
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius_goal = radius;
    }

    /// Snap immediately, bypassing the smoothing.
    pub fn jump_to(&mut self, center_x: f64, center_y: f64, radius: f64) {
        self.center_x = center_x;
        self.center_goal_x = center_x;
        self.center_y = center_y;
        self.center_goal_y = center_y;
        self.radius = radius;
        self.radius_goal = radius;
    }

    pub fn update(&mut self) -> bool {
        self.center_x = self.center_x * (1.0 - self.move_smooth_factor)
            + self.center_goal_x * self.move_smooth_factor;
        self.center_y = self.center_y * (1.0 - self.move_smooth_factor)
            + self.center_goal_y * self.move_smooth_factor;
        self.radius = self.radius * (1.0 - self.zoom_smooth_factor)
            + self.radius_goal * self.zoom_smooth_factor;

        true
    }

    pub fn to_rect(&self, image_width: f64, image_height: f64) -> Rect {
        let angle = (image_height / image_width).atan();
        let width_2 = self.radius * angle.cos();
        let height_2 = self.radius * angle.sin();

        Rect::new(
            self.center_x - width_2,
            self.center_y - height_2,
            self.center_x + width_2,
            self.center_y + height_2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_mapping_round_trips() {
        let rect = Rect::new(-75.8, 38.4, -74.9, 39.9);
        let (w, h) = (800.0, 600.0);
        let (x, y) = (-75.2, 39.1);
        let (sx, sy) = (rect.to_screen_x(x, w), rect.to_screen_y(y, h));
        assert!((rect.world_x(sx, w) - x).abs() < 1e-9);
        assert!((rect.world_y(sy, h) - y).abs() < 1e-9);
    }

    #[test]
    fn screen_y_is_flipped() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(rect.to_screen_y(1.0, 100.0), 0.0);
        assert_eq!(rect.to_screen_y(0.0, 100.0), 100.0);
    }

    #[test]
    fn jump_to_bypasses_smoothing() {
        let mut focus = FocusRange::new(0.0, 0.0, 1.0, 0.01);
        focus.jump_to(-75.4, 39.2, 0.8);
        assert_eq!(focus.center(), (-75.4, 39.2));
        assert_eq!(focus.radius(), 0.8);
        focus.update();
        assert_eq!(focus.center(), (-75.4, 39.2));
    }
}
