//! Integer screen-space geometry and the small value types embedded by
//! interactive elements (visibility, colour).

/// A point in backend pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in backend pixel coordinates.
///
/// `width`/`height` may be zero or negative while an owner is being laid out;
/// anything that draws a rect must skip it unless [`Rect::has_area`] holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn center_on(&mut self, x: i32, y: i32) {
        self.x = x - self.width / 2;
        self.y = y - self.height / 2;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Strict overlap: rects that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (ax, ay, aw, ah) = (self.x as i64, self.y as i64, self.width as i64, self.height as i64);
        let (bx, by, bw, bh) = (other.x as i64, other.y as i64, other.width as i64, other.height as i64);
        ax + aw > bx && ax < bx + bw && ay + ah > by && ay < by + bh
    }

    /// Grows the rect by `dx` on the left and right and `dy` on the top and bottom.
    pub fn expanded(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_sub(dx),
            self.y.saturating_sub(dy),
            self.width.saturating_add(dx.saturating_mul(2)),
            self.height.saturating_add(dy.saturating_mul(2)),
        )
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

/// Projects a cartesian pixel position onto the isometric diamond grid.
///
/// `x`/`y` are `col * tile_w` and `row * tile_h`. A column step moves the
/// result right and down by half a tile, a row step moves it left and down.
/// Returns `(x, y)` unchanged when either tile dimension is not positive.
pub fn cartesian_to_isometric(x: i32, y: i32, tile_w: i32, tile_h: i32) -> (i32, i32) {
    if tile_w <= 0 || tile_h <= 0 {
        return (x, y);
    }
    let (x, y, tw, th) = (x as i64, y as i64, tile_w as i64, tile_h as i64);
    let iso_x = (x * th - y * tw).div_euclid(2 * th);
    let iso_y = (x * th + y * tw).div_euclid(2 * tw);
    (iso_x as i32, iso_y as i32)
}

/// Show/hide state embedded by anything that can be toggled off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    visible: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl Visibility {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hidden(&self) -> bool {
        !self.visible
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.r = r;
        self.g = g;
        self.b = b;
    }

    pub fn set_alpha(&mut self, a: u8) {
        self.a = a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(10, 10));
        assert!(r.contains(30, 30));
        assert!(!r.contains(31, 30));
        assert!(!r.contains(9, 15));
    }

    #[test]
    fn center_on_moves_origin() {
        let mut r = Rect::new(0, 0, 10, 4);
        r.center_on(50, 50);
        assert_eq!(r, Rect::new(45, 48, 10, 4));
        assert_eq!(r.center(), Point::new(50, 50));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(a.overlaps(&Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn expanded_pads_every_side() {
        let r = Rect::new(0, 0, 100, 50).expanded(64, 32);
        assert_eq!(r, Rect::new(-64, -32, 228, 114));
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let r = Rect::new(i32::MIN + 1, 0, 10, 10).expanded(64, 0);
        assert_eq!(r.x, i32::MIN);
        assert_eq!(Rect::new(i32::MAX, 0, 1, 1).translated(5, 0).x, i32::MAX);
        assert!(Rect::new(i32::MAX - 1, 0, 10, 10).overlaps(&Rect::new(i32::MAX, 0, 10, 10)));
    }

    #[test]
    fn non_positive_size_has_no_area() {
        assert!(!Rect::new(0, 0, 0, 10).has_area());
        assert!(!Rect::new(0, 0, 10, -1).has_area());
        assert!(Rect::new(0, 0, 1, 1).has_area());
    }

    #[test]
    fn isometric_steps_form_a_diamond() {
        // 64x32 tiles: column step goes right-down, row step goes left-down.
        assert_eq!(cartesian_to_isometric(0, 0, 64, 32), (0, 0));
        assert_eq!(cartesian_to_isometric(64, 0, 64, 32), (32, 16));
        assert_eq!(cartesian_to_isometric(0, 32, 64, 32), (-32, 16));
        assert_eq!(cartesian_to_isometric(64, 32, 64, 32), (0, 32));
    }

    #[test]
    fn visibility_toggles() {
        let mut v = Visibility::default();
        assert!(v.is_visible());
        v.toggle();
        assert!(v.is_hidden());
        v.show();
        assert!(v.is_visible());
    }
}
