//! Display-space geometry: points and the rectangle the image currently occupies on screen.

/// A position in display (device pixel) coordinates.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RectError {
    #[error("rectangle edge is not finite")]
    NotFinite,
    #[error("rectangle has right < left or bottom < top")]
    Inverted,
}

/// The screen-space region currently occupied by the rendered image.
///
/// Invariant: all edges are finite, `left <= right` and `top <= bottom`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DisplayRect {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}
impl DisplayRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Result<Self, RectError> {
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return Err(RectError::NotFinite);
        }
        if right < left || bottom < top {
            return Err(RectError::Inverted);
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }
    /// A rectangle at the origin with the given size, eg. an image shown at 1:1 scale.
    #[must_use]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width as f32,
            bottom: height as f32,
        }
    }
    #[must_use]
    pub fn left(&self) -> f32 {
        self.left
    }
    #[must_use]
    pub fn top(&self) -> f32 {
        self.top
    }
    #[must_use]
    pub fn right(&self) -> f32 {
        self.right
    }
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.bottom
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
    /// Half-open containment, `[left, right) x [top, bottom)`.
    ///
    /// Used to decide whether a stroke may *start* at `point`.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
    /// Closed clamp onto `[left, right] x [top, bottom]`.
    ///
    /// `point` must be finite, otherwise the result is unspecified.
    #[must_use]
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(self.left, self.right),
            y: point.y.clamp(self.top, self.bottom),
        }
    }
}
impl std::fmt::Display for DisplayRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
impl std::str::FromStr for DisplayRect {
    type Err = RectParseError;
    /// Parse `left,top,right,bottom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut edges = [0.0f32; 4];
        let mut parts = s.split(',');
        for edge in &mut edges {
            let part = parts.next().ok_or(RectParseError::WrongCount)?;
            *edge = part.trim().parse()?;
        }
        if parts.next().is_some() {
            return Err(RectParseError::WrongCount);
        }
        let [left, top, right, bottom] = edges;
        Ok(Self::new(left, top, right, bottom)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RectParseError {
    #[error("expected four comma separated edges")]
    WrongCount,
    #[error(transparent)]
    Value(#[from] std::num::ParseFloatError),
    #[error(transparent)]
    Rect(#[from] RectError),
}

/// Affine mapping taking one rectangle onto another, eg. a stroke's display rect onto the current one, or onto
/// an image's pixel grid.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RectMapping {
    from: Point,
    to: Point,
    scale_x: f32,
    scale_y: f32,
}
impl RectMapping {
    /// Map `from` onto `to`.
    ///
    /// Degenerate (zero-area) source axes map with a scale of one rather than dividing by zero.
    #[must_use]
    pub fn between(from: &DisplayRect, to: &DisplayRect) -> Self {
        let scale = |dst: f32, src: f32| if src > 0.0 { dst / src } else { 1.0 };
        Self {
            from: Point::new(from.left, from.top),
            to: Point::new(to.left, to.top),
            scale_x: scale(to.width(), from.width()),
            scale_y: scale(to.height(), from.height()),
        }
    }
    /// Map `rect` onto an image of `width` x `height` pixels, which it is taken to show in full.
    #[must_use]
    pub fn onto_image(rect: &DisplayRect, width: u32, height: u32) -> Self {
        Self::between(rect, &DisplayRect::from_size(width, height))
    }
    #[must_use]
    pub fn map(&self, point: Point) -> Point {
        Point {
            x: (point.x - self.from.x) * self.scale_x + self.to.x,
            y: (point.y - self.from.y) * self.scale_y + self.to.y,
        }
    }
    /// Scale factor applied to lengths, such as stroke width. Uses the mean of both axes.
    #[must_use]
    pub fn length_scale(&self) -> f32 {
        (self.scale_x + self.scale_y) / 2.0
    }
}

#[cfg(test)]
mod test {
    use super::{DisplayRect, Point, RectError, RectMapping};
    #[test]
    fn rejects_bad_rects() {
        assert_eq!(
            DisplayRect::new(10.0, 0.0, 0.0, 10.0),
            Err(RectError::Inverted)
        );
        assert_eq!(
            DisplayRect::new(0.0, 0.0, f32::INFINITY, 10.0),
            Err(RectError::NotFinite)
        );
        assert!(DisplayRect::new(5.0, 5.0, 5.0, 5.0).is_ok());
    }
    #[test]
    fn contains_is_half_open() {
        let rect = DisplayRect::new(0.0, 0.0, 100.0, 100.0).unwrap();
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(99.9, 50.0)));
        assert!(!rect.contains(Point::new(100.0, 50.0)));
        assert!(!rect.contains(Point::new(-10.0, -10.0)));
        // No rounding towards the rect at the near edges either.
        assert!(!rect.contains(Point::new(-0.5, 0.0)));
        assert!(!rect.contains(Point::new(0.0, -0.5)));
    }
    #[test]
    fn clamp_is_closed() {
        let rect = DisplayRect::new(10.0, 20.0, 110.0, 220.0).unwrap();
        assert_eq!(rect.clamp(Point::new(150.0, 0.0)), Point::new(110.0, 20.0));
        assert_eq!(rect.clamp(Point::new(50.0, 60.0)), Point::new(50.0, 60.0));
    }
    #[test]
    fn parse_rect() {
        let rect: DisplayRect = "0, 0, 100, 50".parse().unwrap();
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 50.0);
        assert!("0,0,100".parse::<DisplayRect>().is_err());
        assert!("0,0,100,50,1".parse::<DisplayRect>().is_err());
        assert!("100,0,0,50".parse::<DisplayRect>().is_err());
    }
    #[test]
    fn mapping_scales_onto_image() {
        let rect = DisplayRect::new(100.0, 50.0, 300.0, 150.0).unwrap();
        let map = RectMapping::onto_image(&rect, 400, 200);
        assert_eq!(map.map(Point::new(100.0, 50.0)), Point::new(0.0, 0.0));
        assert_eq!(map.map(Point::new(300.0, 150.0)), Point::new(400.0, 200.0));
        assert_eq!(map.length_scale(), 2.0);

        let unit = RectMapping::onto_image(&DisplayRect::from_size(64, 32), 64, 32);
        assert_eq!(unit.map(Point::new(7.5, 3.0)), Point::new(7.5, 3.0));
        assert_eq!(unit.length_scale(), 1.0);
    }
    #[test]
    fn mapping_between_rects() {
        // A relayout moving the image right and doubling it.
        let old = DisplayRect::new(0.0, 0.0, 20.0, 10.0).unwrap();
        let new = DisplayRect::new(100.0, 0.0, 140.0, 20.0).unwrap();
        let map = RectMapping::between(&old, &new);
        assert_eq!(map.map(Point::new(2.0, 5.0)), Point::new(104.0, 10.0));
        assert_eq!(map.length_scale(), 2.0);
        let back = RectMapping::between(&new, &old);
        assert_eq!(back.map(Point::new(104.0, 10.0)), Point::new(2.0, 5.0));
    }
}
