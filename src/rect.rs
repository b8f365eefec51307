//! Types for rectangles.

#[allow(clippy::module_inception)]
mod rect {
    use crate::float_eq_cairo::ApproxEqCairo;
    use core::ops::{Add, Sub};
    use float_cmp::approx_eq;
    use num_traits::Zero;

    // Use our own min() and max() that are acceptable for floating point

    fn min<T: PartialOrd>(x: T, y: T) -> T {
        if x <= y {
            x
        } else {
            y
        }
    }

    fn max<T: PartialOrd>(x: T, y: T) -> T {
        if x >= y {
            x
        } else {
            y
        }
    }

    /// A rectangle given by its two corners; `(x0, y0)` is the top-left one.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Rect<T> {
        pub x0: T,
        pub y0: T,
        pub x1: T,
        pub y1: T,
    }

    impl<T> Rect<T> {
        #[inline]
        pub fn new(x0: T, y0: T, x1: T, y1: T) -> Self {
            Self { x0, y0, x1, y1 }
        }
    }

    impl<T> Rect<T>
    where
        T: Copy + PartialOrd + PartialEq + Add<T, Output = T> + Sub<T, Output = T> + Zero,
    {
        #[inline]
        pub fn from_size(w: T, h: T) -> Self {
            Self {
                x0: Zero::zero(),
                y0: Zero::zero(),
                x1: w,
                y1: h,
            }
        }

        #[inline]
        pub fn width(&self) -> T {
            self.x1 - self.x0
        }

        #[inline]
        pub fn height(&self) -> T {
            self.y1 - self.y0
        }

        #[inline]
        pub fn size(&self) -> (T, T) {
            (self.width(), self.height())
        }

        #[inline]
        pub fn translate(&self, by: (T, T)) -> Self {
            Self {
                x0: self.x0 + by.0,
                y0: self.y0 + by.1,
                x1: self.x1 + by.0,
                y1: self.y1 + by.1,
            }
        }

        #[inline]
        pub fn intersection(&self, rect: &Self) -> Option<Self> {
            let (x0, y0, x1, y1) = (
                max(self.x0, rect.x0),
                max(self.y0, rect.y0),
                min(self.x1, rect.x1),
                min(self.y1, rect.y1),
            );

            if x1 > x0 && y1 > y0 {
                Some(Self { x0, y0, x1, y1 })
            } else {
                None
            }
        }

        #[inline]
        pub fn union(&self, rect: &Self) -> Self {
            Self {
                x0: min(self.x0, rect.x0),
                y0: min(self.y0, rect.y0),
                x1: max(self.x1, rect.x1),
                y1: max(self.y1, rect.y1),
            }
        }
    }

    impl Rect<i32> {
        #[inline]
        pub fn is_empty(&self) -> bool {
            // Give an explicit type to the right hand side of the ==, since sometimes
            // type inference fails to figure it out.
            self.width() <= <i32 as Zero>::zero() || self.height() <= <i32 as Zero>::zero()
        }
    }

    impl Rect<f64> {
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.width().approx_eq_cairo(0.0) || self.height().approx_eq_cairo(0.0)
        }

        #[inline]
        pub fn scale(self, x: f64, y: f64) -> Self {
            Self {
                x0: self.x0 * x,
                y0: self.y0 * y,
                x1: self.x1 * x,
                y1: self.y1 * y,
            }
        }

        pub fn approx_eq(&self, other: &Self) -> bool {
            approx_eq!(f64, self.x0, other.x0, epsilon = 0.0001)
                && approx_eq!(f64, self.y0, other.y0, epsilon = 0.0001)
                && approx_eq!(f64, self.x1, other.x1, epsilon = 0.0001)
                && approx_eq!(f64, self.y1, other.y1, epsilon = 0.0001)
        }
    }
}

pub type Rect = rect::Rect<f64>;

pub type IRect = rect::Rect<i32>;

impl From<Rect> for IRect {
    /// Rounds outwards, so that the integer rectangle covers the whole float one.
    #[inline]
    fn from(r: Rect) -> Self {
        Self {
            x0: r.x0.floor() as i32,
            y0: r.y0.floor() as i32,
            x1: r.x1.ceil() as i32,
            y1: r.y1.ceil() as i32,
        }
    }
}

impl From<IRect> for Rect {
    #[inline]
    fn from(r: IRect) -> Self {
        Self {
            x0: f64::from(r.x0),
            y0: f64::from(r.y0),
            x1: f64::from(r.x1),
            y1: f64::from(r.y1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rect() {
        let empty = Rect::new(1.0, 1.0, 1.0, 1.0);
        let not_empty = Rect::new(1.0, 1.0, 2.0, 2.0);

        assert!(empty.is_empty());
        assert!(!not_empty.is_empty());

        assert!(IRect::new(3, 3, 3, 10).is_empty());
        assert!(!IRect::new(3, 3, 4, 10).is_empty());
    }

    #[test]
    fn intersect_and_union() {
        let r1 = Rect::new(1.0, 2.0, 3.0, 4.0);
        let r2 = Rect::new(2.0, 3.0, 5.0, 6.0);
        let r3 = Rect::new(10.0, 10.0, 11.0, 11.0);

        assert_eq!(r1.intersection(&r2), Some(Rect::new(2.0, 3.0, 3.0, 4.0)));
        assert_eq!(r1.intersection(&r3), None);

        assert_eq!(r1.union(&r2), Rect::new(1.0, 2.0, 5.0, 6.0));
        assert_eq!(r1.union(&r3), Rect::new(1.0, 2.0, 11.0, 11.0));
    }

    #[test]
    fn rounds_outwards_to_irect() {
        let r = Rect::new(0.5, -0.5, 9.1, 10.0);

        assert_eq!(IRect::from(r), IRect::new(0, -1, 10, 10));
    }

    #[test]
    fn translate_and_scale() {
        let r = Rect::from_size(2.0, 3.0).translate((1.0, 1.0));
        assert_eq!(r, Rect::new(1.0, 1.0, 3.0, 4.0));

        assert!(r.scale(2.0, 0.5).approx_eq(&Rect::new(2.0, 0.5, 6.0, 2.0)));
        assert_eq!(r.size(), (2.0, 3.0));
    }
}
