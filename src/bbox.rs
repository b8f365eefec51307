//! Bounding boxes that know their coordinate space.

use crate::rect::Rect;
use crate::transform::Transform;

/// A rectangle tagged with the transform of the space it is expressed in.
///
/// `rect` is `None` while nothing has been accumulated; such a box is the identity
/// for [`BoundingBox::insert`].
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub transform: Transform,
    pub rect: Option<Rect>,
}

impl BoundingBox {
    pub fn new() -> BoundingBox {
        Default::default()
    }

    pub fn with_transform(self, transform: Transform) -> BoundingBox {
        BoundingBox { transform, ..self }
    }

    pub fn with_rect(self, rect: Rect) -> BoundingBox {
        BoundingBox {
            rect: Some(rect),
            ..self
        }
    }

    /// Whether nothing has been accumulated, or the accumulated area is degenerate.
    pub fn is_empty(&self) -> bool {
        self.rect.map_or(true, |r| r.is_empty())
    }

    /// Grows this box to also cover `src`, which may be in a different space.
    pub fn insert(&mut self, src: &BoundingBox) {
        let src_rect = match src.rect {
            Some(r) => r,
            None => return,
        };

        // A singular destination space cannot hold anything meaningful.
        let transform = match self.transform.invert() {
            Some(inverse) => inverse.pre_transform(&src.transform),
            None => return,
        };

        self.rect = Some(union_in_space(self.rect, &src_rect, &transform));
    }
}

/// Maps `src` through `transform` and grows `dest` to cover it.
fn union_in_space(dest: Option<Rect>, src: &Rect, transform: &Transform) -> Rect {
    let mapped = transform.transform_rect(src);

    match dest {
        Some(r) => mapped.union(&r),
        None => mapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn union_maps_source_first() {
        let r1 = Rect::new(1.0, 2.0, 3.0, 4.0);
        let r2 = Rect::new(1.5, 2.5, 3.5, 4.5);
        let t = Transform::new_translate(0.5, 0.5);

        assert_eq!(union_in_space(None, &r2, &t), Rect::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(union_in_space(Some(r1), &r2, &t), Rect::new(1.0, 2.0, 4.0, 5.0));
    }

    #[test]
    fn insert_maps_into_destination_space() {
        let mut dest = BoundingBox::new().with_transform(Transform::new_scale(2.0, 2.0));
        let src = BoundingBox::new()
            .with_transform(Transform::new_translate(10.0, 10.0))
            .with_rect(Rect::new(0.0, 0.0, 10.0, 10.0));

        dest.insert(&src);

        assert!(dest
            .rect
            .unwrap()
            .approx_eq(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn singular_destination_ignores_inserts() {
        let mut dest = BoundingBox::new().with_transform(Transform::new_scale(0.0, 1.0));
        dest.insert(&BoundingBox::new().with_rect(Rect::new(0.0, 0.0, 1.0, 1.0)));

        assert!(dest.rect.is_none());
        assert!(dest.is_empty());
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-100.0..100.0f64, -100.0..100.0f64, 0.0..50.0f64, 0.0..50.0f64)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
    }

    fn arb_bbox() -> impl Strategy<Value = BoundingBox> {
        (arb_rect(), -20.0..20.0f64, -20.0..20.0f64, 0.5..4.0f64).prop_map(|(r, tx, ty, s)| {
            BoundingBox::new()
                .with_transform(Transform::new_translate(tx, ty).pre_scale(s, s))
                .with_rect(r)
        })
    }

    proptest! {
        #[test]
        fn inserting_empty_box_is_identity(b in arb_bbox(), tx in -20.0..20.0f64) {
            let mut merged = b;
            merged.insert(&BoundingBox::new().with_transform(Transform::new_translate(tx, 0.0)));

            prop_assert_eq!(merged, b);
        }

        #[test]
        fn insertion_order_does_not_matter(a in arb_bbox(), b in arb_bbox()) {
            let mut ab = BoundingBox::new();
            ab.insert(&a);
            ab.insert(&b);

            let mut ba = BoundingBox::new();
            ba.insert(&b);
            ba.insert(&a);

            prop_assert!(ab.rect.unwrap().approx_eq(&ba.rect.unwrap()));
        }
    }
}
