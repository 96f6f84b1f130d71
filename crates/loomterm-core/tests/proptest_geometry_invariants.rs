//! Property-based invariant tests for the clip-rect primitive used by
//! [`loomterm_runtime::RenderContext`]'s child-context clipping.
//!
//! 1. Intersection is commutative.
//! 2. Intersection is idempotent (A ∩ A = A).
//! 3. Intersection result fits within both inputs.
//! 4. Right/bottom edges are consistent with x+width, y+height.
//! 5. No panics on extreme u16 values.

use loomterm_core::geometry::Rect;
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>())
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn small_rect_strategy() -> impl Strategy<Value = Rect> {
    (0u16..=500, 0u16..=500, 0u16..=500, 0u16..=500).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn intersection_commutative(a in small_rect_strategy(), b in small_rect_strategy()) {
        prop_assert_eq!(
            a.intersection(&b),
            b.intersection(&a),
            "intersection is not commutative: a={:?}, b={:?}",
            a, b
        );
    }
}

proptest! {
    #[test]
    fn intersection_idempotent(a in small_rect_strategy()) {
        let result = a.intersection(&a);
        if a.width == 0 || a.height == 0 {
            prop_assert_eq!(result, Rect::default());
        } else {
            prop_assert_eq!(result, a, "A ∩ A should equal A for {:?}", a);
        }
    }
}

proptest! {
    #[test]
    fn intersection_fits_within_both(a in small_rect_strategy(), b in small_rect_strategy()) {
        let inter = a.intersection(&b);
        if inter != Rect::default() {
            prop_assert!(inter.x >= a.x && inter.x >= b.x);
            prop_assert!(inter.y >= a.y && inter.y >= b.y);
            prop_assert!(inter.right() <= a.right() && inter.right() <= b.right());
            prop_assert!(inter.bottom() <= a.bottom() && inter.bottom() <= b.bottom());
        }
    }
}

proptest! {
    #[test]
    fn right_bottom_consistent(rect in rect_strategy()) {
        prop_assert!(rect.right() >= rect.x);
        prop_assert!(rect.bottom() >= rect.y);

        let computed_width = rect.right().saturating_sub(rect.x);
        if rect.x as u32 + rect.width as u32 <= u16::MAX as u32 {
            prop_assert_eq!(
                computed_width, rect.width,
                "right()-x should equal width when no saturation"
            );
        }
    }
}

proptest! {
    #[test]
    fn no_panic_on_extreme_values(a in rect_strategy(), b in rect_strategy()) {
        let _ = a.intersection(&b);
        let _ = a.right();
        let _ = a.bottom();
    }
}
