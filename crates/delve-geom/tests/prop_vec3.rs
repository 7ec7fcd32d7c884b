use delve_geom::Vec3;
use proptest::num::f32::NORMAL;
use proptest::prelude::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e3)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Horizontal projection drops y and keeps x/z untouched
    #[test]
    fn horizontal_drops_y(v in arb_vec3()) {
        let h = v.horizontal();
        prop_assert_eq!(h.y, 0.0);
        prop_assert_eq!(h.x, v.x);
        prop_assert_eq!(h.z, v.z);
        prop_assert!(approx_abs_rel(h.length(), v.horizontal_length(), 1e-6, 1e-5));
    }

    // Horizontal normalisation yields a unit XZ vector unless the input is vertical
    #[test]
    fn horizontal_normalized_is_unit(v in arb_vec3()) {
        let n = v.horizontal_normalized();
        prop_assert_eq!(n.y, 0.0);
        if v.horizontal_length() > 1e-3 {
            prop_assert!(approx(n.length(), 1.0, 1e-3));
        }
    }

    // Lerp hits both endpoints
    #[test]
    fn lerp_endpoints(a in arb_vec3(), b in arb_vec3()) {
        let s = a.lerp(b, 0.0);
        let e = a.lerp(b, 1.0);
        prop_assert!(approx_abs_rel(s.x, a.x, 1e-3, 1e-5));
        prop_assert!(approx_abs_rel(e.x, b.x, 1e-3, 1e-5));
        prop_assert!(approx_abs_rel(e.y, b.y, 1e-3, 1e-5));
        prop_assert!(approx_abs_rel(e.z, b.z, 1e-3, 1e-5));
    }

    // Block coordinate is the floor of each component
    #[test]
    fn block_is_floor(v in arb_vec3()) {
        let (bx, by, bz) = v.block();
        prop_assert!(bx as f32 <= v.x && v.x < bx as f32 + 1.0);
        prop_assert!(by as f32 <= v.y && v.y < by as f32 + 1.0);
        prop_assert!(bz as f32 <= v.z && v.z < bz as f32 + 1.0);
    }

    // Negation is additive inverse
    #[test]
    fn neg_is_inverse(v in arb_vec3()) {
        let s = v + (-v);
        prop_assert_eq!(s, Vec3::ZERO);
    }
}
