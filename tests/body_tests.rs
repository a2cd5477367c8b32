use approx::assert_abs_diff_eq;
use body_pipeline::config::{FRICTION_CONST, REPULSIVE_CONST};
use body_pipeline::*;

fn body_at(id: u64, x: f64, y: f64, mass: f64) -> Body {
    Body::new(id, Point2::new(x, y), Vector2::ZERO, mass).expect("valid body")
}

fn bounds() -> Boundary {
    Boundary::new(-1.0, -2.0, 1.0, 2.0).expect("valid boundary")
}

#[test]
fn non_positive_mass_is_rejected() {
    for mass in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = Body::new(0, Point2::ORIGIN, Vector2::ZERO, mass)
            .expect_err("mass must be positive and finite");
        assert!(matches!(err, SimError::InvalidConfiguration(_)), "{err}");
    }
}

#[test]
fn bodies_are_identified_by_id_only() {
    let a = body_at(4, 0.0, 0.0, 1.0);
    let mut b = body_at(4, 3.0, 3.0, 5.0);
    b.velocity = Vector2::new(1.0, 1.0);
    assert_eq!(a, b);
    assert!(!a.same_state(&b));
    assert_ne!(a, body_at(5, 0.0, 0.0, 1.0));
}

#[test]
fn repulsion_scales_with_other_mass_over_distance_squared() {
    let a = body_at(0, 0.0, 0.0, 1.0);
    let b = body_at(1, 0.0, 0.5, 3.0);

    assert_abs_diff_eq!(a.distance_from(&b), 0.5);

    let on_a = a.repulsive_force_by(&b).expect("distinct positions");
    assert_abs_diff_eq!(on_a.x, 0.0);
    assert_abs_diff_eq!(on_a.y, -3.0 * REPULSIVE_CONST / 0.25, epsilon = 1e-15);

    let on_b = b.repulsive_force_by(&a).expect("distinct positions");
    assert!(on_b.y > 0.0, "repulsion pushes b away from a");
}

#[test]
fn coincident_bodies_report_degenerate_distance() {
    let a = body_at(0, 0.3, 0.3, 1.0);
    let b = body_at(1, 0.3, 0.3, 1.0);
    assert_eq!(
        a.repulsive_force_by(&b),
        Err(SimError::DegenerateDistance {
            body: BodyId(0),
            other: BodyId(1),
        })
    );
}

#[test]
fn total_force_skips_self_and_coincident_pairs() {
    let mut a = body_at(0, 0.0, 0.0, 1.0);
    a.velocity = Vector2::new(2.0, 0.0);
    let twin = body_at(1, 0.0, 0.0, 1.0);
    let far = body_at(2, 1.0, 0.0, 1.0);
    let all = [a.clone(), twin, far.clone()];

    let total = a.total_force(all.iter()).expect("degenerate pairs are not fatal");
    let expected = a.repulsive_force_by(&far).expect("distinct") + a.friction_force();
    assert_abs_diff_eq!(total.x, expected.x, epsilon = 1e-15);
    assert_abs_diff_eq!(total.y, expected.y, epsilon = 1e-15);
    assert_abs_diff_eq!(a.friction_force().x, -2.0 * FRICTION_CONST);
}

#[test]
fn euler_updates_follow_force_over_mass() {
    let mut body = body_at(0, 0.0, 0.0, 2.0);
    body.update_acceleration(Vector2::new(4.0, -2.0));
    assert_eq!(body.acceleration, Vector2::new(2.0, -1.0));

    body.update_velocity(0.5);
    assert_eq!(body.velocity, Vector2::new(1.0, -0.5));

    body.update_position(2.0);
    assert_eq!(body.position, Point2::new(2.0, -1.0));
}

#[test]
fn collision_leaves_interior_bodies_untouched() {
    let mut body = body_at(0, 0.5, -1.5, 1.0);
    body.velocity = Vector2::new(0.3, -0.7);
    let before = body.clone();

    body.resolve_boundary_collision(&bounds());
    assert!(body.same_state(&before));
}

#[test]
fn collision_reflects_the_crossed_axis_only() {
    let mut body = body_at(0, 1.5, 0.25, 1.0);
    body.velocity = Vector2::new(0.8, 0.4);

    body.resolve_boundary_collision(&bounds());
    assert_eq!(body.position, Point2::new(1.0, 0.25));
    assert_eq!(body.velocity, Vector2::new(-0.8, 0.4));
}

#[test]
fn corner_collision_flips_both_components() {
    let mut body = body_at(0, -3.0, 5.0, 1.0);
    body.velocity = Vector2::new(-1.0, 2.0);

    body.resolve_boundary_collision(&bounds());
    assert_eq!(body.position, Point2::new(-1.0, 2.0));
    assert_eq!(body.velocity, Vector2::new(1.0, -2.0));
}
