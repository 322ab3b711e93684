//! Integration tests for the per-sample ray marcher under real scene matrices

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use zarya_core::prelude::*;
use zarya_core::raymarch::{HIT_THRESHOLD, estimate_normal, object_space_ray, reproject_depth};
use zarya_core::sdf::sphere_lattice;

fn scene_input(params: &TransformParams, ray: Ray, face_normal: Vec3) -> SampleInput {
    let camera = CameraConfig::default();
    let projection = Mat4::perspective_rh(
        camera.fov_degrees.to_radians(),
        16.0 / 9.0,
        camera.near,
        camera.far,
    );
    let transforms = ObjectTransforms::new(params, projection * camera.view_matrix());
    SampleInput {
        ray,
        face_normal,
        model: transforms.model,
        inv_model: transforms.inv_model,
        mvp: transforms.mvp,
        shape: ShapeParams::new(params.scale),
        depth: DepthConvention::ZeroToOne,
    }
}

fn camera_ray(target: Vec3) -> Ray {
    Ray::through(CameraConfig::default().position, target)
}

#[test]
fn identical_inputs_give_identical_samples() {
    let params = TransformParams {
        translation: Vec3::new(4.0, -3.0, 7.5),
        rotation: Vec3::new(12.0, -40.0, 75.0),
        scale: Vec3::new(50.0, 30.0, 45.0),
    };
    let lattice = sphere_lattice();
    for target in [Vec3::ZERO, Vec3::new(20.0, 5.0, -10.0), Vec3::new(-30.0, 40.0, 0.0)] {
        let input = scene_input(&params, camera_ray(target), Vec3::Y);
        let a = shade_sample(&lattice, &NormalShading, &input);
        let b = shade_sample(&lattice, &NormalShading, &input);
        match (a, b) {
            (Sample::Miss, Sample::Miss) => {}
            (Sample::Hit(fa), Sample::Hit(fb)) => {
                assert_eq!(fa.march.t.to_bits(), fb.march.t.to_bits());
                assert_eq!(fa.depth.to_bits(), fb.depth.to_bits());
                assert_eq!(fa.march.normal.to_array(), fb.march.normal.to_array());
                assert_eq!(fa.color.to_array(), fb.color.to_array());
            }
            _ => panic!("hit/miss differs between identical calls"),
        }
    }
}

#[test]
fn hits_lie_inside_interval_and_match_lattice_normals() {
    let lattice = sphere_lattice();
    let params = TransformParams::default();
    let mut hits = 0;

    for i in -8..=8 {
        for j in -8..=8 {
            let target = Vec3::new(i as f32 * 6.0, j as f32 * 6.0, 0.0);
            let input = scene_input(&params, camera_ray(target), Vec3::Y);
            let local = object_space_ray(&input.ray, &input.inv_model);
            let interval = bounding_interval(&local, params.scale);
            let result = march(&lattice, &local, interval);
            if !result.hit {
                continue;
            }
            hits += 1;

            assert!(result.t >= interval.tmin && result.t <= interval.tmax);
            assert!(lattice.distance(result.position) < 2.0 * HIT_THRESHOLD);

            if result.t > interval.tmin {
                let n = estimate_normal(&lattice, result.position);
                let center = lattice.cell_center(result.position);
                let analytic = (result.position - center).normalize();
                // within about 2.5 degrees
                assert!(n.dot(analytic) > 0.999, "normal {n} vs {analytic}");
            }
        }
    }

    assert!(hits > 0, "the grid of rays should hit the lattice");
}

#[test]
fn transformed_object_hits_world_space_sphere() {
    let params = TransformParams {
        translation: Vec3::new(10.0, 20.0, -5.0),
        rotation: Vec3::new(30.0, 45.0, -20.0),
        scale: Vec3::splat(50.0),
    };
    let model = params.model_matrix();
    let local_center = Vec3::splat(5.0);
    let local_dir = Vec3::new(1.0, 0.5, -0.3).normalize();

    // Start 1.5 units off the surface, inside the same lattice cell
    let world_center = model.transform_point3(local_center);
    let world_origin = model.transform_point3(local_center + local_dir * 4.5);
    let input = scene_input(&params, Ray::through(world_origin, world_center), Vec3::Y);

    let fragment = *shade_sample(&sphere_lattice(), &NormalShading, &input)
        .fragment()
        .expect("ray aimed at a lattice center must hit");

    let expected = model.transform_point3(local_center + local_dir * 3.0);
    let world_hit = model.transform_point3(fragment.march.position);
    assert!((world_hit - expected).length() < 0.05);

    let world_normal = model.transform_vector3(fragment.march.normal);
    assert!(world_normal.dot(model.transform_vector3(local_dir)) > 0.999);
    assert!(world_normal.dot(input.ray.direction) < 0.0);
}

#[test]
fn rays_pointing_away_never_march() {
    let params = TransformParams::default();
    let origin = CameraConfig::default().position;
    let ray = Ray::new(origin, origin.normalize());
    let input = scene_input(&params, ray, Vec3::Y);
    let local = object_space_ray(&input.ray, &input.inv_model);
    let interval = bounding_interval(&local, params.scale);
    assert!(interval.is_empty());
    assert_eq!(march(&sphere_lattice(), &local, interval).steps, 0);
    assert_eq!(shade_sample(&sphere_lattice(), &NormalShading, &input), Sample::Miss);
}

#[test]
fn depth_orders_like_rasterized_geometry() {
    let params = TransformParams::default();

    // Straight down the diagonal: enters the box at (50, 50, 50) and stops on
    // the sphere centered at (45, 45, 45).
    let input = scene_input(&params, camera_ray(Vec3::splat(45.0)), Vec3::Y);
    let fragment = *shade_sample(&sphere_lattice(), &NormalShading, &input)
        .fragment()
        .unwrap();

    let entry = reproject_depth(Vec3::splat(50.0), &input.mvp, input.depth);
    let center = reproject_depth(Vec3::splat(45.0), &input.mvp, input.depth);

    assert!((0.0..=1.0).contains(&fragment.depth));
    assert!(entry < fragment.depth);
    assert!(fragment.depth < center);
}

#[test]
fn empty_proxy_draws_nothing() {
    let params = TransformParams {
        scale: Vec3::ZERO,
        ..Default::default()
    };
    let input = scene_input(&params, camera_ray(Vec3::new(1.0, 2.0, 3.0)), Vec3::Y);
    assert_eq!(shade_sample(&sphere_lattice(), &NormalShading, &input), Sample::Miss);
}
