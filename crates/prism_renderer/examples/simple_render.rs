//! Simple ray tracer example.
//!
//! Renders a small scene covering every shape and light type and saves it in
//! PPM format. An optional JSON render configuration can be passed as the
//! first argument:
//!
//! ```text
//! cargo run --release --example simple_render -- config.json
//! ```

use anyhow::{Context, Result};
use prism_renderer::{
    render, AffineShape, Attenuation, Camera, Color, Cone, Csg, Cylinder, DirectionalLight,
    Intensity, Material, PointLight, Quat, RenderConfig, Scene, SceneData, Sphere, SpotLight, Torus,
    Transform, TriangleList, Vec3, Vertex,
};
use std::f32::consts::FRAC_PI_6;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => RenderConfig::default(),
    };

    let start = std::time::Instant::now();
    let mut scene = build_scene();
    scene.initialize().context("initializing scene")?;
    log::info!("Scene built in {:?}", start.elapsed());

    let camera = Camera::look_at(Vec3::new(0.0, 2.5, 9.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y)
        .with_height_angle(40.0);

    let (image, stats) = render(&scene, &camera, &config);
    log::info!("{} rays traced", stats.rays);

    let filename = "output.ppm";
    std::fs::write(filename, image.to_ppm()).with_context(|| format!("writing {filename}"))?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Scene {
    let mut data = SceneData::new();

    let floor = data.add_material(
        Material::new("floor")
            .with_ambient(Color::splat(0.1))
            .with_diffuse(Color::splat(0.6))
            .with_specular(Color::splat(0.2), 8.0),
    );
    let red = data.add_material(
        Material::new("red")
            .with_ambient(Color::new(0.1, 0.0, 0.0))
            .with_diffuse(Color::new(0.8, 0.1, 0.1))
            .with_specular(Color::splat(0.3), 32.0),
    );
    let glass = data.add_material(
        Material::new("glass")
            .with_specular(Color::splat(0.1), 64.0)
            .with_transparency(Color::splat(0.85), 1.5),
    );
    let mirror = data.add_material(
        Material::new("mirror")
            .with_diffuse(Color::splat(0.05))
            .with_specular(Color::splat(0.9), 128.0),
    );
    let gold = data.add_material(
        Material::new("gold")
            .with_ambient(Color::new(0.1, 0.08, 0.0))
            .with_diffuse(Color::new(0.7, 0.55, 0.1))
            .with_specular(Color::new(0.6, 0.5, 0.2), 16.0),
    );

    let mut scene = Scene::new(data);

    // Floor quad
    let corners = [(-6.0, -6.0), (6.0, -6.0), (6.0, 6.0), (-6.0, 6.0)];
    let v: Vec<i32> = corners
        .iter()
        .map(|&(x, z)| scene.data.add_vertex(Vertex::new(Vec3::new(x, -1.0, z))))
        .collect();
    scene.add_shape(TriangleList::new(floor, [[v[0], v[2], v[1]], [v[0], v[3], v[2]]]));

    scene.add_shape(Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0, glass));
    scene.add_shape(Sphere::new(Vec3::new(0.0, 0.0, -2.5), 1.0, mirror));
    scene.add_shape(Cylinder::new(Vec3::new(2.2, -0.25, 0.0), 0.6, 1.5, red));
    scene.add_shape(Cone::new(Vec3::new(0.0, -0.25, 1.5), 0.6, 1.5, gold));

    // Torus tilted back from the camera
    let tilt = Transform::from_translation(Vec3::new(3.0, 1.8, -2.0))
        .with_rotation(Quat::from_rotation_x(-0.4));
    scene.add_shape(AffineShape::from_transform(
        Box::new(Torus::new(Vec3::ZERO, 0.4, 1.0, gold)),
        &tilt,
    ));

    // A sphere with a cylindrical bore
    scene.add_shape(Csg::difference(
        Box::new(Sphere::new(Vec3::new(-3.0, 1.8, -2.0), 0.9, red)),
        vec![Box::new(Cylinder::new(Vec3::new(-3.0, 1.8, -2.0), 0.4, 3.0, red))],
    ));

    scene.add_light(DirectionalLight::new(
        Vec3::new(-0.3, -1.0, -0.5),
        Intensity::new(Color::splat(0.2), Color::splat(0.5), Color::splat(0.5)),
    ));
    scene.add_light(
        PointLight::new(Vec3::new(4.0, 5.0, 5.0), Intensity::uniform(Color::splat(0.8)))
            .with_attenuation(Attenuation::new(1.0, 0.02, 0.0)),
    );
    scene.add_light(
        SpotLight::new(
            Vec3::new(0.0, 6.0, 1.5),
            Vec3::NEG_Y,
            FRAC_PI_6,
            Intensity::uniform(Color::new(0.6, 0.6, 1.0)),
        )
        .with_falloff(8.0),
    );

    scene
}
