//! Zarya CLI - preview, render and inspect the composited SDF scene

mod scene;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scene::SceneArgs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use zarya_core::prelude::*;
use zarya_core::proxy::face_normal_at;
use zarya_core::raymarch::object_space_ray;
use zarya_render::{Camera, ParameterPanel, Viewport};

#[derive(Parser)]
#[command(name = "zarya")]
#[command(about = "A sphere mesh and a ray-marched lattice sharing one depth buffer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive preview window
    Preview {
        #[command(flatten)]
        scene: SceneArgs,

        /// Window width
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Window height
        #[arg(long, default_value = "720")]
        height: u32,

        /// Window title
        #[arg(long, default_value = "Zarya Preview")]
        title: String,
    },

    /// Render the scene to an image file (headless)
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output image file (.png)
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,

        /// Image width
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// March a single camera ray on the CPU and print the sample
    Trace {
        #[command(flatten)]
        scene: SceneArgs,

        /// World-space point the ray passes through
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [0.0, 0.0, 0.0])]
        through: Vec<f32>,
    },

    /// Print statistics of the tessellated sphere
    Mesh {
        #[command(flatten)]
        scene: SceneArgs,
    },

    /// Write the default scene configuration as JSON
    InitConfig {
        /// Output file
        #[arg(short, long, default_value = "scene.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            scene,
            width,
            height,
            title,
        } => {
            run_preview(&scene, width, height, title)?;
        }
        Commands::Render {
            scene,
            output,
            width,
            height,
        } => {
            run_render(&scene, &output, width, height)?;
        }
        Commands::Trace { scene, through } => {
            run_trace(&scene, &through)?;
        }
        Commands::Mesh { scene } => {
            run_mesh(&scene)?;
        }
        Commands::InitConfig { output } => {
            SceneConfig::default()
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote default scene to {}", output.display());
        }
    }

    Ok(())
}

fn run_preview(args: &SceneArgs, width: u32, height: u32, title: String) -> Result<()> {
    use zarya_render::{WindowConfig, run_preview};

    let scene = args.resolve()?;
    println!("{}", zarya_render::controls_help());

    run_preview(
        WindowConfig {
            title,
            width,
            height,
        },
        scene,
    )
}

fn run_render(args: &SceneArgs, output: &Path, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("image size must be non-zero, got {width}x{height}");
    }
    let scene = args.resolve()?;

    println!(
        "Rendering to {} ({}x{})...",
        output.display(),
        width,
        height
    );

    let img = zarya_render::render_headless(&scene, Viewport::new(width, height))
        .context("Headless render failed")?;
    img.save(output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    println!("Saved to: {}", output.display());

    Ok(())
}

/// Build the per-sample input for a camera ray through `target`, using the
/// same clamped parameter snapshot the renderers draw with.
fn trace_input(scene: &SceneConfig, target: Vec3) -> (SampleInput, Interval) {
    let camera = Camera::from_config(&scene.camera, 16.0 / 9.0);
    let params = ParameterPanel::new(scene.object).snapshot();
    let transforms = ObjectTransforms::new(&params, camera.view_projection_matrix());
    let ray = Ray::through(camera.position, target);

    // Face of the proxy the ray enters through, as the rasterizer would see it
    let local = object_space_ray(&ray, &transforms.inv_model);
    let interval = bounding_interval(&local, params.scale);
    let face = face_normal_at(local.at(interval.tmin), params.scale);

    let input = SampleInput {
        ray,
        face_normal: transforms.model.transform_vector3(face),
        model: transforms.model,
        inv_model: transforms.inv_model,
        mvp: transforms.mvp,
        shape: ShapeParams::new(params.scale),
        depth: DepthConvention::ZeroToOne,
    };
    (input, interval)
}

fn run_trace(args: &SceneArgs, through: &[f32]) -> Result<()> {
    let scene = args.resolve()?;
    let [x, y, z] = through else {
        anyhow::bail!("--through expects three components");
    };
    let target = Vec3::new(*x, *y, *z);
    if target == scene.camera.position {
        anyhow::bail!("--through must differ from the camera position");
    }

    let (input, interval) = trace_input(&scene, target);
    let ray = input.ray;

    println!("ray      {} -> {}", ray.origin, ray.direction);
    println!("interval [{:.3}, {:.3}]", interval.tmin, interval.tmax);

    match shade_sample(&sphere_lattice(), &NormalShading, &input) {
        Sample::Miss => println!("miss"),
        Sample::Hit(fragment) => {
            let m = fragment.march;
            println!("hit      t = {:.4} after {} steps", m.t, m.steps);
            println!("position {} (object space)", m.position);
            println!("normal   {} (object space)", m.normal);
            println!("depth    {:.6}", fragment.depth);
            println!("color    {}", fragment.color);
        }
    }

    Ok(())
}

fn run_mesh(args: &SceneArgs) -> Result<()> {
    let scene = args.resolve()?;
    let sphere = scene.sphere;
    let mesh = generate_sphere(sphere.radius, sphere.theta_segments, sphere.phi_segments);

    println!(
        "sphere   radius {} ({} x {} segments)",
        sphere.radius, sphere.theta_segments, sphere.phi_segments
    );
    println!("vertices {}", mesh.vertex_count());
    println!("indices  {}", mesh.indices.len());
    println!("triangles {}", mesh.triangle_count());
    println!(
        "closed   {}",
        if mesh.is_closed_manifold() { "yes" } else { "no" }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_trace_parses_negative_components() {
        let cli = Cli::try_parse_from([
            "zarya",
            "trace",
            "--through",
            "-5,2.5,0",
            "--rotation",
            "0,-90,0",
        ])
        .unwrap();
        let Commands::Trace { scene, through } = cli.command else {
            panic!("expected trace");
        };
        assert_eq!(through, vec![-5.0, 2.5, 0.0]);
        assert_eq!(scene.rotation, Some(vec![0.0, -90.0, 0.0]));
    }

    #[test]
    fn test_trace_defaults_to_origin() {
        let cli = Cli::try_parse_from(["zarya", "trace"]).unwrap();
        let Commands::Trace { through, .. } = cli.command else {
            panic!("expected trace");
        };
        assert_eq!(through, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_trace_uses_clamped_scale() {
        let args = SceneArgs {
            scale: Some(vec![500.0, 500.0, 500.0]),
            ..Default::default()
        };
        let scene = args.resolve().unwrap();
        let (input, _) = trace_input(&scene, Vec3::ZERO);
        assert_eq!(input.shape.half_extents, Vec3::splat(100.0));
    }

    #[test]
    fn test_render_options() {
        let cli = Cli::try_parse_from([
            "zarya", "render", "-o", "out.png", "--width", "64", "--height", "32", "--scale",
            "10,10,10",
        ])
        .unwrap();
        let Commands::Render {
            scene,
            output,
            width,
            height,
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(output, PathBuf::from("out.png"));
        assert_eq!((width, height), (64, 32));
        assert_eq!(scene.resolve().unwrap().object.scale, Vec3::splat(10.0));
    }
}
