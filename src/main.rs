//! Demo: orbit an animated camera around a small scene and log the
//! resulting viewport transforms. Pass an options TOML path to override
//! the defaults.

use std::f32::consts::TAU;
use std::path::Path;

use vista::animation::{Animator, EasingFunction, LoopMode, ScalarAnimation};
use vista::camera::{OrbitController, OrbitalCamera};
use vista::options::Options;
use vista::projection::{self, PerspectiveProjection};
use vista::scene::{SceneLoader, SceneNode};
use vista::viewport::Viewport;
use vista::{Compositor, CompositorHandle, Result};
use web_time::{Duration, Instant};

/// One child node per non-empty line of the input.
struct LineLoader;

impl SceneLoader for LineLoader {
    fn load(
        &self,
        compositor: &CompositorHandle,
        source: &[u8],
    ) -> Result<SceneNode> {
        let mut root = SceneNode::new(compositor, "root")?;
        for line in String::from_utf8_lossy(source).lines() {
            let name = line.trim();
            if !name.is_empty() {
                root.add_child(SceneNode::new(compositor, name)?);
            }
        }
        Ok(root)
    }
}

const DEMO_SCENE: &[u8] = b"backbone\nligand\nwater\n";
const FRAMES: u32 = 8;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = match std::env::args().nth(1) {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options::default(),
    };

    let compositor = Compositor::new();
    let handle = compositor.handle();
    let scene = LineLoader.load(&handle, DEMO_SCENE)?;
    log::info!(
        "loaded scene '{}' with {} children",
        scene.name(),
        scene.children().len()
    );

    let projection = projection::from_options(&handle, &options.projection)?;
    let camera =
        OrbitalCamera::from_options(&handle, &options.camera, projection)?;
    let mut viewport = Viewport::new(&handle, scene.handle(), Box::new(camera))?;

    let mut animator = Animator::new(&handle);
    let start = Instant::now();
    let longitude = viewport
        .camera()
        .property_graph()
        .property_ref(OrbitalCamera::LONGITUDE);
    animator.start_at(
        ScalarAnimation::new(longitude, 0.0, TAU, Duration::from_secs(2))
            .with_easing(EasingFunction::SmoothStep)
            .with_loop_mode(LoopMode::Repeat),
        start,
    );
    let controller = OrbitController::new(&options.controller);

    for frame in 0..FRAMES {
        let now = start + Duration::from_millis(250 * u64::from(frame));
        let _ = animator.update(now)?;
        controller.zoom(viewport.camera(), 0.25)?;
        let evaluated = compositor.evaluate();
        let transform = viewport.transform()?;
        log::info!(
            "frame {frame}: {evaluated} bindings evaluated, origin maps to {:?}",
            transform.project_point3(glam::Vec3::ZERO)
        );
    }

    let perspective = PerspectiveProjection::new(
        &handle,
        options.projection.x_fov.to_radians(),
        options.projection.y_fov.to_radians(),
        options.projection.near,
        options.projection.far,
    )?;
    viewport.camera_mut().set_projection(Box::new(perspective))?;
    log::info!(
        "switched to {} projection, uniform {:?}",
        viewport.camera().projection().kind(),
        viewport.uniform()?.transform
    );
    Ok(())
}
