//! Binds a camera's combined transform onto a scene node.

use glam::Mat4;

use crate::camera::Camera;
use crate::compositor::CompositorHandle;
use crate::error::{Result, VistaError};
use crate::property::store::Binding;
use crate::property::{Expression, Parameter, ValueKind};
use crate::scene::{NodeHandle, TRANSFORM_PROPERTY};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform holding the viewport's view-projection transform.
pub struct ViewportUniform {
    /// Column-major combined matrix.
    pub transform: [[f32; 4]; 4],
}

impl Default for ViewportUniform {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Drives a target node's `Transform` from the camera it owns.
///
/// The target node is not owned. Dropping the viewport unbinds the target,
/// which keeps the last evaluated transform.
#[derive(Debug)]
pub struct Viewport {
    compositor: CompositorHandle,
    target: NodeHandle,
    camera: Box<dyn Camera>,
}

impl Viewport {
    /// Bind `target` to `camera`'s combined matrix.
    ///
    /// Fails with [`VistaError::InvalidTarget`] if the node is gone or has
    /// no matrix transform, and with [`VistaError::InvalidArgument`] if the
    /// compositor has shut down.
    pub fn new(
        compositor: &CompositorHandle,
        target: NodeHandle,
        camera: Box<dyn Camera>,
    ) -> Result<Self> {
        bind_target(compositor, &target, camera.as_ref())?;
        log::debug!("viewport bound to node '{}'", target.name());
        Ok(Self {
            compositor: compositor.clone(),
            target,
            camera,
        })
    }

    /// Swap the camera. The target is rebound to the new camera before the
    /// old camera and its graphs are dropped.
    pub fn set_camera(&mut self, camera: Box<dyn Camera>) -> Result<()> {
        bind_target(&self.compositor, &self.target, camera.as_ref())?;
        self.camera = camera;
        log::debug!("viewport for node '{}' switched camera", self.target.name());
        Ok(())
    }

    /// Active camera.
    #[must_use]
    pub fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }

    /// Active camera, mutably (for projection swaps). The target binding
    /// follows automatically.
    pub fn camera_mut(&mut self) -> &mut dyn Camera {
        self.camera.as_mut()
    }

    /// Target node handle.
    #[must_use]
    pub fn target(&self) -> &NodeHandle {
        &self.target
    }

    /// Current value of the target's bound transform.
    pub fn transform(&self) -> Result<Mat4> {
        let store = self.compositor.upgrade()?;
        let value = store
            .borrow_mut()
            .resolve(self.target.transform_property())
            .map_err(|_| missing_target(&self.target))?;
        value.as_matrix4().ok_or_else(|| missing_target(&self.target))
    }

    /// GPU-ready copy of [`Self::transform`].
    pub fn uniform(&self) -> Result<ViewportUniform> {
        Ok(ViewportUniform {
            transform: self.transform()?.to_cols_array_2d(),
        })
    }
}

impl Drop for Viewport {
    fn drop(&mut self) {
        let Ok(store) = self.compositor.upgrade() else {
            return;
        };
        let transform = self.target.transform_property();
        let mut store = store.borrow_mut();
        // Another viewport may have rebound the target since; leave it alone.
        let owned = store
            .binding_sources(transform)
            .is_ok_and(|sources| sources == [self.camera.combined_property()]);
        if !owned {
            log::debug!(
                "viewport target '{}' no longer driven by this viewport",
                self.target.name()
            );
            return;
        }
        let result = store.unbind(transform);
        if let Err(e) = result {
            log::debug!("viewport target '{}' already gone: {e}", self.target.name());
        }
    }
}

fn bind_target(
    compositor: &CompositorHandle,
    target: &NodeHandle,
    camera: &dyn Camera,
) -> Result<()> {
    let store = compositor.upgrade()?;
    let mut store = store.borrow_mut();
    let transform = target.transform_property();
    let current = store
        .resolve(transform)
        .map_err(|_| missing_target(target))?;
    if current.kind() != ValueKind::Matrix4 {
        return Err(missing_target(target));
    }

    let binding = Binding {
        expression: Expression::new("viewport transform", |args| {
            args.get("combined")
        }),
        parameters: vec![(
            "combined".to_owned(),
            Parameter::from(camera.combined_property()),
        )],
    };
    store.bind(transform, binding)
}

fn missing_target(target: &NodeHandle) -> VistaError {
    VistaError::InvalidTarget(format!(
        "scene node '{}' has no matrix {TRANSFORM_PROPERTY} property",
        target.name()
    ))
}
