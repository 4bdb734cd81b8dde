// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Live-bound camera, projection and viewport transforms.
//!
//! Vista keeps every camera and projection parameter in an animatable
//! property graph. Derived matrices (projection, view, view-projection) are
//! expressions bound over those parameters, and a viewport binds a scene
//! node's transform to its camera's view-projection matrix. Editing any
//! parameter, directly or through an animation, is visible in the node's
//! transform on the next read without an explicit recompute.
//!
//! # Key entry points
//!
//! - [`compositor::Compositor`] - owner of all property storage; runs the
//!   per-frame evaluation pass
//! - [`property::PropertyGraph`] - named, typed, bindable properties
//! - [`projection::Projection`] - orthographic and perspective projections
//! - [`camera::OrbitalCamera`] - spherical orbit camera owning a projection
//! - [`viewport::Viewport`] - binds a camera onto a scene node
//! - [`options::Options`] - TOML-backed camera/projection/controller presets
//! - [`animation`] - eased scalar animations over graph properties
//!
//! # Example
//!
//! ```
//! use vista::camera::{Camera, OrbitalCamera};
//! use vista::compositor::Compositor;
//! use vista::projection::OrthographicProjection;
//! use vista::scene::SceneNode;
//! use vista::viewport::Viewport;
//!
//! # fn main() -> vista::error::Result<()> {
//! let compositor = Compositor::new();
//! let handle = compositor.handle();
//!
//! let node = SceneNode::new(&handle, "root")?;
//! let projection = OrthographicProjection::new(&handle, 100.0, 1.0, 1000.0)?;
//! let camera = OrbitalCamera::new(
//!     &handle,
//!     Box::new(projection),
//!     0.0,
//!     std::f32::consts::FRAC_PI_2,
//!     300.0,
//! )?;
//! let viewport = Viewport::new(&handle, node.handle(), Box::new(camera))?;
//!
//! viewport
//!     .camera()
//!     .property_graph()
//!     .set(OrbitalCamera::LONGITUDE, 0.5_f32)?;
//! assert_eq!(node.transform()?, viewport.camera().combined_matrix()?);
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod camera;
pub mod compositor;
pub mod error;
pub mod options;
pub mod projection;
pub mod property;
pub mod scene;
pub mod viewport;

pub use compositor::{Compositor, CompositorHandle};
pub use error::{Result, VistaError};
