//! Dryland Backdrop - WASM Module
//!
//! A decorative hero backdrop for a `<canvas>`: layered sand dunes, drifting
//! dust and a pulsing node-link network. It is compiled to WebAssembly and
//! exposes a small JavaScript API via wasm-bindgen; everything below the
//! bindings also runs headless for tests.
//!
//! # Architecture
//!
//! - `config`: palette, counts, motion rules and built-in presets
//! - `particles`: drifting dust with edge recycling
//! - `network`: node buffers and link topology using petgraph
//! - `layout`: proximity and band-lattice link builders
//! - `spatial`: R-tree spatial indexing for proximity queries
//! - `render`: the `Surface` trait, canvas and recording backends, painters
//! - `animation`: per-instance state and the frame pipeline
//! - `schedule`: frame scheduling and the frame loop

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod config;
pub mod error;
pub mod layout;
pub mod network;
pub mod particles;
pub mod render;
pub mod schedule;
pub mod spatial;
pub mod viewport;

use config::BackdropOptions;
use error::BackdropError;
use render::CanvasSurface;
use schedule::{AnimationFrameScheduler, FrameLoop};

pub use animation::Animation;
pub use config::{BackdropConfig, Preset};
pub use viewport::Viewport;

/// Canvas id used by [`mount`] when none is given.
pub const DEFAULT_CANVAS_ID: &str = "drylandCanvas";

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// A backdrop bound to one canvas element.
///
/// This struct wraps the frame loop and the window resize listener and
/// provides the public API exposed to JavaScript.
#[wasm_bindgen]
pub struct DrylandBackdrop {
    frames: FrameLoop<CanvasSurface, AnimationFrameScheduler>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl DrylandBackdrop {
    /// Bind to `<canvas id="{canvasId}">`.
    ///
    /// `options` may be `undefined` or an object with any of `preset`,
    /// `config`, `seed`, `particleCount` and `nodeCount`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, options: JsValue) -> std::result::Result<DrylandBackdrop, JsValue> {
        let config = BackdropOptions::from_js(options)?.into_config()?;
        let surface = CanvasSurface::from_element_id(canvas_id)?;
        let frames = FrameLoop::attach(config, surface, AnimationFrameScheduler)?;
        Ok(Self {
            frames,
            on_resize: None,
        })
    }

    /// Start animating and follow window resizes.
    ///
    /// The resize listener is attached only once the first frame has been
    /// scheduled; if attaching fails the loop is stopped again.
    pub fn start(&mut self) -> std::result::Result<(), JsValue> {
        self.frames.start()?;
        if self.on_resize.is_none() {
            if let Err(err) = self.attach_resize() {
                self.frames.stop();
                return Err(err);
            }
        }
        Ok(())
    }

    /// Stop animating and detach the resize listener.
    pub fn stop(&mut self) {
        self.frames.stop();
        self.detach_resize();
    }

    /// Re-measure the canvas and lay the scene out again.
    pub fn resize(&self) {
        self.frames.resize();
    }

    /// Draw exactly one frame, independent of the running loop.
    pub fn step(&self) {
        self.frames.render_frame();
    }

    /// Whether frames are currently being scheduled.
    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    /// Number of network nodes.
    #[wasm_bindgen(getter, js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.frames.with_animation(|a| a.network().node_count())
    }

    /// Number of network links.
    #[wasm_bindgen(getter, js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.frames.with_animation(|a| a.network().link_count())
    }

    /// Number of dust particles.
    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.frames.with_animation(|a| a.particles().len() as u32)
    }

    /// Frames advanced since construction.
    #[wasm_bindgen(getter, js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.frames.with_animation(|a| a.frame() as f64)
    }

    /// Seed of the current layout. Pass it back as `options.seed` to get the
    /// same scene again.
    #[wasm_bindgen(getter)]
    pub fn seed(&self) -> u64 {
        self.frames.with_animation(|a| a.seed())
    }

    /// Node positions as `[x0, y0, x1, y1, ...]` in CSS pixels.
    #[wasm_bindgen(getter, js_name = nodePositions)]
    pub fn node_positions(&self) -> Float32Array {
        self.frames
            .with_animation(|a| Float32Array::from(a.network().interleaved_positions().as_slice()))
    }

    fn attach_resize(&mut self) -> std::result::Result<(), JsValue> {
        let window = web_sys::window().ok_or(BackdropError::NoWindow)?;
        let frames = self.frames.clone();
        let closure = Closure::wrap(Box::new(move || frames.resize()) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        self.on_resize = Some(closure);
        Ok(())
    }

    fn detach_resize(&mut self) {
        let Some(closure) = self.on_resize.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(e) = window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            {
                tracing::warn!(error = %error::describe_js(&e), "failed to remove resize listener");
            }
        }
    }
}

impl Drop for DrylandBackdrop {
    fn drop(&mut self) {
        self.frames.stop();
        self.detach_resize();
    }
}

/// Create and start a backdrop with default options.
#[wasm_bindgen]
pub fn mount(canvas_id: Option<String>) -> std::result::Result<DrylandBackdrop, JsValue> {
    let id = canvas_id.as_deref().unwrap_or(DEFAULT_CANVAS_ID);
    let mut backdrop = DrylandBackdrop::new(id, JsValue::UNDEFINED)?;
    backdrop.start()?;
    Ok(backdrop)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use super::*;
    use render::{DrawCommand, RecordingSurface};
    use schedule::ManualScheduler;

    fn headless(
        options: &str,
        viewport: Viewport,
    ) -> (FrameLoop<RecordingSurface, ManualScheduler>, ManualScheduler) {
        let options: BackdropOptions = serde_json::from_str(options).unwrap();
        let config = options.into_config().unwrap();
        let scheduler = ManualScheduler::new();
        let frames =
            FrameLoop::attach(config, RecordingSurface::new(viewport), scheduler.clone()).unwrap();
        (frames, scheduler)
    }

    /// The reference scene: 800x600, 24 nodes, proximity links.
    #[test]
    fn test_reference_scene() {
        let (frames, _) = headless(r#"{ "seed": 2024 }"#, Viewport::new(800.0, 600.0, 1.0));

        frames.with_animation(|a| {
            let network = a.network();
            assert_eq!(network.node_count(), 24);
            for &x in network.positions_x() {
                assert!((0.0..800.0).contains(&x));
            }
            for &y in network.positions_y() {
                assert!((0.0..600.0).contains(&y));
            }
            for link in network.links() {
                assert!(link.a.0 < link.b.0 && link.b.0 < 24);
            }
            println!(
                "reference scene: {} nodes, {} links",
                network.node_count(),
                network.link_count()
            );
        });
    }

    /// A long run through the scheduler stays finite and balanced.
    #[test]
    fn test_long_run_through_scheduler() {
        let (frames, scheduler) = headless(r#"{ "seed": 7 }"#, Viewport::new(1440.0, 900.0, 2.0));
        frames.start().unwrap();

        for i in 0..600 {
            frames.with_surface(|s| s.clear());
            assert_eq!(scheduler.run_pending(i as f64 * 16.7), 1);
            frames.with_surface(|s| {
                assert!(s.all_finite(), "non-finite geometry at frame {i}");
                assert_eq!(s.save_depth(), 0);
            });
        }

        frames.with_animation(|a| {
            assert_eq!(a.frame(), 600);
            assert_eq!(a.particles().len(), 90);
            let vp = a.viewport();
            for p in a.particles().particles() {
                assert!(p.x <= vp.width + 20.0 + 1.0);
                assert!(p.y >= -20.0 - 1.0 && p.y <= vp.height + 20.0 + 1.0);
            }
            for (&vx, &vy) in a.network().velocities_x().iter().zip(a.network().velocities_y()) {
                assert!(vx.hypot(vy) <= 0.4 + 1e-5);
            }
        });
    }

    /// Same seed and viewport give the same frames, draw call for draw call.
    #[test]
    fn test_seeded_runs_match() {
        let run = || {
            let (frames, _) = headless(
                r#"{ "preset": "oasis", "seed": 31 }"#,
                Viewport::new(640.0, 360.0, 1.0),
            );
            for _ in 0..20 {
                frames.render_frame();
            }
            frames.with_surface(|s| s.commands().to_vec())
        };
        assert_eq!(run(), run());
    }

    /// Resizing mid-run re-lays out inside the new bounds without resetting time.
    #[test]
    fn test_resize_mid_run() {
        let (frames, scheduler) = headless(r#"{ "seed": 5 }"#, Viewport::new(1200.0, 800.0, 1.0));
        frames.start().unwrap();
        for i in 0..50 {
            scheduler.run_pending(i as f64);
        }

        let phone = Viewport::new(390.0, 844.0, 3.0);
        frames.with_surface(|s| s.set_viewport(phone));
        frames.resize();

        frames.with_animation(|a| {
            assert_eq!(a.frame(), 50);
            assert_eq!(a.viewport(), phone);
            let (min_x, min_y, max_x, max_y) = a.network().bounds().unwrap();
            assert!(min_x >= 0.0 && max_x < phone.width);
            assert!(min_y >= 0.0 && max_y < phone.height);
            for p in a.particles().particles() {
                assert!(phone.contains(p.x, p.y));
            }
        });
        frames.with_surface(|s| {
            assert_eq!(s.commands().last(), Some(&DrawCommand::Configure(phone)));
        });

        // The loop keeps going after a resize.
        assert_eq!(scheduler.run_pending(0.0), 1);
        assert_eq!(frames.with_animation(|a| a.frame()), 51);
    }

    /// Count overrides reach the scene.
    #[test]
    fn test_count_overrides() {
        let (frames, _) = headless(
            r#"{ "preset": "dusk", "particleCount": 12, "nodeCount": 9, "seed": 1 }"#,
            Viewport::new(800.0, 600.0, 1.0),
        );
        frames.with_animation(|a| {
            assert_eq!(a.particles().len(), 12);
            assert_eq!(a.network().node_count(), 9);
            // Dusk links 3 bands of 3 as a lattice.
            assert_eq!(a.network().link_count(), 12);
        });
    }

    /// An empty network still animates.
    #[test]
    fn test_zero_nodes() {
        let (frames, _) = headless(r#"{ "nodeCount": 0 }"#, Viewport::new(300.0, 200.0, 1.0));
        frames.render_frame();
        frames.with_animation(|a| {
            assert_eq!(a.network().node_count(), 0);
            assert_eq!(a.network().link_count(), 0);
            assert!(a.network().interleaved_positions().is_empty());
        });
    }
}
