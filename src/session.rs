//! The embeddable viewer session.
//!
//! [`ViewerSession`] is the host-owned widget state: configuration,
//! camera, the background mesh loader, and (while attached to a
//! surface) the GPU resources. The host drives it with a small
//! lifecycle:
//!
//! 1. [`create`](ViewerSession::create) — no GPU work yet.
//! 2. [`attach`](ViewerSession::attach) to a surface target.
//! 3. Per frame: [`update`](ViewerSession::update),
//!    [`render`](ViewerSession::render), and
//!    [`drain_events`](ViewerSession::drain_events).
//! 4. [`detach`](ViewerSession::detach) when the surface goes away;
//!    dropping the session shuts the loader thread down.
//!
//! Rendering is gated on a host-provided visibility flag
//! ([`set_visible`](ViewerSession::set_visible)) so no cycles are spent
//! while the widget is off-screen.

use std::collections::VecDeque;

use crate::camera::controller::CameraController;
use crate::camera::framing;
use crate::error::ViewerError;
use crate::gpu::depth::DepthTarget;
use crate::gpu::render_context::RenderContext;
use crate::gpu::uniform::UniformBinding;
use crate::input::{InputEvent, InputProcessor, ViewerCommand};
use crate::lighting::Lighting;
use crate::mesh::loader::{LoadResult, MeshLoader};
use crate::mesh::MeshData;
use crate::options::{parse_toggle, Options};
use crate::renderer::gizmo::GizmoRenderer;
use crate::renderer::mesh::MeshRenderer;
use crate::util::frame_timing::FrameTiming;

/// Minimum effective render width, regardless of container size.
pub const MIN_RENDER_WIDTH: u32 = 320;
/// Minimum effective render height, regardless of container size.
pub const MIN_RENDER_HEIGHT: u32 = 480;

/// Frame-rate ceiling for the render loop.
const TARGET_FPS: u32 = 120;

/// Token identifying one load request.
///
/// Returned by [`ViewerSession::load`] and echoed in the completion
/// events. Only the most recently issued token can complete; older
/// in-flight loads are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(u64);

/// Notifications queued on the session for the host to drain.
#[derive(Debug)]
pub enum ViewerEvent {
    /// The mesh source locator changed.
    SrcChanged,
    /// A control toggle changed.
    ControlsChanged,
    /// The effective render size changed.
    Resized {
        /// New effective width in pixels.
        width: u32,
        /// New effective height in pixels.
        height: u32,
    },
    /// The widget became visible; the render loop is running.
    RenderLoopStarted,
    /// The widget left view; the render loop is stopped.
    RenderLoopStopped,
    /// A load finished: the mesh is resident and the camera is placed.
    LoadFinished {
        /// Token of the completed request.
        token: LoadToken,
    },
    /// A load failed; no scene state was changed.
    LoadFailed {
        /// Token of the failed request.
        token: LoadToken,
        /// The underlying loader error.
        error: ViewerError,
    },
}

/// GPU-side state, present only while attached to a surface.
struct ViewportState {
    context: RenderContext,
    depth: DepthTarget,
    camera_binding: UniformBinding,
    lighting: Lighting,
    mesh_renderer: MeshRenderer,
    gizmo: GizmoRenderer,
}

/// The embeddable viewer widget state.
///
/// See the [module docs](self) for the lifecycle.
pub struct ViewerSession {
    options: Options,
    src: Option<String>,

    camera: CameraController,
    input: InputProcessor,

    loader: MeshLoader,
    /// Latest issued load generation; 0 = never loaded.
    generation: u64,
    /// Centered CPU mesh, kept so a re-attach can re-upload it.
    mesh: Option<MeshData>,
    /// Extent of the current mesh, for the gizmo scale.
    mesh_extent: f32,

    gpu: Option<ViewportState>,
    width: u32,
    height: u32,

    visible: bool,
    frame_timing: FrameTiming,
    events: VecDeque<ViewerEvent>,
}

impl ViewerSession {
    /// Create a detached session with the given options.
    ///
    /// Spawns the background mesh-loader thread; no GPU work happens
    /// until [`attach`](Self::attach).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the loader thread fails
    /// to spawn.
    pub fn create(options: Options) -> Result<Self, ViewerError> {
        let camera = CameraController::new(
            &options.camera,
            MIN_RENDER_WIDTH as f32 / MIN_RENDER_HEIGHT as f32,
        );
        let loader = MeshLoader::new().map_err(ViewerError::ThreadSpawn)?;

        let mut session = Self {
            options,
            src: None,
            camera,
            input: InputProcessor::new(),
            loader,
            generation: 0,
            mesh: None,
            mesh_extent: 0.0,
            gpu: None,
            width: MIN_RENDER_WIDTH,
            height: MIN_RENDER_HEIGHT,
            visible: false,
            frame_timing: FrameTiming::new(TARGET_FPS),
            events: VecDeque::new(),
        };
        session.sync_controls();
        Ok(session)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Attach to a surface target, building the GPU state.
    ///
    /// The size is clamped to the 320x480 minimum. If a mesh is already
    /// resident it is uploaded immediately. Attaching while already
    /// attached replaces the previous GPU state.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Gpu`] when context creation fails.
    pub async fn attach(
        &mut self,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<(), ViewerError> {
        self.detach();

        let (width, height) = clamp_size(size.0, size.1);
        let context = RenderContext::new(target, (width, height)).await?;
        let depth = DepthTarget::new(&context.device, width, height);

        self.camera.update_uniform();
        let camera_binding = UniformBinding::new(
            &context.device,
            "Camera",
            &self.camera.uniform,
        );
        let lighting = Lighting::new(&context);
        let mesh_renderer = MeshRenderer::new(
            &context,
            &camera_binding.layout,
            &lighting.binding.layout,
        );
        let gizmo = GizmoRenderer::new(&context, &camera_binding.layout);

        let mut state = ViewportState {
            context,
            depth,
            camera_binding,
            lighting,
            mesh_renderer,
            gizmo,
        };

        if let Some(mesh) = &self.mesh {
            upload_mesh(&mut state, mesh, self.mesh_extent, &self.options);
        }

        self.width = width;
        self.height = height;
        self.camera.resize(width, height);
        self.gpu = Some(state);
        Ok(())
    }

    /// Drop the GPU state, disposing the uploaded mesh buffers. The CPU
    /// mesh and camera placement survive for a later re-attach.
    pub fn detach(&mut self) {
        if let Some(mut state) = self.gpu.take() {
            state.mesh_renderer.dispose();
        }
    }

    /// Whether the session currently holds GPU state.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.gpu.is_some()
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options wholesale, syncing control enables.
    ///
    /// Projection parameters take effect on the next load; the material
    /// color is sampled on the next load application.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
        self.sync_controls();
    }

    /// Current mesh source locator.
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// Set the mesh source and trigger a load.
    ///
    /// An empty or unchanged value is ignored. Emits
    /// [`ViewerEvent::SrcChanged`] and returns the load token.
    pub fn set_src(&mut self, src: impl Into<String>) -> Option<LoadToken> {
        let src = src.into();
        if src.is_empty() || self.src.as_deref() == Some(src.as_str()) {
            return None;
        }
        self.src = Some(src);
        self.events.push_back(ViewerEvent::SrcChanged);
        self.load()
    }

    /// Re-trigger loading of the current source.
    ///
    /// Returns the token identifying this request, or `None` when no
    /// source is set. Completion is reported via
    /// [`ViewerEvent::LoadFinished`] / [`ViewerEvent::LoadFailed`]
    /// carrying the same token.
    pub fn load(&mut self) -> Option<LoadToken> {
        let src = self.src.clone()?;
        self.generation += 1;
        self.loader.submit(self.generation, src);
        Some(LoadToken(self.generation))
    }

    /// Enable or disable pan gestures.
    pub fn set_pan(&mut self, enabled: bool) {
        if self.options.controls.pan != enabled {
            self.options.controls.pan = enabled;
            self.controls_changed();
        }
    }

    /// Enable or disable zoom gestures.
    pub fn set_zoom(&mut self, enabled: bool) {
        if self.options.controls.zoom != enabled {
            self.options.controls.zoom = enabled;
            self.controls_changed();
        }
    }

    /// Enable or disable rotate gestures.
    pub fn set_rotate(&mut self, enabled: bool) {
        if self.options.controls.rotate != enabled {
            self.options.controls.rotate = enabled;
            self.controls_changed();
        }
    }

    /// Enable or disable rotation inertia.
    pub fn set_inertia(&mut self, enabled: bool) {
        if self.options.controls.inertia != enabled {
            self.options.controls.inertia = enabled;
            self.controls_changed();
        }
    }

    /// Show or hide the axis gizmo.
    pub fn set_gizmos(&mut self, enabled: bool) {
        if self.options.controls.gizmos != enabled {
            self.options.controls.gizmos = enabled;
            self.controls_changed();
        }
    }

    /// String attribute bridge for hosts that configure the widget with
    /// name/value pairs.
    ///
    /// `src` takes any non-empty string; the control toggles accept
    /// exactly `"on"`/`"off"`. Anything else — unknown names included —
    /// is silently ignored.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match name {
            "src" => {
                let _ = self.set_src(value);
            }
            "pan" | "zoom" | "rotate" | "inertia" | "gizmos" => {
                let Some(enabled) = parse_toggle(value) else {
                    log::debug!("ignoring {name}={value:?}");
                    return;
                };
                match name {
                    "pan" => self.set_pan(enabled),
                    "zoom" => self.set_zoom(enabled),
                    "rotate" => self.set_rotate(enabled),
                    "inertia" => self.set_inertia(enabled),
                    _ => self.set_gizmos(enabled),
                }
            }
            _ => log::debug!("ignoring unknown attribute {name:?}"),
        }
    }

    fn controls_changed(&mut self) {
        self.sync_controls();
        self.events.push_back(ViewerEvent::ControlsChanged);
    }

    fn sync_controls(&mut self) {
        let controls = self.options.controls;
        self.camera.enable_pan = controls.pan;
        self.camera.enable_zoom = controls.zoom;
        self.camera.enable_rotate = controls.rotate;
        self.camera.inertia = controls.inertia;
    }

    // ── Visibility and sizing ────────────────────────────────────────

    /// Host-provided visibility signal. Rendering only happens while
    /// visible; each transition emits a render-loop event.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.events.push_back(ViewerEvent::RenderLoopStarted);
        } else {
            log::debug!(
                "render loop stopped at {:.0} fps",
                self.frame_timing.fps()
            );
            self.events.push_back(ViewerEvent::RenderLoopStopped);
        }
    }

    /// Whether the widget is currently visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Resize to the host container, clamped to the 320x480 minimum.
    /// Emits [`ViewerEvent::Resized`] with the effective size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_size(width, height);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.camera.resize(width, height);
        if let Some(state) = &mut self.gpu {
            state.context.resize(width, height);
            state.depth =
                DepthTarget::new(&state.context.device, width, height);
        }
        self.events.push_back(ViewerEvent::Resized { width, height });
    }

    /// Current effective render size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Feed a raw input event; gestures are applied to the camera
    /// subject to the control toggles.
    pub fn handle_input(&mut self, event: InputEvent) {
        let Some(command) = self.input.handle_event(event) else {
            return;
        };
        match command {
            ViewerCommand::Rotate { delta } => self.camera.rotate(delta),
            ViewerCommand::Pan { delta } => self.camera.pan(delta),
            ViewerCommand::Zoom { delta } => self.camera.zoom(delta),
            ViewerCommand::BeginDrag => self.camera.begin_drag(),
            ViewerCommand::EndDrag => self.camera.end_drag(),
        }
    }

    // ── Frame loop ───────────────────────────────────────────────────

    /// Per-frame bookkeeping: apply finished loads and advance inertia.
    pub fn update(&mut self, dt: f32) {
        while let Some(result) = self.loader.try_recv() {
            self.handle_load_result(result);
        }
        self.camera.update(dt);
    }

    fn handle_load_result(&mut self, result: LoadResult) {
        let token = LoadToken(result.generation);
        if result.generation != self.generation {
            log::debug!(
                "discarding stale load (generation {} != {})",
                result.generation,
                self.generation
            );
            return;
        }
        match result.outcome {
            Ok(mesh) => self.apply_mesh(token, mesh),
            Err(error) => {
                log::warn!("load failed: {error}");
                self.events
                    .push_back(ViewerEvent::LoadFailed { token, error });
            }
        }
    }

    /// A load completed: center the mesh, place the camera, and (when
    /// attached) upload to the GPU.
    fn apply_mesh(&mut self, token: LoadToken, mut mesh: MeshData) {
        let _translation = mesh.center_to_origin();
        self.mesh_extent = mesh
            .bounds
            .size()
            .max_element()
            .max(framing::MIN_EXTENT);

        let placement =
            framing::frame(&mesh.bounds, self.camera.camera.fovy);
        self.camera.apply_placement(&placement);

        if let Some(state) = &mut self.gpu {
            upload_mesh(state, &mesh, self.mesh_extent, &self.options);
        }

        log::info!(
            "mesh ready: {} vertices, camera at distance {:.3}",
            mesh.vertex_count(),
            placement.distance()
        );
        self.mesh = Some(mesh);
        self.events.push_back(ViewerEvent::LoadFinished { token });
    }

    /// Render one frame, if visible, attached, and due.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired; `Outdated`/`Lost` are recoverable via
    /// [`resize`](Self::resize).
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.visible || !self.frame_timing.should_render() {
            return Ok(());
        }
        let Some(state) = &mut self.gpu else {
            return Ok(());
        };

        self.camera.update_uniform();
        state
            .camera_binding
            .write(&state.context.queue, &self.camera.uniform);

        let frame = state.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = state.context.create_encoder();
        {
            let [r, g, b, a] = self.options.display.background;
            let mut rp =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("main render pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: f64::from(r),
                                    g: f64::from(g),
                                    b: f64::from(b),
                                    a: f64::from(a),
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &state.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });

            state.mesh_renderer.draw(
                &mut rp,
                &state.camera_binding.bind_group,
                &state.lighting.binding.bind_group,
            );
            if self.options.controls.gizmos {
                state
                    .gizmo
                    .draw(&mut rp, &state.camera_binding.bind_group);
            }
        }
        state.context.submit(encoder);
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    // ── Events and accessors ─────────────────────────────────────────

    /// Drain all queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.events.drain(..).collect()
    }

    /// The camera controller (placement, distance, zoom limits).
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Whether a mesh is currently resident.
    #[must_use]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}

fn clamp_size(width: u32, height: u32) -> (u32, u32) {
    (width.max(MIN_RENDER_WIDTH), height.max(MIN_RENDER_HEIGHT))
}

/// Push a resident mesh to the GPU: material sampled from the current
/// display options, vertex upload, gizmo rescale.
fn upload_mesh(
    state: &mut ViewportState,
    mesh: &MeshData,
    extent: f32,
    options: &Options,
) {
    state
        .mesh_renderer
        .set_material(&state.context.queue, &options.display);
    state.mesh_renderer.upload_mesh(&state.context, mesh);
    state.gizmo.set_scale(&state.context.queue, extent);
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use approx::assert_relative_eq;
    use web_time::Duration;

    use super::*;
    use crate::error::ViewerError;
    use crate::mesh::loader::LoadResult;

    /// Write a one-triangle binary STL and return its path.
    fn write_test_stl(name: &str) -> String {
        let mut data = vec![0_u8; 80];
        data.extend_from_slice(&1_u32.to_le_bytes());
        let floats: [f32; 12] = [
            0.0, 0.0, 1.0, // normal
            0.0, 0.0, 0.0, // v0
            10.0, 0.0, 0.0, // v1
            0.0, 10.0, 0.0, // v2
        ];
        for f in floats {
            data.extend_from_slice(&f.to_le_bytes());
        }
        data.extend_from_slice(&0_u16.to_le_bytes());

        let path = std::env::temp_dir().join(format!(
            "mirador-{}-{}.stl",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&data).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn session() -> ViewerSession {
        ViewerSession::create(Options::default()).unwrap()
    }

    /// Pump updates until the pending load lands (or time out).
    fn pump_until_loaded(s: &mut ViewerSession) {
        for _ in 0..500 {
            s.update(0.016);
            if s.has_mesh() || s.events.iter().any(|e| {
                matches!(e, ViewerEvent::LoadFailed { .. })
            }) {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("load did not complete");
    }

    #[test]
    fn load_without_src_is_ignored() {
        let mut s = session();
        assert_eq!(s.load(), None);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn set_src_loads_and_places_camera() {
        let path = write_test_stl("load");
        let mut s = session();

        let token = s.set_src(path.clone()).unwrap();
        pump_until_loaded(&mut s);

        let events = s.drain_events();
        assert!(matches!(events[0], ViewerEvent::SrcChanged));
        assert!(events.iter().any(|e| matches!(
            e,
            ViewerEvent::LoadFinished { token: t } if *t == token
        )));

        // 10x10x0 triangle is flat in Z: framed along +Z, distance
        // 1.5 * 5 / tan(30 deg) for the default 60-degree fov.
        let camera = s.camera();
        assert_relative_eq!(
            camera.distance(),
            12.990_381,
            epsilon = 1e-3
        );
        assert_relative_eq!(camera.camera.eye.z, camera.distance());
        assert_eq!(camera.zoom_limits(), (2.0, 20.0));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn failed_load_reports_error() {
        let mut s = session();
        let token = s.set_src("/nonexistent/mirador.stl").unwrap();
        let initial = s.drain_events();
        assert!(matches!(initial[0], ViewerEvent::SrcChanged));

        for _ in 0..500 {
            s.update(0.016);
            if !s.events.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            ViewerEvent::LoadFailed { token: t, error: ViewerError::MeshLoad(_) }
                if *t == token
        )));
        assert!(!s.has_mesh());
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut s = session();
        s.src = Some("unused".into());
        s.generation = 2;

        // A result from generation 1 arrives after generation 2 was
        // issued — it must not touch the scene.
        s.handle_load_result(LoadResult {
            generation: 1,
            outcome: Ok(MeshData {
                vertices: Vec::new(),
                bounds: framing::BoundingBox {
                    min: glam::Vec3::ZERO,
                    max: glam::Vec3::ONE,
                },
            }),
        });
        assert!(!s.has_mesh());
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn invalid_attributes_are_silently_ignored() {
        let mut s = session();
        s.set_attribute("pan", "maybe");
        s.set_attribute("zoom", "ON");
        s.set_attribute("bogus", "on");
        s.set_attribute("src", "");

        assert!(s.drain_events().is_empty());
        assert!(s.options().controls.pan);
        assert!(s.options().controls.zoom);
    }

    #[test]
    fn toggles_emit_events_and_reach_the_camera() {
        let mut s = session();
        s.set_attribute("rotate", "off");
        s.set_attribute("inertia", "on");
        s.set_gizmos(true);
        // Unchanged value: no extra event.
        s.set_attribute("gizmos", "on");

        let events = s.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ViewerEvent::ControlsChanged))
                .count(),
            3
        );
        assert!(!s.camera().enable_rotate);
        assert!(s.camera().inertia);
        assert!(s.options().controls.gizmos);
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let mut s = session();
        s.resize(100, 2000);
        assert_eq!(s.size(), (MIN_RENDER_WIDTH, 2000));

        let events = s.drain_events();
        assert!(matches!(
            events[0],
            ViewerEvent::Resized {
                width: MIN_RENDER_WIDTH,
                height: 2000
            }
        ));

        // Clamped-to-same size is not a change.
        s.resize(10, 10);
        s.resize(0, 0);
        assert_eq!(s.size(), (MIN_RENDER_WIDTH, MIN_RENDER_HEIGHT));
        let second = s.drain_events();
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn visibility_transitions_emit_one_event_each() {
        let mut s = session();
        assert!(!s.is_visible());

        s.set_visible(true);
        s.set_visible(true);
        s.set_visible(false);

        let events = s.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ViewerEvent::RenderLoopStarted));
        assert!(matches!(events[1], ViewerEvent::RenderLoopStopped));
    }

    #[test]
    fn same_src_does_not_reload_but_load_does() {
        let path = write_test_stl("reload");
        let mut s = session();

        let first = s.set_src(path.clone()).unwrap();
        assert_eq!(s.set_src(path.clone()), None);

        let second = s.load().unwrap();
        assert_ne!(first, second);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn input_commands_respect_toggles() {
        let mut s = session();
        s.set_rotate(false);

        s.handle_input(InputEvent::MouseButton {
            button: crate::input::MouseButton::Left,
            pressed: true,
        });
        let eye = s.camera().camera.eye;
        s.handle_input(InputEvent::CursorMoved { x: 40.0, y: 20.0 });
        assert_eq!(s.camera().camera.eye, eye);
    }
}
