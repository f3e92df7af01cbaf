// renderer.rs — wgpu scene + egui overlay, the on-screen ScenePresenter
//
// All GPU buffers are created once at their worst-case size and rewritten in
// place with `Queue::write_buffer`; a recompute never allocates GPU memory.

use glam::Vec3;
use thiserror::Error;
use winit::window::Window;

use crate::camera::OrbitCamera;
use crate::mesh::{
    axis_lines, build_sphere, LineSegment, SphereMesh, MARKER_LAT, MARKER_LON, MARKER_RADIUS,
    SPHERE_LAT, SPHERE_LON,
};
use crate::presenter::{Frame, Readout, ScenePresenter};
use crate::sweep::{Rgba, SweepMesh, MAX_SEGMENTS};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.08, g: 0.08, b: 0.1, a: 1.0 };
const SPHERE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const MARKER_COLOR: Rgba = [1.0, 0.55, 0.1, 1.0];
/// 3 axes + 4 guide lines, two vertices each.
const LINE_VERTEX_CAPACITY: usize = 14;
const SWEEP_VERTEX_CAPACITY: usize = MAX_SEGMENTS + 1;
const SWEEP_INDEX_CAPACITY: usize = MAX_SEGMENTS * 3;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

fn setup_egui_ui_fonts(ctx: &egui::Context) {
    // egui's bundled font lacks ϕ and CJK; look for a system font that has them.
    fn load_font(path: &std::path::Path) -> Option<Vec<u8>> {
        let bytes = std::fs::read(path).ok()?;
        ab_glyph::FontRef::try_from_slice(&bytes).ok()?;
        Some(bytes)
    }

    let mut candidates: Vec<std::path::PathBuf> = Vec::new();
    if cfg!(windows) {
        let dir = std::path::PathBuf::from(r"C:\Windows\Fonts");
        candidates.push(dir.join("msyh.ttf"));
        candidates.push(dir.join("segoeui.ttf"));
        candidates.push(dir.join("arial.ttf"));
    } else if cfg!(target_os = "macos") {
        candidates.push("/System/Library/Fonts/Supplemental/Arial Unicode.ttf".into());
        candidates.push("/Library/Fonts/Arial Unicode.ttf".into());
    } else {
        candidates.push("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc".into());
        candidates.push("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".into());
        candidates.push("/usr/share/fonts/TTF/DejaVuSans.ttf".into());
        candidates.push("/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf".into());
    }
    for name in ["NotoSansSC-Regular.otf", "NotoSans-Regular.ttf", "DejaVuSans.ttf"] {
        if let Some(p) = crate::config::find_asset(&std::path::Path::new("assets").join(name)) {
            candidates.insert(0, p);
        }
    }

    let Some((font_path, font_bytes)) = candidates
        .into_iter()
        .find_map(|p| load_font(&p).map(|bytes| (p, bytes)))
    else {
        log::warn!("{}", crate::i18n::tr("font.not_found"));
        return;
    };

    log::info!(
        "{}",
        crate::i18n::tr_with("font.using", &[("path", font_path.display().to_string())])
    );

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("ui".to_owned(), egui::FontData::from_owned(font_bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            // Keep egui's own font first so Latin text looks the same; ours fills gaps.
            list.push("ui".to_owned());
        }
    }
    ctx.set_fonts(fonts);
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    fn new(position: Vec3, normal: Vec3, color: Rgba) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
}

/// Indexed triangle mesh with fixed-capacity GPU buffers.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, vertex_capacity: usize, index_capacity: usize) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} vertices")),
            size: (vertex_capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} indices")),
            size: (index_capacity * std::mem::size_of::<u32>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            vertex_buffer,
            index_buffer,
            vertex_capacity,
            index_capacity,
            index_count: 0,
        }
    }

    fn write_vertices(&self, queue: &wgpu::Queue, vertices: &[Vertex]) {
        debug_assert!(vertices.len() <= self.vertex_capacity);
        let vertices = &vertices[..vertices.len().min(self.vertex_capacity)];
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
    }

    fn write_indices(&mut self, queue: &wgpu::Queue, indices: &[u32]) {
        debug_assert!(indices.len() <= self.index_capacity);
        let indices = &indices[..indices.len().min(self.index_capacity)];
        if !indices.is_empty() {
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(indices));
        }
        self.index_count = indices.len() as u32;
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Per-period scene content, dropped on `clear_scene`.
struct LiveScene {
    generation: u64,
    axes: [LineSegment; 3],
    guides: [LineSegment; 4],
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    opaque_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,

    line_buffer: wgpu::Buffer,
    line_count: u32,
    marker: GpuMesh,
    sphere: GpuMesh,
    primary: GpuMesh,
    secondary: GpuMesh,

    unit_sphere: SphereMesh,
    unit_marker: SphereMesh,
    scratch: Vec<Vertex>,
    scratch_indices: Vec<u32>,

    axis_length: f32,
    live: Option<LiveScene>,
    readout: Option<Readout>,

    // UI
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: std::sync::Arc<Window>, axis_length: f32) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // SAFETY: the window is kept alive by the event loop for as long as the surface.
        let surface = unsafe { instance.create_surface(window.as_ref()) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default().using_resolution(adapter.limits())
                    },
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RendererError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        // --- camera uniform ---
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        // --- pipelines ---
        let shader = device.create_shader_module(wgpu::include_wgsl!("scene.wgsl"));
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str,
                             topology: wgpu::PrimitiveTopology,
                             blend: wgpu::BlendState,
                             depth_write_enabled: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Fans and the bounding sphere are seen from both sides.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            })
        };

        let opaque_pipeline = make_pipeline(
            "Opaque Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::REPLACE,
            true,
        );
        let line_pipeline = make_pipeline(
            "Line Pipeline",
            wgpu::PrimitiveTopology::LineList,
            wgpu::BlendState::REPLACE,
            true,
        );
        let translucent_pipeline = make_pipeline(
            "Translucent Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );

        // --- geometry buffers ---
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line vertices"),
            size: (LINE_VERTEX_CAPACITY * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let unit_sphere = build_sphere(Vec3::ZERO, 1.0, SPHERE_LAT, SPHERE_LON);
        let unit_marker = build_sphere(Vec3::ZERO, MARKER_RADIUS, MARKER_LAT, MARKER_LON);

        let sphere = GpuMesh::new(
            &device,
            "bounding sphere",
            unit_sphere.vertex_count(),
            unit_sphere.indices.len(),
        );
        let marker = GpuMesh::new(
            &device,
            "point marker",
            unit_marker.vertex_count(),
            unit_marker.indices.len(),
        );
        let primary = GpuMesh::new(&device, "primary sweep", SWEEP_VERTEX_CAPACITY, SWEEP_INDEX_CAPACITY);
        let secondary =
            GpuMesh::new(&device, "secondary sweep", SWEEP_VERTEX_CAPACITY, SWEEP_INDEX_CAPACITY);

        // --- egui ---
        let egui_ctx = egui::Context::default();
        setup_egui_ui_fonts(&egui_ctx);
        let mut egui_state = egui_winit::State::new(window.as_ref());
        egui_state.set_pixels_per_point(window.scale_factor() as f32);
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        let scratch_capacity = unit_sphere.vertex_count();
        let mut renderer = Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            camera_buffer,
            camera_bind_group,
            opaque_pipeline,
            line_pipeline,
            translucent_pipeline,
            line_buffer,
            line_count: 0,
            marker,
            sphere,
            primary,
            secondary,
            unit_sphere,
            unit_marker,
            scratch: Vec::with_capacity(scratch_capacity),
            scratch_indices: Vec::with_capacity(SWEEP_INDEX_CAPACITY),
            axis_length,
            live: None,
            readout: None,
            egui_ctx,
            egui_state,
            egui_renderer,
        };
        // Sphere topologies never change; only their vertices are rewritten.
        renderer.sphere.write_indices(&renderer.queue, &renderer.unit_sphere.indices);
        renderer.marker.write_indices(&renderer.queue, &renderer.unit_marker.indices);
        renderer.update_camera(&OrbitCamera::new());
        Ok(renderer)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    pub fn update_camera(&mut self, camera: &OrbitCamera) {
        let aspect = self.config.width as f32 / self.config.height.max(1) as f32;
        let light = (camera.eye() + Vec3::new(0.0, camera.distance, 0.0)).normalize_or_zero();
        let uniform = CameraUniform {
            view_proj: camera.view_proj(aspect).to_cols_array_2d(),
            light_dir: [light.x, light.y, light.z, 0.0],
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn readout(&self) -> Option<&Readout> {
        self.readout.as_ref()
    }

    fn write_lines(&mut self) {
        self.scratch.clear();
        if let Some(live) = &self.live {
            for line in live.axes.iter().chain(live.guides.iter()) {
                self.scratch.push(Vertex::new(line.start, Vec3::ZERO, line.color));
                self.scratch.push(Vertex::new(line.end, Vec3::ZERO, line.color));
            }
        }
        if !self.scratch.is_empty() {
            self.queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&self.scratch));
        }
        self.line_count = self.scratch.len() as u32;
    }

    fn write_sweep(&mut self, secondary: bool, mesh: &SweepMesh, color: Rgba) {
        let target = if secondary {
            &mut self.secondary
        } else {
            &mut self.primary
        };
        if mesh.is_empty() {
            target.index_count = 0;
            return;
        }
        // A truncated upload would leave indices pointing past the vertices.
        if mesh.vertex_count() > target.vertex_capacity
            || mesh.triangle_count() * 3 > target.index_capacity
        {
            log::warn!(
                "sweep fan of {} vertices exceeds buffer capacity {}, not drawn",
                mesh.vertex_count(),
                target.vertex_capacity
            );
            target.index_count = 0;
            return;
        }

        self.scratch.clear();
        self.scratch.extend(
            mesh.vertices
                .iter()
                .zip(&mesh.normals)
                .map(|(p, n)| Vertex::new(*p, *n, color)),
        );
        self.scratch_indices.clear();
        self.scratch_indices.extend(mesh.indices());

        let target = if secondary {
            &mut self.secondary
        } else {
            &mut self.primary
        };
        target.write_vertices(&self.queue, &self.scratch);
        target.write_indices(&self.queue, &self.scratch_indices);
    }

    fn draw_scene<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.live.is_none() {
            return;
        }
        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        pass.set_pipeline(&self.opaque_pipeline);
        self.marker.draw(pass);

        if self.line_count > 0 {
            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            pass.draw(0..self.line_count, 0..1);
        }

        pass.set_pipeline(&self.translucent_pipeline);
        self.secondary.draw(pass);
        self.primary.draw(pass);
        self.sphere.draw(pass);
    }

    pub fn render_with_ui(
        &mut self,
        window: &Window,
        run_ui: impl FnOnce(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // 1. Scene
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });
            self.draw_scene(&mut render_pass);
        }

        // 2. UI
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl ScenePresenter for Renderer {
    fn show_scene(&mut self, generation: u64) {
        let hidden = LineSegment::new(Vec3::ZERO, Vec3::ZERO, [0.0; 4]);
        self.live = Some(LiveScene {
            generation,
            axes: axis_lines(self.axis_length),
            guides: [hidden; 4],
        });
        log::debug!("scene objects created for generation {generation}");
        self.write_lines();
    }

    fn present(&mut self, frame: &Frame<'_>) {
        let Some(live) = self.live.as_mut() else {
            log::warn!("present called with no live scene");
            return;
        };
        live.guides = *frame.lines;
        self.write_lines();

        self.scratch.clear();
        self.scratch.extend(
            self.unit_marker
                .positions
                .iter()
                .zip(&self.unit_marker.normals)
                .map(|(p, n)| Vertex::new(frame.point + *p, *n, MARKER_COLOR)),
        );
        self.marker.write_vertices(&self.queue, &self.scratch);

        self.write_sweep(false, frame.primary, frame.palette.primary);
        self.write_sweep(true, frame.secondary, frame.palette.secondary);

        self.readout = Some(frame.readout.clone());
    }

    fn update_sphere(&mut self, radius: f32, alpha: f32) {
        let [r, g, b] = SPHERE_COLOR;
        self.scratch.clear();
        self.scratch.extend(
            self.unit_sphere
                .positions
                .iter()
                .zip(&self.unit_sphere.normals)
                .map(|(p, n)| Vertex::new(*p * radius, *n, [r, g, b, alpha])),
        );
        self.sphere.write_vertices(&self.queue, &self.scratch);
    }

    fn clear_scene(&mut self) {
        if let Some(live) = self.live.take() {
            log::debug!("scene objects dropped for generation {}", live.generation);
        }
        self.line_count = 0;
        self.primary.index_count = 0;
        self.secondary.index_count = 0;
        self.readout = None;
    }
}
