// Island fauna viewer: ECS-driven creature simulation rendered with
// instanced draws. All creature joints share one pebble mesh and go out in
// a single draw call; the terrain sheet is a second draw with one instance.

mod engine;

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3, Vec4};
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use engine::Transform;
use engine::camera::OrbitCamera;
use engine::creature::{Creature, MoveState};
use engine::debug_overlay::{CreatureDebugDraw, DebugOverlay, DebugStats};
use engine::input::InputState;
use engine::interact::{Interaction, ray_terrain_hit};
use engine::looper::FrameClock;
use engine::mesh::{GpuVertex, PolyMesh, RenderMesh, triangulate_smooth};
use engine::rig::Rig;
use engine::sim::{FaunaSim, Landmark};
use engine::subdivide::subdivide;
use engine::terrain::{HeightSampler, WORLD_HALF};

// ============================================================================
// INSTANCE DATA (per joint / landmark / terrain sheet)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
        }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const VEC4: u64 = std::mem::size_of::<[f32; 4]>() as u64;
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Model matrix columns (locations 2-5)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: VEC4,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 2 * VEC4,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 3 * VEC4,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Color (location 6)
                wgpu::VertexAttribute {
                    offset: 4 * VEC4,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

// ============================================================================
// UNIFORM DATA
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    sun_dir: [f32; 4],
}

impl Uniforms {
    fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            sun_dir: [0.35, 0.8, 0.45, 0.0],
        }
    }
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const TERRAIN_COLOR: [f32; 3] = [0.36, 0.52, 0.30];

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
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

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &RenderMesh, label: &str) -> Self {
        use wgpu::util::DeviceExt;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.index_count() as u32,
        }
    }
}

struct State {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    render_pipeline: wgpu::RenderPipeline,

    pebble: GpuMesh,
    terrain_mesh: GpuMesh,
    instance_buffer: wgpu::Buffer,
    terrain_instance_buffer: wgpu::Buffer,
    max_instances: usize,
    instance_count: usize,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    sim: FaunaSim,
    clock: FrameClock,
    camera: OrbitCamera,
    input: InputState,
    overlay: DebugOverlay,
    show_stats: bool,
    show_creature_debug: bool,

    // Frame-time accumulators for the stats panel.
    fps: u32,
    frame_count: u32,
    frame_time_min: f32,
    frame_time_max: f32,
    frame_time_sum: f32,
    frame_time_avg: f32,
    last_fps_update: std::time::Instant,
}

impl State {
    async fn new(window: std::sync::Arc<winit::window::Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader_instanced.wgsl").into()),
        });

        let uniforms = Uniforms::new();

        use wgpu::util::DeviceExt;
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuVertex::desc(), InstanceData::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
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
            cache: None,
        });

        // Scene: deterministic island + the fixed creature roster.
        let mut sim = FaunaSim::new(0xD1A0);
        sim.populate_default();

        // Shared joint prototype: unit box rounded by two Catmull-Clark passes.
        let pebble_mesh = triangulate_smooth(&subdivide(&PolyMesh::unit_box(), 2));
        let pebble = GpuMesh::upload(&device, &pebble_mesh, "Pebble Mesh");

        let terrain_render = triangulate_smooth(&sim.terrain.build_mesh());
        let terrain_mesh = GpuMesh::upload(&device, &terrain_render, "Terrain Mesh");

        let max_instances = 4096;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (max_instances * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let terrain_instance_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Terrain Instance"),
                contents: bytemuck::cast_slice(&[InstanceData::new(
                    Mat4::IDENTITY,
                    TERRAIN_COLOR,
                )]),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let overlay = DebugOverlay::new(&window, &device, surface_format);

        let mut input = InputState::new();
        input.window_size = (size.width, size.height);

        Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            render_pipeline,
            pebble,
            terrain_mesh,
            instance_buffer,
            terrain_instance_buffer,
            max_instances,
            instance_count: 0,
            uniform_buffer,
            uniform_bind_group,
            sim,
            clock: FrameClock::start(),
            camera: OrbitCamera::new(),
            input,
            overlay,
            show_stats: false,
            show_creature_debug: false,
            fps: 0,
            frame_count: 0,
            frame_time_min: f32::MAX,
            frame_time_max: 0.0,
            frame_time_sum: 0.0,
            frame_time_avg: 0.0,
            last_fps_update: std::time::Instant::now(),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
            self.input.window_size = (new_size.width, new_size.height);
        }
    }

    fn update(&mut self) {
        let dt = self.clock.tick();

        self.frame_time_min = self.frame_time_min.min(dt * 1000.0);
        self.frame_time_max = self.frame_time_max.max(dt * 1000.0);
        self.frame_time_sum += dt * 1000.0;

        self.camera.update(&self.input, dt);
        self.sim.update(dt);

        if let Some(click) = self.input.take_left_click() {
            self.handle_click(click);
        }
    }

    /// Ground-pick: cursor ray, terrain hit, then the nearest registered
    /// interactable within the pick radius.
    fn handle_click(&mut self, click: (f32, f32)) {
        const PICK_RADIUS: f32 = 120.0;

        let (origin, dir) = self.camera.screen_ray(click, self.input.window_size);
        let Some(hit) = ray_terrain_hit(&self.sim.terrain, origin, dir, 4.0 * WORLD_HALF) else {
            return;
        };

        let mut positions = Vec::new();
        let mut query = self.sim.world.query::<(Entity, &Transform)>();
        for (entity, transform) in query.iter(&self.sim.world) {
            positions.push((entity, transform.position));
        }

        let Some(picked) = self.sim.interactions.pick_near(hit, &positions, PICK_RADIUS) else {
            return;
        };
        match self.sim.interactions.get(picked) {
            Some(Interaction::Teleport { destination }) => {
                log::info!("teleport to {destination:?}");
                self.camera.jump_to(*destination);
            }
            Some(Interaction::Link { url }) => {
                log::info!("open link: {url}");
            }
            None => {}
        }
    }

    /// Gather this frame's joint and landmark instances from the ECS world.
    fn collect_instances(&mut self) -> Vec<InstanceData> {
        let mut instances = Vec::new();

        let mut creatures = self.sim.world.query::<(&Transform, &Creature, &Rig)>();
        for (transform, creature, rig) in creatures.iter(&self.sim.world) {
            let root = Mat4::from_translation(transform.position)
                * Mat4::from_rotation_y(creature.yaw)
                * Mat4::from_scale(Vec3::splat(creature.scale));
            let frames = rig.world_frames(root);
            let color = creature.species.color();
            for (frame, joint) in frames.iter().zip(&rig.joints) {
                instances.push(InstanceData::new(Rig::render_matrix(frame, joint), color));
            }
        }

        let mut landmarks = self.sim.world.query::<(&Transform, &Landmark)>();
        for (transform, landmark) in landmarks.iter(&self.sim.world) {
            let model = Mat4::from_translation(transform.position)
                * Mat4::from_scale(landmark.half_extent * 2.0);
            instances.push(InstanceData::new(model, landmark.color));
        }

        instances.truncate(self.max_instances);
        instances
    }

    /// Project a world point to egui screen points. None when behind the eye.
    fn project_to_screen(&self, view_proj: &Mat4, point: Vec3, ppp: f32) -> Option<egui::Pos2> {
        let clip = *view_proj * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x * 0.5 + 0.5) * self.size.width as f32 / ppp;
        let y = (0.5 - ndc.y * 0.5) * self.size.height as f32 / ppp;
        Some(egui::pos2(x, y))
    }

    fn collect_creature_draws(&mut self, view_proj: &Mat4, ppp: f32) -> Vec<CreatureDebugDraw> {
        let mut snapshot = Vec::new();
        let mut query = self.sim.world.query::<(&Transform, &Creature)>();
        for (transform, creature) in query.iter(&self.sim.world) {
            snapshot.push((transform.position, creature.radius, creature.state));
        }

        let mut draws = Vec::new();
        for (position, radius, state) in snapshot {
            let Some(pos) = self.project_to_screen(view_proj, position, ppp) else {
                continue;
            };
            // Project a point one radius to the side to size the circle.
            let edge = position + Vec3::new(radius, 0.0, 0.0);
            let radius_px = self
                .project_to_screen(view_proj, edge, ppp)
                .map_or(2.0, |e| (e - pos).length().max(2.0));
            let target = match state {
                MoveState::Walking { target } => {
                    let y = self.sim.terrain.height_at(target.x, target.y);
                    let t = Vec3::new(target.x, y, target.y);
                    self.project_to_screen(view_proj, t, ppp)
                }
                MoveState::Idle { .. } => None,
            };
            draws.push(CreatureDebugDraw {
                pos,
                target,
                radius_px,
            });
        }
        draws
    }

    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // All buffer writes happen before the render pass is recorded.
        let instances = self.collect_instances();
        self.instance_count = instances.len();
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let aspect = self.size.width as f32 / self.size.height.max(1) as f32;
        let view_proj = self.camera.view_projection(aspect);
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
            ..Uniforms::new()
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.35,
                            g: 0.55,
                            b: 0.75,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            // Draw 1: terrain sheet, single instance.
            render_pass.set_vertex_buffer(0, self.terrain_mesh.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.terrain_instance_buffer.slice(..));
            render_pass.set_index_buffer(
                self.terrain_mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..self.terrain_mesh.num_indices, 0, 0..1);

            // Draw 2: every creature joint and landmark in one call.
            if self.instance_count > 0 {
                render_pass.set_vertex_buffer(0, self.pebble.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.set_index_buffer(
                    self.pebble.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(
                    0..self.pebble.num_indices,
                    0,
                    0..self.instance_count as u32,
                );
            }
        }

        // Debug overlay on top of the resolved frame.
        let ppp = window.scale_factor() as f32;
        let stats = if self.show_stats {
            let (creatures, walking, idle) = self.sim.creature_stats();
            Some(DebugStats {
                fps: self.fps,
                frame_time_avg_ms: self.frame_time_avg,
                frame_time_min_ms: if self.frame_time_min == f32::MAX {
                    0.0
                } else {
                    self.frame_time_min
                },
                frame_time_max_ms: self.frame_time_max,
                creatures,
                walking,
                idle,
                instances: self.instance_count,
                resolution: (self.size.width, self.size.height),
                camera_target: (self.camera.target().x, self.camera.target().y),
                camera_distance: self.camera.distance(),
            })
        } else {
            None
        };
        let creature_draws = if self.show_creature_debug {
            Some(self.collect_creature_draws(&view_proj, ppp))
        } else {
            None
        };

        if stats.is_some() || creature_draws.is_some() {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.size.width, self.size.height],
                pixels_per_point: ppp,
            };
            self.overlay.render(
                &self.device,
                &self.queue,
                &mut encoder,
                window,
                &view,
                &screen_descriptor,
                stats.as_ref(),
                creature_draws.as_deref(),
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn tally_frame(&mut self) {
        self.frame_count += 1;
        let now = std::time::Instant::now();
        if (now - self.last_fps_update).as_secs_f32() >= 1.0 {
            self.fps = self.frame_count;
            self.frame_time_avg = self.frame_time_sum / self.frame_count.max(1) as f32;
            self.frame_count = 0;
            self.frame_time_min = f32::MAX;
            self.frame_time_max = 0.0;
            self.frame_time_sum = 0.0;
            self.last_fps_update = now;
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();

    let window_attributes = Window::default_attributes()
        .with_title("Isle Fauna")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

    let window = std::sync::Arc::new(event_loop.create_window(window_attributes).unwrap());

    let mut state = pollster::block_on(State::new(window.clone()));

    event_loop
        .run(move |event, control_flow| match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let egui_response = state.overlay.handle_window_event(&window, event);
                if !egui_response.consumed {
                    state.input.process_event(event);
                }

                match event {
                    WindowEvent::CloseRequested => control_flow.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(code),
                                repeat: false,
                                ..
                            },
                        ..
                    } => match code {
                        KeyCode::Escape => control_flow.exit(),
                        KeyCode::F3 => state.show_stats = !state.show_stats,
                        KeyCode::F4 => state.show_creature_debug = !state.show_creature_debug,
                        _ => {}
                    },
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        state.update();
                        match state.render(&window) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => control_flow.exit(),
                            Err(e) => log::error!("surface error: {e:?}"),
                        }
                        state.input.end_frame();
                        state.tally_frame();
                    }
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        })
        .unwrap();
}
