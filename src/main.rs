// main.rs — window, event loop and control panel

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod camera;
mod config;
mod coords;
mod i18n;
mod mesh;
mod presenter;
mod renderer;
mod state;
mod sweep;

use camera::OrbitCamera;
use config::VisualizerConfig;
use presenter::Readout;
use renderer::Renderer;
use state::{Event as VizEvent, Inputs, Phase, VisualizationState};

use std::sync::Arc;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = VisualizerConfig::resolve(&args)?;
    i18n::init(&config.language);

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), config.axis_length))?;
    let mut camera = OrbitCamera::new();
    let mut viz = VisualizationState::new(config);

    let mut mouse_pressed = false;
    let mut last_mouse_pos: Option<PhysicalPosition<f64>> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.repaint {
                    window.request_redraw();
                }
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        renderer.update_camera(&camera);
                        window.request_redraw();
                    }

                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed
                            && input.virtual_keycode == Some(VirtualKeyCode::R)
                        {
                            camera.reset();
                            renderer.update_camera(&camera);
                            window.request_redraw();
                        }
                    }

                    WindowEvent::MouseInput { state, button, .. } => {
                        if button == MouseButton::Left {
                            mouse_pressed = state == ElementState::Pressed;
                            if !mouse_pressed {
                                last_mouse_pos = None;
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        if mouse_pressed {
                            if let Some(last_pos) = last_mouse_pos {
                                let dx = (position.x - last_pos.x) as f32;
                                let dy = (position.y - last_pos.y) as f32;
                                camera.drag(dx, dy);
                                renderer.update_camera(&camera);
                                window.request_redraw();
                            }
                            last_mouse_pos = Some(position);
                        }
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                        };
                        camera.zoom(scroll);
                        renderer.update_camera(&camera);
                        window.request_redraw();
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let mut pending = Vec::new();
                let inputs = viz.inputs();
                let phase = viz.phase();
                let generation = viz.generation();
                let ranges = viz.config().clone();
                let readout = renderer.readout().cloned();

                let render_result = renderer.render_with_ui(&window, |ctx| {
                    draw_ui(
                        ctx,
                        &ranges,
                        inputs,
                        phase,
                        generation,
                        readout.as_ref(),
                        &mut pending,
                    );
                });

                // UI events are applied after the frame so the renderer is free again.
                let changed = !pending.is_empty();
                for ev in pending {
                    viz.handle(ev, &mut renderer);
                }
                if changed {
                    window.request_redraw();
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                    Err(e) => log::error!(
                        "{}",
                        i18n::tr_with("render.error", &[("err", format!("{:?}", e))])
                    ),
                }
            }

            _ => {}
        }
    });
}

fn slider(
    ui: &mut egui::Ui,
    key: &str,
    value: f32,
    range: &config::SliderRange,
    suffix: &str,
) -> Option<f32> {
    let mut v = value;
    let response = ui.add(
        egui::Slider::new(&mut v, range.min..=range.max)
            .text(i18n::tr(key))
            .suffix(suffix)
            .fixed_decimals(2),
    );
    (response.changed() && v != value).then_some(v)
}

fn readout_group(ui: &mut egui::Ui, title_key: &str, lines: [&str; 3]) {
    ui.add_space(6.0);
    ui.strong(i18n::tr(title_key));
    for line in lines {
        ui.monospace(line);
    }
}

fn draw_ui(
    ctx: &egui::Context,
    config: &VisualizerConfig,
    inputs: Inputs,
    phase: Phase,
    generation: Option<u64>,
    readout: Option<&Readout>,
    pending: &mut Vec<VizEvent>,
) {
    egui::SidePanel::left("controls")
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading(i18n::tr("panel.controls"));
            ui.separator();

            if let Some(v) = slider(ui, "slider.radius", inputs.r, &config.radius, "") {
                pending.push(VizEvent::RadiusChanged(v));
            }
            if let Some(v) = slider(ui, "slider.theta", inputs.theta, &config.theta, "°") {
                pending.push(VizEvent::ThetaChanged(v));
            }
            if let Some(v) = slider(ui, "slider.phi", inputs.phi, &config.phi, "°") {
                pending.push(VizEvent::PhiChanged(v));
            }
            if let Some(v) = slider(
                ui,
                "slider.transparency",
                inputs.transparency,
                &config.transparency,
                "",
            ) {
                pending.push(VizEvent::TransparencyChanged(v));
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button(i18n::tr("button.start")).clicked() {
                    pending.push(VizEvent::Start);
                }
                if ui.button(i18n::tr("button.clear")).clicked() {
                    pending.push(VizEvent::Clear);
                }
            });

            if let Some(readout) = readout {
                ui.separator();
                readout_group(ui, "panel.spherical", readout.spherical());
                readout_group(ui, "panel.cartesian", readout.cartesian());
                readout_group(ui, "panel.cylindrical", readout.cylindrical());
            }
        });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            match (phase, generation) {
                (Phase::Active, Some(n)) => {
                    ui.label(
                        egui::RichText::new(i18n::tr_with("status.active", &[("n", n.to_string())]))
                            .color(egui::Color32::GREEN),
                    );
                }
                _ => {
                    ui.label(
                        egui::RichText::new(i18n::tr("status.idle")).color(egui::Color32::YELLOW),
                    );
                }
            }
            ui.label("|");
            ui.label(i18n::tr("status.hint"));
            ui.label("|");
            ui.label(i18n::current_lang());
        });
    });
}
