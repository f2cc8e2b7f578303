//! Entry point for the core spiral viewer.

use anyhow::Result;
use clap::Parser;
use spiral_viewer::{app::App, config::Args};
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

/// What the loop does after a failed frame.
#[derive(Debug, PartialEq, Eq)]
enum Recovery {
    Reconfigure,
    Exit,
    SkipFrame,
}

fn recovery_for(err: &wgpu::SurfaceError) -> Recovery {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Recovery::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => Recovery::Exit,
        wgpu::SurfaceError::Timeout => Recovery::SkipFrame,
        #[allow(unreachable_patterns)]
        _ => Recovery::SkipFrame,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::debug!("{args:?}");

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Core Spiral Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    // Loads assets and builds the mesh before the first frame.
    let mut app = pollster::block_on(App::new(window.clone(), &args))?;

    event_loop.run(move |event, elwt| {
        // Poll keeps the reset and layout easing moving without input.
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                if app.handle_event(&window, &event) {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::KeyboardInput { event, .. }
                        if event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
                    {
                        elwt.exit()
                    }
                    WindowEvent::RedrawRequested => {
                        let Err(err) = app.render(&window) else {
                            return;
                        };
                        match recovery_for(&err) {
                            Recovery::Reconfigure => {
                                log::warn!("Surface {err:?}, reconfiguring");
                                app.on_resize(app.renderer.gfx.size);
                            }
                            Recovery::Exit => {
                                log::error!("Surface {err:?}, exiting");
                                elwt.exit();
                            }
                            Recovery::SkipFrame => log::debug!("Surface {err:?}, frame skipped"),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        }
    })?;

    Ok(())
}
