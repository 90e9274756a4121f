use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use log::info;
use particle_backdrop::script::InteractionScript;
use particle_backdrop::{
    Backdrop, BackdropConfig, ContainerBox, Framebuffer, HeadlessHost, Host, HostEvent, Theme,
};

/// Run the particle backdrop headlessly against a scripted user.
#[derive(Debug, Parser)]
#[command(name = "particle-backdrop", version)]
struct Args {
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
    #[arg(long, default_value_t = 9.0)]
    seconds: f32,
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    #[arg(long, value_enum, default_value_t = Theme::Light)]
    theme: Theme,
    #[arg(long)]
    seed: Option<u64>,
    /// JSON tuning file; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the last rendered frame as a PNG.
    #[arg(long)]
    dump: Option<PathBuf>,
    /// Let the particles drift with no pointer, scroll or resize input.
    #[arg(long)]
    no_script: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BackdropConfig::from_json_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BackdropConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let fps = args.fps.max(1.0);
    let frame_dt = 1.0 / fps;
    let total_frames = (args.seconds.max(0.0) * fps).ceil() as u64;
    let initial = Vec2::new(args.width, args.height);

    let mut host = HeadlessHost::new(ContainerBox::sized(initial.x, initial.y));
    let mut backdrop = Backdrop::mount(&mut host, Framebuffer::new(0, 0), args.theme, config)
        .context("mounting backdrop")?;
    info!(
        "particle backdrop smoke run: {:.1}s @ {:.0}fps, {}x{} {:?}, {} particles",
        args.seconds,
        fps,
        initial.x,
        initial.y,
        args.theme,
        backdrop.field().len()
    );

    let script = InteractionScript::showcase();
    let mut current_phase = None;
    let mut pointer_inside = false;
    let mut scroll_budget = 0.0f32;

    for n in 0..total_frames {
        if !args.no_script {
            if let Some(sample) = script.sample(n as f32 * frame_dt) {
                let key = (sample.cycle, sample.index);
                if current_phase != Some(key) {
                    current_phase = Some(key);
                    info!("[{}] cycle={}", sample.phase.label, sample.cycle);
                    let target = sample.phase.resize_to.unwrap_or(initial);
                    let container = host.container_box();
                    if Vec2::new(container.width, container.height) != target {
                        host.set_container(ContainerBox::sized(target.x, target.y));
                        backdrop.handle_event(&mut host, HostEvent::Resize);
                        info!(
                            "  resized to {}x{} -> {} particles ({:?})",
                            target.x,
                            target.y,
                            backdrop.field().len(),
                            backdrop.field().class()
                        );
                    }
                }

                let container = host.container_box();
                let size = Vec2::new(container.width, container.height);
                match sample.phase.pointer.position(sample.progress, size) {
                    Some(local) => {
                        let client = local + Vec2::new(container.left, container.top);
                        backdrop.handle_event(&mut host, HostEvent::PointerMove(client));
                        pointer_inside = true;
                    }
                    None if pointer_inside => {
                        backdrop.handle_event(&mut host, HostEvent::PointerLeave);
                        pointer_inside = false;
                    }
                    None => {}
                }

                scroll_budget += sample.phase.scrolls_per_second * frame_dt;
                while scroll_budget >= 1.0 {
                    backdrop.handle_event(&mut host, HostEvent::Scroll);
                    scroll_budget -= 1.0;
                }
            }
        }

        let Some(frame) = host.next_frame() else {
            break;
        };
        backdrop.on_frame(&mut host, frame);

        if n % (fps as u64).max(1) == 0 {
            info!(
                "  t={:.2}s particles={} links={} boost={:.2}",
                n as f32 * frame_dt,
                backdrop.field().len(),
                backdrop.field().links().count(),
                backdrop.driver().boost()
            );
        }
    }

    let frames = backdrop.driver().frames_rendered();
    let canvas = backdrop.unmount(&mut host);
    info!("done: {} frames rendered", frames);

    if let Some(path) = &args.dump {
        canvas
            .save_png(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote last frame to {}", path.display());
    }

    Ok(())
}
