//! Orrery - headless scene-graph demo.
//!
//! Builds a small space scene, flies the ship through a scripted input
//! sequence, and records every frame into a draw list.
//!
//! Usage: `orrery [config.json] [frames]`

mod demo;
mod script;
mod ship;

use anyhow::{Context, Result};
use orrery_core::{EngineConfig, FrameLimiter, Timer};
use orrery_platform::InputState;
use orrery_renderer::DrawList;
use orrery_resources::ResourceContext;
use orrery_scene::Scene;
use tracing::{debug, info};

use crate::script::InputScript;

const DEFAULT_FRAMES: u64 = 240;

/// Step used when the loop is unpaced, so runs stay deterministic.
const FIXED_STEP: f64 = 1.0 / 60.0;

/// Longest step a paced frame may take, e.g. after a stall.
const MAX_STEP: f64 = 0.1;

fn main() -> Result<()> {
    orrery_core::init_logging();
    info!("Starting Orrery");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => EngineConfig::default(),
    };
    let frames = match args.next() {
        Some(frames) => frames
            .parse()
            .with_context(|| format!("Invalid frame count '{frames}'"))?,
        None => DEFAULT_FRAMES,
    };

    run(&config, frames)
}

fn run(config: &EngineConfig, frames: u64) -> Result<()> {
    let mut resources = ResourceContext::new(&config.asset_root);
    let mut scene = Scene::new();
    let nodes = demo::build(&mut scene, &mut resources, config)?;

    let script = InputScript::flight();
    let mut input = InputState::new();
    let mut draw_list = DrawList::new();
    let mut limiter = FrameLimiter::new(config.frame_interval());
    let paced = config.frame_interval().is_some();
    let mut timer = Timer::new();

    info!("Running {} frames", frames);
    for frame in 0..frames {
        limiter.begin_frame();

        script.apply(frame, &mut input);
        scene.poll_input(&input);
        input.begin_frame();

        let delta_t = if paced {
            timer.delta_secs().min(MAX_STEP)
        } else {
            FIXED_STEP
        };
        scene.update(delta_t);
        scene
            .render(&mut draw_list)
            .with_context(|| format!("Failed to render frame {frame}"))?;

        if frame % 60 == 0 {
            let stats = draw_list.stats();
            let ship = scene.node(nodes.ship).map(|node| node.position());
            debug!(
                "Frame {}: {} draws, {} lights, ship at {:?}",
                frame, stats.draws, stats.lights, ship
            );
        }
        limiter.end_frame();
    }

    let elapsed = timer.elapsed_secs();
    let ship = scene.node(nodes.ship).context("Ship disappeared")?;
    let observer = scene.node(nodes.observer).context("Observer disappeared")?;
    info!(
        "Finished {} frames in {:.2}s ({} recorded)",
        frames,
        elapsed,
        draw_list.frames_recorded()
    );
    info!(
        "Ship ended at {:?} moving {:.2} u/s",
        ship.position(),
        ship.velocity().magnitude()
    );
    info!("Observer ended at {:?}", observer.position());
    for (shader, count) in draw_list.shader_batches() {
        info!("Shader '{}': {} draws per frame", shader, count);
    }

    resources.clean();
    Ok(())
}
