/*
 *  main.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Headless driver: synthetic tone -> analyser -> visualizer -> PNG
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::time::{Duration, Instant};

use anyhow::Context;
use env_logger::Env;
use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use clap::Parser;

use pulseviz::config::{self, Cli, Config};
use pulseviz::pacer::Pacer;
use pulseviz::tone::ToneSource;
use pulseviz::{PlaybackClock, SpectrumAnalyser, Visualizer};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Render until the frame budget is spent or ctrl-c arrives.
async fn render_loop(cfg: &Config) -> anyhow::Result<()> {
    let analyser = SpectrumAnalyser::new(cfg.fft_size())?;
    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut viz = Visualizer::new(cfg.width(), cfg.height(), analyser, rng)?;
    let params = cfg.render();
    debug!("render params: {params:?}");

    let mut tone = ToneSource::new(cfg.sample_rate_hz());
    let per_frame = (tone.sample_rate() / cfg.fps()).max(1) as usize;
    let clock = PlaybackClock::new(Duration::from_secs_f64(cfg.track_secs()));
    let mut pacer = Pacer::new(cfg.fps());
    let budget = cfg.frames();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(
        "rendering {}x{} at {} fps ({})",
        cfg.width(),
        cfg.height(),
        cfg.fps(),
        if budget == 0 { "until ctrl-c".to_string() } else { format!("{budget} frames") }
    );

    let started = Instant::now();
    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res.context("waiting for ctrl-c")?;
                info!("interrupted, stopping");
                break;
            }
            _ = tokio::time::sleep(pacer.until_deadline(Instant::now())) => {}
        }

        let now = Instant::now();
        if !pacer.should_render(now) {
            continue;
        }

        viz.source_mut().push_samples(&tone.next_block(per_frame));
        viz.draw(&params, clock.snapshot(now));

        if budget > 0 && viz.frame_count() >= budget {
            break;
        }
    }

    let secs = started.elapsed().as_secs_f64();
    info!(
        "rendered {} frames in {:.2}s ({:.1} fps)",
        viz.frame_count(),
        secs,
        viz.frame_count() as f64 / secs.max(f64::EPSILON)
    );

    if let Some(path) = cfg.output.as_ref() {
        viz.surface().save_png(path)?;
        info!("last frame written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // logger first, config loading warns about inputs it drops
    env_logger::Builder::from_env(Env::default().default_filter_or(config::startup_log_level(&cli)))
        .format_timestamp_secs()
        .init();

    let cfg = config::load(&cli)?;

    info!("{} - canvas audio visualizer", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    if let Err(e) = render_loop(&cfg).await {
        error!("visualizer failed: {e:#}");
        return Err(e);
    }
    Ok(())
}
