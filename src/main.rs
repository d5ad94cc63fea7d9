/*
 *  main.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Draws a filled circle on a KS0108 panel, forever or for N frames
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

use anyhow::Context;
use embedded_hal::delay::DelayNs;
use env_logger::Env;
use log::info;

use glcd64::config::{self, Backend, Config};
use glcd64::display::drivers::emulator::EmulatorBus;
use glcd64::display::{DisplayManager, Ks0108, NoopDelay, ParallelBus};
use glcd64::func_timer::FunctionTimer;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    match cfg.backend() {
        Backend::Emulator => {
            let bus = EmulatorBus::new();
            drive(bus.clone(), NoopDelay, &cfg)?;
            if let Some(path) = cfg.dump_pbm.as_ref() {
                bus.save_pbm(path)?;
            }
        }
        Backend::Gpio => run_gpio(&cfg)?,
    }

    info!("Done");
    Ok(())
}

#[cfg(feature = "gpio-cdev")]
fn run_gpio(cfg: &Config) -> anyhow::Result<()> {
    use glcd64::display::SpinDelay;
    use glcd64::display::drivers::gpio::open_cdev;

    let gpio = cfg.gpio.as_ref().context("gpio backend needs a gpio section")?;
    let bus = open_cdev(gpio)?;
    drive(bus, SpinDelay, cfg)
}

#[cfg(not(feature = "gpio-cdev"))]
fn run_gpio(_cfg: &Config) -> anyhow::Result<()> {
    anyhow::bail!("GPIO backend not enabled. Enable with --features gpio-cdev")
}

fn drive<B: ParallelBus, D: DelayNs>(bus: B, delay: D, cfg: &Config) -> anyhow::Result<()> {
    let mut manager = DisplayManager::new(Ks0108::new(bus, delay), cfg.circle(), cfg.half());

    {
        let _timer = FunctionTimer::new("panel start-up");
        manager.start().context("starting panel")?;
    }

    let drawn = manager.run(cfg.frames).context("render loop")?;
    let metrics = manager.performance_metrics();
    info!("Drew {} frame(s), avg {}us per frame", drawn, metrics.avg_frame_time_us);
    Ok(())
}
