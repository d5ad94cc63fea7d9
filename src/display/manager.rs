/*
 *  display/manager.rs
 *
 *  glcd64 - 64x64 graphic LCD demo
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display manager - owns the framebuffer and drives the render cycle
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

use std::time::Instant;

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::display::bus::ParallelBus;
use crate::display::error::DisplayError;
use crate::display::framebuffer::Framebuffer;
use crate::display::protocol::{Half, Ks0108, POST_INIT_MS};
use crate::display::raster::{fill_circle, Circle};
use crate::display::render::render;

/// Log a timing summary every this many frames
const METRICS_LOG_INTERVAL: u64 = 100;

/// Performance metrics for display rendering
#[derive(Debug, Clone, Default)]
pub struct PerformanceMetrics {
    /// Time spent rasterizing into the framebuffer
    pub render_time_us: u64,

    /// Time spent pushing the framebuffer over the bus
    pub transfer_time_us: u64,

    /// Total frame time (render + transfer)
    pub frame_time_us: u64,

    /// Frames completed
    pub frame_count: u64,

    /// Moving average of frame time
    pub avg_frame_time_us: u64,
}

impl PerformanceMetrics {
    pub fn record_frame(&mut self, render_time_us: u64, transfer_time_us: u64) {
        self.render_time_us = render_time_us;
        self.transfer_time_us = transfer_time_us;
        self.frame_time_us = render_time_us + transfer_time_us;
        self.frame_count += 1;

        // Simple moving average (last frame + current) / 2
        if self.avg_frame_time_us == 0 {
            self.avg_frame_time_us = self.frame_time_us;
        } else {
            self.avg_frame_time_us = (self.avg_frame_time_us + self.frame_time_us) / 2;
        }
    }

    pub fn fps(&self) -> f32 {
        if self.avg_frame_time_us == 0 {
            0.0
        } else {
            1_000_000.0 / self.avg_frame_time_us as f32
        }
    }
}

/// Display manager
///
/// Owns the framebuffer and the protocol driver and runs the demo cycle:
/// clear, fill the circle, flush.
pub struct DisplayManager<B, D> {
    glcd: Ks0108<B, D>,
    framebuffer: Framebuffer,
    circle: Circle,
    half: Half,
    metrics: PerformanceMetrics,
}

impl<B: ParallelBus, D: DelayNs> DisplayManager<B, D> {
    pub fn new(glcd: Ks0108<B, D>, circle: Circle, half: Half) -> Self {
        Self {
            glcd,
            framebuffer: Framebuffer::new(),
            circle,
            half,
            metrics: PerformanceMetrics::default(),
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn glcd(&self) -> &Ks0108<B, D> {
        &self.glcd
    }

    pub fn performance_metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    /// Power the panel up and route writes to the configured half
    pub fn start(&mut self) -> Result<(), DisplayError> {
        self.glcd.initialize()?;
        self.glcd.delay_ms(POST_INIT_MS);
        self.glcd.select_screen(self.half)?;
        self.framebuffer.clear();
        info!("Panel ready, drawing on {:?} half", self.half);
        Ok(())
    }

    /// One render cycle: clear, rasterize, flush
    pub fn cycle(&mut self) -> Result<(), DisplayError> {
        let frame_start = Instant::now();

        self.framebuffer.clear();
        let Circle { x, y, radius } = self.circle;
        fill_circle(&mut self.framebuffer, x, y, radius)?;
        let render_time = frame_start.elapsed().as_micros() as u64;

        let transfer_start = Instant::now();
        render(&self.framebuffer, &mut self.glcd)?;
        let transfer_time = transfer_start.elapsed().as_micros() as u64;

        self.metrics.record_frame(render_time, transfer_time);
        if self.metrics.frame_count % METRICS_LOG_INTERVAL == 0 {
            debug!(
                "frame {}: render {}us, transfer {}us, {:.1} fps",
                self.metrics.frame_count, render_time, transfer_time, self.metrics.fps()
            );
        }
        Ok(())
    }

    /// Run cycles back to back; `None` runs until an error
    ///
    /// Returns the number of frames drawn.
    pub fn run(&mut self, frames: Option<u64>) -> Result<u64, DisplayError> {
        match frames {
            Some(n) => info!("Rendering {} frame(s)", n),
            None => info!("Rendering until stopped"),
        }
        let mut drawn = 0u64;
        while frames.is_none_or(|n| drawn < n) {
            self.cycle()?;
            drawn += 1;
        }
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::delay::NoopDelay;
    use crate::display::drivers::mock::{LatchKind, RecordingBus};
    use crate::display::protocol::DISPLAY_ON_SEQUENCE;
    use crate::display::render::WRITES_PER_FRAME;

    fn manager(circle: Circle) -> (DisplayManager<RecordingBus, NoopDelay>, RecordingBus) {
        let bus = RecordingBus::new();
        let glcd = Ks0108::new(bus.clone(), NoopDelay);
        (DisplayManager::new(glcd, circle, Half::Left), bus)
    }

    #[test]
    fn test_start_sequence() {
        let (mut mgr, bus) = manager(Circle::default());
        mgr.start().unwrap();

        // power-up sequence twice: once in reset, once for the selected half
        let commands = bus.values(LatchKind::Command);
        assert_eq!(commands.len(), DISPLAY_ON_SEQUENCE.len() * 2);
        assert!(mgr.glcd().lines().cs1);
        assert!(mgr.glcd().lines().rst);
    }

    #[test]
    fn test_run_counts_frames() {
        let (mut mgr, bus) = manager(Circle::default());
        mgr.start().unwrap();
        bus.reset_state();

        assert_eq!(mgr.run(Some(3)).unwrap(), 3);
        assert_eq!(bus.values(LatchKind::Data).len(), WRITES_PER_FRAME * 3);
        assert_eq!(mgr.performance_metrics().frame_count, 3);
        assert_eq!(mgr.run(Some(0)).unwrap(), 0);
    }

    #[test]
    fn test_cycle_clears_previous_frame() {
        let (mut mgr, _bus) = manager(Circle { x: 10, y: 10, radius: 1 });
        mgr.framebuffer_mut().set_pixel(50, 50).unwrap();
        mgr.cycle().unwrap();
        assert_eq!(mgr.framebuffer().count_on_pixels(), 1);
        assert!(mgr.framebuffer().is_set(10, 10).unwrap());
    }

    #[test]
    fn test_cycle_rejects_oversized_circle() {
        let (mut mgr, bus) = manager(Circle { x: 60, y: 60, radius: 20 });
        assert!(mgr.cycle().is_err());
        assert!(bus.latched().is_empty());
    }

    #[test]
    fn test_metrics_average() {
        let mut metrics = PerformanceMetrics::default();
        metrics.record_frame(100, 900);
        assert_eq!(metrics.avg_frame_time_us, 1000);
        metrics.record_frame(0, 500);
        assert_eq!(metrics.avg_frame_time_us, 750);
        assert!(metrics.fps() > 1300.0);
    }
}
