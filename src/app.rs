/// The `egui` re-export for building native GUIs with the eframe framework.
use eframe::egui::{self, Color32};
/// The `egui_plot` crate for plotting data in an egui-based app.
use egui_plot::{Legend, Line, Plot, PlotPoints};

use std::time::Instant;

use crate::clock::FixedRateTicker;
use crate::field::Bounds;
use crate::params::SimulationParams;
use crate::render::{BOUNDARY_COLOR, PainterSink};
use crate::simulation::Simulation;

/// Width of the grab area around the boundary line, in points.
const HANDLE_WIDTH: f32 = 24.0;

// ===================================================================================
// Main Application
// ===================================================================================

/// The application state:
/// - A configuration UI (sliders) used to set up parameters
/// - The single fixed-rate ticker driving the simulation
/// - The simulation itself, built lazily once the canvas size is known
///
/// Drag and resize events are applied to the simulation between ticks, on the
/// same thread, inside `update`.
pub struct SamplingApp {
    // -------------- Config / UI --------------
    params: SimulationParams, // user-chosen parameters
    needs_reset: bool,        // user requested a rebuild with new params

    // -------------- Scheduling --------------
    ticker: FixedRateTicker,

    // -------------- Simulation Data --------------
    sim: Option<Simulation>,
    /// Handle position while a drag is in progress, in canvas coordinates.
    dragging: Option<f32>,
    /// Why the last restart was refused, shown in the side panel.
    last_error: Option<String>,
}

impl SamplingApp {
    /// The ticker is created here once and lives as long as the app.
    pub fn new(params: SimulationParams, ticker: FixedRateTicker) -> Self {
        Self {
            params,
            needs_reset: true, // so it initialises once
            ticker,
            sim: None,
            dragging: None,
            last_error: None,
        }
    }

    /// Builds (or rebuilds) the simulation for the given canvas.
    fn reset_simulation(&mut self, bounds: Bounds) {
        match Simulation::new(&self.params, bounds) {
            Ok(sim) => {
                self.sim = Some(sim);
                self.last_error = None;
            }
            Err(e) => {
                // Keep whatever was running before.
                log::error!("cannot start simulation: {e}");
                self.last_error = Some(format!("Cannot start simulation: {e}"));
            }
        }
        self.needs_reset = false;
    }

    fn config_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Simulation Controls");

        ui.add(egui::Slider::new(&mut self.params.num_particles, 1..=500).text("Particles"));
        ui.add(egui::Slider::new(&mut self.params.radius_mean, 1.0..=60.0).text("Radius Mean"));
        ui.add(egui::Slider::new(&mut self.params.radius_variance, 0.0..=30.0).text("Radius Variance"));
        ui.add(egui::Slider::new(&mut self.params.base_velocity, 50.0..=5_000.0).text("Base Velocity"));
        ui.add(egui::Slider::new(&mut self.params.spawn_variance, 0.0..=300.0).text("Spawn Variance"));
        ui.add(egui::Slider::new(&mut self.params.max_sample, 0..=200).text("Sample Cap"));

        ui.separator();

        if ui.button("Apply & Restart").clicked() {
            self.needs_reset = true;
        }

        if let Some(err) = &self.last_error {
            ui.colored_label(ui.visuals().error_fg_color, err.as_str());
        }

        let label = if self.ticker.is_paused() { "Resume" } else { "Pause" };
        if ui.button(label).clicked() {
            self.ticker.toggle_pause();
        }

        if let Some(sim) = &self.sim {
            ui.separator();
            let stats = sim.statistics();
            ui.label(format!("Ticks: {}", sim.ticks()));
            ui.label(format!("Sampled: {} (cap {})", stats.sampled_count, sim.tracker().max_sample()));
            if let Some(bias) = stats.bias() {
                ui.label(format!("Bias: {bias:+.2}"));
            }
        }
    }

    fn history_panel(&self, ui: &mut egui::Ui) {
        ui.label("Average radius over time");
        let plot = Plot::new("radius_history")
            .width(260.0)
            .height(300.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_drag(true);

        plot.show(ui, |plot_ui| {
            if let Some(sim) = &self.sim {
                let history = sim.history();
                if !history.is_empty() {
                    plot_ui.line(Line::new(PlotPoints::from(history.true_points())).name("True"));
                    plot_ui.line(
                        Line::new(PlotPoints::from(history.sampled_points()))
                            .name("Sampled")
                            .color(BOUNDARY_COLOR),
                    );
                }
            }
        });
    }

    /// Paints the canvas and routes the boundary handle's drag to the simulation.
    fn canvas(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        // Resize notifier: the canvas is whatever the central panel got this frame.
        match Bounds::new(rect.width(), rect.height()) {
            Ok(bounds) => sim.resize(bounds),
            Err(e) => log::trace!("skipping resize: {e}"),
        }

        let boundary = self.dragging.unwrap_or_else(|| sim.tracker().boundary_x());
        let handle_rect = egui::Rect::from_center_size(
            egui::pos2(rect.min.x + boundary, rect.center().y),
            egui::vec2(HANDLE_WIDTH, rect.height()),
        );
        let response = ui
            .interact(handle_rect, ui.id().with("sampling_handle"), egui::Sense::drag())
            .on_hover_cursor(egui::CursorIcon::ResizeHorizontal);

        if response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let x = (pointer.x - rect.min.x).max(0.0).min(rect.width());
                self.dragging = Some(x);
                sim.set_boundary(x);
            }
        }
        if response.drag_stopped() {
            let x = self.dragging.take().unwrap_or(boundary);
            sim.finish_drag(x);
        }

        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().strong_text_color();
        sim.render(&mut PainterSink::new(&painter, rect, text_color));

        // Grip in the middle of the handle.
        let grip = egui::Rect::from_center_size(
            egui::pos2(rect.min.x + sim.tracker().boundary_x(), rect.center().y),
            egui::vec2(HANDLE_WIDTH / 2.0, 48.0),
        );
        painter.rect_filled(grip, 4.0, BOUNDARY_COLOR);
        painter.rect_stroke(grip, 4.0, egui::Stroke::new(1.0, Color32::WHITE));
    }
}

impl eframe::App for SamplingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --------------------------
        // Sidebar with configuration
        // --------------------------
        egui::SidePanel::left("config_panel").show(ctx, |ui| self.config_panel(ui));

        egui::SidePanel::right("right_panel")
            .resizable(true)
            .show(ctx, |ui| self.history_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            // The canvas size is only known here, so (re)initialise lazily.
            if self.needs_reset {
                let rect = ui.max_rect();
                match Bounds::new(rect.width(), rect.height()) {
                    Ok(bounds) => self.reset_simulation(bounds),
                    Err(e) => log::debug!("waiting for a usable canvas: {e}"),
                }
            }

            // ------------------------------------
            // Run whatever ticks are due, in order
            // ------------------------------------
            let now = Instant::now();
            let due = self.ticker.advance(now);
            if let Some(sim) = self.sim.as_mut() {
                for _ in 0..due {
                    sim.step();
                }
            }

            self.canvas(ui);
        });

        // Wake up again when the next tick is due.
        ctx.request_repaint_after(self.ticker.time_until_next(Instant::now()));
    }
}

impl Drop for SamplingApp {
    fn drop(&mut self) {
        // Teardown: nothing may tick into a dropped canvas.
        self.ticker.cancel();
        log::info!("sampling demo shut down after {} ticks", self.ticker.ticks());
    }
}
