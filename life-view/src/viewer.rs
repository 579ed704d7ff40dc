//! Interactive particle-life viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (particle store, spatial grid, rule table, configuration) and
//! implements [`eframe::App`] to render the particles and expose every
//! tunable parameter through an egui control panel.

use eframe::App;
use life_core::{
    config::{Bounds, ConfigError, MAX_PARTICLE_COUNT, SimConfig},
    grid::SpatialGrid,
    phases,
    rules::TypeRuleTable,
    store::ParticleStore,
};

/// One parameter preset: the four force-related tunables.
#[derive(Clone, Copy, Debug)]
struct Preset {
    damping: f32,
    attraction: f32,
    repel: f32,
    central_gravity: f32,
}

/// The stock presets, cycled automatically when rotation is enabled.
const PRESETS: [Preset; 8] = [
    Preset { damping: 0.001, attraction: 0.3, repel: 0.1, central_gravity: 0.5 },
    Preset { damping: 0.001, attraction: 3.0, repel: 0.0, central_gravity: -1.0 },
    Preset { damping: 0.05, attraction: 3.0, repel: 0.05, central_gravity: 0.0 },
    Preset { damping: 0.05, attraction: 3.0, repel: 0.2, central_gravity: 4.0 },
    Preset { damping: 0.1, attraction: 3.0, repel: 0.2, central_gravity: 8.0 },
    Preset { damping: 0.3, attraction: 0.1, repel: 0.2, central_gravity: 12.0 },
    Preset { damping: 0.05, attraction: 0.3, repel: 0.1, central_gravity: 16.0 },
    Preset { damping: 0.05, attraction: 3.0, repel: 0.08, central_gravity: 20.0 },
];

/// Seconds between automatic preset rotations.
const PRESET_ROTATION_INTERVAL: f64 = 2.45;

/// Background color of the simulation area.
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(20, 15, 11);

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`ParticleStore`], [`SpatialGrid`],
///   [`TypeRuleTable`], [`SimConfig`].
/// - UI configuration (run state, preset rotation, shading offset).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / slider edits.
/// 2. Derive the simulation [`Bounds`] from the central panel size.
/// 3. If `running`, advance one frame via [`phases::step`].
/// 4. Draw every active particle as a glowing point.
pub struct Viewer {
    store: ParticleStore,
    grid: SpatialGrid,
    rules: TypeRuleTable,
    cfg: SimConfig,
    bounds: Bounds,

    rng: rand::rngs::ThreadRng,

    running: bool,
    rotate_presets: bool,
    preset_index: usize,
    last_rotation_time: f64,

    /// Added to the speed-derived lightness when shading particles.
    lightness_offset: f32,

    last_frame_time: f64,
    last_frame_dt: f64,
}

impl Viewer {
    /// Creates a new viewer with the default ruleset and a fully-spawned
    /// particle store.
    ///
    /// Every slot up to [`MAX_PARTICLE_COUNT`] is spawned up front with a
    /// random position and type, so raising the particle-count slider
    /// later only re-activates existing particles. The initial bounds are
    /// provisional; they are replaced by the real panel size on the first
    /// frame.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`], or a [`ConfigError`] if the default
    /// configuration fails validation.
    pub fn new() -> Result<Self, ConfigError> {
        let mut rng = rand::rng();
        let rules = TypeRuleTable::default();
        let cfg = SimConfig::default();
        cfg.validate()?;

        let bounds = Bounds::new(1280.0, 720.0);
        let store = ParticleStore::random_in_bounds(
            MAX_PARTICLE_COUNT,
            cfg.particle_count,
            rules.type_count(),
            &bounds,
            &mut rng,
        )?;

        log::info!(
            "spawned {} particles ({} active) across {} types",
            store.capacity(),
            store.active_count(),
            rules.type_count()
        );

        Ok(Self {
            store,
            grid: SpatialGrid::new(),
            rules,
            cfg,
            bounds,
            rng,
            running: true,
            rotate_presets: false,
            preset_index: 0,
            last_rotation_time: 0.0,
            lightness_offset: 10.0,
            last_frame_time: 0.0,
            last_frame_dt: 0.0,
        })
    }

    /// Re-scatters all particles over the current bounds.
    ///
    /// Keeps the configuration and ruleset; only positions, velocities,
    /// and types are regenerated.
    fn reset(&mut self) {
        match ParticleStore::random_in_bounds(
            MAX_PARTICLE_COUNT,
            self.cfg.particle_count,
            self.rules.type_count(),
            &self.bounds,
            &mut self.rng,
        ) {
            Ok(store) => {
                self.store = store;
                self.grid = SpatialGrid::new();
                log::info!("simulation reset");
            }
            Err(e) => log::error!("reset failed: {e}"),
        }
    }

    /// Copies one preset's values into the live configuration.
    fn apply_preset(&mut self, index: usize) {
        let preset = PRESETS[index % PRESETS.len()];
        self.preset_index = index % PRESETS.len();
        self.cfg.damping = preset.damping;
        self.cfg.attraction = preset.attraction;
        self.cfg.repel = preset.repel;
        self.cfg.central_gravity = preset.central_gravity;
        log::info!("applied preset {}", self.preset_index);
    }

    /// Advances the simulation by one frame.
    fn step_sim(&mut self) {
        phases::step(
            &mut self.store,
            &mut self.grid,
            &self.rules,
            &self.cfg,
            &self.bounds,
        );
    }

    /// Pushes the particle-count slider value into the store.
    fn sync_active_count(&mut self) {
        if self.cfg.particle_count != self.store.active_count()
            && let Err(e) = self.store.set_active_count(self.cfg.particle_count)
        {
            log::warn!("particle count not applied: {e}");
            self.cfg.particle_count = self.store.active_count();
        }
    }

    /// Helper to draw a labeled `f32` [`egui::Slider`].
    fn labeled_slider_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::Slider::new(value, range));
        });
    }

    /// Builds the top panel UI (run controls, presets).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_sim();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();

                ui.checkbox(&mut self.rotate_presets, "Rotate presets");
                for i in 0..PRESETS.len() {
                    if ui
                        .selectable_label(self.preset_index == i, format!("{i}"))
                        .clicked()
                    {
                        self.apply_preset(i);
                    }
                }
            });
        });
    }

    /// Builds the bottom status bar (particle count, grid size, frame dt).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt = {:.1} ms", self.last_frame_dt * 1000.0));
                ui.separator();
                ui.label(format!(
                    "grid = {}x{}",
                    self.grid.cols(),
                    self.grid.rows()
                ));
                ui.label(format!("particles = {}", self.store.active_count()));
            });
        });
    }

    /// Builds the right-hand configuration panel for simulation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Forces");
                Self::labeled_slider_f32(ui, "damping:", &mut self.cfg.damping, 0.0..=3.0);
                Self::labeled_slider_f32(ui, "attraction:", &mut self.cfg.attraction, 0.0..=10.0);
                Self::labeled_slider_f32(ui, "repel:", &mut self.cfg.repel, 0.0..=10.0);
                Self::labeled_slider_f32(
                    ui,
                    "central gravity:",
                    &mut self.cfg.central_gravity,
                    -100.0..=100.0,
                );
                Self::labeled_slider_f32(
                    ui,
                    "gravity min d²:",
                    &mut self.cfg.gravity_min_dist_sq,
                    0.0..=100_000.0,
                );

                ui.separator();
                ui.label("Particles");
                ui.horizontal(|ui| {
                    ui.label("count:");
                    ui.add(egui::Slider::new(
                        &mut self.cfg.particle_count,
                        1..=MAX_PARTICLE_COUNT,
                    ));
                });
                Self::labeled_slider_f32(
                    ui,
                    "radius:",
                    &mut self.cfg.particle_radius,
                    0.5..=30.0,
                );

                ui.separator();
                ui.label("Spatial grid");
                Self::labeled_slider_f32(ui, "cell size:", &mut self.cfg.cell_size, 30.0..=200.0);

                ui.separator();
                ui.label("Appearance");
                Self::labeled_slider_f32(
                    ui,
                    "lightness offset:",
                    &mut self.lightness_offset,
                    -100.0..=100.0,
                );
            });
    }

    /// Builds the central panel: derives the simulation bounds from the
    /// panel size, advances the simulation when running, and draws every
    /// active particle as a glowing point.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(BACKGROUND))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Window-resize handling: the simulation area tracks the
                // drawable rect; the integrator folds strays back inside.
                self.bounds = Bounds::new(rect.width().max(1.0), rect.height().max(1.0));

                if self.running {
                    let now = ctx.input(|i| i.time);
                    if self.last_frame_time > 0.0 {
                        self.last_frame_dt = now - self.last_frame_time;
                    }
                    self.last_frame_time = now;

                    if self.rotate_presets && now - self.last_rotation_time >= PRESET_ROTATION_INTERVAL
                    {
                        let next = (self.preset_index + 1) % PRESETS.len();
                        self.apply_preset(next);
                        self.last_rotation_time = now;
                    }

                    self.step_sim();
                    ctx.request_repaint();
                }

                // Draw particles: a faint wide halo plus a bright core,
                // shaded by type hue and current speed.
                let radius = self.cfg.particle_radius;
                for i in 0..self.store.active_count() {
                    let speed_bucket = self.store.speed_sq(i).min(99.0);
                    let lightness = (speed_bucket.sqrt() * 7.0 + 10.0 + self.lightness_offset)
                        .clamp(0.0, 100.0);
                    let color = hsl_color(self.rules.hue(self.store.types[i]), 100.0, lightness);

                    let pos = egui::pos2(
                        rect.min.x + self.store.px[i],
                        rect.min.y + self.store.py[i],
                    );

                    let halo = egui::Color32::from_rgba_unmultiplied(
                        color.r(),
                        color.g(),
                        color.b(),
                        40,
                    );
                    painter.circle_filled(pos, radius * 2.0, halo);
                    painter.circle_filled(pos, radius, color);
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.sync_active_count();
        self.ui_central_panel(ctx);
    }
}

/// Converts an HSL color (`h` in degrees, `s` and `l` in percent) to an
/// opaque [`egui::Color32`].
fn hsl_color(h: f32, s: f32, l: f32) -> egui::Color32 {
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c * 0.5;
    egui::Color32::from_rgb(
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}
