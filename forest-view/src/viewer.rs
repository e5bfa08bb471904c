//! Animated forest viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the latest published
//! [`LayoutFrame`] plus the camera state, and implements [`eframe::App`]
//! to draw the forest as labeled boxes connected by parent/child lines.
//!
//! Layout itself runs on a worker thread: on the first frame the viewer
//! re-measures every label with the real UI font, then moves the forest
//! into the worker, which publishes incremental frames over a channel
//! while the UI keeps draining and drawing the newest one.

use eframe::App;
use forest_core::{
    config::LayoutConfig,
    forest::Forest,
    layout,
    publish::{FrameSender, LayoutFrame, LayoutPublisher},
};
use glam::Vec2;
use std::sync::mpsc;

/// Height of a node's label box, in world units.
const BOX_H: f32 = 16.0;
/// The label baseline sits this far above the node's anchor row.
const LABEL_LIFT: f32 = 3.0;
/// Connector lines attach this far above the node's anchor row.
const EDGE_LIFT: f32 = 8.0;
/// Point size of the node labels at zoom 1.
const LABEL_SIZE: f32 = 12.0;

/// Main application state for the forest viewer.
///
/// The per-frame update is:
/// 1. If a freshly parsed forest is pending, measure its labels and hand
///    it to the layout worker.
/// 2. Drain the frame channel, keeping the newest snapshot.
/// 3. Draw the snapshot; drag pans the scroll offset, the wheel zooms
///    about the cursor.
pub struct Viewer {
    cfg: LayoutConfig,
    /// Original file text, kept so Restart can re-parse it.
    source: String,
    /// Parsed forest waiting for label measurement and the worker handoff.
    pending: Option<Forest>,

    frames: Option<mpsc::Receiver<LayoutFrame>>,
    frame: LayoutFrame,
    frames_seen: usize,
    worker_done: bool,

    /// Scroll offset applied uniformly at draw time, in screen pixels.
    offset: egui::Vec2,
    zoom: f32,
}

impl Viewer {
    /// Creates a viewer that will animate `forest` once the UI is up.
    pub fn new(source: String, forest: Forest, cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            source,
            pending: Some(forest),
            frames: None,
            frame: LayoutFrame::default(),
            frames_seen: 0,
            worker_done: false,
            offset: egui::vec2(0.0, 0.0),
            zoom: 1.0,
        }
    }

    /// Measures every label with the real UI font, then moves the forest
    /// to a worker thread that runs the layout and publishes frames.
    fn start_layout(&mut self, ctx: &egui::Context) {
        let Some(mut forest) = self.pending.take() else {
            return;
        };

        for node in &mut forest.nodes {
            let galley = ctx.fonts_mut(|fonts| {
                fonts.layout_no_wrap(
                    node.name.clone(),
                    egui::FontId::proportional(LABEL_SIZE),
                    egui::Color32::BLACK,
                )
            });
            node.display_width = galley.size().x.ceil() as i32 + self.cfg.label_pad;
        }

        let (tx, rx) = mpsc::channel();
        let mut publisher = LayoutPublisher::new(self.cfg.tick);
        publisher.subscribe(Box::new(FrameSender::new(tx)));

        let cfg = self.cfg;
        std::thread::spawn(move || {
            match layout::layout(&mut forest, &cfg, &mut publisher) {
                Ok(leaves) => log::info!("layout complete, {leaves} leaf rows"),
                Err(err) => log::error!("layout failed: {err}"),
            }
        });

        self.frames = Some(rx);
        self.worker_done = false;
    }

    /// Re-parses the source text and schedules a fresh animation.
    fn restart(&mut self) {
        match forest_core::parse::parse_forest(&self.source, &self.cfg) {
            Ok(forest) => {
                self.pending = Some(forest);
                self.frames = None;
                self.frame = LayoutFrame::default();
                self.frames_seen = 0;
                self.worker_done = false;
            }
            Err(err) => log::error!("restart failed: {err}"),
        }
    }

    /// Drains the frame channel, keeping only the newest snapshot.
    fn drain_frames(&mut self) {
        let Some(rx) = self.frames.take() else {
            return;
        };
        let mut open = true;
        loop {
            match rx.try_recv() {
                Ok(frame) => {
                    self.frame = frame;
                    self.frames_seen += 1;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    open = false;
                    self.worker_done = true;
                    break;
                }
            }
        }
        if open {
            self.frames = Some(rx);
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom` and shifted by the scroll
    /// offset; the origin is the panel's top-left corner, with y growing
    /// downwards as in the layout itself.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(
            rect.min.x + p.x * self.zoom + self.offset.x,
            rect.min.y + p.y * self.zoom + self.offset.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// Inverse of [`Viewer::world_to_screen`] up to floating point
    /// rounding, using the same `zoom`, `offset`, and `rect`.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(
            (p.x - rect.min.x - self.offset.x) / self.zoom,
            (p.y - rect.min.y - self.offset.y) / self.zoom,
        )
    }

    /// Builds the top panel UI (restart, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⟳ Restart").clicked() {
                    self.restart();
                }
                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.25..=4.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (node count, frame count, worker state).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(if self.worker_done {
                    "layout done"
                } else {
                    "laying out…"
                });
                ui.separator();
                ui.label(format!("frames = {}", self.frames_seen));
                ui.label(format!("nodes = {}", self.frame.sprites.len()));
            });
        });
    }

    /// Builds the central panel where the forest is drawn and panned.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Scroll with drag.
            if response.dragged() {
                self.offset += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.25, 4.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.offset += pointer_screen - screen_after;
            }

            painter.rect_filled(rect, egui::CornerRadius::ZERO, egui::Color32::WHITE);

            let stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);

            // Connectors first so the boxes cover their endpoints.
            for sprite in &self.frame.sprites {
                let child = sprite.pos.as_vec2() - Vec2::new(0.0, EDGE_LIFT);
                for anchor in &sprite.parent_anchors {
                    let parent =
                        anchor.pos.as_vec2() + Vec2::new(anchor.width as f32, -EDGE_LIFT);
                    painter.line_segment(
                        [
                            self.world_to_screen(child, rect),
                            self.world_to_screen(parent, rect),
                        ],
                        stroke,
                    );
                }
            }

            // Labeled boxes.
            for sprite in &self.frame.sprites {
                let anchor = sprite.pos.as_vec2();
                let top_left = self.world_to_screen(anchor - Vec2::new(0.0, BOX_H), rect);
                let size = egui::vec2(sprite.width as f32 * self.zoom, BOX_H * self.zoom);
                painter.rect_stroke(
                    egui::Rect::from_min_size(top_left, size),
                    egui::CornerRadius::ZERO,
                    stroke,
                    egui::StrokeKind::Middle,
                );
                painter.text(
                    self.world_to_screen(anchor - Vec2::new(0.0, LABEL_LIFT), rect),
                    egui::Align2::LEFT_BOTTOM,
                    &sprite.name,
                    egui::FontId::proportional(LABEL_SIZE * self.zoom),
                    egui::Color32::BLACK,
                );
            }

            // Keep repainting while the worker is still publishing.
            if self.frames.is_some() {
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.pending.is_some() {
            self.start_layout(ctx);
        }
        self.drain_frames();

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn test_viewer() -> Viewer {
        Viewer::new(String::new(), Forest::new(), LayoutConfig::default())
    }

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn frame_with_nodes(count: usize) -> LayoutFrame {
        let mut forest = Forest::new();
        for i in 0..count {
            forest.add_node(i as u32 + 1, format!("node{i}"), IVec2::new(10, 30), 20);
        }
        LayoutFrame::capture(&forest)
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = test_viewer();
        // Use non-trivial zoom and offset to exercise the math.
        viewer.zoom = 2.0;
        viewer.offset = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let world_points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, 30.0),
            Vec2::new(-3.5, 8.25),
        ];

        let eps = 1e-4;

        for p in world_points {
            let screen = viewer.world_to_screen(p, rect);
            let back = viewer.screen_to_world(screen, rect);

            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn drain_frames_keeps_only_the_newest_snapshot() {
        let mut viewer = test_viewer();
        let (tx, rx) = mpsc::channel();
        viewer.frames = Some(rx);

        tx.send(frame_with_nodes(1)).unwrap();
        tx.send(frame_with_nodes(2)).unwrap();
        tx.send(frame_with_nodes(3)).unwrap();

        viewer.drain_frames();

        assert_eq!(viewer.frame.sprites.len(), 3);
        assert_eq!(viewer.frames_seen, 3);
        assert!(!viewer.worker_done, "sender is still alive");
        assert!(viewer.frames.is_some());
    }

    #[test]
    fn drain_frames_notices_the_worker_finishing() {
        let mut viewer = test_viewer();
        let (tx, rx) = mpsc::channel();
        viewer.frames = Some(rx);

        tx.send(frame_with_nodes(2)).unwrap();
        drop(tx);

        viewer.drain_frames();

        assert_eq!(viewer.frame.sprites.len(), 2);
        assert!(viewer.worker_done);
        assert!(viewer.frames.is_none(), "channel is gone after disconnect");
    }
}
