use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Shape, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::camera::Projection;
use super::super::render_utils::{
    arrow_head, circle_visible, draw_background, draw_label, label_anchor, segment_visible,
    with_alpha,
};
use super::super::style::{Emphasis, resolve};
use super::interaction::pick_node;

const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 60, 64, 120);
const AFFECTED_LINK_COLOR: Color32 = Color32::from_rgb(0xFF, 0x3B, 0x30);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, now: f64) -> Rect {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if self.store.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The backend returned an empty graph.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return rect;
        }

        self.handle_orbit(&response);
        self.handle_dolly(ui, &response);

        let (bodies, links) = self.store.simulation_parts();
        let layout_moving = !self.layout.is_settled() && self.layout.tick(bodies, links);
        let camera_moving = self.animator.tick(&mut self.camera, now);
        if layout_moving || camera_moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        let projection = Projection::new(
            &self.camera,
            rect,
            self.selection.framer().settings().field_of_view_deg,
        );
        let context = self.selection.style_context();
        let scratch = &mut self.view_scratch;

        scratch.projected.clear();
        scratch.radii.clear();
        for (handle, record) in self.store.records() {
            let projected = projection.project(self.store.position(handle));
            let sphere_radius = resolve(handle, record, &context).sphere_radius;
            scratch.projected.push(projected);
            scratch.radii.push(
                projected.map_or(0.0, |point| (sphere_radius * point.scale).clamp(1.5, 60.0)),
            );
        }

        for link in self.store.links() {
            let (Some(start), Some(end)) = (
                scratch.projected[link.source.index()],
                scratch.projected[link.target.index()],
            ) else {
                continue;
            };
            if !segment_visible(rect, start.screen, end.screen, 4.0) {
                continue;
            }

            let touches_affected = context
                .affected
                .contains(&self.store.record(link.source).id)
                || context.affected.contains(&self.store.record(link.target).id);
            let (width, color) = if touches_affected {
                (1.8, AFFECTED_LINK_COLOR)
            } else {
                (1.0, LINK_COLOR)
            };

            painter.line_segment([start.screen, end.screen], Stroke::new(width, color));
            let arrow_size = (2.0 * end.scale).clamp(3.0, 10.0);
            if let Some(points) = arrow_head(start.screen, end.screen, arrow_size) {
                painter.add(Shape::convex_polygon(points.to_vec(), color, Stroke::NONE));
            }
        }

        let hovered = response
            .hover_pos()
            .and_then(|pointer| pick_node(pointer, &scratch.projected, &scratch.radii))
            .and_then(|index| self.store.handle_at(index));

        scratch.draw_order.clear();
        scratch.draw_order.extend(
            scratch
                .projected
                .iter()
                .enumerate()
                .filter(|(_, point)| point.is_some())
                .map(|(index, _)| index),
        );
        let depths = &scratch.projected;
        scratch.draw_order.sort_by(|a, b| {
            let depth = |index: usize| depths[index].map_or(0.0, |point| point.depth);
            depth(*b).total_cmp(&depth(*a))
        });

        for &index in &scratch.draw_order {
            let (Some(point), Some(handle)) = (scratch.projected[index], self.store.handle_at(index))
            else {
                continue;
            };
            let record = self.store.record(handle);
            let style = resolve(handle, record, &context);
            let radius = scratch.radii[index];
            let glow_radius = (style.glow_radius * point.scale).max(radius);
            if !circle_visible(rect, point.screen, glow_radius) {
                continue;
            }

            painter.circle_filled(point.screen, glow_radius, with_alpha(style.color, style.glow_alpha));
            painter.circle_filled(point.screen, radius, style.color);
            painter.circle_filled(
                point.screen - vec2(radius * 0.3, radius * 0.3),
                radius * 0.35,
                with_alpha(Color32::WHITE, 0.35),
            );
            if let Some((inner, outer)) = style.ring_span() {
                let width = ((outer - inner) * point.scale).max(1.0);
                painter.circle_stroke(
                    point.screen,
                    (inner * point.scale).max(glow_radius) + width * 0.5,
                    Stroke::new(width, with_alpha(style.color, 0.8)),
                );
            }

            let is_hovered = hovered == Some(handle);
            if style.emphasis != Emphasis::Normal || is_hovered {
                draw_label(
                    &painter,
                    label_anchor(point.screen, radius),
                    &record.name,
                    Color32::WHITE,
                    style.label_background,
                );
            }
        }

        if let Some(handle) = hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            let record = self.store.record(handle);
            let cluster = record
                .cluster
                .and_then(|id| self.store.cluster(id))
                .map_or("no cluster", |cluster| cluster.name.as_str());
            painter.text(
                rect.left_top() + vec2(10.0, rect.height() - 24.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}  |  {}", record.name, record.id, cluster),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(handle) = hovered
        {
            self.click_node(handle, now);
        }

        rect
    }
}
