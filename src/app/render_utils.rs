use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, vec2};

pub(super) const ARROW_POSITION: f32 = 0.9;

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(0, 0, 0));

    let step = 64.0;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(40, 44, 52, 60));

    let mut x = rect.left() + (rect.width() * 0.5).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (rect.height() * 0.5).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

/// Triangle pointing from `start` toward `end`, its tip placed at
/// [`ARROW_POSITION`] along the segment. `None` for zero-length segments.
pub(super) fn arrow_head(start: Pos2, end: Pos2, size: f32) -> Option<[Pos2; 3]> {
    let delta = end - start;
    let length = delta.length();
    if length <= f32::EPSILON {
        return None;
    }

    let direction = delta / length;
    let normal = vec2(-direction.y, direction.x);
    let tip = start + delta * ARROW_POSITION;
    let base = tip - direction * size;
    let half_width = size * 0.5;

    Some([tip, base + normal * half_width, base - normal * half_width])
}

pub(super) fn draw_label(
    painter: &Painter,
    anchor: Pos2,
    text: &str,
    text_color: Color32,
    background: Color32,
) {
    let galley = painter.layout_no_wrap(text.to_owned(), FontId::proportional(12.0), text_color);
    let padding = vec2(6.0, 3.0);
    let rect = Align2::LEFT_CENTER.anchor_size(anchor, galley.size() + padding * 2.0);

    painter.rect_filled(rect, 4.0, background);
    painter.galley(rect.min + padding, galley, text_color);
}

pub(super) fn label_anchor(position: Pos2, radius: f32) -> Pos2 {
    position + Vec2::new(radius + 6.0, 0.0)
}
