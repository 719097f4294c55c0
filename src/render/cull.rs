use macroquad::prelude::*;

const CULL_MARGIN_CELLS: f32 = 1.0;

/// Pads a view rect by one grid cell on every side.
///
/// Keeps tiles whose edge is just outside the view from popping in late.
pub fn padded_view(view: Rect, grid: Vec2) -> Rect {
    let pad = grid * CULL_MARGIN_CELLS;
    Rect::new(
        view.x - pad.x,
        view.y - pad.y,
        view.w + 2.0 * pad.x,
        view.h + 2.0 * pad.y,
    )
}

/// Whether a tile drawn at `dst` can show up in `view`. No view means no culling.
#[inline]
pub fn is_visible(view: Option<Rect>, dst: Rect) -> bool {
    match view {
        Some(v) => v.overlaps(&dst),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_view_keeps_neighbouring_cells() {
        let grid = vec2(32.0, 32.0);
        let view = padded_view(Rect::new(0.0, 0.0, 64.0, 64.0), grid);

        assert!(is_visible(Some(view), Rect::new(-32.0, -32.0, 32.0, 32.0)));
        assert!(is_visible(Some(view), Rect::new(64.0, 64.0, 32.0, 32.0)));
        assert!(!is_visible(Some(view), Rect::new(128.0, 0.0, 32.0, 32.0)));
        assert!(is_visible(None, Rect::new(1e6, 1e6, 1.0, 1.0)));
    }
}
