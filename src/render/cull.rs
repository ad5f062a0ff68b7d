use crate::geom::Rect;

/// Pads the viewport by one tile on every side so tiles whose origin lies
/// just off screen but whose extent reaches into it are still drawn.
pub fn expanded_viewport(viewport: Rect, tile_w: i32, tile_h: i32) -> Rect {
    viewport.expanded(tile_w, tile_h)
}

#[inline]
pub fn is_visible(dest: &Rect, expanded_view: &Rect) -> bool {
    dest.overlaps(expanded_view)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Rect = Rect::new(0, 0, 800, 600);

    #[test]
    fn tile_just_outside_screen_is_kept() {
        let view = expanded_viewport(VIEW, 64, 32);
        // Origin left of the screen, extent still inside the padding.
        assert!(is_visible(&Rect::new(-100, 10, 64, 32), &view));
        assert!(is_visible(&Rect::new(820, 620, 64, 32), &view));
    }

    #[test]
    fn tile_beyond_padding_is_culled() {
        let view = expanded_viewport(VIEW, 64, 32);
        assert!(!is_visible(&Rect::new(-128, 0, 64, 32), &view));
        assert!(!is_visible(&Rect::new(864, 0, 64, 32), &view));
        assert!(!is_visible(&Rect::new(0, -64, 64, 32), &view));
        assert!(!is_visible(&Rect::new(0, 632, 64, 32), &view));
    }
}
