//! Property tests for the coordinate transform and the cursor registry.

use std::collections::HashSet;

use minesync_protocol::{BoardSize, PlayerId};
use minesync_room::{
    BoardGeometry, BoardPoint, BoardRect, Cursor, CursorRegistry, CursorSurface, TileRect,
};
use proptest::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

/// Counts live visuals so the surface can be checked against the registry.
#[derive(Default)]
struct CountingSurface {
    live: HashSet<PlayerId>,
    hidden_selections: usize,
}

impl CursorSurface for CountingSurface {
    fn spawn_cursor(&mut self, cursor: &Cursor) {
        assert!(self.live.insert(cursor.id), "spawned twice: {}", cursor.id);
    }

    fn place_cursor(&mut self, id: PlayerId, _page_x: f64, _page_y: f64) {
        assert!(self.live.contains(&id));
    }

    fn place_selection(&mut self, id: PlayerId, outline: Option<TileRect>) {
        assert!(self.live.contains(&id));
        if outline.is_none() {
            self.hidden_selections += 1;
        }
    }

    fn remove_cursor(&mut self, id: PlayerId) {
        assert!(self.live.remove(&id), "removed twice: {id}");
    }
}

#[derive(Debug, Clone)]
enum Op {
    Create(u64),
    Remove(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(0u64..8).prop_map(Op::Create), (0u64..8).prop_map(Op::Remove)]
}

/// A board of `w x h` tiles, each `tile` pixels square, at some page offset.
fn geometry_strategy() -> impl Strategy<Value = BoardGeometry> {
    (1u32..64, 1u32..64, 1u32..64, -500i32..500, -500i32..500).prop_map(|(w, h, tile, x, y)| {
        let rect = BoardRect {
            x: f64::from(x),
            y: f64::from(y),
            width: f64::from(w * tile),
            height: f64::from(h * tile),
        };
        BoardGeometry::measure(rect, BoardSize { width: w, height: h })
            .expect("non-empty rect")
    })
}

// =========================================================================
// Tile containment
// =========================================================================

proptest! {
    #[test]
    fn points_inside_the_rect_map_to_tiles_on_the_board(
        geometry in geometry_strategy(),
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let rect = geometry.rect();
        let page_x = rect.x + (fx * rect.width).floor().min(rect.width - 1.0);
        let page_y = rect.y + (fy * rect.height).floor().min(rect.height - 1.0);
        let point = geometry.page_to_board(page_x, page_y);
        let tile = geometry.tile_of(point);

        prop_assert!(geometry.contains(tile), "{point:?} -> {tile:?}");
        prop_assert!(geometry.selection_rect(point).is_some());
    }

    #[test]
    fn points_outside_the_rect_map_off_the_board(
        geometry in geometry_strategy(),
        dx in 1i64..2000,
        dy in 0i64..2000,
        side in 0u8..4,
    ) {
        let rect = geometry.rect();
        let (w, h) = (rect.width as i64, rect.height as i64);
        let point = match side {
            0 => BoardPoint { x: -dx, y: dy % h },
            1 => BoardPoint { x: w - 1 + dx, y: dy % h },
            2 => BoardPoint { x: dy % w, y: -dx },
            _ => BoardPoint { x: dy % w, y: h - 1 + dx },
        };
        let tile = geometry.tile_of(point);

        prop_assert!(!geometry.contains(tile), "{point:?} -> {tile:?}");
        prop_assert!(geometry.selection_rect(point).is_none());
    }

    #[test]
    fn off_board_moves_hide_the_selection(
        geometry in geometry_strategy(),
        dx in 1i64..100,
    ) {
        let mut surface = CountingSurface::default();
        let mut registry = CursorRegistry::new();
        registry.create(&mut surface, PlayerId(1), "Bob", "#ff0000");

        registry
            .move_to(&mut surface, Some(&geometry), PlayerId(1), BoardPoint { x: -dx, y: 0 })
            .unwrap();
        prop_assert_eq!(surface.hidden_selections, 1);
    }
}

// =========================================================================
// Registry size
// =========================================================================

proptest! {
    #[test]
    fn registry_size_equals_net_creates(ops in proptest::collection::vec(op(), 0..64)) {
        let mut surface = CountingSurface::default();
        let mut registry = CursorRegistry::new();
        let mut created = 0usize;
        let mut removed = 0usize;

        for op in ops {
            match op {
                Op::Create(id) => {
                    if registry.create(&mut surface, PlayerId(id), format!("p{id}"), "#000") {
                        created += 1;
                    }
                }
                Op::Remove(id) => {
                    if registry.remove(&mut surface, PlayerId(id)) {
                        removed += 1;
                    }
                }
            }
        }

        prop_assert_eq!(registry.len(), created - removed);
        prop_assert_eq!(surface.live.len(), registry.len());
    }
}
