// the board is 10x10 tiles numbered 1..=100, starting bottom-left and
// zigzagging upward: row 0 goes left to right, row 1 right to left, and so on
use num::integer::div_rem;
use num::Integer;

pub const BOARD_SIZE: u32 = 10;
pub const NUM_TILES: Tile = BOARD_SIZE * BOARD_SIZE;
pub const START_TILE: Tile = 1;

/// 1-based tile index, valid in `1..=NUM_TILES`.
pub type Tile = u32;

/// Position of a tile on the grid. Row 0 is the bottom row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: u32,
    pub col: u32,
}

impl GridPos {
    pub fn new(row: u32, col: u32) -> GridPos {
        GridPos { row, col }
    }

    /// Row counted from the top, for drawing top-down.
    pub fn screen_row(&self) -> u32 {
        BOARD_SIZE - 1 - self.row
    }
}

pub fn is_valid_tile(tile: Tile) -> bool {
    (1..=NUM_TILES).contains(&tile)
}

/// Maps a tile to its place on the zigzag grid, `None` outside the board.
pub fn tile_to_grid(tile: Tile) -> Option<GridPos> {
    if !is_valid_tile(tile) {
        return None;
    }
    let (row, mut col) = div_rem(tile - 1, BOARD_SIZE);
    // odd rows run right to left
    if row.is_odd() {
        col = BOARD_SIZE - 1 - col;
    }
    Some(GridPos::new(row, col))
}

/// Inverse of [`tile_to_grid`].
pub fn grid_to_tile(pos: GridPos) -> Option<Tile> {
    if pos.row >= BOARD_SIZE || pos.col >= BOARD_SIZE {
        return None;
    }
    let col = if pos.row.is_odd() {
        BOARD_SIZE - 1 - pos.col
    } else {
        pos.col
    };
    Some(pos.row * BOARD_SIZE + col + 1)
}

/// Centre of a tile in pixel space, y growing downward from the top of a
/// screen `screen_height` pixels tall.
pub fn tile_to_pixel(tile: Tile, tile_size: i32, screen_height: i32) -> Option<(i32, i32)> {
    let pos = tile_to_grid(tile)?;
    let x = pos.col as i32 * tile_size + tile_size / 2;
    let y = screen_height - (pos.row as i32 * tile_size + tile_size / 2);
    Some((x, y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalKind {
    Ladder,
    Snake,
}

impl PortalKind {
    pub fn name(&self) -> &'static str {
        match self {
            PortalKind::Ladder => "ladder",
            PortalKind::Snake => "snake",
        }
    }
}

/// A fixed teleport from one tile to another. Whether it is a ladder or a
/// snake only depends on the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal {
    pub from: Tile,
    pub to: Tile,
}

impl Portal {
    const fn new(from: Tile, to: Tile) -> Portal {
        Portal { from, to }
    }

    pub fn kind(&self) -> PortalKind {
        if self.to > self.from {
            PortalKind::Ladder
        } else {
            PortalKind::Snake
        }
    }
}

// sorted by source tile, lookups binary search on it
const PORTALS: [Portal; 20] = [
    Portal::new(4, 14),
    Portal::new(9, 31),
    Portal::new(16, 6),
    Portal::new(17, 7),
    Portal::new(20, 38),
    Portal::new(28, 84),
    Portal::new(36, 44),
    Portal::new(48, 26),
    Portal::new(49, 11),
    Portal::new(51, 67),
    Portal::new(56, 53),
    Portal::new(62, 19),
    Portal::new(63, 81),
    Portal::new(64, 60),
    Portal::new(71, 91),
    Portal::new(80, 99),
    Portal::new(87, 24),
    Portal::new(93, 73),
    Portal::new(95, 75),
    Portal::new(98, 78),
];

/// The portal starting on `tile`, if any.
pub fn portal_at(tile: Tile) -> Option<Portal> {
    PORTALS
        .binary_search_by_key(&tile, |portal| portal.from)
        .ok()
        .map(|index| PORTALS[index])
}

/// Every portal on the board, by ascending source tile.
pub fn portals() -> impl Iterator<Item = Portal> {
    PORTALS.iter().copied()
}
