use glam::{IVec2, UVec2, Vec2};

use crate::types::{ActorId, Rect};

/// Row-major 2D storage that only ever grows. Growth keeps existing cells in
/// place and default-fills the new ones.
#[derive(Debug, Default)]
pub(crate) struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Default> Grid<T> {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        if x < self.width && y < self.height {
            self.cells.get_mut((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Grow to at least `width` x `height`. Never shrinks.
    pub fn expand_to(&mut self, width: u32, height: u32) {
        let width = width.max(self.width);
        let height = height.max(self.height);
        if width == self.width && height == self.height {
            return;
        }

        let old_width = self.width;
        let old_height = self.height;
        let mut old = std::mem::take(&mut self.cells).into_iter();
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                if x < old_width && y < old_height {
                    cells.push(old.next().unwrap_or_default());
                } else {
                    cells.push(T::default());
                }
            }
        }

        self.width = width;
        self.height = height;
        self.cells = cells;
    }
}

/// Half-open cell index range: `min` inclusive, `max` exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CellRange {
    pub min: IVec2,
    pub max: IVec2,
}

impl CellRange {
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }
}

/// One spatial-hash layer of a tilemap: a grid of chunks, each chunk a grid
/// of tile cells holding the actors whose bounds cover that tile.
///
/// Tile and chunk indices are derived from world coordinates. The chunk grid
/// grows on insert; individual chunks size their tile grids lazily.
#[derive(Debug)]
pub(crate) struct ChunkLayer {
    tile_size: UVec2,
    /// Chunk dimensions in tiles.
    chunk_size: UVec2,
    chunks: Grid<Grid<Vec<ActorId>>>,
}

impl ChunkLayer {
    pub fn new(tile_size: UVec2, chunk_size: UVec2) -> Self {
        Self {
            tile_size,
            chunk_size,
            chunks: Grid::new(),
        }
    }

    /// Tiles covered by `bounds`, half-open.
    pub fn tile_range(&self, bounds: &Rect) -> CellRange {
        let tile = self.tile_size.as_vec2();
        CellRange {
            min: (bounds.min() / tile).floor().as_ivec2(),
            max: (bounds.max() / tile).ceil().as_ivec2(),
        }
    }

    /// Chunks covering a tile range, half-open.
    pub fn chunk_range(&self, tiles: &CellRange) -> CellRange {
        let size = self.chunk_size.as_ivec2();
        CellRange {
            min: IVec2::new(tiles.min.x.div_euclid(size.x), tiles.min.y.div_euclid(size.y)),
            max: IVec2::new(
                (tiles.max.x + size.x - 1).div_euclid(size.x),
                (tiles.max.y + size.y - 1).div_euclid(size.y),
            ),
        }
    }

    /// Register `id` in every tile cell covered by `bounds`. Returns false
    /// without touching the grid when the covered range extends into
    /// negative chunk space.
    pub fn insert(&mut self, bounds: &Rect, id: ActorId) -> bool {
        let tiles = self.tile_range(bounds);
        let chunks = self.chunk_range(&tiles);
        if chunks.is_empty() {
            return true;
        }
        if chunks.min.x < 0 || chunks.min.y < 0 {
            log::error!(
                "cannot register collision bounds {:?}: chunk range {:?} extends below origin",
                bounds,
                chunks
            );
            return false;
        }

        self.chunks.expand_to(chunks.max.x as u32, chunks.max.y as u32);
        self.for_each_covered_cell_mut(&tiles, &chunks, |cell| cell.push(id));
        true
    }

    /// Drop `id` from every tile cell covered by `bounds`.
    pub fn remove(&mut self, bounds: &Rect, id: ActorId) {
        let tiles = self.tile_range(bounds);
        let chunks = self.chunk_range(&tiles);
        if chunks.min.x < 0 || chunks.min.y < 0 {
            return;
        }
        self.for_each_covered_cell_mut(&tiles, &chunks, |cell| cell.retain(|a| *a != id));
    }

    /// Visit every actor registered in a cell covered by `bounds`. Actors
    /// spanning several cells are visited once per cell; callers deduplicate.
    pub fn each_overlapping(&self, bounds: &Rect, f: &mut impl FnMut(ActorId)) {
        let tiles = self.tile_range(bounds);
        let chunks = self.chunk_range(&tiles);
        let size = self.chunk_size.as_ivec2();

        for cy in chunks.min.y..chunks.max.y {
            for cx in chunks.min.x..chunks.max.x {
                if !self.chunks.in_range(cx, cy) {
                    continue;
                }
                let Some(chunk) = self.chunks.get(cx as u32, cy as u32) else {
                    continue;
                };
                if chunk.is_empty() {
                    continue;
                }
                let local = Self::clip_to_chunk(&tiles, IVec2::new(cx, cy), size);
                for ty in local.min.y..local.max.y {
                    for tx in local.min.x..local.max.x {
                        if !chunk.in_range(tx, ty) {
                            continue;
                        }
                        if let Some(cell) = chunk.get(tx as u32, ty as u32) {
                            for id in cell {
                                f(*id);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Extent of the allocated chunk grid in world units.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            (self.chunks.width() * self.chunk_size.x * self.tile_size.x) as f32,
            (self.chunks.height() * self.chunk_size.y * self.tile_size.y) as f32,
        )
    }

    /// World-space rect of every allocated chunk, for debug drawing.
    pub fn each_chunk_rect(&self, f: &mut impl FnMut(Rect)) {
        let chunk_px = Vec2::new(
            (self.chunk_size.x * self.tile_size.x) as f32,
            (self.chunk_size.y * self.tile_size.y) as f32,
        );
        for cy in 0..self.chunks.height() {
            for cx in 0..self.chunks.width() {
                let min = Vec2::new(cx as f32, cy as f32) * chunk_px;
                f(Rect::new(min + chunk_px * 0.5, chunk_px * 0.5));
            }
        }
    }

    /// Tile range clipped to one chunk, in chunk-local tile coordinates.
    fn clip_to_chunk(tiles: &CellRange, chunk: IVec2, size: IVec2) -> CellRange {
        let base = chunk * size;
        CellRange {
            min: (tiles.min - base).max(IVec2::ZERO),
            max: (tiles.max - base).min(size),
        }
    }

    fn for_each_covered_cell_mut(
        &mut self,
        tiles: &CellRange,
        chunks: &CellRange,
        mut f: impl FnMut(&mut Vec<ActorId>),
    ) {
        let size = self.chunk_size.as_ivec2();
        for cy in chunks.min.y..chunks.max.y {
            for cx in chunks.min.x..chunks.max.x {
                if !self.chunks.in_range(cx, cy) {
                    continue;
                }
                let local = Self::clip_to_chunk(tiles, IVec2::new(cx, cy), size);
                if local.is_empty() {
                    continue;
                }
                let Some(chunk) = self.chunks.get_mut(cx as u32, cy as u32) else {
                    continue;
                };
                // Lazily size the chunk's tile grid to what this range needs.
                chunk.expand_to(local.max.x as u32, local.max.y as u32);
                for ty in local.min.y..local.max.y {
                    for tx in local.min.x..local.max.x {
                        if let Some(cell) = chunk.get_mut(tx as u32, ty as u32) {
                            f(cell);
                        }
                    }
                }
            }
        }
    }
}

/// Collision-side view of one tilemap: its chunk layers plus the actors
/// registered into them.
#[derive(Debug)]
pub(crate) struct TilemapCollision {
    pub topleft: Vec2,
    pub layers: Vec<ChunkLayer>,
    pub actors: Vec<ActorId>,
}

impl TilemapCollision {
    pub fn new(topleft: Vec2) -> Self {
        Self {
            topleft,
            layers: Vec::new(),
            actors: Vec::new(),
        }
    }

    pub fn create_layer(&mut self, tile_size: UVec2, chunk_size: UVec2) -> u32 {
        self.layers.push(ChunkLayer::new(tile_size, chunk_size));
        (self.layers.len() - 1) as u32
    }

    /// Broad bounds of the tilemap: the largest allocated layer extent,
    /// anchored at `topleft`.
    pub fn bounds(&self) -> Rect {
        let mut size = Vec2::ZERO;
        for layer in &self.layers {
            size = size.max(layer.pixel_size());
        }
        Rect::new(self.topleft + size * 0.5, size * 0.5)
    }
}
