use crate::{constants::CHUNK_SIZE, types::WorldId};

/// Integer block coordinates inside a world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn below(&self) -> Self {
        Self::new(self.x, self.y - 1, self.z)
    }

    /// The six orthogonal neighbors, in a fixed order
    pub fn neighbors(&self) -> [BlockPos; 6] {
        [
            Self::new(self.x, self.y - 1, self.z),
            Self::new(self.x, self.y + 1, self.z),
            Self::new(self.x - 1, self.y, self.z),
            Self::new(self.x + 1, self.y, self.z),
            Self::new(self.x, self.y, self.z - 1),
            Self::new(self.x, self.y, self.z + 1),
        ]
    }

    pub fn chunk(&self) -> ChunkKey {
        ChunkKey::from_block(self)
    }

    /// Packs the position into a single integer: 26 bits of x, 26 bits of z
    /// and 12 bits of y. Used as the final tie-break between queued updates.
    pub fn as_long(&self) -> i64 {
        ((i64::from(self.x) & 0x3FF_FFFF) << 38)
            | ((i64::from(self.z) & 0x3FF_FFFF) << 12)
            | (i64::from(self.y) & 0xFFF)
    }

    pub fn distance_sq_to(&self, player: &PlayerPosition) -> f64 {
        let dx = f64::from(self.x) + 0.5 - player.x;
        let dy = f64::from(self.y) + 0.5 - player.y;
        let dz = f64::from(self.z) + 0.5 - player.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// A 16x16 column of blocks, the unit of spatial batching
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub x: i32,
    pub z: i32,
}

impl ChunkKey {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn from_block(pos: &BlockPos) -> Self {
        Self::new(pos.x.div_euclid(CHUNK_SIZE), pos.z.div_euclid(CHUNK_SIZE))
    }

    pub fn from_player(player: &PlayerPosition) -> Self {
        let size = f64::from(CHUNK_SIZE);
        // float to int casts saturate, so far-away players stay representable
        Self::new(
            (player.x / size).floor() as i32,
            (player.z / size).floor() as i32,
        )
    }

    /// Squared distance from the chunk's center column (at sea level) to a player
    pub fn center_distance_sq_to(&self, player: &PlayerPosition) -> f64 {
        let size = f64::from(CHUNK_SIZE);
        let cx = f64::from(self.x) * size + size / 2.0;
        let cz = f64::from(self.z) * size + size / 2.0;
        let dx = cx - player.x;
        let dy = 64.0 - player.y;
        let dz = cz - player.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Chebyshev distance in chunks
    pub fn chunk_radius_to(&self, other: &ChunkKey) -> u32 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).unsigned_abs();
        u32::try_from(dx.max(dz)).unwrap_or(u32::MAX)
    }
}

/// A candidate update location: world plus block coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UpdatePosition {
    pub world: WorldId,
    pub pos: BlockPos,
}

impl UpdatePosition {
    pub fn new(world: WorldId, pos: BlockPos) -> Self {
        Self { world, pos }
    }

    pub fn chunk(&self) -> ChunkKey {
        self.pos.chunk()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlayerPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn chunk(&self) -> ChunkKey {
        ChunkKey::from_player(self)
    }
}
