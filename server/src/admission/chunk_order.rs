use floodgate_shared::{ChunkKey, PlayerPosition};

/// The order in which a drain visits a world's active chunks
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkOrder {
    /// Chunks near a player, nearest first
    pub proximal: Vec<ChunkKey>,
    /// All other chunks, rotated by the round-robin cursor
    pub distal: Vec<ChunkKey>,
}

impl ChunkOrder {
    pub fn len(&self) -> usize {
        self.proximal.len() + self.distal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proximal.is_empty() && self.distal.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkKey> {
        self.proximal.iter().chain(self.distal.iter())
    }
}

/// Splits `active` into player-proximal and distal chunks.
///
/// A chunk is proximal when it lies within `player_chunk_radius` chunks of a
/// chunk holding a player; proximal chunks are sorted by the distance from
/// their center to the nearest player. Distal chunks keep key order, starting
/// at `cursor` modulo their count, so repeated drains rotate through them.
pub fn chunk_order<'a>(
    active: impl Iterator<Item = &'a ChunkKey>,
    players: &[PlayerPosition],
    player_chunk_radius: u32,
    cursor: usize,
) -> ChunkOrder {
    let player_chunks: Vec<ChunkKey> = players.iter().map(PlayerPosition::chunk).collect();

    let mut proximal: Vec<(f64, ChunkKey)> = Vec::new();
    let mut distal: Vec<ChunkKey> = Vec::new();

    for chunk in active {
        let near_player = player_chunks
            .iter()
            .any(|player_chunk| chunk.chunk_radius_to(player_chunk) <= player_chunk_radius);
        if near_player {
            let nearest = players
                .iter()
                .map(|player| chunk.center_distance_sq_to(player))
                .fold(f64::INFINITY, f64::min);
            proximal.push((nearest, *chunk));
        } else {
            distal.push(*chunk);
        }
    }

    proximal.sort_by(|(a_dist, a_chunk), (b_dist, b_chunk)| {
        a_dist.total_cmp(b_dist).then_with(|| a_chunk.cmp(b_chunk))
    });
    if !distal.is_empty() {
        let start = cursor % distal.len();
        distal.rotate_left(start);
    }

    ChunkOrder {
        proximal: proximal.into_iter().map(|(_, chunk)| chunk).collect(),
        distal,
    }
}
