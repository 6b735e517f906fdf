use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quantum_core::dimension::DimensionTag;
use quantum_core::host::GridCell;
use quantum_core::portal::PortalTarget;
use quantum_core::powerup::PowerupEffect;

use crate::level::{CoinSpec, LevelLayout, PlatformRun, PortalSpec, PowerupSpec};

/// Chunk width in cells (each procedural section is this wide).
const CHUNK_WIDTH: i32 = 10;
/// Number of chunks in a generated level.
const NUM_CHUNKS: i32 = 8;
/// Row of the ground floor.
pub const GROUND_ROW: i32 = 14;
/// Level width in cells.
pub const LEVEL_WIDTH: i32 = CHUNK_WIDTH * NUM_CHUNKS;

const BONUS_EFFECTS: [PowerupEffect; 4] = [
    PowerupEffect::Speed,
    PowerupEffect::Invincibility,
    PowerupEffect::ExtraLife,
    PowerupEffect::FirePower,
];

fn tag(dimension: DimensionTag) -> Option<String> {
    Some(dimension.as_str().to_string())
}

fn run(col: i32, row: i32, width: u32, dimension: DimensionTag) -> PlatformRun {
    PlatformRun {
        col,
        row,
        width,
        dimension: tag(dimension),
        solid: true,
        breakable: false,
    }
}

fn coin(col: i32, row: i32, dimension: DimensionTag) -> CoinSpec {
    CoinSpec {
        col,
        row,
        dimension: tag(dimension),
        value: None,
    }
}

/// Generate a deterministic bonus level from a seed.
///
/// Ground is tagged `Both`. Every chunk after the first adds a section
/// whose traversal depends on the dimension: gaps bridged in only one
/// dimension, twin ledges, staircases alternating tags. Coins sit on the
/// dimension-specific cells so they can earn the same-dimension bonus.
pub fn generate_level(seed: u64) -> LevelLayout {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut layout = LevelLayout {
        name: format!("Bonus {seed}"),
        spawn: GridCell::new(1, GROUND_ROW - 2),
        platforms: Vec::new(),
        coins: Vec::new(),
        powerups: Vec::new(),
        portals: Vec::new(),
    };

    // Spawn chunk is flat ground
    layout
        .platforms
        .push(run(0, GROUND_ROW, CHUNK_WIDTH as u32, DimensionTag::Both));

    for chunk_idx in 1..NUM_CHUNKS {
        let base_x = chunk_idx * CHUNK_WIDTH;
        generate_chunk(&mut layout, &mut rng, base_x);
    }

    layout.portals.push(PortalSpec {
        col: LEVEL_WIDTH - 2,
        row: GROUND_ROW - 1,
        dimension: None,
        active: true,
        target: PortalTarget::AdvanceLevel,
    });

    layout
}

fn generate_chunk(layout: &mut LevelLayout, rng: &mut StdRng, base_x: i32) {
    let pattern = rng.random_range(0u8..4);
    let side = if rng.random_bool(0.5) {
        DimensionTag::Light
    } else {
        DimensionTag::Dark
    };

    match pattern {
        0 => {
            // Gap bridged in one dimension only
            let gap_start = base_x + rng.random_range(3..6);
            let gap_width = rng.random_range(2..4);
            layout.platforms.push(run(
                base_x,
                GROUND_ROW,
                (gap_start - base_x) as u32,
                DimensionTag::Both,
            ));
            layout
                .platforms
                .push(run(gap_start, GROUND_ROW, gap_width as u32, side));
            let after = gap_start + gap_width;
            layout.platforms.push(run(
                after,
                GROUND_ROW,
                (base_x + CHUNK_WIDTH - after) as u32,
                DimensionTag::Both,
            ));
            layout.coins.push(coin(gap_start, GROUND_ROW - 1, side));
        },
        1 => {
            // Twin ledges: same cells, opposite dimensions
            layout
                .platforms
                .push(run(base_x, GROUND_ROW, CHUNK_WIDTH as u32, DimensionTag::Both));
            let ledge_row = GROUND_ROW - rng.random_range(3..6);
            let ledge_col = base_x + rng.random_range(1..4);
            let ledge_len = rng.random_range(3..6);
            layout
                .platforms
                .push(run(ledge_col, ledge_row, ledge_len, DimensionTag::Light));
            layout
                .platforms
                .push(run(ledge_col, ledge_row, ledge_len, DimensionTag::Dark));
            layout
                .coins
                .push(coin(ledge_col + 1, ledge_row - 1, DimensionTag::Light));
            layout
                .coins
                .push(coin(ledge_col + 2, ledge_row - 1, DimensionTag::Dark));
        },
        2 => {
            // Staircase alternating dimensions step by step
            layout
                .platforms
                .push(run(base_x, GROUND_ROW, CHUNK_WIDTH as u32, DimensionTag::Both));
            for i in 0..4 {
                let step = if i % 2 == 0 { side } else { opposite(side) };
                layout
                    .platforms
                    .push(run(base_x + i * 2, GROUND_ROW - 2 - i, 2, step));
            }
            layout
                .coins
                .push(coin(base_x + 6, GROUND_ROW - 6, opposite(side)));
        },
        _ => {
            // Powerup on a ledge that only exists in one dimension
            layout
                .platforms
                .push(run(base_x, GROUND_ROW, CHUNK_WIDTH as u32, DimensionTag::Both));
            let ledge_col = base_x + rng.random_range(2..6);
            layout
                .platforms
                .push(run(ledge_col, GROUND_ROW - 4, 3, side));
            let effect = BONUS_EFFECTS[rng.random_range(0..BONUS_EFFECTS.len())];
            layout.powerups.push(PowerupSpec {
                col: ledge_col + 1,
                row: GROUND_ROW - 5,
                dimension: tag(side),
                effect,
            });
        },
    }
}

fn opposite(tag: DimensionTag) -> DimensionTag {
    match tag {
        DimensionTag::Light => DimensionTag::Dark,
        DimensionTag::Dark => DimensionTag::Light,
        DimensionTag::Both => DimensionTag::Both,
    }
}
