//! Magic bitboard tables for sliding-piece attacks.
//!
//! For each square and slider type we store a blocker mask, a magic
//! multiplier, a shift amount and an offset into one shared flattened attack
//! table. At lookup time `((occupied & mask) * magic) >> shift` indexes the
//! precomputed attack set, so no ray walking happens during move generation.
//!
//! The multipliers are found by brute force at table-build time: sparse
//! random candidates are tested for collision-free indexing over every
//! blocker subset of the mask. Construction runs once behind a `Lazy` global
//! and the tables are read-only afterwards.

use once_cell::sync::Lazy;
use rand::Rng;

use crate::bitboard::{sq_to_bb, BitboardIter, Bitboard};

/// Attempts allowed per square before magic search gives up. Failing to find
/// a multiplier is a table-construction bug, never a move-generation event,
/// so exhausting the budget panics.
const MAGIC_ATTEMPT_BUDGET: u32 = 100_000_000;

#[derive(Debug, Clone, Copy)]
pub struct MagicEntry {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u32,
    pub offset: usize,
}

impl MagicEntry {
    const EMPTY: MagicEntry = MagicEntry {
        mask: 0,
        magic: 0,
        shift: 0,
        offset: 0,
    };
}

pub struct MagicTables {
    rook: [MagicEntry; 64],
    bishop: [MagicEntry; 64],
    /// One flattened attack table shared by all squares of both sliders.
    attacks: Vec<Bitboard>,
}

static MAGIC_TABLES: Lazy<MagicTables> = Lazy::new(MagicTables::build);

/// Rook attacks from `sq` given the full occupancy.
#[inline(always)]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    MAGIC_TABLES.lookup(&MAGIC_TABLES.rook[sq as usize], occupied)
}

/// Bishop attacks from `sq` given the full occupancy.
#[inline(always)]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    MAGIC_TABLES.lookup(&MAGIC_TABLES.bishop[sq as usize], occupied)
}

/// Queen attacks are the union of rook and bishop attacks from the square.
#[inline(always)]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

impl MagicTables {
    #[inline(always)]
    fn lookup(&self, entry: &MagicEntry, occupied: Bitboard) -> Bitboard {
        let blockers = occupied & entry.mask;
        let index = (blockers.wrapping_mul(entry.magic) >> entry.shift) as usize;
        self.attacks[entry.offset + index]
    }

    fn build() -> MagicTables {
        let mut rook = [MagicEntry::EMPTY; 64];
        let mut bishop = [MagicEntry::EMPTY; 64];
        let mut attacks: Vec<Bitboard> = Vec::new();

        for sq in 0..64u8 {
            rook[sq as usize] = build_square(sq, rook_mask(sq), rook_attacks_slow, &mut attacks);
        }
        for sq in 0..64u8 {
            bishop[sq as usize] =
                build_square(sq, bishop_mask(sq), bishop_attacks_slow, &mut attacks);
        }

        MagicTables {
            rook,
            bishop,
            attacks,
        }
    }
}

/// Find a magic for one square and append its attack span to the shared table.
fn build_square(
    sq: u8,
    mask: Bitboard,
    slow: fn(u8, Bitboard) -> Bitboard,
    attacks: &mut Vec<Bitboard>,
) -> MagicEntry {
    let bits = mask.count_ones();
    let variations = 1usize << bits;
    let occupancies: Vec<Bitboard> = (0..variations)
        .map(|index| occupancy_subset(index, mask))
        .collect();
    let reference: Vec<Bitboard> = occupancies.iter().map(|&occ| slow(sq, occ)).collect();

    let (magic, shift) = find_magic(sq, mask, &occupancies, &reference);

    let offset = attacks.len();
    attacks.resize(offset + variations, 0);
    for (occ, attack_set) in occupancies.iter().zip(reference.iter()) {
        let index = (occ.wrapping_mul(magic) >> shift) as usize;
        attacks[offset + index] = *attack_set;
    }

    MagicEntry {
        mask,
        magic,
        shift,
        offset,
    }
}

/// Brute-force search for a multiplier that maps every blocker subset to a
/// distinct slot (or to a slot holding the identical attack set).
fn find_magic(
    sq: u8,
    mask: Bitboard,
    occupancies: &[Bitboard],
    reference: &[Bitboard],
) -> (u64, u32) {
    let shift = 64 - mask.count_ones();
    let mut rng = rand::thread_rng();
    let mut used = vec![0u64; occupancies.len()];

    for _ in 0..MAGIC_ATTEMPT_BUDGET {
        // Sparse candidates work far more often than dense ones.
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(magic) & 0xff00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        used.fill(0);
        let mut fail = false;
        for (occ, attack_set) in occupancies.iter().zip(reference.iter()) {
            let index = (occ.wrapping_mul(magic) >> shift) as usize;
            if used[index] == 0 {
                used[index] = *attack_set;
            } else if used[index] != *attack_set {
                // Two blocker patterns needing different results collided.
                fail = true;
                break;
            }
        }
        if !fail {
            return (magic, shift);
        }
    }

    panic!("no collision-free magic multiplier found for square {sq} within the attempt budget");
}

/// Expand an index in `0..2^popcount(mask)` into the corresponding blocker
/// subset of `mask`.
fn occupancy_subset(index: usize, mask: Bitboard) -> Bitboard {
    let mut occupancy = 0u64;
    for (i, sq) in BitboardIter(mask).enumerate() {
        if index & (1 << i) != 0 {
            occupancy |= sq_to_bb(sq);
        }
    }
    occupancy
}

/// Relevant blocker mask for a rook: its rank and file, board edges excluded.
/// A blocker on the edge cannot shadow anything beyond it.
fn rook_mask(sq: u8) -> Bitboard {
    let rank = sq / 8;
    let file = sq % 8;
    let mut mask = 0u64;
    for f in 1..7 {
        if f != file {
            mask |= sq_to_bb(rank * 8 + f);
        }
    }
    for r in 1..7 {
        if r != rank {
            mask |= sq_to_bb(r * 8 + file);
        }
    }
    mask
}

/// Relevant blocker mask for a bishop: its diagonals, board edges excluded.
fn bishop_mask(sq: u8) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut mask = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= sq_to_bb((r * 8 + f) as u8);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Ray-cast rook attacks, stopping at (and including) the first blocker in
/// each direction. Used to fill the tables and as the test oracle.
fn rook_attacks_slow(sq: u8, occupied: Bitboard) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut attacks = 0u64;
    for (dr, df) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = sq_to_bb((r * 8 + f) as u8);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Ray-cast bishop attacks, stopping at the first blocker in each direction.
fn bishop_attacks_slow(sq: u8, occupied: Bitboard) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut attacks = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = sq_to_bb((r * 8 + f) as u8);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::square_index;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn masks_exclude_edges_and_own_square() {
        for sq in 0..64u8 {
            let rm = rook_mask(sq);
            let bm = bishop_mask(sq);
            assert_eq!(rm & sq_to_bb(sq), 0);
            assert_eq!(bm & sq_to_bb(sq), 0);
            // No bishop mask bit may sit on any edge.
            assert_eq!(bm & (0xff | 0xff00_0000_0000_0000 | 0x0101_0101_0101_0101 | 0x8080_8080_8080_8080), 0);
        }
        // Rook on e4 sees 6 inner squares on the rank and 6 on the file,
        // minus the overlap exclusions: 10 relevant blockers.
        assert_eq!(rook_mask(square_index("e4").unwrap()).count_ones(), 10);
    }

    #[test]
    fn empty_board_attack_counts() {
        let e4 = square_index("e4").unwrap();
        assert_eq!(rook_attacks(e4, 0).count_ones(), 14);
        assert_eq!(bishop_attacks(e4, 0).count_ones(), 13);
        assert_eq!(queen_attacks(e4, 0).count_ones(), 27);
        let a1 = square_index("a1").unwrap();
        assert_eq!(rook_attacks(a1, 0).count_ones(), 14);
        assert_eq!(bishop_attacks(a1, 0).count_ones(), 7);
    }

    #[test]
    fn blockers_cut_rays_and_can_be_captured() {
        let e4 = square_index("e4").unwrap();
        let e2 = square_index("e2").unwrap();
        let g4 = square_index("g4").unwrap();
        let occupied = sq_to_bb(e2) | sq_to_bb(g4);
        let attacks = rook_attacks(e4, occupied);
        assert_ne!(attacks & sq_to_bb(e2), 0); // blocker is attacked
        assert_ne!(attacks & sq_to_bb(g4), 0);
        assert_eq!(attacks & sq_to_bb(square_index("e1").unwrap()), 0); // shadowed
        assert_eq!(attacks & sq_to_bb(square_index("h4").unwrap()), 0);
    }

    /// The magic lookup must agree with the ray-casting oracle for arbitrary
    /// occupancies on every square.
    #[test]
    fn magic_matches_ray_casting() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for sq in 0..64u8 {
            for _ in 0..64 {
                let occupied: Bitboard = rng.gen::<u64>() & rng.gen::<u64>();
                assert_eq!(
                    rook_attacks(sq, occupied),
                    rook_attacks_slow(sq, occupied),
                    "rook mismatch at sq={sq} occ={occupied:#x}"
                );
                assert_eq!(
                    bishop_attacks(sq, occupied),
                    bishop_attacks_slow(sq, occupied),
                    "bishop mismatch at sq={sq} occ={occupied:#x}"
                );
            }
        }
    }

    #[test]
    fn occupancy_subset_enumerates_mask() {
        let mask = rook_mask(0);
        let bits = mask.count_ones();
        assert_eq!(occupancy_subset(0, mask), 0);
        assert_eq!(occupancy_subset((1 << bits) - 1, mask), mask);
        // Every generated subset stays inside the mask.
        for index in 0..(1usize << bits) {
            assert_eq!(occupancy_subset(index, mask) & !mask, 0);
        }
    }
}
