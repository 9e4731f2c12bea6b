//! Connected-component counting inside a 3×3×3 neighborhood.
//!
//! Foreground components use 26-connectivity, labelled by flooding over the
//! eight 2×2×2 octants that share the center: any two neighbors that are
//! 26-adjacent lie in a common octant, and every pair inside one octant is
//! 26-adjacent. Background components use 6-connectivity restricted to the
//! 18-neighborhood (faces and edges).

use super::occupancy::{CENTER_BIT, Occupancy};

/// Face-neighbor bits: −z, −y, −x, +x, +y, +z.
pub const FACE_MASK: u32 = (1 << 4) | (1 << 10) | (1 << 12) | (1 << 14) | (1 << 16) | (1 << 22);

/// Face and edge neighbor bits (18-neighborhood without center).
pub const N18_MASK: u32 = {
    let mut mask = 0u32;
    let mut bit = 0;
    while bit < 27 {
        let (x, y, z) = decode(bit);
        let manhattan = (x - 1).abs() + (y - 1).abs() + (z - 1).abs();
        if manhattan == 1 || manhattan == 2 {
            mask |= 1 << bit;
        }
        bit += 1;
    }
    mask
};

/// Neighbor bits of each octant; octant `o` spans sign `+` on axis `k`
/// iff bit `k` of `o` is set.
pub const OCTANT_BITS: [u32; 8] = {
    let mut table = [0u32; 8];
    let mut octant = 0;
    while octant < 8 {
        let sx = if octant & 1 != 0 { 2 } else { 0 };
        let sy = if octant & 2 != 0 { 2 } else { 0 };
        let sz = if octant & 4 != 0 { 2 } else { 0 };
        let mut mask = 0u32;
        let mut bit = 0;
        while bit < 27 {
            let (x, y, z) = decode(bit);
            if (x == 1 || x == sx) && (y == 1 || y == sy) && (z == 1 || z == sz) {
                mask |= 1 << bit;
            }
            bit += 1;
        }
        table[octant] = mask & !(1 << CENTER_BIT);
        octant += 1;
    }
    table
};

/// Bits 6-adjacent to each bit within the 3×3×3 block.
const SIX_ADJACENT: [u32; 27] = {
    let mut table = [0u32; 27];
    let mut bit = 0;
    while bit < 27 {
        let (x, y, z) = decode(bit);
        let mut mask = 0u32;
        if x > 0 {
            mask |= 1 << (bit - 1);
        }
        if x < 2 {
            mask |= 1 << (bit + 1);
        }
        if y > 0 {
            mask |= 1 << (bit - 3);
        }
        if y < 2 {
            mask |= 1 << (bit + 3);
        }
        if z > 0 {
            mask |= 1 << (bit - 9);
        }
        if z < 2 {
            mask |= 1 << (bit + 9);
        }
        table[bit as usize] = mask;
        bit += 1;
    }
    table
};

/// Block coordinates in `0..3` of a bit.
const fn decode(bit: u32) -> (i32, i32, i32) {
    let b = bit as i32;
    (b % 3, (b / 3) % 3, b / 9)
}

/// Grow `seed` inside `set` under 26-connectivity.
fn grow_26(seed: u32, set: u32) -> u32 {
    let mut component = seed;
    loop {
        let mut grown = component;
        for octant in &OCTANT_BITS {
            if octant & component != 0 {
                grown |= octant & set;
            }
        }
        if grown == component {
            return component;
        }
        component = grown;
    }
}

/// Grow `seed` inside `set` under 6-connectivity.
fn grow_6(seed: u32, set: u32) -> u32 {
    let mut component = seed;
    let mut frontier = seed;
    while frontier != 0 {
        let mut next = 0;
        let mut remaining = frontier;
        while remaining != 0 {
            let bit = remaining.trailing_zeros();
            remaining &= remaining - 1;
            next |= SIX_ADJACENT[bit as usize];
        }
        next &= set & !component;
        component |= next;
        frontier = next;
    }
    component
}

/// Split `set` into components via `grow`, returning their masks in order
/// of lowest bit.
fn components(set: u32, grow: fn(u32, u32) -> u32) -> Vec<u32> {
    let mut out = Vec::new();
    let mut remaining = set;
    while remaining != 0 {
        let seed = 1 << remaining.trailing_zeros();
        let component = grow(seed, set);
        remaining &= !component;
        out.push(component);
    }
    out
}

/// 26-connected components among the occupied neighbors.
pub fn count_foreground_components(occ: Occupancy) -> u32 {
    components(occ.neighbors(), grow_26).len() as u32
}

/// 6-connected background components in the 18-neighborhood that touch a
/// face neighbor of the center.
pub fn count_background_components(occ: Occupancy) -> u32 {
    let background = N18_MASK & !occ.bits();
    components(background, grow_6)
        .into_iter()
        .filter(|c| c & FACE_MASK != 0)
        .count() as u32
}

/// 6-connected groups of occupied neighbors.
///
/// A straight run through the center has two, a T or + junction three or
/// more.
pub fn count_branches(occ: Occupancy) -> u32 {
    components(occ.neighbors(), grow_6).len() as u32
}
