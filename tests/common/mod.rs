//! Hand-assembled CLX fixtures, independent of the library writer.

#![allow(dead_code)]

/// Frame payload: 6-byte header then `pixels` bytes counting up from `seed`.
pub fn frame(width: u16, height: u16, seed: u8, pixels: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(6 + pixels);
    out.extend_from_slice(&10u16.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend((0..pixels).map(|k| seed.wrapping_add(k as u8)));
    out
}

/// Frame of exactly `total` bytes (header included).
pub fn frame_of_size(seed: u8, total: usize) -> Vec<u8> {
    frame(4, 4, seed, total - 6)
}

/// Serialize groups of frame payloads. One group is written without a
/// group-offset table, several with one.
pub fn build_clx(groups: &[Vec<Vec<u8>>]) -> Vec<u8> {
    let table = if groups.len() == 1 { 0 } else { 4 * groups.len() as u32 };

    let mut offsets = Vec::new();
    let mut pos = table;
    for group in groups {
        offsets.push(pos);
        pos += group_size(group);
    }

    let mut out = Vec::new();
    if groups.len() > 1 {
        for off in &offsets {
            out.extend_from_slice(&off.to_be_bytes());
        }
    }
    for group in groups {
        let header = 8 + 4 * group.len() as u32;
        out.extend_from_slice(&(group.len() as u32).to_be_bytes());
        let mut rel = header;
        for f in group {
            out.extend_from_slice(&rel.to_be_bytes());
            rel += f.len() as u32;
        }
        out.extend_from_slice(&group_size(group).to_be_bytes());
        for f in group {
            out.extend_from_slice(f);
        }
    }
    out
}

pub fn group_size(group: &[Vec<u8>]) -> u32 {
    8 + 4 * group.len() as u32 + group.iter().map(|f| f.len() as u32).sum::<u32>()
}

pub fn be_u32(bytes: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}

/// Three groups at offsets 12, 140 and 310, two frames each; 406 bytes.
pub fn three_groups() -> Vec<Vec<Vec<u8>>> {
    vec![
        vec![frame_of_size(0x40, 56), frame_of_size(0x41, 56)],
        vec![frame_of_size(0x50, 70), frame_of_size(0x51, 84)],
        vec![frame_of_size(0x60, 40), frame_of_size(0x61, 40)],
    ]
}

/// Four groups A, B, C, D tagged by their first pixel.
pub fn four_groups() -> Vec<Vec<Vec<u8>>> {
    vec![
        vec![frame(8, 8, b'A', 20), frame(8, 8, b'A', 24)],
        vec![frame(16, 4, b'B', 30)],
        vec![frame(2, 2, b'C', 12), frame(2, 2, b'C', 12), frame(2, 2, b'C', 16)],
        vec![frame(32, 1, b'D', 40)],
    ]
}
