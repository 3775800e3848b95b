use crate::{
    bitgen::{BitGenerator, BitSource},
    seed::Seed,
};

/// Three per-vertex scalar walks, one per color channel, min-max normalized
/// into [0, 1] independently per channel.
///
/// All three channels draw from one shared generator in channel order, so
/// channel boundaries are contiguous in the bitstream rather than
/// independently seeded.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorField {
    channels: [Vec<f64>; 3],
}

impl ColorField {
    pub fn generate(color_seed: &Seed, vertex_count: usize) -> Self {
        let mut bits = BitGenerator::new(color_seed);
        Self::generate_from(&mut bits, vertex_count)
    }

    pub(crate) fn generate_from(bits: &mut impl BitSource, vertex_count: usize) -> Self {
        let c1 = channel_walk(bits, vertex_count);
        let c2 = channel_walk(bits, vertex_count);
        let c3 = channel_walk(bits, vertex_count);
        Self {
            channels: [c1, c2, c3],
        }
    }

    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    pub fn channel(&self, i: usize) -> &[f64] {
        &self.channels[i]
    }

    /// 8-bit color of vertex `i`, truncating each channel the way the
    /// reference does (`int(value * 255)`).
    pub fn rgb(&self, i: usize) -> [u8; 3] {
        [
            (self.channels[0][i] * 255.0) as u8,
            (self.channels[1][i] * 255.0) as u8,
            (self.channels[2][i] * 255.0) as u8,
        ]
    }
}

/// One ±1 cursor walk of `n` values starting from 0, normalized by the
/// channel's own min and max. A constant channel (min == max, only possible
/// for n <= 1) maps to the 0.5 midpoint instead of dividing by zero.
fn channel_walk(bits: &mut impl BitSource, n: usize) -> Vec<f64> {
    let mut cursor: i64 = 0;
    let mut raw = Vec::with_capacity(n);
    for _ in 0..n {
        cursor += if bits.next_bit() == 1 { 1 } else { -1 };
        raw.push(cursor);
    }

    let lowest = raw.iter().copied().min().unwrap_or(0);
    let highest = raw.iter().copied().max().unwrap_or(0);
    if highest == lowest {
        return vec![0.5; n];
    }
    let range = (highest - lowest) as f64;
    raw.into_iter()
        .map(|v| (v - lowest) as f64 / range)
        .collect()
}
