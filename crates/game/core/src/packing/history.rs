//! Bit-packing of bounded histories.
//!
//! A history of capacity N and element width W is one `N * W`-bit integer.
//! Slot 0 occupies the most significant W bits, slot N-1 the least
//! significant. Unused trailing slots are zero.

use core::marker::PhantomData;

use super::{MAX_AGGREGATE_BITS, PackingError};
use crate::config::GameConfig;

fn field_mask(width: u32) -> u128 {
    if width >= MAX_AGGREGATE_BITS {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

/// Validates the layout and returns the total aggregate width in bits.
fn layout_bits(capacity: usize, width: u32) -> Result<u32, PackingError> {
    let overflow = PackingError::LayoutOverflow { capacity, width };
    if width == 0 {
        return Err(overflow);
    }
    let bits = u32::try_from(capacity)
        .ok()
        .and_then(|n| n.checked_mul(width))
        .ok_or(overflow.clone())?;
    if bits > MAX_AGGREGATE_BITS {
        return Err(overflow);
    }
    Ok(bits)
}

/// Shift that places slot `index` of `capacity` at its bit position.
fn slot_shift(capacity: usize, width: u32, index: usize) -> u32 {
    (capacity - 1 - index) as u32 * width
}

/// Concatenates up to `capacity` elements of `width` bits, first element most
/// significant. Missing trailing elements are packed as zero.
pub fn pack(elements: &[u128], capacity: usize, width: u32) -> Result<u128, PackingError> {
    layout_bits(capacity, width)?;
    if elements.len() > capacity {
        return Err(PackingError::TooManyElements {
            len: elements.len(),
            capacity,
        });
    }

    let mask = field_mask(width);
    let mut aggregate = 0u128;
    for (index, &value) in elements.iter().enumerate() {
        if value & !mask != 0 {
            return Err(PackingError::ElementOverflow { value, width });
        }
        aggregate |= value << slot_shift(capacity, width, index);
    }
    Ok(aggregate)
}

/// Exact inverse of [`pack`]: returns all `capacity` slots.
///
/// Fails if the aggregate uses bits beyond `capacity * width`.
pub fn unpack(aggregate: u128, capacity: usize, width: u32) -> Result<Vec<u128>, PackingError> {
    let bits = layout_bits(capacity, width)?;
    if aggregate & !field_mask(bits) != 0 {
        return Err(PackingError::InvalidEncoding { aggregate, bits });
    }

    let mask = field_mask(width);
    Ok((0..capacity)
        .map(|index| (aggregate >> slot_shift(capacity, width, index)) & mask)
        .collect())
}

/// Reads one slot.
///
/// Every slot position is compared against `index` and the masked slot values
/// are summed; the read fails unless exactly one position matched.
pub fn read_at(
    aggregate: u128,
    capacity: usize,
    width: u32,
    index: usize,
) -> Result<u128, PackingError> {
    let slots = unpack(aggregate, capacity, width)?;

    let mut matches = 0u32;
    let mut selected = 0u128;
    for (position, value) in slots.into_iter().enumerate() {
        let hit = u128::from(position == index);
        matches += hit as u32;
        selected += hit * value;
    }

    if matches != 1 {
        return Err(PackingError::IndexOutOfRange { index, capacity });
    }
    Ok(selected)
}

/// Returns a new aggregate equal to `aggregate` except slot `index`, which
/// holds `value`.
pub fn write_at(
    aggregate: u128,
    capacity: usize,
    width: u32,
    index: usize,
    value: u128,
) -> Result<u128, PackingError> {
    if index >= capacity {
        return Err(PackingError::IndexOutOfRange { index, capacity });
    }
    let slots = unpack(aggregate, capacity, width)?;

    let updated: Vec<u128> = slots
        .into_iter()
        .enumerate()
        .map(|(position, old)| if position == index { value } else { old })
        .collect();
    pack(&updated, capacity, width)
}

/// Typed view over a packed history with a fixed layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PackedHistory<const N: usize, const W: u32> {
    raw: u128,
    #[cfg_attr(feature = "serde", serde(skip))]
    _layout: PhantomData<[(); N]>,
}

/// Seven 14-bit guess records (98 bits).
pub type GuessHistory = PackedHistory<{ GameConfig::MAX_ATTEMPTS }, { GameConfig::GUESS_RECORD_BITS }>;

/// Seven 8-bit clue records (56 bits).
pub type ClueHistory = PackedHistory<{ GameConfig::MAX_ATTEMPTS }, { GameConfig::CLUE_RECORD_BITS }>;

impl<const N: usize, const W: u32> PackedHistory<N, W> {
    pub const CAPACITY: usize = N;
    pub const WIDTH: u32 = W;

    /// An empty history (all slots zero).
    pub const fn empty() -> Self {
        Self {
            raw: 0,
            _layout: PhantomData,
        }
    }

    /// Wraps a stored aggregate after checking it fits the layout.
    pub fn from_raw(raw: u128) -> Result<Self, PackingError> {
        unpack(raw, N, W)?;
        Ok(Self {
            raw,
            _layout: PhantomData,
        })
    }

    pub fn raw(&self) -> u128 {
        self.raw
    }

    pub fn get(&self, index: usize) -> Result<u128, PackingError> {
        read_at(self.raw, N, W, index)
    }

    /// Returns a copy with slot `index` replaced.
    #[must_use = "histories are immutable; the updated copy is returned"]
    pub fn with(&self, index: usize, value: u128) -> Result<Self, PackingError> {
        Ok(Self {
            raw: write_at(self.raw, N, W, index, value)?,
            _layout: PhantomData,
        })
    }

    /// All slots in order.
    pub fn slots(&self) -> Result<Vec<u128>, PackingError> {
        unpack(self.raw, N, W)
    }
}

impl<const N: usize, const W: u32> Default for PackedHistory<N, W> {
    fn default() -> Self {
        Self::empty()
    }
}
