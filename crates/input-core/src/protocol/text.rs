//! Packed UTF-16 text payloads.
//!
//! Text records carry two UTF-16 code units per `i32` slot:
//!
//! ```text
//! slot = unit[2k] | (unit[2k + 1] << 16)
//! ```
//!
//! When the string has an odd number of units, the last one sits alone in the
//! low half of the final slot and the high half stays zero.

use super::messages::TEXT_HEADER_SLOTS;

/// Returns the number of slots needed for the packed characters of a string
/// of `len` UTF-16 units.
pub fn packed_slots(len: usize) -> usize {
    (len + 1) / 2
}

/// Returns the total slot count of a text record (`[7, len, packed...]`).
pub fn text_record_slots(len: usize) -> usize {
    packed_slots(len) + TEXT_HEADER_SLOTS
}

/// Packs `units` into `out`, two per slot.
///
/// `out` must hold at least [`packed_slots`]`(units.len())` slots; extra slots
/// are left untouched.
///
/// # Panics
///
/// Panics if `out` is too short.
pub fn pack_units(units: &[u16], out: &mut [i32]) {
    assert!(
        out.len() >= packed_slots(units.len()),
        "text buffer holds {} slots, {} required",
        out.len(),
        packed_slots(units.len())
    );
    for (slot, pair) in out.iter_mut().zip(units.chunks(2)) {
        let low = u32::from(pair[0]);
        let high = pair.get(1).map_or(0, |&u| u32::from(u));
        *slot = (low | (high << 16)) as i32;
    }
}

/// Unpacks `len` UTF-16 units from `slots`.
///
/// Returns `None` if `slots` is too short to hold `len` units.
pub fn unpack_text(slots: &[i32], len: usize) -> Option<Vec<u16>> {
    if slots.len() < packed_slots(len) {
        return None;
    }
    let mut units = Vec::with_capacity(len);
    for i in 0..len {
        let slot = slots[i / 2] as u32;
        let unit = if i % 2 == 0 { slot & 0xFFFF } else { slot >> 16 };
        units.push(unit as u16);
    }
    Some(units)
}
