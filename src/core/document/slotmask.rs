/// Bit mask of selected slots within a single processor lane.
/// One bit per slot; bit N set means the processor slot N is selected,
/// whether or not a processor currently occupies it.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
pub struct SlotMask(u64);

impl SlotMask {
    pub fn empty() -> SlotMask {
        SlotMask(0)
    }

    /// A mask with every slot in [0, num_slots) selected.
    pub fn full(num_slots: i32) -> SlotMask {
        if num_slots <= 0 {
            return SlotMask(0);
        }
        if num_slots >= 64 {
            return SlotMask(u64::MAX);
        }
        SlotMask((1u64 << num_slots) - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn get(&self, slot: i32) -> bool {
        if !(0..64).contains(&slot) {
            return false;
        }
        (self.0 >> slot) & 1 == 1
    }

    pub fn set(&mut self, slot: i32, selected: bool) {
        if !(0..64).contains(&slot) {
            return;
        }
        if selected {
            self.0 |= 1 << slot;
        } else {
            self.0 &= !(1 << slot);
        }
    }

    /// Shift all bits upward by delta slots (downward for negative delta).
    /// Bits shifted past either end are discarded.
    pub fn shift(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        if delta.unsigned_abs() >= 64 {
            self.0 = 0;
        } else if delta > 0 {
            self.0 <<= delta as u32;
        } else {
            self.0 >>= (-delta) as u32;
        }
    }

    pub fn first_set(&self) -> Option<i32> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as i32)
        }
    }

    pub fn last_set(&self) -> Option<i32> {
        if self.0 == 0 {
            None
        } else {
            Some(63 - self.0.leading_zeros() as i32)
        }
    }

    /// Clear any bits at or beyond num_slots.
    pub fn truncate(&mut self, num_slots: i32) {
        *self = SlotMask(self.0 & Self::full(num_slots).0);
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        let bits = self.0;
        (0..64).filter(move |slot| (bits >> slot) & 1 == 1)
    }
}
