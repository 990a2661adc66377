/// Exclusive, non-reentrant flags guarding calculate and reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusyFlags {
    calculating: bool,
    resetting: bool,
}

impl BusyFlags {
    /// Raises the calculation flag; `false` if a calculation is already pending.
    pub fn try_begin_calculation(&mut self) -> bool {
        if self.calculating {
            return false;
        }
        self.calculating = true;
        true
    }

    pub fn finish_calculation(&mut self) {
        self.calculating = false;
    }

    pub fn try_begin_reset(&mut self) -> bool {
        if self.resetting {
            return false;
        }
        self.resetting = true;
        true
    }

    pub fn finish_reset(&mut self) {
        self.resetting = false;
    }

    pub fn is_calculating(self) -> bool {
        self.calculating
    }

    pub fn is_resetting(self) -> bool {
        self.resetting
    }
}
