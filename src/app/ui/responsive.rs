pub(in crate::app) const NARROW_BREAKPOINT: f32 = 768.0;

/// Tracks which side of the breakpoint the window is on so panels are only
/// collapsed or restored when the width actually crosses it.
#[derive(Debug, Default)]
pub(in crate::app) struct Breakpoint {
    narrow: Option<bool>,
}

impl Breakpoint {
    /// `Some(narrow)` on the first observation and on every crossing,
    /// `None` otherwise.
    pub(in crate::app) fn observe(&mut self, width: f32) -> Option<bool> {
        let narrow = width < NARROW_BREAKPOINT;
        if self.narrow == Some(narrow) {
            return None;
        }

        self.narrow = Some(narrow);
        Some(narrow)
    }
}
