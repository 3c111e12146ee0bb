use crate::types::AlertLevel;

// ---------------------------------------------------------------------------
// AlertGate
// ---------------------------------------------------------------------------

/// Edge detector over incoming alert levels.
///
/// The first observation notifies only if something is already wrong;
/// afterwards any change of the `(group1, group2)` pair notifies, including
/// recovery back to SAFE. A sustained alert never notifies twice.
#[derive(Debug, Default)]
pub struct AlertGate {
    last: Option<(AlertLevel, AlertLevel)>,
}

impl AlertGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a notification should fire for this pair of levels,
    /// recording the pair either way.
    pub fn should_notify(&mut self, level1: AlertLevel, level2: AlertLevel) -> bool {
        let current = (level1, level2);
        match self.last.replace(current) {
            None => level1.is_alert() || level2.is_alert(),
            Some(previous) => previous != current,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
