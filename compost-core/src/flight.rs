use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight gate for the camera node: at most one upload in flight at a
/// time. The capture task sets it right before issuing the upload command and
/// the terminal completion callback (success or error) clears it, so the two
/// sides never share a plain bool across tasks.
pub struct UploadGate {
    in_flight: AtomicBool,
}

impl UploadGate {
    pub const fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claims the gate. Returns false when an upload is already in flight.
    pub fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Releases the gate; called from the terminal upload callback.
    pub fn finish(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn is_idle(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }
}

impl Default for UploadGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_before_first_capture() {
        let gate = UploadGate::new();
        assert!(gate.is_idle());
    }

    #[test]
    fn held_strictly_between_begin_and_terminal_callback() {
        let gate = UploadGate::new();

        assert!(gate.try_begin());
        assert!(!gate.is_idle());
        // A second capture may not start while the first is in flight.
        assert!(!gate.try_begin());

        // Terminal callback fires — error or completion, same effect.
        gate.finish();
        assert!(gate.is_idle());
        assert!(gate.try_begin());
    }
}
