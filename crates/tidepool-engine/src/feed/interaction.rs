/// Pointer snapshot driving a simulation disturbance.
///
/// `position` is normalized to `[0, 1] x [0, 1]` by whoever produces the sample
/// (surface UV for the water/trail pages). `active` is `1.0` while the pointer is
/// pressed and `0.0` otherwise; programs multiply their brush by it, so values in
/// between scale the disturbance.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct InteractionSample {
    pub position: [f32; 2],
    pub active: f32,
}

impl InteractionSample {
    #[inline]
    pub const fn new(position: [f32; 2], active: f32) -> Self {
        Self { position, active }
    }

    /// Pressed pointer at `position`.
    #[inline]
    pub const fn pressed(position: [f32; 2]) -> Self {
        Self::new(position, 1.0)
    }

    /// Released pointer at `position`.
    #[inline]
    pub const fn released(position: [f32; 2]) -> Self {
        Self::new(position, 0.0)
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self.active > 0.0
    }

    /// Packs the sample as the `vec4<f32>` uniform programs read (`x, y, active, 0`).
    #[inline]
    pub fn to_uniform(self) -> [f32; 4] {
        [self.position[0], self.position[1], self.active, 0.0]
    }
}

/// Single-slot, latest-value-wins hand-off between pointer event handlers and
/// the per-frame feed.
///
/// Producers overwrite the pending value as events arrive; nothing is queued, so
/// several updates between two ticks collapse into the last one. The consumer
/// calls [`latch`](Self::latch) once at the start of a tick and uses that
/// snapshot for the whole frame, so a sample cannot change halfway through
/// feeding uniforms even if more events arrive before the pass is recorded.
#[derive(Debug, Default, Clone)]
pub struct InteractionSlot {
    pending: InteractionSample,
    latched: InteractionSample,
    updates_since_latch: u32,
}

impl InteractionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending sample.
    pub fn publish(&mut self, sample: InteractionSample) {
        self.pending = sample;
        self.updates_since_latch = self.updates_since_latch.saturating_add(1);
    }

    /// Moves the pointer without touching the active flag.
    pub fn set_position(&mut self, position: [f32; 2]) {
        self.publish(InteractionSample {
            position,
            ..self.pending
        });
    }

    /// Presses or releases the pointer in place.
    pub fn set_active(&mut self, active: bool) {
        self.publish(InteractionSample {
            active: if active { 1.0 } else { 0.0 },
            ..self.pending
        });
    }

    /// Latest value written by a producer (not yet latched).
    #[inline]
    pub fn pending(&self) -> InteractionSample {
        self.pending
    }

    /// Snapshots the pending value for the current tick.
    pub fn latch(&mut self) -> InteractionSample {
        if self.updates_since_latch > 1 {
            log::trace!(
                "interaction slot: {} updates collapsed into one frame",
                self.updates_since_latch
            );
        }
        self.updates_since_latch = 0;
        self.latched = self.pending;
        self.latched
    }

    /// Snapshot taken by the last [`latch`](Self::latch).
    #[inline]
    pub fn latched(&self) -> InteractionSample {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_publish_wins() {
        let mut slot = InteractionSlot::new();
        slot.publish(InteractionSample::pressed([0.1, 0.1]));
        slot.publish(InteractionSample::pressed([0.2, 0.3]));
        slot.publish(InteractionSample::released([0.9, 0.4]));
        assert_eq!(slot.latch(), InteractionSample::released([0.9, 0.4]));
    }

    #[test]
    fn latched_snapshot_ignores_later_updates() {
        let mut slot = InteractionSlot::new();
        slot.publish(InteractionSample::pressed([0.5, 0.5]));
        let snap = slot.latch();

        slot.set_position([0.7, 0.7]);
        assert_eq!(slot.latched(), snap);
        assert_eq!(slot.pending().position, [0.7, 0.7]);
    }

    #[test]
    fn set_active_keeps_position() {
        let mut slot = InteractionSlot::new();
        slot.set_position([0.25, 0.75]);
        slot.set_active(true);
        assert_eq!(slot.pending(), InteractionSample::pressed([0.25, 0.75]));
        slot.set_active(false);
        assert!(!slot.pending().is_active());
        assert_eq!(slot.pending().position, [0.25, 0.75]);
    }

    #[test]
    fn uniform_layout_is_xy_active_pad() {
        let s = InteractionSample::new([0.3, 0.6], 1.0);
        assert_eq!(s.to_uniform(), [0.3, 0.6, 1.0, 0.0]);
    }
}
