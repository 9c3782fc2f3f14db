/// Edge detector for the "end of list is near the viewport" signal.
///
/// Behaves like an intersection observer over the end of the rendered
/// list: it is only armed once enough records are visible, a fresh observer
/// is attached whenever the visible count changes, and it notifies on
/// attachment while already near the end or on a transition into the
/// near-end region. Repeated observations with unchanged inputs never
/// notify twice.
#[derive(Debug, Default)]
pub struct Sentinel {
    armed_at: Option<usize>,
    near_end: bool,
}

impl Sentinel {
    pub fn observe(&mut self, near_end: bool, visible: usize, min_visible: usize) -> bool {
        let was_near_end = std::mem::replace(&mut self.near_end, near_end);
        if visible < min_visible {
            self.armed_at = None;
            return false;
        }
        let rearmed = self.armed_at.replace(visible) != Some(visible);
        near_end && (rearmed || !was_near_end)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
