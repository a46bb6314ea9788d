use std::{cell::RefCell, rc::Rc};

/// Externally owned element the engine shifts vertically.
///
/// The host creates and owns it; the engine only receives a handle. Implementations
/// return `false` while the element is not mounted, and the write is retried on the
/// next frame.
pub trait VisualLayer {
    fn apply_offset(&mut self, offset_px: f64) -> bool;
}

impl<L: VisualLayer + ?Sized> VisualLayer for Box<L> {
    fn apply_offset(&mut self, offset_px: f64) -> bool {
        (**self).apply_offset(offset_px)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerState {
    pub mounted: bool,
    pub offset_px: f64,
    /// Number of accepted writes.
    pub writes: usize,
}

/// In-memory layer shared between the engine and whoever renders it.
#[derive(Clone, Debug, Default)]
pub struct SharedLayer(Rc<RefCell<LayerState>>);

impl SharedLayer {
    pub fn mounted() -> Self {
        Self(Rc::new(RefCell::new(LayerState {
            mounted: true,
            ..LayerState::default()
        })))
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub fn set_mounted(&self, mounted: bool) {
        self.0.borrow_mut().mounted = mounted;
    }

    pub fn offset_px(&self) -> f64 {
        self.0.borrow().offset_px
    }

    pub fn state(&self) -> LayerState {
        self.0.borrow().clone()
    }
}

impl VisualLayer for SharedLayer {
    fn apply_offset(&mut self, offset_px: f64) -> bool {
        let mut state = self.0.borrow_mut();
        if !state.mounted {
            return false;
        }
        state.offset_px = offset_px;
        state.writes += 1;
        true
    }
}

/// Linear map of `progress` over `[0, stage1_start]` onto `[0, max_shift_px]`.
pub fn shift_for(progress: f64, stage1_start: f64, max_shift_px: f64) -> f64 {
    let t = if stage1_start > 0.0 {
        (progress / stage1_start).clamp(0.0, 1.0)
    } else if progress > 0.0 {
        1.0
    } else {
        0.0
    };
    if t.is_nan() { 0.0 } else { t * max_shift_px }
}

/// Sole writer of the external layer's vertical offset.
#[derive(Debug)]
pub struct Synchronizer<L> {
    layer: L,
    stage1_start: f64,
    max_shift_ratio: f64,
    applied: Option<f64>,
}

impl<L: VisualLayer> Synchronizer<L> {
    pub fn new(layer: L, stage1_start: f64, max_shift_ratio: f64) -> Self {
        Self {
            layer,
            stage1_start,
            max_shift_ratio,
            applied: None,
        }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Last offset the layer accepted.
    pub fn applied(&self) -> Option<f64> {
        self.applied
    }

    /// Push the offset for `progress`; returns the offset wanted this frame.
    pub fn sync(&mut self, progress: f64, viewport_height: f64) -> f64 {
        let offset = shift_for(
            progress,
            self.stage1_start,
            self.max_shift_ratio * viewport_height.max(0.0),
        );
        if self.applied != Some(offset) {
            self.write(offset);
        }
        offset
    }

    /// Put the layer back at zero, unconditionally.
    pub fn reset(&mut self) {
        self.write(0.0);
    }

    fn write(&mut self, offset: f64) {
        if self.layer.apply_offset(offset) {
            self.applied = Some(offset);
        } else {
            tracing::trace!(offset, "visual layer absent, offset not applied");
            self.applied = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/sync.rs"]
mod tests;
