use parking_lot::Mutex;
use std::{collections::HashMap, fmt::Debug};

use crate::{DisplayModel, Widget};

/// Applies a rendered model to whatever shows the widget.
pub trait Surface: Send + Sync + Debug {
    fn apply(&self, widget: &Widget, model: &DisplayModel);
}

/// Keeps the last model applied to each widget id.
#[derive(Debug, Default)]
pub struct MemorySurface {
    models: Mutex<HashMap<String, DisplayModel>>,
    applied: Mutex<usize>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self, widget_id: &str) -> Option<DisplayModel> {
        self.models.lock().get(widget_id).cloned()
    }

    /// Total number of `apply` calls.
    pub fn applied(&self) -> usize {
        *self.applied.lock()
    }
}

impl Surface for MemorySurface {
    fn apply(&self, widget: &Widget, model: &DisplayModel) {
        self.models.lock().insert(widget.id.clone(), model.clone());
        *self.applied.lock() += 1;
    }
}
