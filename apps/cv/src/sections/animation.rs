use std::collections::HashSet;
use std::sync::Mutex;

/// Records which elements have already played their entrance animation.
///
/// A one-way latch: once marked, an element stays marked for the lifetime of
/// the registry and renders statically from then on.
pub trait AnimationRegistry: Send + Sync {
    fn has(&self, id: &str) -> bool;
    fn mark_animated(&self, id: &str);
}

#[derive(Debug, Default)]
pub struct AnimationLatch {
    animated: Mutex<HashSet<String>>,
}

impl AnimationLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.animated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnimationRegistry for AnimationLatch {
    fn has(&self, id: &str) -> bool {
        self.animated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(id)
    }

    fn mark_animated(&self, id: &str) {
        self.animated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id.to_string());
    }
}
