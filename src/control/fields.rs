use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct FieldState {
    value: String,
    revision: u64,
}

/// A shared handle to one form field. Clones refer to the same field; every
/// write bumps the revision.
#[derive(Debug, Clone, Default)]
pub struct Field {
    state: Arc<Mutex<FieldState>>,
}

impl Field {
    pub fn new(initial: impl Into<String>) -> Self {
        Field {
            state: Arc::new(Mutex::new(FieldState {
                value: initial.into(),
                revision: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FieldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn value(&self) -> String {
        self.lock().value.clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        let mut state = self.lock();
        state.value = value.into();
        state.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Power,
    DragArea,
}

/// The fields an [`InputBinding`](super::binding::InputBinding) reads and writes.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pub power: Field,
    pub drag_area: Field,
    pub top_speed: Field,
}

impl FormFields {
    pub fn new(power: Field, drag_area: Field, top_speed: Field) -> Self {
        FormFields {
            power,
            drag_area,
            top_speed,
        }
    }

    pub fn input(&self, role: FieldRole) -> &Field {
        match role {
            FieldRole::Power => &self.power,
            FieldRole::DragArea => &self.drag_area,
        }
    }
}
