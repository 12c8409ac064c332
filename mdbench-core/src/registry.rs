use std::path::Path;
use std::sync::Arc;

use crate::backend::{Backend, BackendError};
use crate::step::StepKind;

/// One bound step: perform the operation on a file path or fail.
pub type Operation = Arc<dyn Fn(&Path) -> Result<(), BackendError> + Send + Sync>;

/// Operations for every [`StepKind`], bound to one backend at setup time.
#[derive(Clone)]
pub struct OperationTable {
    ops: [Operation; StepKind::COUNT],
}

impl OperationTable {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            ops: StepKind::ALL.map(|kind| bind(backend.clone(), kind)),
        }
    }

    pub fn get(&self, kind: StepKind) -> Operation {
        self.ops[kind.index()].clone()
    }
}

impl std::fmt::Debug for OperationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationTable")
            .field("kinds", &StepKind::ALL)
            .finish()
    }
}

fn bind(backend: Arc<dyn Backend>, kind: StepKind) -> Operation {
    match kind {
        StepKind::Create => Arc::new(move |path: &Path| backend.create(path)),
        StepKind::Stat => Arc::new(move |path: &Path| backend.stat(path)),
        StepKind::Open => Arc::new(move |path: &Path| backend.open(path)),
        StepKind::Remove => Arc::new(move |path: &Path| backend.remove(path)),
    }
}
