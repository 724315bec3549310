//! Fire-and-forget task spawning on the page's event loop.

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};

use crate::interop;

#[derive(Debug, Clone, Copy, Default)]
/// Spawner that queues futures as browser microtasks.
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        interop::spawn_local(future)
    }
}

#[cfg(test)]
mod tests {
    use futures::task::LocalSpawnExt;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_spawner_reports_shutdown() {
        let err = BrowserSpawner
            .spawn_local(async {})
            .expect_err("no event loop outside wasm32");
        assert!(err.is_shutdown());
    }
}
