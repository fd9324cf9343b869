use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

use super::{build_catalog, loader::template_files, TemplateCatalog};

/// CatalogHandle holds the catalog currently in service. Readers take a
/// cheap `Arc` snapshot; a reload publishes a whole new catalog.
#[derive(Clone)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<TemplateCatalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// Snapshot of the current catalog
    pub async fn current(&self) -> Arc<TemplateCatalog> {
        self.current.read().await.clone()
    }

    /// Replace the catalog in service
    pub async fn swap(&self, catalog: TemplateCatalog) {
        let mut current = self.current.write().await;
        *current = Arc::new(catalog);
    }
}

/// File name, size and modification time of every template file
pub type Fingerprint = Vec<(PathBuf, u64, Option<SystemTime>)>;

/// Snapshot the template directory. Take it before building a catalog from
/// the directory so edits made during the build are seen on the next poll.
pub fn fingerprint(dir: &Path) -> Result<Fingerprint> {
    let mut entries = Vec::new();
    for path in template_files(dir)? {
        let meta = std::fs::metadata(&path)?;
        entries.push((path, meta.len(), meta.modified().ok()));
    }
    Ok(entries)
}

/// CatalogReloader polls the template directory and swaps in a rebuilt
/// catalog whenever its files change
pub struct CatalogReloader {
    dir: PathBuf,
    handle: CatalogHandle,
    poll: Duration,
    baseline: Option<Fingerprint>,
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl CatalogReloader {
    /// `baseline` is the directory fingerprint taken before the catalog in
    /// service was built; with None the first poll always rebuilds.
    pub fn new(
        dir: PathBuf,
        handle: CatalogHandle,
        poll_secs: u64,
        baseline: Option<Fingerprint>,
    ) -> Self {
        Self {
            dir,
            handle,
            poll: Duration::from_secs(poll_secs.max(1)),
            baseline,
            stop_tx: None,
        }
    }

    /// Start polling
    pub fn start(&mut self) {
        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let dir = self.dir.clone();
        let handle = self.handle.clone();
        let poll = self.poll;
        let mut last = self.baseline.take();

        tokio::spawn(async move {
            let mut ticker = interval(poll);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = check_catalog(&dir, &handle, &mut last).await {
                            tracing::warn!("Catalog reload failed, keeping current catalog: {:#}", e);
                        }
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("Catalog reloader stopped");
                        break;
                    }
                }
            }
        });
    }

    /// Stop polling
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Rebuild and swap the catalog if the directory changed since `last`.
/// Returns true when a new catalog was published. On a failed rebuild the
/// fingerprint is still recorded so a broken file is reported once, not on
/// every tick.
pub async fn check_catalog(
    dir: &Path,
    handle: &CatalogHandle,
    last: &mut Option<Fingerprint>,
) -> Result<bool> {
    let owned_dir = dir.to_path_buf();
    let current = tokio::task::spawn_blocking(move || fingerprint(&owned_dir)).await??;

    if last.as_ref() == Some(&current) {
        return Ok(false);
    }
    *last = Some(current);

    let owned_dir = dir.to_path_buf();
    let catalog = tokio::task::spawn_blocking(move || build_catalog(Some(&owned_dir))).await??;
    tracing::info!("Catalog reloaded from {} ({} templates)", dir.display(), catalog.len());
    handle.swap(catalog).await;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::loader::tests::{scratch_dir, template_json};
    use crate::catalog::seeds;
    use serde_json::json;

    #[test]
    fn test_handle_swap_keeps_old_snapshots() {
        tokio_test::block_on(async {
            let handle = CatalogHandle::new(TemplateCatalog::empty());
            let before = handle.current().await;

            handle.swap(TemplateCatalog::builtin().unwrap()).await;
            let after = handle.current().await;

            assert!(before.is_empty());
            assert_eq!(after.len(), seeds::default_templates().len());
        });
    }

    #[tokio::test]
    async fn test_check_catalog_reloads_on_change() {
        let dir = scratch_dir();
        let handle = CatalogHandle::new(TemplateCatalog::empty());
        let mut last = None;

        assert!(check_catalog(&dir, &handle, &mut last).await.unwrap());
        assert_eq!(handle.current().await.len(), seeds::default_templates().len());

        // Unchanged directory: nothing to do
        assert!(!check_catalog(&dir, &handle, &mut last).await.unwrap());

        std::fs::write(dir.join("extra.json"), template_json("zz-extra", "Cisco").to_string()).unwrap();
        assert!(check_catalog(&dir, &handle, &mut last).await.unwrap());
        assert!(handle.current().await.get("zz-extra").is_some());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_broken_file_keeps_previous_catalog() {
        let dir = scratch_dir();
        let handle = CatalogHandle::new(TemplateCatalog::builtin().unwrap());
        let mut last = fingerprint(&dir).ok();

        let mut broken = template_json("broken", "Cisco");
        broken["variables"] = json!([]);
        std::fs::write(dir.join("broken.json"), broken.to_string()).unwrap();

        assert!(check_catalog(&dir, &handle, &mut last).await.is_err());
        assert!(handle.current().await.get("broken").is_none());
        // Same broken state is not retried
        assert!(!check_catalog(&dir, &handle, &mut last).await.unwrap());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_edit_during_build_is_picked_up() {
        let dir = scratch_dir();
        std::fs::write(dir.join("a.json"), template_json("zz-a", "Cisco").to_string()).unwrap();

        // Same order as startup: fingerprint, then build
        let mut last = fingerprint(&dir).ok();
        let handle = CatalogHandle::new(build_catalog(Some(&dir)).unwrap());

        // Edit lands after the build read the directory
        std::fs::write(dir.join("b.json"), template_json("zz-b", "Aruba").to_string()).unwrap();
        assert!(handle.current().await.get("zz-b").is_none());

        assert!(check_catalog(&dir, &handle, &mut last).await.unwrap());
        let current = handle.current().await;
        assert!(current.get("zz-a").is_some());
        assert!(current.get("zz-b").is_some());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_reloader_uses_baseline() {
        let dir = scratch_dir();
        let handle = CatalogHandle::new(TemplateCatalog::builtin().unwrap());
        let baseline = fingerprint(&dir).ok();

        std::fs::write(dir.join("late.json"), template_json("zz-late", "Juniper").to_string()).unwrap();

        let mut reloader = CatalogReloader::new(dir.clone(), handle.clone(), 1, baseline);
        reloader.start();
        // interval fires immediately on the first tick
        for _ in 0..50 {
            if handle.current().await.get("zz-late").is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        reloader.stop();

        assert!(handle.current().await.get("zz-late").is_some());
        std::fs::remove_dir_all(&dir).ok();
    }
}
