//! Current-site holder with build-then-swap reloads.
//!
//! # Thread Safety
//!
//! `Site` is designed for concurrent access:
//! - `snapshot()` returns `Arc<SiteSnapshot>` with minimal locking (just Arc clone)
//! - `reload_if_needed()` uses double-checked locking so that a burst of
//!   invalidations results in a single rebuild
//! - `invalidate()` is lock-free (atomic flag)
//!
//! A rebuild scans the whole content directory into a new snapshot and only
//! then swaps it in. Readers never observe a partially built tree, and a
//! failed rebuild leaves the previous snapshot in place.
//!
//! # Example
//!
//! ```no_run
//! use mdw_site::{BuildContext, Site, SiteOptions};
//!
//! let ctx = BuildContext::new("content", SiteOptions::default())?;
//! let site = Site::new(ctx);
//!
//! let snapshot = site.reload_if_needed()?;
//! let home = snapshot.index().lookup("/");
//!
//! // Called by a file watcher.
//! site.invalidate();
//! # Ok::<(), mdw_site::BuildError>(())
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::context::BuildContext;
use crate::error::BuildError;
use crate::navigation::NavigationNode;
use crate::page::Page;
use crate::site_index::SiteIndex;

/// A fully built navigation tree and its index.
#[derive(Debug)]
pub struct SiteSnapshot {
    root: NavigationNode,
    index: SiteIndex,
}

impl SiteSnapshot {
    /// Root navigation node.
    #[must_use]
    pub fn root(&self) -> &NavigationNode {
        &self.root
    }

    /// URL index over all pages.
    #[must_use]
    pub fn index(&self) -> &SiteIndex {
        &self.index
    }
}

/// Lifecycle events passed to hooks registered with [`Site::with_hook`].
#[derive(Debug)]
pub enum HookEvent<'a> {
    /// A rebuild is about to scan the content directory.
    PreScan {
        /// Content root being scanned.
        content_dir: &'a Path,
    },
    /// The tree has been built; the index is not yet swapped in.
    PostScan {
        /// Freshly built root node.
        root: &'a NavigationNode,
    },
    /// A new snapshot is current.
    Swapped {
        /// The snapshot now served.
        snapshot: &'a Arc<SiteSnapshot>,
    },
    /// The rebuild failed; the previous snapshot is still current.
    Failed {
        /// Error that aborted the rebuild.
        error: &'a BuildError,
    },
}

/// Callback invoked for every [`HookEvent`].
pub type Hook = Box<dyn Fn(&HookEvent<'_>) + Send + Sync>;

/// The current site, rebuilt on demand.
pub struct Site {
    ctx: BuildContext,
    hooks: Vec<Hook>,
    /// Mutex for serializing rebuilds.
    reload_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current: RwLock<Option<Arc<SiteSnapshot>>>,
    /// Snapshot validity flag.
    valid: AtomicBool,
}

impl Site {
    /// Create a site. Nothing is built until the first reload.
    #[must_use]
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            ctx,
            hooks: Vec::new(),
            reload_lock: Mutex::new(()),
            current: RwLock::new(None),
            valid: AtomicBool::new(false),
        }
    }

    /// Register a lifecycle hook. Hooks run in registration order.
    #[must_use]
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HookEvent<'_>) + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Build context used for every rebuild.
    #[must_use]
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Current snapshot, if a build has succeeded.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<SiteSnapshot>> {
        self.current.read().unwrap().clone()
    }

    /// Whether the current snapshot is up to date.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Mark the current snapshot stale.
    ///
    /// Next `reload_if_needed()` will rebuild. Current readers continue
    /// using their existing `Arc<SiteSnapshot>`.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    /// Return the current snapshot, rebuilding first if it is stale.
    ///
    /// # Errors
    ///
    /// Returns the [`BuildError`] of a failed rebuild. The previous snapshot
    /// stays current and the site stays invalid, so the next call retries.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload_if_needed(&self) -> Result<Arc<SiteSnapshot>, BuildError> {
        // Fast path: snapshot valid
        if self.is_valid()
            && let Some(snapshot) = self.snapshot()
        {
            return Ok(snapshot);
        }

        let _guard = self.reload_lock.lock().unwrap();

        // Double-check after acquiring lock
        if self.is_valid()
            && let Some(snapshot) = self.snapshot()
        {
            return Ok(snapshot);
        }

        self.rebuild_locked()
    }

    /// Rebuild unconditionally and swap in the result.
    ///
    /// # Errors
    ///
    /// Returns the [`BuildError`] that aborted the rebuild. The previous
    /// snapshot stays current.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn rebuild(&self) -> Result<Arc<SiteSnapshot>, BuildError> {
        let _guard = self.reload_lock.lock().unwrap();
        self.rebuild_locked()
    }

    /// Look up a page in the current snapshot without rebuilding.
    #[must_use]
    pub fn lookup(&self, url: &str) -> Option<Arc<Page>> {
        self.snapshot()?.index().lookup(url).cloned()
    }

    /// Caller must hold `reload_lock`.
    fn rebuild_locked(&self) -> Result<Arc<SiteSnapshot>, BuildError> {
        // Invalidations arriving during the scan flip this back to false.
        self.valid.store(true, Ordering::Release);

        match self.build_snapshot() {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.current.write().unwrap() = Some(Arc::clone(&snapshot));
                self.emit(&HookEvent::Swapped {
                    snapshot: &snapshot,
                });
                tracing::info!(pages = snapshot.index().len(), "Site snapshot swapped");
                Ok(snapshot)
            }
            Err(error) => {
                self.valid.store(false, Ordering::Release);
                tracing::error!(error = %error, "Site rebuild failed, keeping previous snapshot");
                self.emit(&HookEvent::Failed { error: &error });
                Err(error)
            }
        }
    }

    fn build_snapshot(&self) -> Result<SiteSnapshot, BuildError> {
        self.emit(&HookEvent::PreScan {
            content_dir: self.ctx.root(),
        });
        let root = NavigationNode::build(&self.ctx)?;
        self.emit(&HookEvent::PostScan { root: &root });
        let index = SiteIndex::flatten(&root);
        Ok(SiteSnapshot { root, index })
    }

    fn emit(&self, event: &HookEvent<'_>) {
        for hook in &self.hooks {
            hook(event);
        }
    }
}
