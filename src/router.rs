// Section routing. Each navigation spawns the target section's load as its
// own task and aborts whatever load was still running for the previous one,
// so a slow response can never overwrite the section the user moved to.

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::Result;
use crate::view::SectionView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Dashboard,
    Workouts,
    Nutrition,
    Goals,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Workouts,
        Section::Nutrition,
        Section::Goals,
    ];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Dashboard => "Dashboard",
            Section::Workouts => "Workouts",
            Section::Nutrition => "Nutrition",
            Section::Goals => "Goals",
        };
        f.write_str(s)
    }
}

struct PendingLoad {
    section: Section,
    handle: JoinHandle<Result<SectionView>>,
}

/// Tracks the active section and its in-flight load. `None` means the user
/// is not signed in.
#[derive(Default)]
pub struct Router {
    current: Option<Section>,
    pending: Option<PendingLoad>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Section> {
        self.current
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Make `section` active and start loading it.
    pub fn navigate<F>(&mut self, section: Section, load: F)
    where
        F: Future<Output = Result<SectionView>> + Send + 'static,
    {
        self.cancel_pending();
        debug!(%section, "navigating");
        self.current = Some(section);
        self.pending = Some(PendingLoad {
            section,
            handle: tokio::spawn(load),
        });
    }

    /// Wait for the in-flight load. Returns nothing if the load was aborted
    /// or belongs to a section that is no longer active.
    pub async fn settle(&mut self) -> Option<Result<SectionView>> {
        let pending = self.pending.take()?;
        let outcome = match pending.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(section = %pending.section, error = %e, "section load did not finish");
                return None;
            }
        };
        let stale = match &outcome {
            Ok(view) => view.section() != pending.section,
            Err(_) => false,
        };
        if stale || self.current != Some(pending.section) {
            debug!(section = %pending.section, "dropping stale section data");
            return None;
        }
        Some(outcome)
    }

    /// Back to the signed-out state.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.current = None;
    }

    fn cancel_pending(&mut self) {
        if let Some(prev) = self.pending.take() {
            debug!(section = %prev.section, "aborting section load");
            prev.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn navigating_away_aborts_the_previous_load() {
        let mut router = Router::new();
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        router.navigate(Section::Workouts, async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(SectionView::Workouts(vec![]))
        });
        router.navigate(Section::Goals, async { Ok(SectionView::Goals(vec![])) });

        let view = router.settle().await.unwrap().unwrap();
        assert_eq!(view, SectionView::Goals(vec![]));
        assert_eq!(router.current(), Some(Section::Goals));
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn reset_discards_pending_load() {
        let mut router = Router::new();
        router.navigate(Section::Dashboard, async { Ok(SectionView::Workouts(vec![])) });
        router.reset();
        assert_eq!(router.current(), None);
        assert!(!router.is_loading());
        assert!(router.settle().await.is_none());
    }

    #[tokio::test]
    async fn mismatched_view_is_dropped() {
        let mut router = Router::new();
        router.navigate(Section::Nutrition, async { Ok(SectionView::Goals(vec![])) });
        assert!(router.settle().await.is_none());
    }

    #[tokio::test]
    async fn load_errors_are_handed_back() {
        let mut router = Router::new();
        router.navigate(Section::Workouts, async {
            Err(crate::error::ClientError::validation("boom"))
        });
        assert!(matches!(router.settle().await, Some(Err(_))));
    }
}
