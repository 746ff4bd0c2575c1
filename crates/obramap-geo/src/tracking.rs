//! Live position tracking session.
//!
//! Wraps the proximity engine in an explicitly owned open/close lifecycle:
//! the platform's location watch feeds samples in arrival order, only the
//! most recent sample matters, and closing the session clears dependent
//! activation state so no stale obra stays "active" after teardown.

use crate::proximity::{evaluate, SiteIndex};
use obramap_core::models::PositionSample;
use serde::Serialize;

/// Owned snapshot of the currently active obra.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveObra {
    pub id_unico: String,
    pub nome: Option<String>,
    pub distance_m: f64,
}

/// One location-tracking session over a loaded obra set.
///
/// The site set is read-only for the session's lifetime; reloading obras
/// means building a new session.
#[derive(Debug)]
pub struct TrackingSession {
    index: SiteIndex,
    last: Option<PositionSample>,
    active: Option<ActiveObra>,
    closed: bool,
}

impl TrackingSession {
    pub fn new(index: SiteIndex) -> Self {
        Self { index, last: None, active: None, closed: false }
    }

    /// Consume one position sample and re-evaluate proximity.
    ///
    /// Last write wins; no history is retained. Returns the active obra
    /// after this sample, or `None` when no site qualifies. Samples
    /// delivered after [`close`](Self::close) are ignored.
    pub fn update(&mut self, sample: PositionSample) -> Option<&ActiveObra> {
        if self.closed {
            return None;
        }

        self.last = Some(sample);
        let position = sample.coordinate();
        self.active = evaluate(&position, self.index.sites()).map(|hit| ActiveObra {
            id_unico: hit.site.id_unico.clone(),
            nome: hit.site.nome.clone(),
            distance_m: hit.distance_m,
        });
        self.active.as_ref()
    }

    /// The active obra from the most recent sample, if any.
    pub fn active(&self) -> Option<&ActiveObra> {
        self.active.as_ref()
    }

    /// The most recent position sample, or `None` before the first fix
    /// and after close.
    pub fn last_position(&self) -> Option<&PositionSample> {
        self.last.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// End the session. Idempotent; clears the last position and the
    /// active obra so the UI cannot act on stale activation state.
    pub fn close(&mut self) {
        self.closed = true;
        self.last = None;
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obramap_core::models::Obra;

    fn session_with_one_site() -> TrackingSession {
        let mut obra = Obra::with_id("A");
        obra.geometria = Some("-8.0476,-34.877".to_string());
        TrackingSession::new(SiteIndex::from_obras(&[obra], 150.0))
    }

    #[test]
    fn test_no_fix_means_no_activation() {
        let session = session_with_one_site();
        assert!(session.active().is_none());
        assert!(session.last_position().is_none());
    }

    #[test]
    fn test_update_activates_within_radius() {
        let mut session = session_with_one_site();
        let active = session.update(PositionSample::new(-8.0476, -34.877, 10.0)).unwrap();
        assert_eq!(active.id_unico, "A");
    }

    #[test]
    fn test_last_write_wins() {
        let mut session = session_with_one_site();
        session.update(PositionSample::new(-8.0476, -34.877, 10.0));
        assert!(session.active().is_some());

        // Moving away deactivates; only the latest sample counts.
        session.update(PositionSample::new(-8.06, -34.89, 10.0));
        assert!(session.active().is_none());
        assert_eq!(session.last_position().unwrap().latitude, -8.06);
    }

    #[test]
    fn test_close_clears_state_and_is_idempotent() {
        let mut session = session_with_one_site();
        session.update(PositionSample::new(-8.0476, -34.877, 10.0));

        session.close();
        assert!(session.is_closed());
        assert!(session.active().is_none());
        assert!(session.last_position().is_none());

        session.close(); // second close is a no-op
        assert!(session.is_closed());
    }

    #[test]
    fn test_updates_after_close_are_ignored() {
        let mut session = session_with_one_site();
        session.close();
        assert!(session.update(PositionSample::new(-8.0476, -34.877, 10.0)).is_none());
        assert!(session.active().is_none());
    }
}
