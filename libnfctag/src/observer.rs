// libnfctag/src/observer.rs

use log::info;

use crate::tag::TagSummary;

/// Tag lifecycle callbacks, fired once per physical arrival and departure.
/// Called from the controller event thread or the presence monitor; must
/// not call back into blocking engine operations.
pub trait TagObserver: Send + Sync {
    fn on_tag_arrived(&self, summary: &TagSummary);
    fn on_tag_departed(&self);
}

/// Observer that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl TagObserver for LogObserver {
    fn on_tag_arrived(&self, summary: &TagSummary) {
        info!(
            "tag arrived: uid={} techs={:?}",
            summary.uid.to_hex(),
            summary.technologies
        );
    }

    fn on_tag_departed(&self) {
        info!("tag departed");
    }
}
