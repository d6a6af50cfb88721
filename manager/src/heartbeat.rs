//! Poll/answer liveness bookkeeping for service recipes

use crate::constants::maintenance::HEARTBEAT_GAP_SECONDS;
use crate::service::Service;
use chrono::{DateTime, Duration, Utc};

pub struct PollHeartbeat;

impl PollHeartbeat {
    #[inline]
    pub fn record_poll_sent(service: &mut Service, now: DateTime<Utc>) {
        service.last_poll = Some(now);
    }

    #[inline]
    pub fn record_poll_answered(service: &mut Service, now: DateTime<Utc>) {
        service.last_poll_answer = Some(now);
    }

    pub fn reset(service: &mut Service, now: DateTime<Utc>) {
        service.last_poll_answer = Some(now);
        service.last_poll = Some(now);
    }

    /// Time between the last poll and its answer. `None` until a poll was sent;
    /// a poll that was never answered counts from the epoch.
    pub fn gap(service: &Service) -> Option<Duration> {
        let last_poll = service.last_poll?;
        let answered = service
            .last_poll_answer
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Some(last_poll - answered)
    }

    pub fn is_gap_open(service: &Service) -> bool {
        Self::gap(service)
            .map(|gap| gap > Duration::seconds(HEARTBEAT_GAP_SECONDS))
            .unwrap_or(false)
    }
}
