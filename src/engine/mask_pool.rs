//! Per-group mask allocator.
//!
//! Masks are short display tokens substituted for a member's identity.
//! Uniqueness holds per group at one instant; assignments are recycled once a
//! member's activity goes stale past the configured TTL.

use crate::error::{OperationError, OperationResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// A mask currently held by a member.
#[derive(Debug, Clone)]
pub struct MaskAssignment {
    pub mask: String,
    pub assigned_at: DateTime<Utc>,
}

struct PoolState {
    universe: Vec<String>,
    ttl_secs: u64,
    live: HashMap<i64, MaskAssignment>,
}

/// A single group's mask allocator. Concurrent callers serialize on the
/// internal lock; pools across groups are fully independent.
pub struct MaskPool {
    state: Mutex<PoolState>,
}

impl MaskPool {
    pub fn new(universe: Vec<String>, ttl_secs: u64) -> Self {
        Self {
            state: Mutex::new(PoolState {
                universe,
                ttl_secs,
                live: HashMap::new(),
            }),
        }
    }

    /// Allocate or return a member's mask.
    ///
    /// `pinned` is the member's persisted pinned mask, if any — it bypasses
    /// rotation and is returned regardless of `renew` except when `renew` is
    /// requested explicitly by `/change`, which still honors a pin (a pinned
    /// mask cannot be renewed away; callers clear the pin first).
    pub fn get_mask(
        &self,
        member_id: i64,
        pinned: Option<&str>,
        renew: bool,
        now: DateTime<Utc>,
    ) -> OperationResult<(bool, String)> {
        if !renew
            && let Some(pinned) = pinned
        {
            return Ok((false, pinned.to_string()));
        }

        let mut state = self.state.lock();

        if !renew
            && let Some(existing) = state.live.get(&member_id)
        {
            return Ok((false, existing.mask.clone()));
        }

        self.evict_stale(&mut state, now);

        let held: std::collections::HashSet<&str> =
            state.live.values().map(|a| a.mask.as_str()).collect();
        let candidates: Vec<&String> =
            state.universe.iter().filter(|m| !held.contains(m.as_str())).collect();

        let chosen = candidates
            .choose(&mut rand::thread_rng())
            .map(|s| (*s).clone())
            .ok_or(OperationError::MaskNotAvailable)?;

        state.live.insert(
            member_id,
            MaskAssignment {
                mask: chosen.clone(),
                assigned_at: now,
            },
        );

        Ok((true, chosen))
    }

    /// Release a member's live (non-pinned) mask, e.g. on leave/ban.
    pub fn release(&self, member_id: i64) {
        self.state.lock().live.remove(&member_id);
    }

    fn evict_stale(&self, state: &mut PoolState, now: DateTime<Utc>) {
        let ttl = state.ttl_secs as i64;
        state
            .live
            .retain(|_, assignment| (now - assignment.assigned_at).num_seconds() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("mask{i}")).collect()
    }

    #[test]
    fn assigns_and_remembers() {
        let pool = MaskPool::new(universe(5), 3600);
        let now = Utc::now();
        let (created, mask) = pool.get_mask(1, None, false, now).unwrap();
        assert!(created);
        let (created_again, mask_again) = pool.get_mask(1, None, false, now).unwrap();
        assert!(!created_again);
        assert_eq!(mask, mask_again);
    }

    #[test]
    fn pinned_mask_bypasses_pool() {
        let pool = MaskPool::new(universe(5), 3600);
        let now = Utc::now();
        let (created, mask) = pool.get_mask(1, Some("🦊"), false, now).unwrap();
        assert!(!created);
        assert_eq!(mask, "🦊");
    }

    #[test]
    fn exhaustion_raises_mask_not_available() {
        let pool = MaskPool::new(universe(2), 3600);
        let now = Utc::now();
        pool.get_mask(1, None, false, now).unwrap();
        pool.get_mask(2, None, false, now).unwrap();
        let err = pool.get_mask(3, None, false, now).unwrap_err();
        assert!(matches!(err, OperationError::MaskNotAvailable));
    }

    #[test]
    fn stale_assignment_is_recycled() {
        let pool = MaskPool::new(universe(1), 1);
        let t0 = Utc::now();
        let (_, mask0) = pool.get_mask(1, None, false, t0).unwrap();
        let t1 = t0 + chrono::Duration::seconds(10);
        let (created, mask1) = pool.get_mask(2, None, false, t1).unwrap();
        assert!(created);
        assert_eq!(mask0, mask1);
    }

    #[test]
    fn renew_draws_a_fresh_mask_when_available() {
        let pool = MaskPool::new(universe(5), 3600);
        let now = Utc::now();
        pool.get_mask(1, None, false, now).unwrap();
        let (created, _) = pool.get_mask(1, None, true, now).unwrap();
        assert!(created);
    }
}
