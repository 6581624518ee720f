//! Per-app daily limits and usage aggregation.
//!
//! Totals are computed on demand from the two lists, so they can never
//! drift from the records they summarize. Each user only ever sees and
//! changes their own records.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;
use crate::model::{ScreenTimeLimit, ScreenTimeUsage};

/// Display row for one app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStatus {
    pub app_id: String,
    pub app_name: String,
    pub icon_name: String,
    pub daily_limit_minutes: u32,
    pub minutes_used: u32,
    pub remaining_minutes: u32,
    pub usage_percentage: f64,
    pub blocked: bool,
}

/// Aggregate numbers for the home screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsSummary {
    pub total_daily_limit: u32,
    pub total_minutes_used: u32,
    pub remaining_minutes: u32,
    pub usage_percentage: f64,
    pub is_over_limit: bool,
}

/// Every user's limits and usage. Records are keyed by `(user_id, app_id)`;
/// queries go through [`LimitsTracker::for_user`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsTracker {
    limits: Vec<ScreenTimeLimit>,
    usage: Vec<ScreenTimeUsage>,
}

impl LimitsTracker {
    pub fn new(limits: Vec<ScreenTimeLimit>, usage: Vec<ScreenTimeUsage>) -> Self {
        Self { limits, usage }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// All records, for persistence.
    pub fn limits(&self) -> &[ScreenTimeLimit] {
        &self.limits
    }

    pub fn usage(&self) -> &[ScreenTimeUsage] {
        &self.usage
    }

    pub fn for_user<'a>(&'a self, user_id: &'a str) -> UserLimits<'a> {
        UserLimits {
            user_id,
            tracker: self,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Adds a limit for a new app, or replaces the limit of a known one.
    /// The owner is `limit.user_id`.
    pub fn upsert_limit(&mut self, limit: ScreenTimeLimit) -> Event {
        let event = Event::LimitUpdated {
            app_id: limit.app_id.clone(),
            daily_limit_minutes: limit.daily_limit_minutes,
            at: Utc::now(),
        };
        match self.limit_mut(&limit.user_id, &limit.app_id) {
            Some(existing) => {
                existing.daily_limit_minutes = limit.daily_limit_minutes;
                existing.updated_at = Utc::now();
            }
            None => self.limits.push(limit),
        }
        event
    }

    pub fn update_limit(
        &mut self,
        user_id: &str,
        app_id: &str,
        minutes: u32,
    ) -> Result<Event, ValidationError> {
        let limit = self
            .limit_mut(user_id, app_id)
            .ok_or_else(|| ValidationError::UnknownApp(app_id.to_string()))?;
        limit.daily_limit_minutes = minutes;
        limit.updated_at = Utc::now();
        tracing::debug!(user_id, app_id, minutes, "daily limit updated");
        Ok(Event::LimitUpdated {
            app_id: app_id.to_string(),
            daily_limit_minutes: minutes,
            at: Utc::now(),
        })
    }

    /// Raises one app's limit by an approved extension.
    pub fn grant_extension(
        &mut self,
        user_id: &str,
        app_id: &str,
        minutes: u32,
    ) -> Result<Event, ValidationError> {
        let current = self
            .for_user(user_id)
            .limit_for(app_id)
            .map(|l| l.daily_limit_minutes)
            .ok_or_else(|| ValidationError::UnknownApp(app_id.to_string()))?;
        tracing::info!(user_id, app_id, minutes, "extension granted");
        self.update_limit(user_id, app_id, current.saturating_add(minutes))
    }

    /// Adds minutes to an app's usage, creating the usage record on first
    /// use. Apps without a configured limit are rejected.
    pub fn add_usage_time(
        &mut self,
        user_id: &str,
        app_id: &str,
        minutes: u32,
    ) -> Result<Event, ValidationError> {
        let existing = self
            .usage
            .iter_mut()
            .find(|u| u.user_id == user_id && u.app_id == app_id);
        let minutes_used = if let Some(usage) = existing {
            usage.minutes_used = usage.minutes_used.saturating_add(minutes);
            usage.minutes_used
        } else {
            let limit = self
                .for_user(user_id)
                .limit_for(app_id)
                .ok_or_else(|| ValidationError::UnknownApp(app_id.to_string()))?;
            let usage = ScreenTimeUsage::new(
                limit.app_id.clone(),
                limit.app_name.clone(),
                minutes,
                user_id,
            );
            self.usage.push(usage);
            minutes
        };

        if self.for_user(user_id).is_app_blocked(app_id) {
            tracing::warn!(user_id, app_id, minutes_used, "app is now blocked");
        }

        Ok(Event::UsageRecorded {
            app_id: app_id.to_string(),
            minutes_added: minutes,
            minutes_used,
            at: Utc::now(),
        })
    }

    /// Zeroes one user's usage.
    pub fn reset_usage(&mut self, user_id: &str) -> Event {
        for usage in self.usage.iter_mut().filter(|u| u.user_id == user_id) {
            usage.minutes_used = 0;
        }
        Event::UsageReset { at: Utc::now() }
    }

    fn limit_mut(&mut self, user_id: &str, app_id: &str) -> Option<&mut ScreenTimeLimit> {
        self.limits
            .iter_mut()
            .find(|l| l.user_id == user_id && l.app_id == app_id)
    }
}

/// Read-only view of one user's limits and usage.
///
/// Totals are computed on demand and saturate at `u32::MAX`.
#[derive(Debug, Clone, Copy)]
pub struct UserLimits<'a> {
    user_id: &'a str,
    tracker: &'a LimitsTracker,
}

impl<'a> UserLimits<'a> {
    pub fn user_id(&self) -> &'a str {
        self.user_id
    }

    pub fn limits(&self) -> impl Iterator<Item = &'a ScreenTimeLimit> + 'a {
        let user_id = self.user_id;
        self.tracker.limits.iter().filter(move |l| l.user_id == user_id)
    }

    pub fn usage(&self) -> impl Iterator<Item = &'a ScreenTimeUsage> + 'a {
        let user_id = self.user_id;
        self.tracker.usage.iter().filter(move |u| u.user_id == user_id)
    }

    pub fn limit_for(&self, app_id: &str) -> Option<&'a ScreenTimeLimit> {
        self.limits().find(|l| l.app_id == app_id)
    }

    pub fn usage_for(&self, app_id: &str) -> Option<&'a ScreenTimeUsage> {
        self.usage().find(|u| u.app_id == app_id)
    }

    pub fn total_daily_limit(&self) -> u32 {
        self.limits()
            .map(|l| l.daily_limit_minutes)
            .fold(0, u32::saturating_add)
    }

    pub fn total_minutes_used(&self) -> u32 {
        self.usage().map(|u| u.minutes_used).fold(0, u32::saturating_add)
    }

    pub fn remaining_minutes(&self) -> u32 {
        self.total_daily_limit()
            .saturating_sub(self.total_minutes_used())
    }

    /// Used / limit as a fraction; 0.0 when there is no limit.
    pub fn usage_percentage(&self) -> f64 {
        ratio(self.total_minutes_used(), self.total_daily_limit())
    }

    pub fn is_over_limit(&self) -> bool {
        self.total_minutes_used() > self.total_daily_limit()
    }

    /// Blocked only when the overall budget is blown *and* this app has
    /// used up its own allowance.
    pub fn is_app_blocked(&self, app_id: &str) -> bool {
        if !self.is_over_limit() {
            return false;
        }
        match (self.usage_for(app_id), self.limit_for(app_id)) {
            (Some(usage), Some(limit)) => usage.minutes_used >= limit.daily_limit_minutes,
            _ => false,
        }
    }

    pub fn summary(&self) -> LimitsSummary {
        LimitsSummary {
            total_daily_limit: self.total_daily_limit(),
            total_minutes_used: self.total_minutes_used(),
            remaining_minutes: self.remaining_minutes(),
            usage_percentage: self.usage_percentage(),
            is_over_limit: self.is_over_limit(),
        }
    }

    pub fn per_app_status(&self) -> Vec<AppStatus> {
        self.limits()
            .map(|limit| {
                let used = self
                    .usage_for(&limit.app_id)
                    .map(|u| u.minutes_used)
                    .unwrap_or(0);
                AppStatus {
                    app_id: limit.app_id.clone(),
                    app_name: limit.app_name.clone(),
                    icon_name: limit.icon_name.clone(),
                    daily_limit_minutes: limit.daily_limit_minutes,
                    minutes_used: used,
                    remaining_minutes: limit.daily_limit_minutes.saturating_sub(used),
                    usage_percentage: ratio(used, limit.daily_limit_minutes),
                    blocked: self.is_app_blocked(&limit.app_id),
                }
            })
            .collect()
    }
}

fn ratio(used: u32, limit: u32) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    f64::from(used) / f64::from(limit)
}
