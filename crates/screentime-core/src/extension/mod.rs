//! Extension request approval workflow.
//!
//! A request starts `Pending`, collects one response per eligible group
//! member, and is resolved against the configured [`ApprovalPolicy`] after
//! every response:
//!
//! ```text
//! Pending -> Approved   (approvals >= required)
//! Pending -> Denied     (approvals + outstanding < required)
//! ```
//!
//! Resolved requests are final. There is no expiry and no re-opening.

mod policy;

pub use policy::ApprovalPolicy;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ExtensionError, ValidationError};
use crate::events::Event;
use crate::model::{
    ExtensionRequest, ExtensionResponse, ExtensionStatus, Group, ScreenTimeLimit, User,
};

/// Default upper bound for a single request, in minutes.
pub const DEFAULT_MAX_MINUTES: u32 = 120;

/// Response counts for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub eligible: usize,
    pub approvals: usize,
    pub denials: usize,
    pub outstanding: usize,
    pub required: usize,
}

impl Tally {
    pub fn outcome(&self) -> ExtensionStatus {
        if self.eligible == 0 {
            ExtensionStatus::Pending
        } else if self.approvals >= self.required {
            ExtensionStatus::Approved
        } else if self.approvals + self.outstanding < self.required {
            ExtensionStatus::Denied
        } else {
            ExtensionStatus::Pending
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionTracker {
    requests: Vec<ExtensionRequest>,
    policy: ApprovalPolicy,
    max_minutes: u32,
}

impl Default for ExtensionTracker {
    fn default() -> Self {
        Self::new(Vec::new(), ApprovalPolicy::default(), DEFAULT_MAX_MINUTES)
    }
}

impl ExtensionTracker {
    pub fn new(requests: Vec<ExtensionRequest>, policy: ApprovalPolicy, max_minutes: u32) -> Self {
        Self {
            requests,
            policy,
            max_minutes,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn policy(&self) -> ApprovalPolicy {
        self.policy
    }

    pub fn requests(&self) -> &[ExtensionRequest] {
        &self.requests
    }

    pub fn get(&self, request_id: &str) -> Option<&ExtensionRequest> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    pub fn requests_by(&self, user_id: &str) -> Vec<&ExtensionRequest> {
        self.requests.iter().filter(|r| r.user_id == user_id).collect()
    }

    /// Pending requests in `group` that `user_id` may still answer.
    pub fn awaiting_response_from(&self, user_id: &str, group: &Group) -> Vec<&ExtensionRequest> {
        if !group.is_active_member(user_id) {
            return Vec::new();
        }
        self.requests
            .iter()
            .filter(|r| {
                r.is_pending()
                    && r.group_id == group.id
                    && r.user_id != user_id
                    && !r.has_response_from(user_id)
            })
            .collect()
    }

    pub fn tally(&self, request: &ExtensionRequest, group: &Group) -> Tally {
        let eligible: Vec<&str> = group
            .active_members()
            .filter(|m| m.user_id != request.user_id)
            .map(|m| m.user_id.as_str())
            .collect();
        // Responses from members who have since left do not count.
        let counted = request
            .responses
            .iter()
            .filter(|r| eligible.contains(&r.user_id.as_str()));
        let (approvals, denials) = counted.fold((0, 0), |(a, d), r| {
            if r.approved {
                (a + 1, d)
            } else {
                (a, d + 1)
            }
        });
        Tally {
            eligible: eligible.len(),
            approvals,
            denials,
            outstanding: eligible.len() - approvals - denials,
            required: self.policy.required_approvals(eligible.len()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Creates a pending request. Nothing is stored when validation fails.
    pub fn create(
        &mut self,
        app: Option<&ScreenTimeLimit>,
        minutes: u32,
        reason: &str,
        requester: &User,
        group: &Group,
    ) -> Result<Event, CoreError> {
        let app = app.ok_or(ValidationError::Empty("app"))?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::Empty("reason").into());
        }
        if minutes == 0 || minutes > self.max_minutes {
            return Err(ValidationError::InvalidValue {
                field: "minutes".into(),
                message: format!("must be between 1 and {}", self.max_minutes),
            }
            .into());
        }
        if !group.is_active_member(&requester.id) {
            return Err(ExtensionError::NotActiveMember(requester.id.clone()).into());
        }

        let request = ExtensionRequest::pending(
            app.app_id.clone(),
            app.app_name.clone(),
            minutes,
            reason.to_string(),
            requester.id.clone(),
            group.id.clone(),
        );
        tracing::info!(
            request_id = %request.id,
            app_id = %app.app_id,
            minutes,
            "extension requested"
        );

        let event = Event::ExtensionRequested {
            request_id: request.id.clone(),
            group_id: group.id.clone(),
            requester_id: requester.id.clone(),
            requester_name: requester.display_name().to_string(),
            app_name: app.app_name.clone(),
            minutes,
            at: Utc::now(),
        };
        self.requests.push(request);
        Ok(event)
    }

    /// Records one member's decision, then resolves the request if the
    /// policy allows. Returns the response event, followed by the
    /// resolution event when the request was decided.
    pub fn respond(
        &mut self,
        request_id: &str,
        responder: &User,
        approved: bool,
        comment: Option<&str>,
        group: &Group,
    ) -> Result<Vec<Event>, ExtensionError> {
        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        if !approved && comment.is_none() {
            return Err(ExtensionError::CommentRequired);
        }

        let request = self.pending_mut(request_id)?;
        if request.user_id == responder.id {
            return Err(ExtensionError::SelfResponse);
        }
        if request.group_id != group.id || !group.is_active_member(&responder.id) {
            return Err(ExtensionError::NotActiveMember(responder.id.clone()));
        }
        if request.has_response_from(&responder.id) {
            return Err(ExtensionError::DuplicateResponse(responder.id.clone()));
        }

        request.responses.push(ExtensionResponse::new(
            request_id,
            responder.id.clone(),
            approved,
            comment.map(str::to_string),
        ));
        request.updated_at = Utc::now();
        tracing::debug!(
            request_id,
            responder = %responder.id,
            approved,
            "extension response recorded"
        );

        let mut events = vec![Event::ExtensionResponded {
            request_id: request_id.to_string(),
            responder_id: responder.id.clone(),
            approved,
            at: Utc::now(),
        }];
        events.extend(self.resolve(request_id, group)?);
        Ok(events)
    }

    /// Applies the policy to a pending request. Returns `None` while the
    /// outcome is still open.
    pub fn resolve(
        &mut self,
        request_id: &str,
        group: &Group,
    ) -> Result<Option<Event>, ExtensionError> {
        let tally = self.tally(self.pending(request_id)?, group);
        let status = tally.outcome();
        if status == ExtensionStatus::Pending {
            return Ok(None);
        }

        let request = self.pending_mut(request_id)?;
        request.status = status;
        request.updated_at = Utc::now();
        tracing::info!(
            request_id,
            %status,
            approvals = tally.approvals,
            required = tally.required,
            "extension resolved"
        );

        Ok(Some(Event::ExtensionResolved {
            request_id: request.id.clone(),
            requester_id: request.user_id.clone(),
            app_id: request.app_id.clone(),
            app_name: request.app_name.clone(),
            minutes: request.requested_minutes,
            status,
            at: Utc::now(),
        }))
    }

    fn pending(&self, request_id: &str) -> Result<&ExtensionRequest, ExtensionError> {
        let request = self
            .get(request_id)
            .ok_or_else(|| ExtensionError::NotFound(request_id.to_string()))?;
        if !request.is_pending() {
            return Err(ExtensionError::AlreadyResolved {
                id: request.id.clone(),
                status: request.status.to_string(),
            });
        }
        Ok(request)
    }

    fn pending_mut(&mut self, request_id: &str) -> Result<&mut ExtensionRequest, ExtensionError> {
        self.pending(request_id)?;
        self.requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| ExtensionError::NotFound(request_id.to_string()))
    }
}
