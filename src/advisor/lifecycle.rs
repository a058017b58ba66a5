use crate::error::{MarketError, Result, ValidationError};
use crate::models::{AdvisorRequest, NewAdvisorRequest, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome an advisor can give a pending request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl From<Verdict> for RequestStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Approved => RequestStatus::Approved,
            Verdict::Rejected => RequestStatus::Rejected,
        }
    }
}

/// Everything a single status transition writes
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub verdict: Verdict,
    pub response: String,
    pub advisor_id: String,
}

impl Decision {
    pub fn new(verdict: Verdict, response: impl Into<String>, advisor_id: impl Into<String>) -> Self {
        Self {
            verdict,
            response: response.into(),
            advisor_id: advisor_id.into(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.response.trim().is_empty() {
            return Err(ValidationError::MissingField("response"));
        }
        Ok(())
    }
}

/// Build a fresh request. Status is always pending with no response fields,
/// whatever the submission contained.
pub fn open_request(
    id: String,
    submission: NewAdvisorRequest,
    requester_id: &str,
    now: DateTime<Utc>,
) -> AdvisorRequest {
    AdvisorRequest {
        id,
        property_id: submission.property_id,
        user_id: requester_id.to_string(),
        status: RequestStatus::Pending,
        message: submission.message,
        response: None,
        created_at: now,
        responded_at: None,
        advisor_id: None,
    }
}

/// Transition a pending request to its decided state.
///
/// Either every decided field is written or, on error, `request` is left as it was.
pub fn decide(request: &mut AdvisorRequest, decision: &Decision, now: DateTime<Utc>) -> Result<()> {
    if request.status != RequestStatus::Pending {
        return Err(MarketError::PreconditionFailed(format!(
            "advisor request {} is already {}",
            request.id,
            request.status.label().to_lowercase()
        )));
    }

    request.status = decision.verdict.into();
    request.response = Some(decision.response.clone());
    request.responded_at = Some(now);
    request.advisor_id = Some(decision.advisor_id.clone());
    Ok(())
}

/// Check the pending/decided field invariant on a stored record
pub fn is_consistent(request: &AdvisorRequest) -> bool {
    let decided = request.status.is_terminal();
    decided == request.response.is_some()
        && decided == request.responded_at.is_some()
        && decided == request.advisor_id.is_some()
}
