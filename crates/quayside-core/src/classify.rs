//! Management reply classification
//!
//! Broker rejections carry a diagnostic code embedded in the reply body. A
//! fixed, configurable set of codes means "the resource already exists", which
//! provisioning treats as success (idempotent convergence across cluster
//! members). The code lists are versioned external configuration, not
//! hardcoded in provisioning logic: brokers have shipped different codes for
//! what is effectively the same conflict across versions and code paths.

use serde::{Deserialize, Serialize};

/// Management operations the classifier distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOp {
    CreateAddress,
    CreateQueue,
    DeleteAddress,
    DestroyQueue,
}

impl AdminOp {
    /// Operation name on the broker's management resource
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminOp::CreateAddress => "createAddress",
            AdminOp::CreateQueue => "createQueue",
            AdminOp::DeleteAddress => "deleteAddress",
            AdminOp::DestroyQueue => "destroyQueue",
        }
    }

    /// Whether an already-exists rejection is tolerated for this operation.
    ///
    /// Creation is idempotent; deletion of a nonexistent resource stays a
    /// genuine failure the caller must judge.
    pub fn tolerates_conflict(&self) -> bool {
        matches!(self, AdminOp::CreateAddress | AdminOp::CreateQueue)
    }
}

/// Outcome of classifying one management reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The broker reported success
    Success,
    /// The broker rejected the operation because the target already exists
    AlreadyExists,
    /// Any other rejection, with the diagnostic body
    Rejected(String),
}

/// Classifies management reply bodies against configured diagnostic codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyClassifier {
    /// Codes meaning the address already exists
    pub address_exists_codes: Vec<String>,
    /// Codes meaning the queue already exists
    pub queue_exists_codes: Vec<String>,
}

impl Default for ReplyClassifier {
    fn default() -> Self {
        Self {
            // AMQ229203/AMQ229204 cover address-creation conflicts across
            // broker versions; AMQ229019 is the queue-creation conflict.
            address_exists_codes: vec!["AMQ229203".into(), "AMQ229204".into()],
            queue_exists_codes: vec!["AMQ229019".into()],
        }
    }
}

impl ReplyClassifier {
    /// Classify a reply: `success` is the broker's operation-succeeded flag,
    /// `body` the diagnostic text on failure.
    ///
    /// A failed reply whose body matches no configured code is `Rejected`
    /// carrying the raw body, never silently swallowed.
    pub fn classify(&self, op: AdminOp, success: bool, body: &str) -> Classification {
        if success {
            return Classification::Success;
        }
        if op.tolerates_conflict() && self.codes_for(op).iter().any(|code| body.contains(code)) {
            return Classification::AlreadyExists;
        }
        Classification::Rejected(body.to_string())
    }

    fn codes_for(&self, op: AdminOp) -> &[String] {
        match op {
            AdminOp::CreateAddress | AdminOp::DeleteAddress => &self.address_exists_codes,
            AdminOp::CreateQueue | AdminOp::DestroyQueue => &self.queue_exists_codes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag_wins() {
        let c = ReplyClassifier::default();
        assert_eq!(
            c.classify(AdminOp::CreateAddress, true, ""),
            Classification::Success
        );
    }

    #[test]
    fn test_address_conflict_matched_by_substring() {
        let c = ReplyClassifier::default();
        let body = "AMQ229204: Address orders already exists";
        assert_eq!(
            c.classify(AdminOp::CreateAddress, false, body),
            Classification::AlreadyExists
        );
    }

    #[test]
    fn test_queue_conflict_code_not_valid_for_address() {
        let c = ReplyClassifier::default();
        let body = "AMQ229019: Queue orders already exists";
        assert_eq!(
            c.classify(AdminOp::CreateQueue, false, body),
            Classification::AlreadyExists
        );
        // the queue code must not excuse an address-creation failure
        assert_eq!(
            c.classify(AdminOp::CreateAddress, false, body),
            Classification::Rejected(body.to_string())
        );
    }

    #[test]
    fn test_deletion_never_tolerates_conflict() {
        let c = ReplyClassifier::default();
        let body = "AMQ229019: Queue orders already exists";
        assert_eq!(
            c.classify(AdminOp::DestroyQueue, false, body),
            Classification::Rejected(body.to_string())
        );
    }

    #[test]
    fn test_unknown_rejection_carries_raw_body() {
        let c = ReplyClassifier::default();
        let body = "AMQ229031: Unable to validate user";
        assert_eq!(
            c.classify(AdminOp::CreateQueue, false, body),
            Classification::Rejected(body.to_string())
        );
    }

    #[test]
    fn test_custom_code_list() {
        let c = ReplyClassifier {
            address_exists_codes: vec!["HQ119019".into()],
            queue_exists_codes: vec![],
        };
        assert_eq!(
            c.classify(AdminOp::CreateAddress, false, "HQ119019: exists"),
            Classification::AlreadyExists
        );
        assert_eq!(
            c.classify(AdminOp::CreateAddress, false, "AMQ229204: exists"),
            Classification::Rejected("AMQ229204: exists".into())
        );
    }
}
