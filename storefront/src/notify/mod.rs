//! Signup notifications
//!
//! Delivery is best-effort: the signup flow logs a failed notification and
//! moves on, the lead is already stored at that point.

use shared::error::AppResult;
use shared::models::Lead;

/// Sends the welcome message for a new or returning customer
pub trait SignupNotifier: Send + Sync {
    fn send_welcome(&self, lead: &Lead) -> AppResult<()>;
}

/// Writes the welcome notification to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl SignupNotifier for LogNotifier {
    fn send_welcome(&self, lead: &Lead) -> AppResult<()> {
        tracing::info!(
            customer_id = lead.customer_id,
            email = %lead.email,
            source = lead.auth_provider.label(),
            "Welcome notification sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::LeadCreate;

    #[test]
    fn test_log_notifier_succeeds() {
        let lead = Lead::from_create(
            2_024_001,
            LeadCreate {
                name: "Kabir".to_string(),
                email: "kabir@example.com".to_string(),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(LogNotifier.send_welcome(&lead).is_ok());
    }
}
