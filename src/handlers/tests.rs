//! Handler-level tests
//!
//! Pure command and result checks; the end-to-end paths run against a real
//! database in tests/integration_api.rs.

#[cfg(test)]
mod tests {
    use crate::domain::{Recipient, DEFAULT_SUSPENSION_REASON};
    use crate::error::AppError;
    use crate::handlers::SuspendAccountCommand;
    use uuid::Uuid;

    #[test]
    fn test_suspend_command_defaults() {
        let account_id = Uuid::new_v4();
        let cmd = SuspendAccountCommand::new(account_id);

        assert_eq!(cmd.account_id, account_id);
        assert!(cmd.reason.is_none());
    }

    #[test]
    fn test_suspend_command_with_reason() {
        let cmd = SuspendAccountCommand::new(Uuid::new_v4())
            .with_reason("terms violation".to_string());

        assert_eq!(cmd.reason, Some("terms violation".to_string()));
    }

    #[test]
    fn test_default_suspension_reason_is_fixed() {
        assert_eq!(DEFAULT_SUSPENSION_REASON, "Suspended by administrator");
    }

    #[test]
    fn test_recipient_validation_precedes_storage() {
        // The handlers validate before building any query; an empty
        // descriptor must fail the same way both of them see it.
        let empty = Recipient::default();
        assert!(matches!(empty.validate(), Err(AppError::InvalidRecipient)));
    }
}
