//! Notification Config

use clap::Args;

/// Operator notification settings.
#[derive(Debug, Args)]
pub struct NotifyConfig {
    /// Phone number refund deep links are addressed to
    #[arg(long, env = "OPERATOR_PHONE", default_value = "628123456789")]
    pub operator_phone: String,
}
