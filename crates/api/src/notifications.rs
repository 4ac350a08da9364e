//! New-lead notification fan-out
//!
//! Notifies configured channels (email via Resend, SMS via Twilio, Telegram)
//! when a lead lands. Channels missing their credentials are skipped, and a
//! notification problem never fails the lead write it follows.
//!
//! TODO: replace the logging stubs with real Resend/Twilio/Telegram delivery.

/// Which delivery channels are configured. Only presence is tracked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationChannels {
    pub email: bool,
    pub sms: bool,
    pub telegram: bool,
}

/// Sends new-lead notifications across all configured channels
pub struct NotificationService {
    channels: NotificationChannels,
}

impl NotificationService {
    pub fn new(channels: NotificationChannels) -> Self {
        Self { channels }
    }

    /// Read channel configuration from the environment.
    ///
    /// Email needs `RESEND_API_KEY`, SMS needs both `TWILIO_SID` and
    /// `TWILIO_AUTH_TOKEN`, Telegram needs `TELEGRAM_BOT_TOKEN`.
    pub fn from_env() -> Self {
        let channels = NotificationChannels {
            email: env_present("RESEND_API_KEY"),
            sms: env_present("TWILIO_SID") && env_present("TWILIO_AUTH_TOKEN"),
            telegram: env_present("TELEGRAM_BOT_TOKEN"),
        };

        tracing::info!(
            email = channels.email,
            sms = channels.sms,
            telegram = channels.telegram,
            "Notification channels configured"
        );

        Self::new(channels)
    }

    /// Fan out a new-lead notification to every configured channel.
    ///
    /// Email goes to the organization owner's registered address when one is
    /// known.
    pub async fn notify_new_lead(&self, to_email: Option<&str>, name: &str, description: Option<&str>) {
        let subject = "New Lead Available - GetLead.Store";
        let message = build_lead_message(name, description);

        let email = self.send_email(to_email.unwrap_or(""), subject, &message).await;
        // Owner notification numbers are not stored yet, so SMS fan-out has
        // no destination and short-circuits inside send_sms.
        let sms = self.send_sms("", &message).await;
        let telegram = self.send_telegram(&message).await;

        tracing::debug!(email, sms, telegram, "Lead notification fan-out complete");
    }

    async fn send_email(&self, to_email: &str, subject: &str, message: &str) -> bool {
        if !self.channels.email {
            tracing::debug!("Skipping email notification, RESEND_API_KEY not configured");
            return false;
        }
        if to_email.is_empty() {
            tracing::debug!("Skipping email notification, no destination address");
            return false;
        }
        tracing::info!(to = to_email, subject, message, "Email notification dispatched");
        true
    }

    async fn send_sms(&self, to_phone: &str, message: &str) -> bool {
        if !self.channels.sms {
            tracing::debug!("Skipping SMS notification, Twilio not configured");
            return false;
        }
        if to_phone.is_empty() {
            tracing::debug!("Skipping SMS notification, no destination number");
            return false;
        }
        tracing::info!(to = to_phone, message, "SMS notification dispatched");
        true
    }

    async fn send_telegram(&self, message: &str) -> bool {
        if !self.channels.telegram {
            tracing::debug!("Skipping Telegram notification, TELEGRAM_BOT_TOKEN not configured");
            return false;
        }
        tracing::info!(message, "Telegram notification dispatched");
        true
    }
}

fn build_lead_message(name: &str, description: Option<&str>) -> String {
    format!(
        "New lead received: {} - {}",
        name,
        description.unwrap_or_default()
    )
}

fn env_present(key: &str) -> bool {
    std::env::var(key).is_ok_and(|value| !value.is_empty())
}
