/// SMTP mail delivery via lettre.
///
/// Callers fire these from a blocking task and log failures; no request
/// outcome ever depends on the mail transport.
use anyhow::{anyhow, Result};
use lettre::message::header::ContentType;
use lettre::message::{MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::SmtpTransport;
use lettre::{Message, Transport};

use crate::config::Config;
use crate::models::Appointment;

#[derive(Debug, Clone)]
pub struct Mailer {
    smtp_host: String,
    smtp_port: u16,
    smtp_username: String,
    smtp_password: String,
    from_email: String,
    from_name: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Self {
        Mailer {
            smtp_host: config.smtp_host.clone(),
            smtp_port: config.smtp_port,
            smtp_username: config.smtp_username.clone(),
            smtp_password: config.smtp_password.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.smtp_host.is_empty() && !self.from_email.is_empty()
    }

    fn transport(&self) -> SmtpTransport {
        let mut builder = SmtpTransport::builder_dangerous(&self.smtp_host).port(self.smtp_port);
        if !self.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.smtp_username.clone(),
                self.smtp_password.clone(),
            ));
        }
        builder.build()
    }

    fn send(&self, to: &str, subject: &str, text: String, html: String) -> Result<()> {
        if !self.is_configured() {
            return Err(anyhow!("SMTP transport not configured"));
        }

        let from = format!("{} <{}>", self.from_name, self.from_email)
            .parse()
            .map_err(|e| anyhow!("invalid from address: {e}"))?;
        let to = to
            .parse()
            .map_err(|e| anyhow!("invalid recipient address: {e}"))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .map_err(|e| anyhow!("failed to build message: {e}"))?;

        self.transport()
            .send(&message)
            .map_err(|e| anyhow!("failed to send email: {e}"))?;

        tracing::info!(to = %message.envelope().to().first().map(ToString::to_string).unwrap_or_default(), "email sent");
        Ok(())
    }

    /// Email carrying the set-password link.
    pub fn send_set_password_link(&self, to: &str, link: &str, ttl_minutes: i64) -> Result<()> {
        let text = format!(
            "A password setup was requested for your account.\n\n\
             Open this link to choose a new password:\n{link}\n\n\
             The link expires in {ttl_minutes} minutes. If you did not request it, ignore this email."
        );
        let html = format!(
            r#"<div style="font-family:Arial,Helvetica,sans-serif;line-height:1.6;max-width:600px;margin:0 auto">
  <h2>Set your password</h2>
  <p>A password setup was requested for your account.</p>
  <p><a href="{link}" style="background:#0b6aa3;color:#fff;padding:10px 16px;border-radius:8px;text-decoration:none;display:inline-block">Set password</a></p>
  <p>If the button does not work, copy this URL into your browser:</p>
  <p><code style="word-break:break-all">{link}</code></p>
  <p style="color:#64748b;font-size:12px">This link expires in {ttl_minutes} minutes. If you did not request it, ignore this email.</p>
</div>"#
        );

        self.send(to, "Set your password", text, html)
    }

    /// Booking confirmation for a freshly created appointment.
    pub fn send_appointment_confirmation(&self, appointment: &Appointment) -> Result<()> {
        let modality = match appointment.modality.as_str() {
            "online" => "Remote consultation",
            _ => "In person",
        };
        let subject = format!(
            "Appointment confirmed - {} {}",
            appointment.date, appointment.time
        );

        let text = format!(
            "Hello {},\n\n\
             Your appointment has been booked.\n\n\
             Date: {} {}\n\
             Doctor: {} ({})\n\
             Modality: {}\n\
             Reservation: {}\n\n\
             Reply to this email if you need to reschedule.",
            appointment.patient_name,
            appointment.date,
            appointment.time,
            appointment.doctor_name,
            appointment.specialty,
            modality,
            appointment.reservation_code,
        );
        let html = format!(
            r#"<div style="font-family:Arial,Helvetica,sans-serif;line-height:1.6;max-width:600px;margin:0 auto">
  <h2>Appointment confirmed</h2>
  <p>Hello <b>{}</b>, your appointment has been booked.</p>
  <ul style="list-style:none;padding:0">
    <li><b>Date:</b> {} {}</li>
    <li><b>Doctor:</b> {} ({})</li>
    <li><b>Modality:</b> {}</li>
    <li><b>Reservation:</b> <code>{}</code></li>
  </ul>
  <p>Reply to this email if you need to reschedule.</p>
</div>"#,
            appointment.patient_name,
            appointment.date,
            appointment.time,
            appointment.doctor_name,
            appointment.specialty,
            modality,
            appointment.reservation_code,
        );

        self.send(&appointment.patient_email, &subject, text, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> Mailer {
        Mailer {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: String::new(),
            from_name: "Test".to_string(),
        }
    }

    #[test]
    fn test_unconfigured_mailer_refuses_to_send() {
        let mailer = unconfigured();
        assert!(!mailer.is_configured());
        assert!(mailer
            .send_set_password_link("a@x.com", "http://localhost/set-password?token=t", 60)
            .is_err());
    }

    #[test]
    fn test_configured_flag() {
        let mailer = Mailer {
            smtp_host: "smtp.example.com".to_string(),
            from_email: "noreply@example.com".to_string(),
            ..unconfigured()
        };
        assert!(mailer.is_configured());
    }
}
