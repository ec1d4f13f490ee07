pub mod mailer;
pub mod scoring;
