/// Chest X-ray scoring against the external classifier.
///
/// The model itself is an external collaborator: in `remote` mode the raw
/// image bytes are POSTed to the configured endpoint and the two class
/// scores come back as JSON; in `mock` mode (no endpoint configured) a
/// fixed score pair keeps the rest of the pipeline exercisable.
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scores {
    pub normal: f32,
    pub tuberculosis: f32,
}

#[derive(Clone)]
pub struct ScoringService {
    endpoint: Option<String>,
    http: reqwest::Client,
}

impl ScoringService {
    pub fn new(endpoint: Option<String>) -> Self {
        ScoringService {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    pub fn mode(&self) -> &'static str {
        if self.endpoint.is_some() {
            "remote"
        } else {
            "mock"
        }
    }

    pub async fn score(&self, bytes: Vec<u8>, mime_type: &str) -> Result<Scores> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(Scores {
                normal: 0.85,
                tuberculosis: 0.15,
            });
        };

        let response = self
            .http
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?
            .error_for_status()?;

        let raw: Scores = response.json().await?;
        Ok(normalize(raw))
    }
}

/// Clamp to [0, 1] and renormalize; remote scorers have been seen to
/// return unnormalized logits.
pub(crate) fn normalize(scores: Scores) -> Scores {
    let normal = scores.normal.clamp(0.0, 1.0);
    let tuberculosis = scores.tuberculosis.clamp(0.0, 1.0);

    let sum = normal + tuberculosis;
    if sum == 0.0 {
        return Scores {
            normal: 0.5,
            tuberculosis: 0.5,
        };
    }

    Scores {
        normal: normal / sum,
        tuberculosis: tuberculosis / sum,
    }
}
