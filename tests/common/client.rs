//! HTTP client for end-to-end tests
//!
//! When API routes or request formats change, update only this file.

use super::constants::REQUEST_TIMEOUT_SECS;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("home request failed")
    }

    pub async fn get_tracks(&self) -> Response {
        self.client
            .get(format!("{}/api/tracks", self.base_url))
            .send()
            .await
            .expect("tracks request failed")
    }

    pub async fn audit_track(&self, id: &str) -> Response {
        self.client
            .post(format!("{}/api/tracks/{}/audit", self.base_url, id))
            .send()
            .await
            .expect("audit request failed")
    }

    pub async fn get_audit_history(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/tracks/{}/audits", self.base_url, id))
            .send()
            .await
            .expect("audit history request failed")
    }

    pub async fn generate_dispute(&self, id: &str) -> Response {
        self.client
            .post(format!("{}/api/tracks/{}/dispute", self.base_url, id))
            .send()
            .await
            .expect("dispute request failed")
    }

    pub async fn upload_report_raw(&self, csv: &str) -> Response {
        self.client
            .post(format!("{}/api/sustainability/report", self.base_url))
            .body(csv.to_string())
            .send()
            .await
            .expect("report upload failed")
    }

    pub async fn upload_report_multipart(&self, csv: &str) -> Response {
        let part = reqwest::multipart::Part::text(csv.to_string()).file_name("report.csv");
        let form = reqwest::multipart::Form::new().part("file", part);
        self.client
            .post(format!("{}/api/sustainability/report", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("multipart report upload failed")
    }
}
