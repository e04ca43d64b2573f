//! Viewer URL construction and backend notification.
//!
//! The viewer must learn the fileID→URL mapping (`cv_post`) before a
//! redirect is issued; a failed notification withholds the redirect.

use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use reqwest::Client;
use serde::Serialize;

use viewbridge_core::{AppError, ViewerSettings};

const VIEWER_PAGE: &str = "web/viewer.html";
const NOTIFY_PATH: &str = "cv_post";
const PUBLIC_PREFIX: &str = "public/";

#[derive(Serialize)]
struct NotifyMapping<'a> {
    #[serde(rename = "objectID")]
    object_id: &'a str,
    #[serde(rename = "finalURL")]
    final_url: &'a str,
}

#[derive(Clone)]
pub struct ViewerClient {
    client: Client,
    settings: ViewerSettings,
}

impl ViewerClient {
    pub fn new(settings: ViewerSettings, timeout_secs: u64) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client for the viewer backend")?;

        Ok(Self { client, settings })
    }

    /// Date stamp embedded in viewer URLs, `YY.MM.DD` in local time.
    pub fn insert_stamp() -> String {
        Local::now().format("%y.%m.%d").to_string()
    }

    /// Build the authenticated viewer URL for a converted artifact.
    ///
    /// `relative_path` is the artifact path under the viewer root; its
    /// `public/` prefix is stripped because the viewer serves that
    /// directory as its web root.
    pub fn build_viewer_url(
        &self,
        file_id: &str,
        user_name: &str,
        relative_path: &str,
        insert_dt: &str,
    ) -> String {
        let file = relative_path
            .strip_prefix(PUBLIC_PREFIX)
            .unwrap_or(relative_path);

        let url = format!(
            "{}/{}?file=/{}&user_name={}&disposable_key={}&object_ID={}&insert_dt={}",
            self.settings.base_url,
            VIEWER_PAGE,
            file,
            urlencoding::encode(user_name),
            self.settings.disposable_key,
            urlencoding::encode(file_id),
            insert_dt,
        );

        // The viewer's query parser treats a literal `+` as data, never
        // as an encoded space; this substitution is mandatory.
        url.replace('+', "%2B")
    }

    /// Tell the viewer backend about a fileID→URL mapping. Non-2xx and
    /// transport failures are both hard failures.
    pub async fn notify_mapping(&self, object_id: &str, final_url: &str) -> Result<(), AppError> {
        let url = format!("{}/{}", self.settings.base_url, NOTIFY_PATH);

        let response = self
            .client
            .post(&url)
            .json(&NotifyMapping {
                object_id,
                final_url,
            })
            .send()
            .await
            .map_err(|e| AppError::UpstreamNotify(format!("POST {} failed: {}", url, e)))?;

        response
            .error_for_status()
            .map_err(|e| AppError::UpstreamNotify(format!("POST {} failed: {}", url, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ViewerClient {
        ViewerClient::new(
            ViewerSettings {
                base_url: "http://viewer.example.com".to_string(),
                disposable_key: "dk123".to_string(),
            },
            5,
        )
        .unwrap()
    }

    #[test]
    fn url_carries_all_parameters() {
        let url = client().build_viewer_url(
            "f1",
            "alice",
            "public/OUT/p1/report.esob",
            "26.08.06",
        );
        assert_eq!(
            url,
            "http://viewer.example.com/web/viewer.html?file=/OUT/p1/report.esob\
             &user_name=alice&disposable_key=dk123&object_ID=f1&insert_dt=26.08.06"
        );
    }

    #[test]
    fn plus_in_user_name_is_escaped() {
        let url = client().build_viewer_url("f1", "A+B", "public/OUT/p1/a.esob", "26.08.06");
        assert!(url.contains("user_name=A%2BB"), "got: {url}");
        assert!(!url.contains('+'), "got: {url}");
    }

    #[test]
    fn space_in_user_name_never_becomes_a_literal_plus() {
        let url = client().build_viewer_url("f1", "A B", "public/OUT/p1/a.esob", "26.08.06");
        assert!(!url.contains('+'), "got: {url}");
    }

    #[test]
    fn public_prefix_is_stripped_once() {
        let url = client().build_viewer_url("f1", "u", "public/OUT/p1/a.esob", "26.08.06");
        assert!(url.contains("?file=/OUT/p1/a.esob&"), "got: {url}");
    }

    #[test]
    fn insert_stamp_is_dotted_short_date() {
        let stamp = ViewerClient::insert_stamp();
        let bytes = stamp.as_bytes();
        assert_eq!(bytes.len(), 8, "got: {stamp}");
        for (i, b) in bytes.iter().enumerate() {
            if i == 2 || i == 5 {
                assert_eq!(*b, b'.', "got: {stamp}");
            } else {
                assert!(b.is_ascii_digit(), "got: {stamp}");
            }
        }
    }
}
