use tracing::debug;

use crate::error::{EtlError, Result};
use crate::retry::{retry_with_policy, RetryPolicy};
use crate::types::{Animal, AnimalsPage};

/// Client for the two animal endpoints. Both operations retry 5xx responses
/// with exponential backoff; any other failure surfaces immediately.
pub struct AnimalApi {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl AnimalApi {
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    /// Fetch one page of the animal listing.
    pub async fn get_animals(&self, page: u32) -> Result<AnimalsPage> {
        let url = format!("{}/animals", self.base_url);
        retry_with_policy(
            &self.retry,
            || self.fetch_page(&url, page),
            EtlError::is_server_error,
        )
        .await
    }

    async fn fetch_page(&self, url: &str, page: u32) -> Result<AnimalsPage> {
        let response = self
            .client
            .get(url)
            .query(&[("page", page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::UnexpectedStatus {
                status,
                url: response.url().to_string(),
            });
        }

        let parsed: AnimalsPage = response.json().await?;
        debug!(
            "Page {} response: {} items, total_pages={:?}",
            page,
            parsed.items.as_ref().map_or(0, Vec::len),
            parsed.total_pages
        );
        Ok(parsed)
    }

    /// Post a batch of animals to the home endpoint as one JSON array.
    pub async fn post_home(&self, batch: &[Animal]) -> Result<()> {
        let url = format!("{}/home", self.base_url);
        retry_with_policy(
            &self.retry,
            || self.post_batch_once(&url, batch),
            EtlError::is_server_error,
        )
        .await
    }

    async fn post_batch_once(&self, url: &str, batch: &[Animal]) -> Result<()> {
        let response = self.client.post(url).json(batch).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::UnexpectedStatus {
                status,
                url: response.url().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::default()
            .with_base_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(40))
    }

    #[tokio::test]
    async fn fetches_and_parses_a_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/animals"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "total_pages": 3,
                "items": [{"id": 1, "name": "Turtle", "friends": "Cat"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = AnimalApi::new(server.uri(), fast_retry());
        let page = api.get_animals(1).await.unwrap();

        assert_eq!(page.items.unwrap().len(), 1);
        assert_eq!(page.total_pages, Some(3));
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let server = MockServer::start().await;
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        Mock::given(method("GET"))
            .and(path("/animals"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                if hits_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200).set_body_json(json!({"items": []}))
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let api = AnimalApi::new(server.uri(), fast_retry());
        let page = api.get_animals(1).await.unwrap();
        assert_eq!(page.items.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts_of_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/animals"))
            .respond_with(ResponseTemplate::new(503))
            .expect(5)
            .mount(&server)
            .await;

        let api = AnimalApi::new(server.uri(), fast_retry());
        let err = api.get_animals(1).await.unwrap_err();
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/animals"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let api = AnimalApi::new(server.uri(), fast_retry());
        let err = api.get_animals(1).await.unwrap_err();
        assert!(matches!(err, EtlError::UnexpectedStatus { status, .. }
            if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn posts_the_batch_as_a_json_array() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/home"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let batch: Vec<Animal> = serde_json::from_value(json!([
            {"id": 1, "friends": ["Cat"], "born_at": null}
        ]))
        .unwrap();

        let api = AnimalApi::new(server.uri(), fast_retry());
        api.post_home(&batch).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert!(body.is_array());
        assert_eq!(body[0]["friends"], json!(["Cat"]));
    }
}
