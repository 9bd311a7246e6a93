use pdfdrop_engine::{PutObjectRequest, StorageEngine, StorageError, StorageResult, StoredObject};
use reqwest::{header, Method, StatusCode};

use crate::{error_message, BackendClient};

/// Object storage backed by the hosted `/storage/v1` API.
#[derive(Clone, Debug)]
pub struct RemoteStorage {
    client: BackendClient,
}

impl RemoteStorage {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

fn is_duplicate(status: StatusCode, message: &str) -> bool {
    status == StatusCode::CONFLICT
        || message.contains("Duplicate")
        || message.contains("already exists")
}

impl StorageEngine for RemoteStorage {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<StoredObject> {
        let path = format!("/storage/v1/object/{}/{}", request.bucket, request.key);
        let size = request.data.len() as u64;

        let response = self
            .client
            .request(Method::POST, &path)
            .header(header::CONTENT_TYPE, &request.content_type)
            .header(
                header::CACHE_CONTROL,
                format!("max-age={}", request.cache_control_secs),
            )
            .header("x-upsert", "false")
            .body(request.data)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            if is_duplicate(status, &message) {
                return Err(StorageError::AlreadyExists(request.key));
            }
            tracing::error!("Storage rejected {}: {} {}", path, status, message);
            return Err(StorageError::Backend(message));
        }

        Ok(StoredObject {
            bucket: request.bucket,
            key: request.key,
            size,
            etag: response
                .headers()
                .get(header::ETAG)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        })
    }

    async fn public_url(&self, bucket: &str, key: &str) -> Option<String> {
        Some(
            self.client
                .build_url(&format!("/storage/v1/object/public/{}/{}", bucket, key)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn put(key: &str) -> PutObjectRequest {
        PutObjectRequest {
            bucket: "pdfs".to_string(),
            key: key.to_string(),
            content_type: "application/pdf".to_string(),
            cache_control_secs: 3600,
            data: Bytes::from_static(b"%PDF-1.7"),
        }
    }

    #[tokio::test]
    async fn uploads_without_upsert_and_with_cache_hint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/pdfs/1700000000000-a.pdf")
            .match_header("apikey", "anon")
            .match_header("authorization", "Bearer anon")
            .match_header("x-upsert", "false")
            .match_header("cache-control", "max-age=3600")
            .match_header("content-type", "application/pdf")
            .match_body("%PDF-1.7")
            .with_status(200)
            .with_body(r#"{"Key":"pdfs/1700000000000-a.pdf"}"#)
            .create_async()
            .await;

        let storage = RemoteStorage::new(BackendClient::new(&server.url(), "anon").unwrap());
        let stored = storage.put_object(put("1700000000000-a.pdf")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(stored.key, "1700000000000-a.pdf");
        assert_eq!(stored.size, 8);
    }

    #[tokio::test]
    async fn duplicate_response_maps_to_already_exists() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/storage/v1/object/pdfs/1-a.pdf")
            .with_status(400)
            .with_body(r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#)
            .create_async()
            .await;

        let storage = RemoteStorage::new(BackendClient::new(&server.url(), "anon").unwrap());
        let err = storage.put_object(put("1-a.pdf")).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn other_failures_carry_backend_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/storage/v1/object/pdfs/1-a.pdf")
            .with_status(404)
            .with_body(r#"{"statusCode":"404","error":"Not found","message":"Bucket not found"}"#)
            .create_async()
            .await;

        let storage = RemoteStorage::new(BackendClient::new(&server.url(), "anon").unwrap());
        let err = storage.put_object(put("1-a.pdf")).await.unwrap_err();
        assert_eq!(err.to_string(), "Bucket not found");
    }

    #[tokio::test]
    async fn public_url_points_at_public_object_route() {
        let storage =
            RemoteStorage::new(BackendClient::new("https://project.example.co", "anon").unwrap());
        assert_eq!(
            storage.public_url("pdfs", "1-a.pdf").await.as_deref(),
            Some("https://project.example.co/storage/v1/object/public/pdfs/1-a.pdf")
        );
    }
}
