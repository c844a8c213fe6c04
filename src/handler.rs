//! The poster pipeline: generate, decode, store, sign.

use crate::{
    bedrock::{self, ImageClient, ImageGenerator},
    config::{Config, GenerationParameters, PRESIGNED_URL_EXPIRY_SECS},
    error::{PosterError, Result},
    logger,
    models::{PosterRequest, PosterResponse, StoredImage, TitanImageRequest, TitanImageResponse},
    storage::{ObjectStore, S3Store},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Object key for a poster generated at `at`, second resolution.
pub fn poster_name(at: NaiveDateTime) -> String {
    format!("poster_{}.png", at.format("%Y-%m-%d-%H-%M-%S"))
}

/// First image of a generation response, still base64 encoded.
pub fn first_image(payload: &[u8]) -> Result<String> {
    let response: TitanImageResponse = serde_json::from_slice(payload).map_err(|e| {
        PosterError::GenerationFailed(format!("malformed response payload: {}", e))
    })?;
    response
        .images
        .into_iter()
        .next()
        .ok_or_else(|| PosterError::GenerationFailed("response contained no images".into()))
}

pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(encoded)?)
}

#[derive(Clone)]
pub struct PosterHandler {
    generator: Arc<dyn ImageGenerator>,
    store: Arc<dyn ObjectStore>,
    params: GenerationParameters,
}

impl PosterHandler {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        store: Arc<dyn ObjectStore>,
        params: GenerationParameters,
    ) -> Self {
        Self {
            generator,
            store,
            params,
        }
    }

    /// Builds the handler on top of the real Bedrock and S3 clients.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let sdk_config = bedrock::load_sdk_config(&config.bedrock).await;
        bedrock::require_region(&sdk_config)?;
        let generator = ImageClient::from_sdk_config(&sdk_config, config.bedrock.model_id.clone());
        let store = S3Store::from_sdk_config(&sdk_config, config.storage.bucket.clone());

        Ok(Self::new(
            Arc::new(generator),
            Arc::new(store),
            config.generation.clone(),
        ))
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    pub async fn handle(&self, event: &Value) -> Result<PosterResponse> {
        self.handle_at(event, Local::now().naive_local()).await
    }

    /// Runs the pipeline with `now` as the invocation time used for naming.
    pub async fn handle_at(&self, event: &Value, now: NaiveDateTime) -> Result<PosterResponse> {
        let request = PosterRequest::from_event(event)?;
        log::info!("Received prompt: {}", request.prompt);

        let payload = {
            let _timer = logger::timer("generate");
            let generation_request = TitanImageRequest::new(request.prompt, &self.params);
            self.generator.invoke(&generation_request).await?
        };

        let encoded = first_image(&payload)?;
        let bytes = decode_image(&encoded)?;
        log::debug!("Decoded image of {} bytes", bytes.len());

        let image = StoredImage::png(poster_name(now), bytes);
        {
            let _timer = logger::timer("upload");
            self.store.put_object(&image).await?;
        }

        let signed = self
            .store
            .presign_get(&image.key, Duration::from_secs(PRESIGNED_URL_EXPIRY_SECS))
            .await?;
        log::info!(
            "Poster {}/{} available until {}",
            self.store.bucket(),
            image.key,
            signed.expires_at
        );

        Ok(PosterResponse::ok(signed.url))
    }

    /// Runs one invocation and maps any failure to a response at the boundary.
    pub async fn respond(&self, event: &Value) -> PosterResponse {
        let request_id = Uuid::new_v4().to_string();
        logger::with_request_id(request_id, async {
            match self.handle(event).await {
                Ok(response) => response,
                Err(e) => {
                    log::error!("Invocation failed ({}): {}", e.kind(), e);
                    PosterResponse::from(&e)
                }
            }
        })
        .await
    }

    /// Reads one JSON event from `input` and writes the response mapping to `output`.
    ///
    /// An event that is not JSON is answered like any other invalid input.
    pub async fn respond_io<R: Read, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> io::Result<PosterResponse> {
        let response = match serde_json::from_reader::<_, Value>(input) {
            Ok(event) => self.respond(&event).await,
            Err(e) => {
                let err = PosterError::InvalidInput(format!("event is not valid JSON: {}", e));
                log::error!("Invocation rejected: {}", err);
                PosterResponse::from(&err)
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignedUrl;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;
    use std::sync::Mutex;

    // "fake png bytes"
    const IMAGE_B64: &str = "ZmFrZSBwbmcgYnl0ZXM=";

    struct FakeGenerator {
        body: Vec<u8>,
        calls: Mutex<Vec<TitanImageRequest>>,
    }

    impl FakeGenerator {
        fn returning(body: Value) -> Self {
            Self::returning_raw(body.to_string().into_bytes())
        }

        fn returning_raw(body: Vec<u8>) -> Self {
            Self {
                body,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<TitanImageRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn invoke(&self, request: &TitanImageRequest) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(request.clone());
            Ok(self.body.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ImageGenerator for FailingGenerator {
        async fn invoke(&self, _request: &TitanImageRequest) -> Result<Vec<u8>> {
            Err(PosterError::GenerationFailed("ThrottlingException".into()))
        }
    }

    struct FakeStore {
        bucket: String,
        fail_put: bool,
        puts: Mutex<Vec<StoredImage>>,
        signed: Mutex<Vec<(String, Duration)>>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                bucket: "movie-poster-design-0101-abc".to_string(),
                fail_put: false,
                puts: Mutex::new(Vec::new()),
                signed: Mutex::new(Vec::new()),
            }
        }

        fn failing_put() -> Self {
            Self {
                fail_put: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn put_object(&self, image: &StoredImage) -> Result<()> {
            if self.fail_put {
                return Err(PosterError::StorageFailed("AccessDenied".into()));
            }
            self.puts.lock().unwrap().push(image.clone());
            Ok(())
        }

        async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<SignedUrl> {
            self.signed
                .lock()
                .unwrap()
                .push((key.to_string(), expires_in));
            Ok(SignedUrl {
                url: format!(
                    "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}",
                    self.bucket,
                    key,
                    expires_in.as_secs()
                ),
                expires_in_secs: expires_in.as_secs(),
                expires_at: Utc::now(),
            })
        }

        fn bucket(&self) -> &str {
            &self.bucket
        }
    }

    fn handler(generator: Arc<dyn ImageGenerator>, store: Arc<dyn ObjectStore>) -> PosterHandler {
        PosterHandler::new(generator, store, GenerationParameters::default())
    }

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 30)
            .unwrap()
    }

    fn is_poster_key(key: &str) -> bool {
        key.strip_prefix("poster_")
            .and_then(|rest| rest.strip_suffix(".png"))
            .map(|stamp| {
                stamp.len() == 19
                    && NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d-%H-%M-%S").is_ok()
            })
            .unwrap_or(false)
    }

    #[test]
    fn test_poster_name_format() {
        assert_eq!(poster_name(fixed_time()), "poster_2024-03-09-07-05-30.png");
        assert!(is_poster_key(&poster_name(Local::now().naive_local())));
    }

    #[test]
    fn test_first_image_takes_head() {
        let payload = json!({"images": ["Zmlyc3Q=", "c2Vjb25k"]}).to_string();
        assert_eq!(first_image(payload.as_bytes()).unwrap(), "Zmlyc3Q=");
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let generator = Arc::new(FakeGenerator::returning(json!({ "images": [IMAGE_B64] })));
        let store = Arc::new(FakeStore::new());
        let handler = handler(generator.clone(), store.clone());

        let response = handler
            .handle(&json!({"prompt": "a noir detective film poster"}))
            .await
            .unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            TitanImageRequest::new("a noir detective film poster", &GenerationParameters::default())
        );

        let puts = store.puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 1);
        assert!(is_poster_key(&puts[0].key));
        assert_eq!(puts[0].bytes, b"fake png bytes".to_vec());
        assert_eq!(puts[0].content_type, "image/png");

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("movie-poster-design-0101-abc"));
        assert!(response.body.contains(&puts[0].key));
        assert_eq!(
            serde_json::to_value(&response).unwrap()["statusCode"],
            json!(200)
        );
    }

    #[tokio::test]
    async fn test_signed_url_expiry_is_one_hour() {
        let generator = Arc::new(FakeGenerator::returning(json!({ "images": [IMAGE_B64] })));
        let store = Arc::new(FakeStore::new());
        let handler = handler(generator, store.clone());

        let response = handler
            .handle_at(&json!({"prompt": "western"}), fixed_time())
            .await
            .unwrap();

        let signed = store.signed.lock().unwrap().clone();
        assert_eq!(
            signed,
            vec![(
                "poster_2024-03-09-07-05-30.png".to_string(),
                Duration::from_secs(3600)
            )]
        );
        assert!(response.body.ends_with("X-Amz-Expires=3600"));
    }

    #[tokio::test]
    async fn test_missing_prompt_fails_before_generation() {
        let generator = Arc::new(FakeGenerator::returning(json!({ "images": [IMAGE_B64] })));
        let store = Arc::new(FakeStore::new());
        let handler = handler(generator.clone(), store.clone());

        let err = handler.handle(&json!({"text": "oops"})).await.unwrap_err();
        assert!(matches!(err, PosterError::InvalidInput(_)));
        assert!(generator.calls().is_empty());
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_images_fails() {
        let generator = Arc::new(FakeGenerator::returning(json!({ "images": [] })));
        let store = Arc::new(FakeStore::new());
        let handler = handler(generator, store.clone());

        let err = handler.handle(&json!({"prompt": "sci-fi"})).await.unwrap_err();
        assert!(matches!(err, PosterError::GenerationFailed(_)));
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payloads() {
        let store: Arc<dyn ObjectStore> = Arc::new(FakeStore::new());

        let not_json = handler(
            Arc::new(FakeGenerator::returning_raw(b"<html>".to_vec())),
            store.clone(),
        );
        let err = not_json.handle(&json!({"prompt": "x"})).await.unwrap_err();
        assert!(matches!(err, PosterError::GenerationFailed(_)));

        let no_images = handler(
            Arc::new(FakeGenerator::returning(json!({ "artifacts": [] }))),
            store.clone(),
        );
        let err = no_images.handle(&json!({"prompt": "x"})).await.unwrap_err();
        assert!(matches!(err, PosterError::GenerationFailed(_)));

        let bad_base64 = handler(
            Arc::new(FakeGenerator::returning(json!({ "images": ["***not base64***"] }))),
            store,
        );
        let err = bad_base64.handle(&json!({"prompt": "x"})).await.unwrap_err();
        assert!(matches!(err, PosterError::DecodeFailed(_)));
    }

    #[tokio::test]
    async fn test_respond_maps_failures() {
        let handler = handler(Arc::new(FailingGenerator), Arc::new(FakeStore::new()));
        let response = handler.respond(&json!({"prompt": "horror"})).await;
        assert_eq!(response.status_code, 502);
        assert!(response.body.contains("ThrottlingException"));

        let handler = handler_with_failing_store();
        let response = handler.respond(&json!({"prompt": "horror"})).await;
        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("AccessDenied"));

        let response = handler.respond(&json!({})).await;
        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn test_first_image_rejects_non_json() {
        let err = first_image(b"<html>").unwrap_err();
        assert!(matches!(err, PosterError::GenerationFailed(_)));
        assert!(err.to_string().contains("malformed response payload"));
    }

    #[tokio::test]
    async fn test_respond_io_round_trip() {
        let store = Arc::new(FakeStore::new());
        let handler = handler(
            Arc::new(FakeGenerator::returning(json!({ "images": [IMAGE_B64] }))),
            store.clone(),
        );

        let input = br#"{"prompt": "a noir detective film poster"}"#;
        let mut output = Vec::new();
        let response = handler.respond_io(&input[..], &mut output).await.unwrap();

        assert!(response.is_success());
        let written: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(written["statusCode"], json!(200));
        assert_eq!(written["body"], json!(response.body));
        assert!(output.ends_with(b"\n"));
        assert_eq!(store.puts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_respond_io_rejects_garbage_event() {
        let generator = Arc::new(FakeGenerator::returning(json!({ "images": [IMAGE_B64] })));
        let handler = handler(generator.clone(), Arc::new(FakeStore::new()));

        let mut output = Vec::new();
        let response = handler
            .respond_io(&b"prompt=hello"[..], &mut output)
            .await
            .unwrap();

        assert_eq!(response.status_code, 400);
        let written: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(written["statusCode"], json!(400));
        assert!(generator.calls().is_empty());
    }

    fn handler_with_failing_store() -> PosterHandler {
        handler(
            Arc::new(FakeGenerator::returning(json!({ "images": [IMAGE_B64] }))),
            Arc::new(FakeStore::failing_put()),
        )
    }
}
