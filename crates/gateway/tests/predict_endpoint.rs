use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use gateway::{config::DEFAULT_MAX_UPLOAD_BYTES, server::router, state::AppState};
use image::{DynamicImage, ImageFormat, Luma, Rgb, RgbImage};
use inference::{CLASS_NAMES, InferenceBackend, InferenceOutput, Predictor};
use ndarray::{Array4, ArrayD, IxDyn};
use serde_json::Value;
use std::io::Cursor;
use tower::ServiceExt;

const BOUNDARY: &str = "X-PREDICT-BOUNDARY";

/// Backend returning fixed logits for the gender head
struct MockBackend {
    male: f32,
    female: f32,
}

impl InferenceBackend for MockBackend {
    fn load_model(_path: &str) -> anyhow::Result<Self> {
        Ok(Self {
            male: 0.0,
            female: 0.0,
        })
    }

    fn infer(&self, images: &Array4<f32>) -> anyhow::Result<InferenceOutput> {
        anyhow::ensure!(
            images.shape() == [1, 3, 256, 256],
            "unexpected input shape {:?}",
            images.shape()
        );

        let mut data = vec![0.0f32; CLASS_NAMES.len()];
        data[1] = self.male;
        data[2] = self.female;
        let logits = ArrayD::from_shape_vec(IxDyn(&[1, CLASS_NAMES.len()]), data)?;
        Ok(InferenceOutput { logits })
    }
}

struct BrokenBackend;

impl InferenceBackend for BrokenBackend {
    fn load_model(_path: &str) -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn infer(&self, _images: &Array4<f32>) -> anyhow::Result<InferenceOutput> {
        anyhow::bail!("Non-zero status code returned while running Conv node")
    }
}

fn app_with<B: InferenceBackend + 'static>(backend: B, max_upload_bytes: usize) -> Router {
    let state = AppState::new(Predictor::new(backend), "model_webgpu.onnx");
    router(state, max_upload_bytes)
}

fn app(male: f32, female: f32) -> Router {
    app_with(MockBackend { male, female }, DEFAULT_MAX_UPLOAD_BYTES)
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();
    bytes.into_inner()
}

fn face_png() -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 160, Rgb([180, 140, 120]))),
        ImageFormat::Png,
    )
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn predict_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn assert_error_response(status: StatusCode, json: &Value) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json["error"].as_str().expect("error field should be a string");
    assert!(!error.is_empty(), "error message should not be empty");
}

#[tokio::test]
async fn test_predict_returns_male_label_and_percentage() {
    let request = predict_request(multipart_body("file", "face.png", &face_png()));

    let (status, json) = send(app(2.0, -1.0), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["class_name"], "gender_male");
    assert_eq!(json["percentage"].as_f64(), Some(88.08));
    assert_eq!(
        json.as_object().unwrap().len(),
        2,
        "Only class_name and percentage are returned"
    );
}

#[tokio::test]
async fn test_predict_tie_returns_female() {
    let request = predict_request(multipart_body("file", "face.png", &face_png()));

    let (status, json) = send(app(0.0, 0.0), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["class_name"], "gender_female");
    assert_eq!(json["percentage"].as_f64(), Some(50.0));
}

#[tokio::test]
async fn test_predict_accepts_grayscale_jpeg() {
    let gray = encode(
        DynamicImage::ImageLuma8(image::GrayImage::from_pixel(33, 47, Luma([90]))),
        ImageFormat::Jpeg,
    );
    let request = predict_request(multipart_body("file", "gray.jpg", &gray));

    let (status, json) = send(app(-2.0, 1.0), request).await;

    assert_eq!(status, StatusCode::OK, "body: {}", json);
    assert_eq!(json["class_name"], "gender_female");
}

#[tokio::test]
async fn test_malformed_upload_is_500_with_error() {
    let request = predict_request(multipart_body("file", "notes.txt", b"just some text"));

    let (status, json) = send(app(2.0, -1.0), request).await;

    assert_error_response(status, &json);
    assert!(json.get("class_name").is_none());
}

#[tokio::test]
async fn test_missing_file_field_is_500() {
    let request = predict_request(multipart_body("image", "face.png", &face_png()));

    let (status, json) = send(app(2.0, -1.0), request).await;

    assert_error_response(status, &json);
    assert!(json["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn test_non_multipart_request_is_500() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, json) = send(app(2.0, -1.0), request).await;

    assert_error_response(status, &json);
}

#[tokio::test]
async fn test_engine_failure_is_500() {
    let request = predict_request(multipart_body("file", "face.png", &face_png()));

    let (status, json) = send(app_with(BrokenBackend, DEFAULT_MAX_UPLOAD_BYTES), request).await;

    assert_error_response(status, &json);
    assert!(json["error"].as_str().unwrap().contains("Conv node"));
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let request = predict_request(multipart_body("file", "face.png", &face_png()));

    let (status, json) = send(app_with(MockBackend { male: 1.0, female: 0.0 }, 64), request).await;

    assert_ne!(status, StatusCode::OK);
    assert!(json.get("class_name").is_none());
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(app(0.0, 0.0), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_path"], "model_webgpu.onnx");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/predict")
        .header(header::ORIGIN, "http://laravel.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app(0.0, 0.0).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*",
        "Permissive CORS should allow any origin"
    );
}
