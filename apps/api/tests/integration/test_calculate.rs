use super::helpers::{
    StubBehavior, canvas_png_bytes, data_uri, default_answer, expect_status, jpeg_bytes,
    opaque_png_bytes, post_json, raw_base64, read_json, send, spawn_app, spawn_app_with,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use calculator_api::domain::drawing::entity::AnalysisRecord;
use futures_util::future::join_all;
use serde_json::{Value, json};

#[tokio::test]
async fn opaque_png_with_empty_vars_is_processed() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&opaque_png_bytes()), "dict_of_vars": {} }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Image processed");
    assert_eq!(body["data"], json!([{ "expr": "2 + 2", "result": "4", "assign": false }]));
}

#[tokio::test]
async fn trailing_slash_route_and_raw_base64_are_accepted() {
    let app = spawn_app();

    let req = post_json(
        "/calculate/",
        &json!({ "image": raw_base64(&opaque_png_bytes()), "dict_of_vars": {} }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn jpeg_drawings_are_accepted() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({ "image": format!("data:image/jpeg;base64,{}", raw_base64(&jpeg_bytes())) }),
    );
    expect_status(send(&app.app, req).await, StatusCode::OK).await;
}

#[tokio::test]
async fn invalid_base64_is_rejected_with_400() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({ "image": "data:image/png;base64,%%%not-base64%%%", "dict_of_vars": {} }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    let detail = body["detail"].as_str().expect("detail missing");
    assert!(
        detail.starts_with("Invalid Drawing data:"),
        "unexpected detail: {detail}"
    );
    assert!(app.analyzer.calls().is_empty());
}

#[tokio::test]
async fn payload_with_extra_comma_segment_is_rejected_with_400() {
    let app = spawn_app();

    let image = format!("{},{}", data_uri(&opaque_png_bytes()), raw_base64(b"tail"));
    let req = post_json("/calculate", &json!({ "image": image, "dict_of_vars": {} }));
    let res = expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert!(
        body["detail"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Invalid Drawing data:")
    );
    assert!(app.analyzer.calls().is_empty());
    assert!(!app.snapshot_path.exists());
}

#[tokio::test]
async fn valid_base64_that_is_not_an_image_is_rejected_with_400() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({ "image": raw_base64(b"hello world"), "dict_of_vars": {} }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert!(
        body["detail"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Invalid Drawing data:")
    );
}

#[tokio::test]
async fn unknown_stroke_color_is_rejected_with_400() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({
            "image": data_uri(&canvas_png_bytes([0, 0, 0])),
            "dict_of_vars": { "strokeColor": "not-a-color" }
        }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert_eq!(
        body["detail"],
        "Invalid Drawing data: unknown color specifier: \"not-a-color\""
    );
}

#[tokio::test]
async fn missing_stroke_color_defaults_to_black_on_white() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&canvas_png_bytes([0, 0, 0])), "dict_of_vars": {} }),
    );
    expect_status(send(&app.app, req).await, StatusCode::OK).await;

    let calls = app.analyzer.calls();
    assert_eq!(calls.len(), 1);
    let (image, _) = &calls[0];
    assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0]);
}

#[tokio::test]
async fn light_stroke_is_composited_onto_black() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({
            "image": data_uri(&canvas_png_bytes([255, 255, 255])),
            "dict_of_vars": { "strokeColor": "rgb(255,255,255)" }
        }),
    );
    expect_status(send(&app.app, req).await, StatusCode::OK).await;

    let (image, _) = &app.analyzer.calls()[0];
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(1, 1).0, [255, 255, 255]);
}

#[tokio::test]
async fn out_of_range_stroke_channels_are_clamped() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({
            "image": data_uri(&canvas_png_bytes([255, 0, 0])),
            "dict_of_vars": { "strokeColor": "rgb(300,0,0)" }
        }),
    );
    expect_status(send(&app.app, req).await, StatusCode::OK).await;

    let (image, _) = &app.analyzer.calls()[0];
    assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
}

#[tokio::test]
async fn variables_are_passed_through_untouched() {
    let app = spawn_app();

    let vars = json!({ "x": "5", "y": 2.5, "flag": true, "strokeColor": "orange" });
    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&canvas_png_bytes([255, 165, 0])), "dict_of_vars": vars }),
    );
    expect_status(send(&app.app, req).await, StatusCode::OK).await;

    let (_, seen_vars) = &app.analyzer.calls()[0];
    assert_eq!(serde_json::to_value(seen_vars).unwrap(), vars);
}

#[tokio::test]
async fn normalized_snapshot_is_written_as_rgb_png() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&canvas_png_bytes([0, 0, 255])), "dict_of_vars": {} }),
    );
    expect_status(send(&app.app, req).await, StatusCode::OK).await;

    let snapshot = image::open(&app.snapshot_path).expect("snapshot missing");
    assert_eq!(snapshot.color(), image::ColorType::Rgb8);
    let snapshot = snapshot.to_rgb8();
    assert_eq!(snapshot.dimensions(), (4, 4));
    assert_eq!(snapshot.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(snapshot.get_pixel(1, 1).0, [0, 0, 255]);
}

#[tokio::test]
async fn concurrent_submissions_leave_one_complete_snapshot() {
    let app = spawn_app();
    let strokes: Vec<[u8; 3]> = (0..8u8).map(|i| [i * 20, 0, 0]).collect();

    let responses = join_all(strokes.iter().map(|stroke| {
        let req = post_json(
            "/calculate",
            &json!({ "image": data_uri(&canvas_png_bytes(*stroke)), "dict_of_vars": {} }),
        );
        send(&app.app, req)
    }))
    .await;
    for res in responses {
        assert_eq!(res.status(), StatusCode::OK);
    }

    let snapshot = image::open(&app.snapshot_path)
        .expect("snapshot must stay decodable")
        .to_rgb8();
    assert_eq!(snapshot.get_pixel(0, 0).0, [255, 255, 255]);
    let stroke = snapshot.get_pixel(1, 1).0;
    assert!(
        strokes.contains(&stroke),
        "snapshot holds a stroke nobody submitted: {stroke:?}"
    );
}

#[tokio::test]
async fn empty_analysis_returns_500_without_detail_suffix() {
    let app = spawn_app_with(StubBehavior::Answer(vec![]));

    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&opaque_png_bytes()), "dict_of_vars": {} }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::INTERNAL_SERVER_ERROR).await;
    let body: Value = read_json(res).await;
    assert_eq!(body, json!({ "detail": "Error processing Drawing" }));
}

#[tokio::test]
async fn analyzer_failure_returns_500_with_message() {
    let app = spawn_app_with(StubBehavior::Fail("boom".into()));

    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&opaque_png_bytes()), "dict_of_vars": {} }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::INTERNAL_SERVER_ERROR).await;
    let body: Value = read_json(res).await;
    let detail = body["detail"].as_str().expect("detail missing");
    assert!(detail.contains("boom"), "unexpected detail: {detail}");
    assert_eq!(detail, "Error processing Drawing: boom");
}

#[tokio::test]
async fn assignments_are_returned_to_the_client() {
    let app = spawn_app_with(StubBehavior::Answer(vec![
        AnalysisRecord::assignment("x", "4"),
        AnalysisRecord::new("x + 1", "5"),
    ]));

    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&opaque_png_bytes()) }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["data"][0], json!({ "expr": "x", "result": "4", "assign": true }));
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_ne!(body["data"], json!(default_answer()));
}

#[tokio::test]
async fn malformed_json_body_is_unprocessable() {
    let app = spawn_app();

    let req = Request::builder()
        .method("POST")
        .uri("/calculate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{ "dict_of_vars": {} }"#))
        .expect("failed to build request");
    let res = expect_status(
        send(&app.app, req).await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    let body: Value = read_json(res).await;
    assert!(body["detail"].is_string());
    assert!(app.analyzer.calls().is_empty());
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = spawn_app();

    let req = post_json(
        "/calculate",
        &json!({ "image": data_uri(&opaque_png_bytes()), "dict_of_vars": {} }),
    );
    let res = send(&app.app, req).await;
    assert!(res.headers().contains_key("x-request-id"));
}
