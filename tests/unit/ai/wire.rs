use super::*;

#[test]
fn image_prompt_serializes_inline_data_before_text() {
    let image = EncodedImage {
        mime_type: "image/jpeg".to_string(),
        data: "AAAA".to_string(),
    };
    let req = GenerateContentRequest::image_prompt(&image, "make it funny")
        .with_json_schema(serde_json::json!({"type": "ARRAY"}));
    let json = serde_json::to_value(&req).unwrap();

    let parts = &json["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
    assert_eq!(parts[1]["text"], "make it funny");
    assert!(json["contents"][0].get("role").is_none());
    assert_eq!(
        json["generationConfig"]["responseMimeType"],
        "application/json"
    );
    assert_eq!(json["generationConfig"]["responseSchema"]["type"], "ARRAY");
}

#[test]
fn plain_requests_omit_generation_config() {
    let image = EncodedImage {
        mime_type: "image/jpeg".to_string(),
        data: "AAAA".to_string(),
    };
    let json = serde_json::to_value(GenerateContentRequest::image_prompt(&image, "x")).unwrap();
    assert!(json.get("generationConfig").is_none());
}

#[test]
fn response_text_joins_text_parts_of_first_candidate() {
    let raw = r#"{
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": "[{\"text\":"}, {"text": "\"hi\"}]"}]},
             "finishReason": "STOP"},
            {"content": {"parts": [{"text": "ignored"}]}}
        ],
        "usageMetadata": {"totalTokenCount": 12}
    }"#;
    let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.text().as_deref(), Some(r#"[{"text":"hi"}]"#));
}

#[test]
fn unknown_parts_and_missing_content_are_tolerated() {
    let raw = r#"{
        "candidates": [
            {"content": {"parts": [
                {"functionCall": {"name": "f", "args": {}}},
                {"inlineData": {"mimeType": "image/png", "data": ""}},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
            ]}}
        ]
    }"#;
    let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.text(), None);
    let inline = resp.first_inline_data().unwrap();
    assert_eq!(inline.mime_type, "image/png");
    assert_eq!(inline.data, "iVBORw0KGgo=");

    let blocked: GenerateContentResponse =
        serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
    assert!(blocked.candidates.is_empty());
    assert_eq!(blocked.text(), None);
    assert!(blocked.first_inline_data().is_none());

    let no_content: GenerateContentResponse =
        serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
    assert_eq!(no_content.text(), None);
}
