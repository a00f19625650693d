use super::*;
use crate::ai::{
    fake::FakeModel,
    wire::{GenerateContentResponse, InlineData, Part},
};

fn jpeg() -> EncodedImage {
    EncodedImage {
        mime_type: "image/jpeg".to_string(),
        data: "/9j/AA==".to_string(),
    }
}

#[tokio::test]
async fn first_inline_image_is_returned_unchanged() {
    let fake = FakeModel::new();
    fake.push(Ok(GenerateContentResponse::from_parts(vec![
        Part::Text {
            text: "Here you go".to_string(),
        },
        Part::InlineData {
            inline_data: InlineData {
                mime_type: "image/png".to_string(),
                data: "iVBORw0KGgoAAAANSUhEUg==".to_string(),
            },
        },
    ])));

    let edited = fake
        .client()
        .edit_image(&jpeg(), "Add a retro filter")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.mime_type, "image/png");
    assert_eq!(edited.data, "iVBORw0KGgoAAAANSUhEUg==");

    let (model, req) = &fake.calls()[0];
    assert_eq!(model, "gemini-2.5-flash-image");
    assert!(req.generation_config.is_none());
    assert!(matches!(&req.contents[0].parts[1], Part::Text { text } if text == "Add a retro filter"));
}

#[tokio::test]
async fn text_only_reply_means_no_edit() {
    let fake = FakeModel::new();
    fake.push_text("I cannot do that.");
    let out = fake.client().edit_image(&jpeg(), "remove the dog").await.unwrap();
    assert!(out.is_none());
}

#[tokio::test]
async fn blank_instruction_is_rejected_without_a_call() {
    let fake = FakeModel::new();
    let err = fake.client().edit_image(&jpeg(), "   ").await.unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    let fake = FakeModel::new();
    fake.push_failure("quota");
    let err = fake.client().edit_image(&jpeg(), "x").await.unwrap_err();
    assert!(matches!(err, MemeError::Service(_)));
}
