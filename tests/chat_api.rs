//! End-to-end tests over the HTTP surface.
//!
//! Everything runs against the mock classifier and mock form provider,
//! which is exactly the offline demo configuration: scripted flows work,
//! loan verification uses the demo questionnaire, and classifier outages
//! degrade to canned copy.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use finova_assistant::adapters::ai::MockClassifier;
use finova_assistant::adapters::form_service::MockFormProvider;
use finova_assistant::adapters::http::{chat_router, ChatAppState};
use finova_assistant::adapters::session::InMemorySessionStore;
use finova_assistant::application::handlers::ChatTurnHandler;
use finova_assistant::domain::flow::{
    ActionDirectory, ClassifiedIntent, FlowRouter, IntentCategory,
};
use finova_assistant::domain::wizard::WizardEngine;
use finova_assistant::ports::{ClassifierError, FormProvider};

struct TestApp {
    router: Router,
    classifier: Arc<MockClassifier>,
}

fn test_app() -> TestApp {
    let classifier = Arc::new(MockClassifier::new());
    let forms = Arc::new(MockFormProvider::new());
    let handler = ChatTurnHandler::new(
        FlowRouter::new(ActionDirectory::new()),
        Arc::new(InMemorySessionStore::new(Duration::from_secs(1800))),
        classifier.clone(),
        Arc::new(WizardEngine::new(forms.clone() as Arc<dyn FormProvider>)),
        forms,
    );
    TestApp {
        router: chat_router().with_state(ChatAppState::new(Arc::new(handler))),
        classifier,
    }
}

async fn post_json(router: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn chat(router: &Router, session: &str, body: serde_json::Value) -> serde_json::Value {
    let mut body = body;
    body["sessionId"] = serde_json::json!(session);
    let (status, json) = post_json(router, "/api/chat", body).await;
    assert_eq!(status, StatusCode::OK, "unexpected status for {json}");
    json
}

#[tokio::test]
async fn payment_flow_resolves_to_portal_link() {
    let app = test_app();

    let json = chat(
        &app.router,
        "s1",
        serde_json::json!({ "message": "I'd like to make a payment" }),
    )
    .await;
    assert_eq!(json["intent"], "PAYMENT");
    let buttons = json["buttons"].as_array().unwrap();
    assert_eq!(buttons.len(), 4);
    assert_eq!(buttons[0]["actionIntent"], "PAYMENT_TYPE_MORTGAGE");

    let json = chat(
        &app.router,
        "s1",
        serde_json::json!({ "message": "Credit Card", "actionIntent": "PAYMENT_TYPE_CREDIT_CARD" }),
    )
    .await;
    assert_eq!(json["intent"], "PAYMENT");
    assert_eq!(
        json["button"]["url"],
        "https://payments.finovabank.example/credit-card"
    );
    assert_eq!(json["button"]["openInNewWindow"], true);
}

#[tokio::test]
async fn loan_wizard_completes_on_demo_fields() {
    let app = test_app();

    chat(
        &app.router,
        "s2",
        serde_json::json!({ "message": "I want to apply for a loan" }),
    )
    .await;
    chat(
        &app.router,
        "s2",
        serde_json::json!({ "message": "Home Loan", "actionIntent": "LOAN_TYPE_HOME" }),
    )
    .await;
    let mut json = chat(
        &app.router,
        "s2",
        serde_json::json!({ "message": "Begin application", "actionIntent": "BEGIN_LOAN_APPLICATION" }),
    )
    .await;

    let mut input = json["inputRequest"].clone();
    assert_eq!(input["stepNumber"], 1);
    assert_eq!(input["totalSteps"], 9);
    assert_eq!(input["fieldId"], "firstName");
    assert_eq!(input["prefillValue"], "Greg");

    for _ in 0..9 {
        json = chat(
            &app.router,
            "s2",
            serde_json::json!({
                "message": "confirmed",
                "inputRequest": {
                    "sessionId": input["sessionId"],
                    "fieldId": input["fieldId"],
                },
            }),
        )
        .await;
        if json.get("inputRequest").is_none() {
            break;
        }
        input = json["inputRequest"].clone();
    }

    let loading = &json["loading"];
    assert_eq!(loading["durationMs"], 5000);
    assert!(loading["approvalMessage"]
        .as_str()
        .unwrap()
        .contains("home loan"));
    assert_eq!(
        loading["completionButton"]["url"],
        "https://apply.finovabank.example/loan/complete"
    );

    // The conversation is reset afterwards; the next unmatched message
    // goes back to the classifier (mock default: general).
    let json = chat(&app.router, "s2", serde_json::json!({ "message": "hello again" })).await;
    assert_eq!(json["intent"], "GENERAL_BANKING_QUESTION");
}

#[tokio::test]
async fn sessions_do_not_bleed_between_keys() {
    let app = test_app();

    chat(
        &app.router,
        "alice",
        serde_json::json!({ "message": "make a payment" }),
    )
    .await;

    app.classifier.push_classification(Ok(ClassifiedIntent::new(
        IntentCategory::OutOfScope,
        None,
    )));
    let json = chat(
        &app.router,
        "bob",
        serde_json::json!({ "message": "what's on TV tonight?" }),
    )
    .await;
    assert_eq!(json["intent"], "OUT_OF_SCOPE");

    // Alice is still mid payment flow and gets re-prompted.
    let json = chat(&app.router, "alice", serde_json::json!({ "message": "hmm" })).await;
    assert_eq!(json["intent"], "PAYMENT");
    assert!(json["buttons"].is_array());
}

#[tokio::test]
async fn classifier_outage_degrades_to_scripted_copy() {
    let app = test_app();
    app.classifier.push_classification(Err(ClassifierError::Http {
        status: 500,
        body: "boom".to_string(),
    }));

    let json = chat(
        &app.router,
        "s4",
        serde_json::json!({ "message": "something unclassifiable" }),
    )
    .await;
    assert_eq!(json["intent"], "GENERAL_BANKING_QUESTION");
    assert!(json["reply"].as_str().unwrap().contains("payments"));
}

#[tokio::test]
async fn classified_loan_type_skips_the_type_prompt() {
    let app = test_app();
    app.classifier.push_classification(Ok(ClassifiedIntent::new(
        IntentCategory::LoanApplication,
        Some("auto loan".to_string()),
    )));

    let json = chat(
        &app.router,
        "s5",
        serde_json::json!({ "message": "thinking about financing a car" }),
    )
    .await;
    assert_eq!(json["intent"], "LOAN_APPLICATION");
    let buttons = json["buttons"].as_array().unwrap();
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0]["actionIntent"], "BEGIN_LOAN_APPLICATION");
}

#[tokio::test]
async fn empty_message_is_rejected_with_400() {
    let app = test_app();
    let (status, json) = post_json(
        &app.router,
        "/api/chat",
        serde_json::json!({ "message": "", "sessionId": "s6" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["reply"], "Please provide a message to send.");
}

#[tokio::test]
async fn login_stub_checks_demo_credentials() {
    let app = test_app();

    let (status, json) = post_json(
        &app.router,
        "/api/login",
        serde_json::json!({ "username": "demo", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, _) = post_json(
        &app.router,
        "/api/login",
        serde_json::json!({ "username": "demo", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
