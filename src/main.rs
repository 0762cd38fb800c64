//! Finova assistant server entrypoint.
//!
//! Loads configuration, wires live or mock adapters depending on which
//! credentials are present, and serves the chat API. Nothing upstream is
//! required: with an empty environment the server runs fully offline on
//! the mock classifier and the demo form fields.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use finova_assistant::adapters::ai::{MockClassifier, OpenAiClassifier, OpenAiClassifierConfig};
use finova_assistant::adapters::form_service::{CallvuConfig, CallvuFormClient, MockFormProvider};
use finova_assistant::adapters::http::{chat_router, ChatAppState};
use finova_assistant::adapters::session::InMemorySessionStore;
use finova_assistant::application::handlers::ChatTurnHandler;
use finova_assistant::config::AppConfig;
use finova_assistant::domain::flow::{ActionDirectory, FlowRouter};
use finova_assistant::domain::wizard::WizardEngine;
use finova_assistant::ports::{FormProvider, IntentClassifier, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let classifier = build_classifier(&config);
    let forms = build_form_provider(&config);

    let sessions: Arc<dyn SessionStore> =
        Arc::new(InMemorySessionStore::new(config.session.idle_ttl()));
    let wizard = Arc::new(WizardEngine::new(Arc::clone(&forms)));

    let handler = Arc::new(ChatTurnHandler::new(
        FlowRouter::new(ActionDirectory::new()),
        sessions,
        classifier,
        wizard,
        forms,
    ));

    let app = chat_router()
        .with_state(ChatAppState::new(handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    info!(%addr, environment = ?config.server.environment, "starting finova assistant");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_classifier(config: &AppConfig) -> Arc<dyn IntentClassifier> {
    match &config.classifier.openai_api_key {
        Some(key) if config.classifier.is_configured() => {
            info!(model = %config.classifier.model, "using live intent classifier");
            Arc::new(OpenAiClassifier::new(
                OpenAiClassifierConfig::new(key.expose_secret().clone())
                    .with_model(config.classifier.model.clone())
                    .with_base_url(config.classifier.base_url.clone())
                    .with_timeout(config.classifier.timeout()),
            ))
        }
        _ => {
            warn!("no classifier credentials, using scripted fallback classifier");
            Arc::new(MockClassifier::new())
        }
    }
}

fn build_form_provider(config: &AppConfig) -> Arc<dyn FormProvider> {
    let provider = &config.form_provider;
    match (
        provider.org_id.as_ref(),
        provider.token.as_ref(),
        provider.normalized_base_url(),
    ) {
        (Some(org_id), Some(token), Some(base_url)) if provider.is_configured() => {
            info!(%org_id, %base_url, "using live form provider");
            Arc::new(CallvuFormClient::new(
                CallvuConfig::new(org_id.clone(), token.expose_secret().clone(), base_url)
                    .with_timeout(provider.timeout()),
            ))
        }
        _ => {
            warn!("no form provider credentials, loan verification will use demo fields");
            Arc::new(MockFormProvider::new())
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
