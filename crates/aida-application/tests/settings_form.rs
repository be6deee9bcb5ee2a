mod support;

use std::sync::Arc;

use aida_application::settings_form::{
    ConnectionTest, Indicator, SettingsField, SettingsFormController,
};
use aida_core::gateway::Procedure;
use aida_core::settings::Settings;
use support::{HostCall, MockGateway, RecordingHost, ack, network_error};

fn controller() -> (SettingsFormController, Arc<MockGateway>, Arc<RecordingHost>) {
    let gateway = Arc::new(MockGateway::new());
    let host = Arc::new(RecordingHost::default());
    let controller = SettingsFormController::new(gateway.clone(), host.clone());
    (controller, gateway, host)
}

fn doc() -> Settings {
    Settings::fallback("https://erp.example.com")
}

#[test]
fn test_refresh_adds_test_connection_button() {
    let (controller, _gateway, host) = controller();
    controller.on_refresh();
    assert_eq!(
        host.calls(),
        vec![HostCall::Button {
            label: "Test Connection".to_string(),
            group: "Actions".to_string(),
        }]
    );
}

#[test]
fn test_url_fields_warn_without_reverting() {
    let (controller, _gateway, host) = controller();
    let mut doc = doc();

    doc.api_server_url = "ftp://x".to_string();
    controller.on_field_change(&doc, SettingsField::ApiServerUrl);
    doc.erpnext_url = "https://x".to_string();
    controller.on_field_change(&doc, SettingsField::ErpnextUrl);
    doc.erpnext_url = String::new();
    controller.on_field_change(&doc, SettingsField::ErpnextUrl);

    let prompts = host.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].title, "Invalid URL");
    assert_eq!(
        prompts[0].message,
        "API Server URL must start with http:// or https://"
    );
    assert_eq!(prompts[0].indicator, Indicator::Orange);
    assert_eq!(doc.api_server_url, "ftp://x");
}

#[test]
fn test_feature_flag_notices() {
    let (controller, _gateway, host) = controller();
    let mut doc = doc();

    controller.on_field_change(&doc, SettingsField::EnableOnboarding);
    controller.on_field_change(&doc, SettingsField::EnableLeadCreation);
    doc.google_api_key = "a-real-looking-google-key".to_string();
    controller.on_field_change(&doc, SettingsField::EnableLeadCreation);
    doc.enable_lead_creation = false;
    doc.enable_onboarding = false;
    controller.on_field_change(&doc, SettingsField::EnableLeadCreation);
    controller.on_field_change(&doc, SettingsField::EnableOnboarding);

    let titles: Vec<(String, Indicator)> = host
        .prompts()
        .into_iter()
        .map(|prompt| (prompt.title, prompt.indicator))
        .collect();
    assert_eq!(
        titles,
        vec![
            ("Onboarding Enabled".to_string(), Indicator::Green),
            ("Google API Key Required".to_string(), Indicator::Orange),
            ("Lead Creation Enabled".to_string(), Indicator::Green),
        ]
    );
}

#[tokio::test]
async fn test_connection_requires_api_server_url() {
    let (controller, gateway, host) = controller();
    let mut doc = doc();
    doc.api_server_url = String::new();

    assert_eq!(
        controller.test_connection(&doc).await,
        ConnectionTest::MissingConfiguration
    );
    assert_eq!(gateway.count(Procedure::TestConnection), 0);
    let prompts = host.prompts();
    assert_eq!(prompts[0].title, "Missing Configuration");
    assert_eq!(prompts[0].indicator, Indicator::Red);
}

#[tokio::test]
async fn test_connection_success_shows_alerts() {
    let (controller, gateway, host) = controller();

    assert_eq!(
        controller.test_connection(&doc()).await,
        ConnectionTest::Succeeded
    );
    assert_eq!(gateway.count(Procedure::TestConnection), 1);
    assert_eq!(
        host.calls(),
        vec![
            HostCall::Alert {
                message: "Testing connection...".to_string(),
                indicator: Indicator::Blue,
            },
            HostCall::Alert {
                message: "Connection test completed successfully".to_string(),
                indicator: Indicator::Green,
            },
        ]
    );
}

#[tokio::test]
async fn test_connection_failure_messages() {
    let (controller, gateway, host) = controller();

    *gateway.test_connection.lock().unwrap() = ack(false, Some("API server returned status 502"));
    assert_eq!(
        controller.test_connection(&doc()).await,
        ConnectionTest::Failed("API server returned status 502".to_string())
    );

    *gateway.test_connection.lock().unwrap() = ack(false, None);
    assert_eq!(
        controller.test_connection(&doc()).await,
        ConnectionTest::Failed("Unknown error occurred".to_string())
    );

    *gateway.test_connection.lock().unwrap() = Err(network_error());
    assert_eq!(
        controller.test_connection(&doc()).await,
        ConnectionTest::Failed("Failed to communicate with server".to_string())
    );

    // One call per press, never retried.
    assert_eq!(gateway.count(Procedure::TestConnection), 3);
    assert!(
        host.prompts()
            .iter()
            .all(|prompt| prompt.title == "Connection Test Failed"
                && prompt.indicator == Indicator::Red)
    );
}

#[tokio::test]
async fn test_save_validates_before_calling() {
    let (controller, gateway, host) = controller();
    let mut doc = doc();
    doc.mongo_uri = "postgres://db".to_string();

    let err = controller.save(&doc).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(gateway.count(Procedure::SaveSettings), 0);
    assert_eq!(host.prompts()[0].message, "Invalid MongoDB URI format");

    doc.mongo_uri = "mongodb://localhost:27017/aida".to_string();
    controller.save(&doc).await.unwrap();
    assert_eq!(gateway.count(Procedure::SaveSettings), 1);
}

#[tokio::test]
async fn test_save_reports_server_rejection() {
    let (controller, gateway, _host) = controller();
    *gateway.save.lock().unwrap() = ack(false, Some("Insufficient permissions"));

    let err = controller.save(&doc()).await.unwrap_err();
    assert_eq!(err.detail(), "Insufficient permissions");
}
