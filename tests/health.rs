use onboarding_bot::{configuration::get_config, web::Application};

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let mut settings = get_config().expect("Failed to read configuration.");
    // Use a random OS port
    settings.app.port = 0;

    let app = Application::build(&settings).await.unwrap();
    let addr = app.listening_addr();
    tokio::spawn(app.serve_forever());

    let resp = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert!(resp.text().await.unwrap().contains("OK"));
}
