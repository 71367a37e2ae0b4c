use keygate::create_router;

mod common;

#[tokio::test]
#[serial_test::serial]
async fn basic_integration_test() {
    // ---
    // Test that the router can be created successfully
    common::setup_test_env();
    let _router = create_router()
        .await
        .expect("Should be able to create router");
}

#[tokio::test]
#[serial_test::serial]
async fn health_endpoint_works() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body = response.text().await.expect("Failed to read response body");
    assert!(body.contains("ok"));
}

#[tokio::test]
#[serial_test::serial]
async fn full_health_check_probes_the_store() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health?mode=full"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[serial_test::serial]
async fn root_endpoint_works() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body = response.text().await.expect("Failed to read response body");
    assert!(body.contains("user_login"));
}

#[tokio::test]
#[serial_test::serial]
async fn invalid_routes_return_404() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/nonexistent"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[serial_test::serial]
async fn server_handles_concurrent_requests() {
    // ---
    let server = common::TestServer::new().await;

    // Make multiple concurrent requests
    let futures = (0..10).map(|_| server.client.get(server.url("/health")).send());

    let responses = futures::future::join_all(futures).await;

    // All requests should succeed
    for response in responses {
        let response = response.expect("Request should succeed");
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
#[serial_test::serial]
async fn server_handles_malformed_json() {
    // ---
    let server = common::TestServer::new().await;

    // Send malformed JSON to the seller registration endpoint
    let response = server
        .client
        .post(server.url("/register"))
        .header("content-type", "application/json")
        .body("{ invalid json }")
        .send()
        .await
        .expect("Failed to send request");

    // Should return 400 Bad Request
    assert_eq!(response.status(), 400);
}
