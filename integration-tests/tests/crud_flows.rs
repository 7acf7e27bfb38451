use integration_tests::support::{draft, spawn_server, ADMIN_PIN};
use podwatch::PodcastPatch;
use podwatch_client::OpStatus;
use serde_json::Value;

#[tokio::test]
async fn full_lifecycle_against_a_real_server() {
    let server = spawn_server().await;
    let mut store = server.store();

    store.fetch_all().await;
    assert_eq!(store.operations().fetch, OpStatus::Succeeded);
    assert!(store.podcasts().is_empty());

    // create reconciles the list without a refetch
    store.create(&draft("Science Friday", "Science", "4821")).await;
    assert_eq!(store.operations().create, OpStatus::Succeeded);
    assert_eq!(store.podcasts().len(), 1);
    let id = store.podcasts()[0].id.clone();
    assert!(store.podcasts()[0].updated_at.is_none());

    // update through the store, gated by the podcast's own PIN
    let patch = PodcastPatch { rating: Some(3.75), ..Default::default() };
    store.update(&id, &patch, "4821").await;
    assert_eq!(store.operations().update, OpStatus::Succeeded);
    assert_eq!(store.podcasts()[0].rating, Some(3.8));
    assert!(store.podcasts()[0].updated_at.is_some());

    // a fresh client sees the same state from the server
    let mut second = server.store();
    second.fetch_all().await;
    assert_eq!(second.podcasts().len(), 1);
    assert_eq!(second.podcasts()[0].rating, Some(3.8));

    store.delete(&id, "4821").await;
    assert_eq!(store.operations().delete, OpStatus::Succeeded);
    assert!(store.podcasts().is_empty());

    second.fetch_all().await;
    assert!(second.podcasts().is_empty());
}

#[tokio::test]
async fn wrong_pin_is_rejected_and_admin_pin_overrides() {
    let server = spawn_server().await;
    let mut store = server.store();

    store.create(&draft("Science Friday", "Science", "4821")).await;
    let id = store.podcasts()[0].id.clone();

    // wrong PIN: operation fails, nothing changes anywhere
    store.delete(&id, "0000").await;
    assert_eq!(store.operations().delete, OpStatus::Failed);
    assert_eq!(store.last_error(), Some("Invalid PIN for this podcast"));
    assert_eq!(store.podcasts().len(), 1);

    // the process-wide admin PIN authorizes any podcast
    store.delete(&id, ADMIN_PIN).await;
    assert_eq!(store.operations().delete, OpStatus::Succeeded);
    assert!(store.podcasts().is_empty());
}

#[tokio::test]
async fn empty_patch_is_rejected_and_list_is_unchanged() {
    let server = spawn_server().await;
    let mut store = server.store();

    store.create(&draft("Science Friday", "Science", "4821")).await;
    let id = store.podcasts()[0].id.clone();
    let before = store.podcasts().to_vec();

    store.update(&id, &PodcastPatch::default(), "4821").await;
    assert_eq!(store.operations().update, OpStatus::Failed);
    assert_eq!(store.last_error(), Some("No fields to update"));
    assert_eq!(store.podcasts(), &before[..]);
}

#[tokio::test]
async fn no_response_ever_carries_a_pin_field() {
    let server = spawn_server().await;
    let mut store = server.store();
    store.create(&draft("Science Friday", "Science", "4821")).await;
    let id = store.podcasts()[0].id.clone();

    let client = reqwest::Client::new();

    // list response
    let body: Value = client.get(server.podcasts_url()).send().await.unwrap().json().await.unwrap();
    let listed = body["data"]["podcasts"][0].as_object().unwrap();
    assert!(!listed.contains_key("pin"));
    assert!(!listed.contains_key("pinHash"));

    // detail response
    let body: Value =
        client.get(format!("{}/{id}", server.podcasts_url())).send().await.unwrap().json().await.unwrap();
    assert!(!body["data"]["podcast"].as_object().unwrap().contains_key("pin"));

    // error responses stay on the uniform {status, message} shape
    let resp = client
        .delete(format!("{}/{id}", server.podcasts_url()))
        .json(&serde_json::json!({ "pin": "0000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["status"], "fail");
    assert_eq!(err["message"], "Invalid PIN for this podcast");
    assert!(err.get("pin").is_none());
}

#[tokio::test]
async fn transport_failures_surface_as_stored_errors_not_panics() {
    let server = spawn_server().await;
    // a port nobody listens on
    let api = podwatch_client::HttpApi::new("http://127.0.0.1:9").unwrap();
    let mut store = podwatch_client::RequestStateStore::new(api);

    store.fetch_all().await;
    assert_eq!(store.operations().fetch, OpStatus::Failed);
    assert!(store.last_error().is_some());
    assert!(store.podcasts().is_empty());

    // the live server is unaffected
    let mut live = server.store();
    live.fetch_all().await;
    assert_eq!(live.operations().fetch, OpStatus::Succeeded);
}
