use domain::{Todo, TodoId};
use serde_json::json;
use std::sync::Arc;
use todo_client::{AuthMeProvider, AuthenticationStateProvider, ClientError, StaticAuthState, TodoClient};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, authorised: bool) -> TodoClient {
    TodoClient::new(
        reqwest::Client::new(),
        &format!("{}/api", server.uri()),
        Arc::new(StaticAuthState(authorised)),
    )
    .unwrap()
}

async fn mount_list(server: &MockServer, todos: &[Todo], times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(todos))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_fetches_only_once() {
    let server = MockServer::start().await;
    let existing = vec![Todo::new("from server")];
    mount_list(&server, &existing, 1).await;
    let mut client = client_for(&server, true);

    assert!(client.todos().is_none());
    client.load().await.unwrap();
    client.load().await.unwrap();

    assert_eq!(client.todos().unwrap(), existing.as_slice());
}

#[tokio::test]
async fn anonymous_load_is_empty_without_network() {
    let server = MockServer::start().await;
    mount_list(&server, &[], 0).await;
    let mut client = client_for(&server, false);

    client.load().await.unwrap();

    assert_eq!(client.todos(), Some(&[][..]));
}

#[tokio::test]
async fn add_posts_label_and_keeps_server_id() {
    let server = MockServer::start().await;
    mount_list(&server, &[], 1).await;
    let created = Todo::new("Buy milk");
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .and(body_json(json!("Buy milk")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);
    client.load().await.unwrap();

    client.add("Buy milk").await.unwrap();

    assert_eq!(client.todos().unwrap(), &[created][..]);
}

#[tokio::test]
async fn anonymous_add_stays_local() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let mut client = client_for(&server, false);
    client.load().await.unwrap();

    client.add("local only").await.unwrap();

    let todos = client.todos().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].label, "local only");
    assert!(!todos[0].complete);
}

#[tokio::test]
async fn blank_labels_are_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);

    client.add("   ").await.unwrap();

    assert!(client.todos().is_none());
}

#[tokio::test]
async fn add_propagates_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);

    let result = client.add("denied").await;

    assert!(matches!(result, Err(ClientError::Http(_))));
    assert!(client.todos().is_none());
}

#[tokio::test]
async fn update_pushes_to_server_then_updates_cache() {
    let server = MockServer::start().await;
    let todo = Todo::new("draft");
    mount_list(&server, std::slice::from_ref(&todo), 1).await;
    let done = Todo {
        complete: true,
        ..todo.clone()
    };
    Mock::given(method("PUT"))
        .and(path("/api/todos"))
        .and(body_json(&done))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);
    client.load().await.unwrap();

    client.update(done.clone()).await.unwrap();

    assert_eq!(client.todos().unwrap(), &[done][..]);
}

#[tokio::test]
async fn update_failure_leaves_cache_untouched() {
    let server = MockServer::start().await;
    let todo = Todo::new("draft");
    mount_list(&server, std::slice::from_ref(&todo), 1).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);
    client.load().await.unwrap();

    let result = client
        .update(Todo {
            label: "final".to_string(),
            ..todo.clone()
        })
        .await;

    assert!(matches!(result, Err(ClientError::Http(_))));
    assert_eq!(client.todos().unwrap(), &[todo][..]);
}

#[tokio::test]
async fn update_of_uncached_todo_is_an_error() {
    let server = MockServer::start().await;
    mount_list(&server, &[], 1).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);
    client.load().await.unwrap();

    let stranger = Todo::new("stranger");
    let result = client.update(stranger.clone()).await;

    assert!(matches!(result, Err(ClientError::UnknownTodo(id)) if id == stranger.id));
}

#[tokio::test]
async fn update_before_load_is_noop() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);

    client.update(Todo::new("not loaded")).await.unwrap();

    assert_eq!(client.todos(), None);
}

#[tokio::test]
async fn anonymous_update_stays_local() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut client = client_for(&server, false);
    client.load().await.unwrap();
    client.add("local").await.unwrap();
    let done = Todo {
        complete: true,
        ..client.todos().unwrap()[0].clone()
    };

    client.update(done.clone()).await.unwrap();

    assert_eq!(client.todos().unwrap(), &[done][..]);
}

#[tokio::test]
async fn remove_deletes_on_server_and_locally() {
    let server = MockServer::start().await;
    let keep = Todo::new("keep");
    let gone = Todo::new("gone");
    mount_list(&server, &[keep.clone(), gone.clone()], 1).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/todos/{}", gone.id)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let mut client = client_for(&server, true);
    client.load().await.unwrap();

    client.remove(gone.id).await.unwrap();

    assert_eq!(client.todos().unwrap(), &[keep][..]);
}

#[tokio::test]
async fn anonymous_remove_stays_local() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    let mut client = client_for(&server, false);
    client.load().await.unwrap();
    client.add("local").await.unwrap();
    let id = client.todos().unwrap()[0].id;

    client.remove(id).await.unwrap();
    client.remove(TodoId::new()).await.unwrap();

    assert_eq!(client.todos(), Some(&[][..]));
}

#[tokio::test]
async fn auth_me_requires_authorised_role() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientPrincipal": {
                "identityProvider": "github",
                "userId": "u1",
                "userDetails": "someone",
                "userRoles": ["anonymous", "authenticated", "authorised"]
            }
        })))
        .mount(&server)
        .await;

    let provider = AuthMeProvider::new(reqwest::Client::new(), &server.uri()).unwrap();
    assert!(provider.is_authorised().await);

    let strict = AuthMeProvider::new(reqwest::Client::new(), &server.uri())
        .unwrap()
        .with_required_role("admin");
    assert!(!strict.is_authorised().await);
}

#[tokio::test]
async fn auth_me_without_principal_is_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"clientPrincipal": null})))
        .mount(&server)
        .await;

    let provider = AuthMeProvider::new(reqwest::Client::new(), &server.uri()).unwrap();
    assert!(!provider.is_authorised().await);
}

#[tokio::test]
async fn auth_me_failure_is_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.auth/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = AuthMeProvider::new(reqwest::Client::new(), &server.uri()).unwrap();
    assert!(!provider.is_authorised().await);
}
