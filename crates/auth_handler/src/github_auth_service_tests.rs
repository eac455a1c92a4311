use super::*;
use rand::thread_rng;
use rsa::{pkcs8::EncodePrivateKey, RsaPrivateKey};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_APP_ID: u64 = 12345;

fn create_test_credentials() -> AppCredentials {
    let mut rng = thread_rng();
    let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
    let pem = private_key
        .to_pkcs8_pem(Default::default())
        .unwrap()
        .to_string();
    AppCredentials::new(TEST_APP_ID, pem)
}

async fn mount_token_exchange(mock_server: &MockServer, installation_id: u64, token: &str) {
    Mock::given(method("POST"))
        .and(path(format!(
            "/app/installations/{installation_id}/access_tokens"
        )))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": token,
            "expires_at": "2030-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_get_installation_token_for_org_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/electron/installation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 501 })))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_token_exchange(&mock_server, 501, "ghs_org_token").await;

    let service = GitHubAuthService::new(mock_server.uri());
    let token = service
        .get_installation_token_for_org("electron", &create_test_credentials())
        .await
        .expect("Exchange should succeed");

    assert_eq!(token.unwrap().expose_secret(), "ghs_org_token");
}

#[tokio::test]
async fn test_get_installation_token_for_repo_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/electron/fake-repo/installation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 502 })))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_token_exchange(&mock_server, 502, "ghs_repo_token").await;

    let service = GitHubAuthService::new(mock_server.uri());
    let token = service
        .get_installation_token_for_repo(
            &RepositoryRef::new("electron", "fake-repo"),
            &create_test_credentials(),
        )
        .await
        .expect("Exchange should succeed");

    assert_eq!(token.unwrap().expose_secret(), "ghs_repo_token");
}

#[tokio::test]
async fn test_get_installation_token_for_repo_not_installed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/electron/fake-repo/installation"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = GitHubAuthService::new(mock_server.uri());
    let token = service
        .get_installation_token_for_repo(
            &RepositoryRef::new("electron", "fake-repo"),
            &create_test_credentials(),
        )
        .await
        .expect("A missing installation is not an error");

    assert!(token.is_none());
}

#[tokio::test]
async fn test_get_installation_token_surfaces_github_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/electron/installation"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "A JSON web token could not be decoded",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let service = GitHubAuthService::new(mock_server.uri());
    let result = service
        .get_installation_token_for_org("electron", &create_test_credentials())
        .await;

    match result {
        Err(e) => assert_eq!(e.to_string(), "A JSON web token could not be decoded"),
        Ok(_) => panic!("Expected an error"),
    }
}

#[tokio::test]
async fn test_invalid_private_key_is_invalid_credentials() {
    let service = GitHubAuthService::default();
    let credentials = AppCredentials::new(TEST_APP_ID, "not a key");

    let result = service
        .get_installation_token_for_org("electron", &credentials)
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
}

#[tokio::test]
async fn test_get_app_slug() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": TEST_APP_ID,
            "slug": "electron-bot",
            "name": "Electron Bot"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = GitHubAuthService::new(mock_server.uri());
    let slug = service
        .get_app_slug(&create_test_credentials())
        .await
        .expect("App lookup should succeed");

    assert_eq!(slug, "electron-bot");
}

#[tokio::test]
async fn test_get_user_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/electron-bot%5Bbot%5D"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "electron-bot[bot]",
            "id": 987654
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = GitHubAuthService::new(mock_server.uri());
    let id = service
        .get_user_id("electron-bot[bot]", &SecretString::from("ghs_token"))
        .await
        .expect("User lookup should succeed");

    assert_eq!(id, 987654);
}

#[tokio::test]
async fn test_revoke_installation_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/installation/token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = GitHubAuthService::new(mock_server.uri());
    let result = service
        .revoke_installation_token(&SecretString::from("ghs_token"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_revoke_installation_token_surfaces_github_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/installation/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = GitHubAuthService::new(mock_server.uri());
    let result = service
        .revoke_installation_token(&SecretString::from("ghs_expired"))
        .await;

    match result {
        Err(AuthError::GitHubError(msg)) => assert_eq!(msg, "Bad credentials"),
        other => panic!("Expected GitHubError, got {other:?}"),
    }
}
