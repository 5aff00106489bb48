//! ProfileClient against a local stand-in for the profile services

mod common;

use common::{FakeUpstream, LEGACY_ID, NOTCH_ID, SKINLESS_ID};
use skinrender::profile::{PlayerId, ProfileClient, ProfileError, TextureSource};

fn id(raw: &str) -> PlayerId {
    PlayerId::parse(raw).unwrap()
}

#[tokio::test]
async fn test_lookup_name() {
    let upstream = FakeUpstream::start().await;
    let client = ProfileClient::new(&upstream.api_config()).unwrap();

    assert_eq!(client.lookup_name("Notch").await.unwrap().as_str(), NOTCH_ID);
    assert_eq!(upstream.calls(), (1, 0, 0));
}

#[tokio::test]
async fn test_unknown_names_are_not_found() {
    let upstream = FakeUpstream::start().await;
    let client = ProfileClient::new(&upstream.api_config()).unwrap();

    for name in ["nobody", "ghost"] {
        let err = client.lookup_name(name).await.unwrap_err();
        assert!(matches!(err, ProfileError::PlayerNotFound(ref n) if n == name), "{}", err);
    }
}

#[tokio::test]
async fn test_skin_url() {
    let upstream = FakeUpstream::start().await;
    let client = ProfileClient::new(&upstream.api_config()).unwrap();

    let url = client.skin_url(&id(NOTCH_ID)).await.unwrap().unwrap();
    assert_eq!(url, format!("{}/textures/notch", upstream.base_url));

    assert_eq!(client.skin_url(&id(SKINLESS_ID)).await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_profile() {
    let upstream = FakeUpstream::start().await;
    let client = ProfileClient::new(&upstream.api_config()).unwrap();

    let err = client.skin_url(&id("0123456789abcdef0123456789abcdef")).await.unwrap_err();
    assert!(matches!(err, ProfileError::ProfileNotFound(_)));
}

#[tokio::test]
async fn test_fetch_texture() {
    let upstream = FakeUpstream::start().await;
    let client = ProfileClient::new(&upstream.api_config()).unwrap();

    let url = client.skin_url(&id(LEGACY_ID)).await.unwrap().unwrap();
    let bytes = client.fetch_texture(&url).await.unwrap();
    let image = image::load_from_memory(&bytes).unwrap();
    assert_eq!((image.width(), image.height()), (64, 32));
}

#[tokio::test]
async fn test_fetch_texture_error_status() {
    let upstream = FakeUpstream::start().await;
    let client = ProfileClient::new(&upstream.api_config()).unwrap();

    let url = format!("{}/textures/missing", upstream.base_url);
    let err = client.fetch_texture(&url).await.unwrap_err();
    assert!(matches!(err, ProfileError::TextureStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = skinrender::config::ApiConfig::with_base_url(&format!("http://{}", addr));
    let client = ProfileClient::new(&config).unwrap();
    let err = client.lookup_name("Notch").await.unwrap_err();
    assert!(matches!(err, ProfileError::Http(_)));
}
