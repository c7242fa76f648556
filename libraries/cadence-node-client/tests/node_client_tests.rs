//! Tests for the Lavalink node client.
//!
//! These tests use mock servers to verify request shapes and response
//! mapping without a running node.

use cadence_core::{
    ChannelId, EngineError, PlaybackEngine, PlayerHandle, ResolveResult, RoomId, Track,
    TrackInfo, UserId,
};
use cadence_node_client::{LavalinkClient, NodeClientError, NodeConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LavalinkClient {
    LavalinkClient::new(NodeConfig::new(server.uri(), "youshallnotpass")).unwrap()
}

fn track_json(id: &str) -> serde_json::Value {
    json!({
        "encoded": format!("enc-{id}"),
        "info": {
            "identifier": id,
            "isSeekable": true,
            "author": "Artist",
            "length": 200_000,
            "isStream": false,
            "position": 0,
            "title": format!("Song {id}"),
            "uri": format!("https://youtube.com/watch?v={id}"),
            "artworkUrl": null,
            "isrc": null,
            "sourceName": "youtube"
        },
        "pluginInfo": {},
        "userData": {}
    })
}

fn user() -> UserId {
    UserId::new("42")
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_url() {
        assert!(LavalinkClient::new(NodeConfig::new("http://localhost:2333", "pass")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match LavalinkClient::new(NodeConfig::new("", "pass")) {
            Err(NodeClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        assert!(matches!(
            LavalinkClient::new(NodeConfig::new("localhost:2333", "pass")),
            Err(NodeClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = LavalinkClient::new(NodeConfig::new("http://node:2333/", "pass")).unwrap();
        assert_eq!(client.url(), "http://node:2333");
    }

    #[tokio::test]
    async fn test_session_id_from_config() {
        let config = NodeConfig::new("http://node:2333", "pass").with_session_id("abc");
        let client = LavalinkClient::new(config).unwrap();
        assert_eq!(client.session_id().await.as_deref(), Some("abc"));
    }
}

// =============================================================================
// Resolve Tests
// =============================================================================

mod resolve {
    use super::*;

    #[tokio::test]
    async fn test_search_prefixes_platform() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/loadtracks"))
            .and(query_param("identifier", "ytmsearch:daft punk"))
            .and(header("Authorization", "youshallnotpass"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "loadType": "search",
                "data": [track_json("a"), track_json("b")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).resolve("daft punk", &user()).await.unwrap();

        match result {
            ResolveResult::Search { tracks } => {
                assert_eq!(tracks.len(), 2);
                assert_eq!(tracks[0].encoded, "enc-a");
                assert_eq!(tracks[0].duration_ms, Some(200_000));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_url_passes_through() {
        let server = MockServer::start().await;
        let link = "https://youtube.com/watch?v=a";
        Mock::given(method("GET"))
            .and(path("/v4/loadtracks"))
            .and(query_param("identifier", link))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "loadType": "track",
                "data": track_json("a")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).resolve(link, &user()).await.unwrap();
        assert!(matches!(result, ResolveResult::Track { .. }));
    }

    #[tokio::test]
    async fn test_playlist_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/loadtracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "loadType": "playlist",
                "data": {
                    "info": { "name": "Mix", "selectedTrack": -1 },
                    "pluginInfo": {},
                    "tracks": [track_json("a"), track_json("b"), track_json("c")]
                }
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .resolve("https://youtube.com/playlist?list=x", &user())
            .await
            .unwrap();

        match result {
            ResolveResult::Playlist { info, tracks } => {
                assert_eq!(info.name, "Mix");
                assert_eq!(tracks.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_is_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/loadtracks"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "loadType": "empty", "data": {} })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).resolve("zzzz", &user()).await.unwrap();
        assert_eq!(result, ResolveResult::NoMatch);
    }

    #[tokio::test]
    async fn test_load_error_is_resolve_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/loadtracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "loadType": "error",
                "data": { "message": "This video is unavailable", "severity": "common", "cause": "x" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve("bad", &user()).await.unwrap_err();
        match err {
            EngineError::Resolve(msg) => assert!(msg.contains("unavailable")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_node_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/loadtracks"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "timestamp": 1,
                "status": 401,
                "error": "Unauthorized",
                "message": "Invalid password",
                "path": "/v4/loadtracks"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve("x", &user()).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Node {
                status: 401,
                message: "Invalid password".into()
            }
        );
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/loadtracks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve("x", &user()).await.unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_unavailable() {
        // Nothing listens on port 1
        let client = LavalinkClient::new(NodeConfig::new("http://127.0.0.1:1", "pass")).unwrap();
        let err = client.resolve("x", &user()).await.unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(_)));
    }
}

// =============================================================================
// Player Tests
// =============================================================================

mod player {
    use super::*;

    const PLAYER_PATH: &str = "/v4/sessions/sess-1/players/guild-1";

    async fn connected(server: &MockServer) -> Box<dyn PlayerHandle> {
        let client = client_for(server);
        client.set_session_id("sess-1").await;
        client
            .connect(
                &RoomId::new("guild-1"),
                &ChannelId::new("voice"),
                &ChannelId::new("text"),
            )
            .await
            .unwrap()
    }

    fn track() -> Track {
        Track::new(TrackInfo::new("enc-a", "Song a"), user())
    }

    #[tokio::test]
    async fn test_connect_without_session_fails() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let result = client
            .connect(&RoomId::new("g"), &ChannelId::new("v"), &ChannelId::new("t"))
            .await;
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_play_patches_encoded_track() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(PLAYER_PATH))
            .and(header("Authorization", "youshallnotpass"))
            .and(body_json(json!({ "track": { "encoded": "enc-a" }, "paused": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        connected(&server).await.play(&track()).await.unwrap();
    }

    #[tokio::test]
    async fn test_pause_and_volume_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(PLAYER_PATH))
            .and(body_json(json!({ "paused": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(PLAYER_PATH))
            .and(body_json(json!({ "volume": 75 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let player = connected(&server).await;
        player.pause(true).await.unwrap();
        player.set_volume(75).await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_sends_null_track() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(PLAYER_PATH))
            .and(body_json(json!({ "track": { "encoded": null } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        connected(&server).await.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_destroy_deletes_player() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(PLAYER_PATH))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        connected(&server).await.destroy().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_session_on_node_is_node_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(PLAYER_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": 404,
                "error": "Not Found",
                "message": "Session not found",
                "path": PLAYER_PATH
            })))
            .mount(&server)
            .await;

        let err = connected(&server).await.pause(false).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Node {
                status: 404,
                message: "Session not found".into()
            }
        );
    }
}
