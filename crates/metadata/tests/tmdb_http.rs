use std::time::Duration;

use cinestream_core::{ContentType, MediaKind, TimeWindow};
use cinestream_metadata::provider::CatalogProvider;
use cinestream_metadata::query::CatalogQuery;
use cinestream_metadata::tmdb::{TmdbClient, TmdbConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TmdbClient {
    TmdbClient::new(TmdbConfig {
        base_url: server.uri(),
        image_base_url: "http://img.test/t/p".into(),
        bearer_token: "test-token".into(),
        language: "en-US".into(),
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

#[tokio::test]
async fn list_sends_bearer_and_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{
                "id": 385687,
                "title": "Fast X",
                "release_date": "2023-05-17",
                "vote_average": 7.2,
                "poster_path": "/fastx.jpg",
                "genre_ids": [28, 80]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .list(&CatalogQuery::PopularMovies { page: 1 })
        .await;

    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert_eq!(rec.title, "Fast X");
    assert_eq!(rec.release_year, 2023);
    assert_eq!(rec.genres, vec!["Action", "Crime"]);
    assert_eq!(
        rec.poster_url.as_deref(),
        Some("http://img.test/t/p/w500/fastx.jpg")
    );
}

#[tokio::test]
async fn list_is_capped_at_twenty() {
    let server = MockServer::start().await;
    let results: Vec<_> = (1..=40)
        .map(|i| json!({ "id": i, "name": format!("Show {i}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/tv/top_rated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(&server)
        .await;

    let records = client(&server)
        .list(&CatalogQuery::TopRatedTv { page: 1 })
        .await;

    assert_eq!(records.len(), 20);
    assert!(records.iter().all(|r| r.kind == MediaKind::Series));
}

#[tokio::test]
async fn error_status_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending/all/day"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let records = client(&server)
        .list(&CatalogQuery::Trending {
            content: ContentType::All,
            window: TimeWindow::Day,
        })
        .await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn invalid_json_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let records = client(&server)
        .list(&CatalogQuery::TopRatedMovies { page: 1 })
        .await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn malformed_element_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": 1, "title": "Fast Five" },
                { "title": "no id" },
                { "id": 3, "title": "Fast X" }
            ]
        })))
        .mount(&server)
        .await;

    let records = client(&server)
        .list(&CatalogQuery::Search {
            content: ContentType::Movie,
            query: "fast".into(),
            page: 1,
        })
        .await;

    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Fast Five", "Fast X"]);
}

#[tokio::test]
async fn detail_found_and_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/385687"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 385687,
            "title": "Fast X",
            "runtime": 142,
            "status": "Released",
            "genres": [{ "id": 28, "name": "Action" }]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let found = client.detail(MediaKind::Movie, "385687").await.unwrap();
    assert_eq!(found.runtime.as_deref(), Some("142 min"));
    assert_eq!(found.genres, vec!["Action"]);

    // Unmatched requests get wiremock's default 404.
    assert!(client.detail(MediaKind::Movie, "1").await.is_none());
}

#[tokio::test]
async fn seasons_and_episodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/66732"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 66732,
            "name": "Stranger Things",
            "seasons": [
                { "id": 1, "season_number": 0, "name": "Specials" },
                { "id": 2, "season_number": 1, "name": "Season 1", "episode_count": 8 }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/66732/season/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "episodes": [
                { "id": 10, "episode_number": 1, "name": "The Vanishing of Will Byers" },
                { "id": 11, "episode_number": 2, "name": "The Weirdo on Maple Street" }
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let seasons = client.seasons("66732").await;
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].episode_count, 8);

    let episodes = client.season_episodes("66732", 1).await;
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[1].episode_number, 2);

    assert!(client.season_episodes("66732", 9).await.is_empty());
}

#[tokio::test]
async fn episode_keeps_series_title_and_year() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/66732"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 66732,
            "name": "Stranger Things",
            "first_air_date": "2016-07-15"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/66732/season/4/episode/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1198665,
            "name": "Chapter One: The Hellfire Club",
            "air_date": "2022-05-27"
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let rec = client.episode("66732", 4, 1).await.unwrap();
    assert_eq!(rec.title, "Stranger Things");
    assert_eq!(rec.release_year, 2016);
    assert_eq!(rec.external_id.as_deref(), Some("66732"));
    assert_eq!(
        rec.episode_title.as_deref(),
        Some("Chapter One: The Hellfire Club")
    );

    // No series detail for this id, so no playable episode.
    assert!(client.episode("1", 1, 1).await.is_none());
}
