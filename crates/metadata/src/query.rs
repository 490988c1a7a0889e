use cinestream_core::{ContentType, MediaKind, TimeWindow};

use crate::genres;

/// A catalog list request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    PopularMovies { page: u32 },
    PopularTv { page: u32 },
    TopRatedMovies { page: u32 },
    TopRatedTv { page: u32 },
    AiringTodayTv { page: u32 },
    OnTheAirTv { page: u32 },
    Trending { content: ContentType, window: TimeWindow },
    DiscoverMovies { genre: u32, page: u32 },
    DiscoverTv { genre: u32, page: u32 },
    Recommendations { kind: MediaKind, id: String },
    Search { content: ContentType, query: String, page: u32 },
}

impl CatalogQuery {
    pub fn path(&self) -> String {
        match self {
            Self::PopularMovies { .. } => "/movie/popular".into(),
            Self::PopularTv { .. } => "/tv/popular".into(),
            Self::TopRatedMovies { .. } => "/movie/top_rated".into(),
            Self::TopRatedTv { .. } => "/tv/top_rated".into(),
            Self::AiringTodayTv { .. } => "/tv/airing_today".into(),
            Self::OnTheAirTv { .. } => "/tv/on_the_air".into(),
            Self::Trending { content, window } => format!("/trending/{content}/{window}"),
            Self::DiscoverMovies { .. } => "/discover/movie".into(),
            Self::DiscoverTv { .. } => "/discover/tv".into(),
            Self::Recommendations { kind, id } => format!("/{kind}/{id}/recommendations"),
            Self::Search { content, .. } => match content {
                ContentType::Movie => "/search/movie".into(),
                ContentType::Tv => "/search/tv".into(),
                ContentType::All => "/search/multi".into(),
            },
        }
    }

    /// Query parameters, excluding `language` which the client adds.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::PopularMovies { page }
            | Self::PopularTv { page }
            | Self::TopRatedMovies { page }
            | Self::TopRatedTv { page }
            | Self::AiringTodayTv { page }
            | Self::OnTheAirTv { page } => vec![("page", page.to_string())],
            Self::Trending { .. } => Vec::new(),
            Self::DiscoverMovies { genre, page } => vec![
                ("include_adult", "false".into()),
                ("include_video", "false".into()),
                ("sort_by", "popularity.desc".into()),
                ("with_genres", genre.to_string()),
                ("page", page.to_string()),
            ],
            Self::DiscoverTv { genre, page } => vec![
                ("include_adult", "false".into()),
                ("include_null_first_air_dates", "false".into()),
                ("sort_by", "popularity.desc".into()),
                ("with_genres", genre.to_string()),
                ("page", page.to_string()),
            ],
            Self::Recommendations { .. } => vec![("page", "1".into())],
            Self::Search { query, page, .. } => {
                vec![("query", query.clone()), ("page", page.to_string())]
            }
        }
    }

    /// Kind used to parse result elements. `None` for mixed lists, where each
    /// element carries `media_type`.
    pub fn kind(&self) -> Option<MediaKind> {
        match self {
            Self::PopularMovies { .. }
            | Self::TopRatedMovies { .. }
            | Self::DiscoverMovies { .. } => Some(MediaKind::Movie),
            Self::PopularTv { .. }
            | Self::TopRatedTv { .. }
            | Self::AiringTodayTv { .. }
            | Self::OnTheAirTv { .. }
            | Self::DiscoverTv { .. } => Some(MediaKind::Series),
            Self::Trending { content, .. } | Self::Search { content, .. } => content.media_kind(),
            Self::Recommendations { kind, .. } => Some(*kind),
        }
    }

    /// Cache key for this query. Search results are never cached.
    pub fn cache_key(&self) -> Option<String> {
        Some(match self {
            Self::PopularMovies { page } => format!("popular_movies_{page}"),
            Self::PopularTv { page } => format!("popular_tv_{page}"),
            Self::TopRatedMovies { page } => format!("top_rated_movies_{page}"),
            Self::TopRatedTv { page } => format!("top_rated_tv_{page}"),
            Self::AiringTodayTv { page } => format!("airing_today_tv_{page}"),
            Self::OnTheAirTv { page } => format!("on_the_air_tv_{page}"),
            Self::Trending { content, window } => format!("trending_{content}_{window}"),
            Self::DiscoverMovies { genre, page } => format!("discover_movie_{genre}_{page}"),
            Self::DiscoverTv { genre, page } => format!("discover_tv_{genre}_{page}"),
            Self::Recommendations { kind, id } => format!("recommendations_{kind}_{id}"),
            Self::Search { .. } => return None,
        })
    }
}

/// A titled row on a browse screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRow {
    pub title: &'static str,
    pub query: CatalogQuery,
}

impl HomeRow {
    fn new(title: &'static str, query: CatalogQuery) -> Self {
        Self { title, query }
    }
}

/// First-page rows for the movie or series browse screen, in display order.
pub fn home_rows(kind: MediaKind) -> Vec<HomeRow> {
    let page = 1;
    match kind {
        MediaKind::Movie => vec![
            HomeRow::new("Featured Movies", CatalogQuery::PopularMovies { page }),
            HomeRow::new("Top Rated", CatalogQuery::TopRatedMovies { page }),
            HomeRow::new(
                "Action & Adventure",
                CatalogQuery::DiscoverMovies { genre: genres::ACTION, page },
            ),
            HomeRow::new("Comedy", CatalogQuery::DiscoverMovies { genre: genres::COMEDY, page }),
            HomeRow::new("Drama", CatalogQuery::DiscoverMovies { genre: genres::DRAMA, page }),
            HomeRow::new(
                "Documentaries",
                CatalogQuery::DiscoverMovies { genre: genres::DOCUMENTARY, page },
            ),
        ],
        MediaKind::Series => vec![
            HomeRow::new("Popular", CatalogQuery::PopularTv { page }),
            HomeRow::new("Top Rated", CatalogQuery::TopRatedTv { page }),
            HomeRow::new("Airing Today", CatalogQuery::AiringTodayTv { page }),
            HomeRow::new("On The Air", CatalogQuery::OnTheAirTv { page }),
            HomeRow::new(
                "Action & Adventure",
                CatalogQuery::DiscoverTv { genre: genres::ACTION_ADVENTURE_TV, page },
            ),
            HomeRow::new("Comedy", CatalogQuery::DiscoverTv { genre: genres::COMEDY, page }),
            HomeRow::new("Drama", CatalogQuery::DiscoverTv { genre: genres::DRAMA, page }),
            HomeRow::new(
                "Sci-Fi & Fantasy",
                CatalogQuery::DiscoverTv { genre: genres::SCI_FI_FANTASY_TV, page },
            ),
            HomeRow::new(
                "Documentaries",
                CatalogQuery::DiscoverTv { genre: genres::DOCUMENTARY, page },
            ),
            HomeRow::new("Crime", CatalogQuery::DiscoverTv { genre: genres::CRIME, page }),
        ],
    }
}
