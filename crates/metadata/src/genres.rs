//! TMDB genre ids. List responses only carry `genre_ids`; detail responses
//! embed the names directly.

pub const ACTION: u32 = 28;
pub const COMEDY: u32 = 35;
pub const CRIME: u32 = 80;
pub const DOCUMENTARY: u32 = 99;
pub const DRAMA: u32 = 18;
pub const ACTION_ADVENTURE_TV: u32 = 10759;
pub const SCI_FI_FANTASY_TV: u32 = 10765;

const GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
    // TV
    (10759, "Action & Adventure"),
    (10762, "Kids"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
];

pub fn genre_name(id: u64) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(gid, _)| u64::from(*gid) == id)
        .map(|(_, name)| *name)
}

/// Map `genre_ids` to names, dropping ids the table does not know.
pub fn genre_names(ids: &[serde_json::Value]) -> Vec<String> {
    ids.iter()
        .filter_map(|v| v.as_u64())
        .filter_map(genre_name)
        .map(str::to_string)
        .collect()
}
