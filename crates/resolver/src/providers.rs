//! Provider registry shared by automatic fallback and manual server selection.

use cinestream_core::MediaKind;

/// One upstream scraping backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provider {
    /// Path segment on the source API.
    pub id: &'static str,
    /// Name shown in server selection.
    pub alias: &'static str,
    /// Whether automatic resolution tries this provider.
    pub fallback: bool,
    pub movies_only: bool,
}

impl Provider {
    const fn new(id: &'static str, alias: &'static str) -> Self {
        Self {
            id,
            alias,
            fallback: true,
            movies_only: false,
        }
    }

    pub fn serves(&self, kind: MediaKind) -> bool {
        !self.movies_only || kind == MediaKind::Movie
    }
}

/// Every provider, in display order. Fallback order is the same order with
/// selection-only providers removed.
pub const PROVIDERS: &[Provider] = &[
    Provider::new("myflixerzupcloud", "Neon"),
    Provider::new("1movies", "Sage"),
    Provider::new("moviebox", "Cypher"),
    Provider {
        id: "cdn",
        alias: "Yoru",
        fallback: false,
        movies_only: true,
    },
    Provider::new("primewire", "Reyna"),
    Provider::new("onionplay", "Omen"),
    Provider::new("m4uhd", "Breach"),
    Provider::new("hdmovie", "Vyse"),
];

/// Which of the two source API hosts to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirror {
    Primary,
    Backup,
}

impl Mirror {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Backup => "Backup",
        }
    }
}

impl std::fmt::Display for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable `(provider, mirror)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Server {
    pub provider: &'static Provider,
    pub mirror: Mirror,
}

impl Server {
    /// e.g. "Neon (Primary)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.provider.alias, self.mirror)
    }
}

pub fn find(id: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.id == id)
}

/// Providers tried by automatic resolution, in order.
pub fn fallback_order() -> impl Iterator<Item = &'static Provider> {
    PROVIDERS.iter().filter(|p| p.fallback)
}

/// Servers a user may pick for a title of `kind`.
pub fn servers_for(kind: MediaKind) -> Vec<Server> {
    PROVIDERS
        .iter()
        .filter(|p| p.serves(kind))
        .flat_map(|provider| {
            [Mirror::Primary, Mirror::Backup]
                .into_iter()
                .map(move |mirror| Server { provider, mirror })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_order_is_fixed() {
        let ids: Vec<_> = fallback_order().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![
                "myflixerzupcloud",
                "1movies",
                "moviebox",
                "primewire",
                "onionplay",
                "m4uhd",
                "hdmovie"
            ]
        );
    }

    #[test]
    fn movie_only_server_hidden_for_series() {
        let movie = servers_for(MediaKind::Movie);
        let series = servers_for(MediaKind::Series);
        assert_eq!(movie.len(), 16);
        assert_eq!(series.len(), 14);
        assert!(series.iter().all(|s| s.provider.id != "cdn"));
        assert_eq!(movie[0].label(), "Neon (Primary)");
        assert_eq!(movie[7].label(), "Yoru (Backup)");
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(find("1movies").map(|p| p.alias), Some("Sage"));
        assert!(find("nope").is_none());
    }
}
