use crate::models::MediaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    VidsrcCc,
    VidsrcMe,
    VidsrcPro,
    EmbedSu,
    TwoEmbed,
    MoviesApi,
    SuperEmbed,
    Videasy,
}

impl Mirror {
    pub const ALL: [Mirror; 8] = [
        Mirror::VidsrcCc,
        Mirror::VidsrcMe,
        Mirror::VidsrcPro,
        Mirror::EmbedSu,
        Mirror::TwoEmbed,
        Mirror::MoviesApi,
        Mirror::SuperEmbed,
        Mirror::Videasy,
    ];

    pub const DEFAULT: Mirror = Mirror::Videasy;

    pub fn name(&self) -> &'static str {
        match self {
            Mirror::VidsrcCc => "vidsrc.cc",
            Mirror::VidsrcMe => "vidsrc.me",
            Mirror::VidsrcPro => "vidsrc.pro",
            Mirror::EmbedSu => "embedsu",
            Mirror::TwoEmbed => "2embed",
            Mirror::MoviesApi => "moviesapi",
            Mirror::SuperEmbed => "superembed",
            Mirror::Videasy => "player.videasy.net",
        }
    }

    /// Unknown or missing names map to the default mirror.
    pub fn from_name(name: Option<&str>) -> Mirror {
        name.and_then(|n| Self::ALL.into_iter().find(|m| m.name() == n.trim()))
            .unwrap_or(Self::DEFAULT)
    }

    /// Landing page probed by the status check.
    pub fn home_url(&self) -> &'static str {
        match self {
            Mirror::VidsrcCc => "https://vidsrc.cc",
            Mirror::VidsrcMe => "https://vidsrc.net",
            Mirror::VidsrcPro => "https://vidsrc.pro",
            Mirror::EmbedSu => "https://embed.su",
            Mirror::TwoEmbed => "https://www.2embed.cc",
            Mirror::MoviesApi => "https://moviesapi.club",
            Mirror::SuperEmbed => "https://multiembed.mov",
            Mirror::Videasy => "https://player.videasy.net",
        }
    }

    pub fn embed_url(&self, kind: MediaKind, id: i64) -> String {
        match self {
            Mirror::VidsrcCc => format!("https://vidsrc.cc/v2/embed/{kind}/{id}"),
            Mirror::VidsrcMe => format!("https://vidsrc.net/embed/{kind}/?tmdb={id}"),
            Mirror::VidsrcPro => format!("https://vidsrc.pro/embed/{kind}/{id}"),
            Mirror::EmbedSu => format!("https://embed.su/embed/{kind}/{id}"),
            Mirror::TwoEmbed => format!("https://www.2embed.cc/embed/{kind}/{id}"),
            // Both only index by TMDB id, the kind is implied.
            Mirror::MoviesApi => format!("https://moviesapi.club/movie/{id}"),
            Mirror::SuperEmbed => format!("https://multiembed.mov/?video_id={id}&tmdb=1"),
            Mirror::Videasy => {
                let segment = match kind {
                    MediaKind::Movie => "movie",
                    MediaKind::Tv => "show",
                };
                format!(
                    "https://player.videasy.net/embed/{segment}/{id}?ads_behavior=background&popup_mode=quiet"
                )
            }
        }
    }
}

pub fn resolve(kind: MediaKind, id: i64, server: Option<&str>) -> String {
    Mirror::from_name(server).embed_url(kind, id)
}
