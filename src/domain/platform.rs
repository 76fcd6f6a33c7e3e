//! Platform and service detection for deep-link synthesis.
//!
//! Two independent classifiers feed one composition step:
//!
//! - [`detect_platform`] maps a user-agent onto [`Platform`]
//! - [`detect_service`] maps a destination URL onto [`Service`]
//! - [`generate_deep_link`] picks the best URI for the `(platform, service)` pair
//!
//! Both classifiers are driven by ordered rule tables where the first match
//! wins. Adding a service means adding one row to `SERVICE_RULES`.
//!
//! Every function here is pure and total. Anything unrecognised degrades to
//! the original destination.

use std::fmt;
use url::Url;

/// Client operating system family, as far as redirects care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        }
    }

    fn is_mobile(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downstream service a destination URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Spotify,
    AppleMusic,
    YouTube,
    Instagram,
    Facebook,
    TikTok,
    Uber,
    Lyft,
    GoogleMaps,
    Unknown,
}

impl Service {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::AppleMusic => "apple_music",
            Self::YouTube => "youtube",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::TikTok => "tiktok",
            Self::Uber => "uber",
            Self::Lyft => "lyft",
            Self::GoogleMaps => "google_maps",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct PlatformRule {
    needles: &'static [&'static str],
    platform: Platform,
}

/// Checked in order against the lowercased user-agent.
const PLATFORM_RULES: &[PlatformRule] = &[
    PlatformRule {
        needles: &["iphone", "ipad"],
        platform: Platform::Ios,
    },
    PlatformRule {
        needles: &["android"],
        platform: Platform::Android,
    },
];

/// One row of the service table.
///
/// A pattern is `host` or `host/path-prefix`. It matches a destination whose
/// host equals `host` or is a subdomain of it, and whose path starts with the
/// prefix when one is given.
struct ServiceRule {
    service: Service,
    patterns: &'static [&'static str],
    generate: fn(Platform, &Destination<'_>) -> Option<String>,
}

/// Checked in order; the first rule with a matching pattern wins.
const SERVICE_RULES: &[ServiceRule] = &[
    ServiceRule {
        service: Service::Spotify,
        patterns: &["open.spotify.com"],
        generate: spotify_link,
    },
    ServiceRule {
        service: Service::AppleMusic,
        patterns: &["music.apple.com"],
        generate: universal_link,
    },
    ServiceRule {
        service: Service::YouTube,
        patterns: &["youtube.com", "youtu.be"],
        generate: youtube_link,
    },
    ServiceRule {
        service: Service::Instagram,
        patterns: &["instagram.com"],
        generate: instagram_link,
    },
    ServiceRule {
        service: Service::Facebook,
        patterns: &["facebook.com"],
        generate: universal_link,
    },
    ServiceRule {
        service: Service::TikTok,
        patterns: &["tiktok.com"],
        generate: tiktok_link,
    },
    ServiceRule {
        service: Service::Uber,
        patterns: &["uber.com"],
        generate: uber_link,
    },
    ServiceRule {
        service: Service::Lyft,
        patterns: &["lyft.com"],
        generate: lyft_link,
    },
    ServiceRule {
        service: Service::GoogleMaps,
        patterns: &["google.com/maps"],
        generate: maps_link,
    },
];

/// Classifies a user-agent string. Matching is case-insensitive.
pub fn detect_platform(user_agent: &str) -> Platform {
    let ua = user_agent.to_ascii_lowercase();

    PLATFORM_RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| ua.contains(needle)))
        .map_or(Platform::Web, |rule| rule.platform)
}

/// Classifies a destination URL. Matching is case-insensitive.
pub fn detect_service(destination: &str) -> Service {
    let destination = Destination::parse(destination);

    SERVICE_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| destination.matches(p)))
        .map_or(Service::Unknown, |rule| rule.service)
}

/// Synthesizes the best link to send a `platform` client to for `destination`.
///
/// Returns `destination` unchanged whenever no app-specific URI applies.
pub fn generate_deep_link(platform: Platform, service: Service, destination: &str) -> String {
    let Some(rule) = SERVICE_RULES.iter().find(|rule| rule.service == service) else {
        return destination.to_string();
    };

    (rule.generate)(platform, &Destination::parse(destination))
        .unwrap_or_else(|| destination.to_string())
}

/// Classifies both axes and synthesizes the deep link in one step.
pub fn deep_link_for(user_agent: &str, destination: &str) -> String {
    generate_deep_link(
        detect_platform(user_agent),
        detect_service(destination),
        destination,
    )
}

/// A destination URL, parsed when possible.
struct Destination<'a> {
    raw: &'a str,
    url: Option<Url>,
}

impl<'a> Destination<'a> {
    fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            url: Url::parse(raw.trim()).ok(),
        }
    }

    fn matches(&self, pattern: &str) -> bool {
        let (host, path_prefix) = match pattern.split_once('/') {
            Some((host, path)) => (host, Some(path)),
            None => (pattern, None),
        };

        let Some(url) = &self.url else {
            return self.raw.to_ascii_lowercase().contains(pattern);
        };
        let Some(actual_host) = url.host_str() else {
            return false;
        };

        let actual_host = actual_host.to_ascii_lowercase();
        let host_matches = actual_host == host
            || actual_host
                .strip_suffix(host)
                .is_some_and(|rest| rest.ends_with('.'));

        host_matches
            && path_prefix.is_none_or(|prefix| {
                url.path()
                    .trim_start_matches('/')
                    .to_ascii_lowercase()
                    .starts_with(prefix)
            })
    }

    /// Non-empty path segments, ignoring any trailing slash.
    fn segments(&self) -> Vec<&str> {
        match &self.url {
            Some(url) => url
                .path_segments()
                .map(|segments| segments.filter(|s| !s.is_empty()).collect())
                .unwrap_or_default(),
            None => self
                .raw
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .split('/')
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    fn last_segment(&self) -> Option<&str> {
        self.segments().last().copied().and_then(app_id)
    }

    /// Raw, still percent-encoded value of a query parameter.
    fn query_param(&self, name: &str) -> Option<&str> {
        self.url
            .as_ref()?
            .query()?
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| app_id(value))
    }
}

/// Accepts an identifier only if it is safe to splice into an app URI.
fn app_id(id: &str) -> Option<&str> {
    let safe = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'));
    safe.then_some(id)
}

const SPOTIFY_KINDS: &[&str] = &["track", "album", "playlist", "artist", "episode", "show"];

fn spotify_link(platform: Platform, destination: &Destination<'_>) -> Option<String> {
    let segments = destination.segments();
    let (&id, rest) = segments.split_last()?;
    let id = app_id(id)?;
    let kind = rest
        .last()
        .copied()
        .filter(|kind| SPOTIFY_KINDS.contains(kind))
        .unwrap_or("track");

    match platform {
        Platform::Ios => Some(format!("spotify:{kind}:{id}")),
        Platform::Android => Some(format!(
            "intent://spotify/{kind}/{id}#Intent;scheme=spotify;package=com.spotify.music;end"
        )),
        Platform::Web => None,
    }
}

fn youtube_link(platform: Platform, destination: &Destination<'_>) -> Option<String> {
    let id = destination
        .query_param("v")
        .or_else(|| destination.last_segment())
        .filter(|id| *id != "watch")?;

    match platform {
        Platform::Ios => Some(format!("vnd.youtube:{id}")),
        Platform::Android => Some(format!(
            "intent://www.youtube.com/watch?v={id}#Intent;package=com.google.android.youtube;end"
        )),
        Platform::Web => None,
    }
}

fn instagram_link(platform: Platform, destination: &Destination<'_>) -> Option<String> {
    let username = destination.last_segment()?;

    match platform {
        Platform::Ios => Some(format!("instagram://user?username={username}")),
        Platform::Android => Some(format!(
            "intent://instagram.com/_u/{username}#Intent;package=com.instagram.android;scheme=https;end"
        )),
        Platform::Web => None,
    }
}

fn tiktok_link(platform: Platform, destination: &Destination<'_>) -> Option<String> {
    let video_id = destination.last_segment()?;

    match platform {
        Platform::Ios => Some(format!("snssdk1128://video/{video_id}")),
        Platform::Android => Some(format!(
            "intent://v/{video_id}#Intent;package=com.zhiliaoapp.musically;scheme=https;end"
        )),
        Platform::Web => None,
    }
}

/// Services that open from the web URL itself through OS-level universal links.
fn universal_link(_: Platform, _: &Destination<'_>) -> Option<String> {
    None
}

fn uber_link(platform: Platform, _: &Destination<'_>) -> Option<String> {
    app_launch(platform, "uber://")
}

fn lyft_link(platform: Platform, _: &Destination<'_>) -> Option<String> {
    app_launch(platform, "lyft://")
}

fn maps_link(platform: Platform, _: &Destination<'_>) -> Option<String> {
    app_launch(platform, "comgooglemaps://")
}

/// Opens the app without addressing anything inside it.
fn app_launch(platform: Platform, uri: &str) -> Option<String> {
    platform.is_mobile().then(|| uri.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
    const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

    #[test]
    fn test_detect_platform() {
        let cases = [
            (IPHONE_UA, Platform::Ios),
            ("Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)", Platform::Ios),
            (ANDROID_UA, Platform::Android),
            ("SOMETHING ANDROID UPPERCASE", Platform::Android),
            (DESKTOP_UA, Platform::Web),
            ("", Platform::Web),
        ];

        for (ua, expected) in cases {
            assert_eq!(detect_platform(ua), expected, "user-agent: {ua}");
        }
    }

    #[test]
    fn test_first_platform_rule_wins() {
        assert_eq!(detect_platform("iPhone Android hybrid"), Platform::Ios);
    }

    #[test]
    fn test_detect_service() {
        let cases = [
            ("https://open.spotify.com/track/abc", Service::Spotify),
            ("https://music.apple.com/us/album/x/123", Service::AppleMusic),
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Service::YouTube),
            ("https://youtu.be/dQw4w9WgXcQ", Service::YouTube),
            ("https://m.youtube.com/shorts/abc", Service::YouTube),
            ("https://www.instagram.com/rustlang/", Service::Instagram),
            ("https://facebook.com/page", Service::Facebook),
            ("https://www.tiktok.com/@user/video/7231", Service::TikTok),
            ("https://m.uber.com/ul/", Service::Uber),
            ("https://lyft.com/ride", Service::Lyft),
            ("https://www.google.com/maps/place/Berlin", Service::GoogleMaps),
            ("HTTPS://OPEN.SPOTIFY.COM/TRACK/ABC", Service::Spotify),
            ("https://www.google.com/search?q=maps", Service::Unknown),
            ("https://notyoutube.com/watch?v=1", Service::Unknown),
            ("https://example.com/open.spotify.com", Service::Unknown),
        ];

        for (url, expected) in cases {
            assert_eq!(detect_service(url), expected, "destination: {url}");
        }
    }

    #[test]
    fn test_detect_service_unparseable_falls_back_to_substring() {
        assert_eq!(detect_service("open.spotify.com/track/abc"), Service::Spotify);
        assert_eq!(detect_service("not a url"), Service::Unknown);
    }

    #[test]
    fn test_spotify_deep_links() {
        let dest = "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC";

        assert_eq!(
            generate_deep_link(Platform::Ios, Service::Spotify, dest),
            "spotify:track:4uLU6hMCjMI75M1A2tKUQC"
        );
        assert_eq!(
            generate_deep_link(Platform::Android, Service::Spotify, dest),
            "intent://spotify/track/4uLU6hMCjMI75M1A2tKUQC#Intent;scheme=spotify;package=com.spotify.music;end"
        );
        assert_eq!(generate_deep_link(Platform::Web, Service::Spotify, dest), dest);
    }

    #[test]
    fn test_spotify_kind_and_query_are_handled() {
        let dest = "https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3?si=abc";
        assert_eq!(
            generate_deep_link(Platform::Ios, Service::Spotify, dest),
            "spotify:album:1DFixLWuPkv3KT3TnV35m3"
        );
    }

    #[test]
    fn test_youtube_deep_links() {
        let watch = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        let short = "https://youtu.be/dQw4w9WgXcQ/";

        assert_eq!(
            generate_deep_link(Platform::Ios, Service::YouTube, watch),
            "vnd.youtube:dQw4w9WgXcQ"
        );
        assert_eq!(
            generate_deep_link(Platform::Android, Service::YouTube, short),
            "intent://www.youtube.com/watch?v=dQw4w9WgXcQ#Intent;package=com.google.android.youtube;end"
        );
        assert_eq!(
            generate_deep_link(Platform::Ios, Service::YouTube, "https://youtube.com/watch"),
            "https://youtube.com/watch"
        );
    }

    #[test]
    fn test_unsafe_identifiers_degrade_to_destination() {
        let cases = [
            (Service::YouTube, "https://www.youtube.com/watch?v=abc%0A"),
            (
                Service::YouTube,
                "https://www.youtube.com/watch?v=x%23Intent%3Bpackage%3Devil.app%3Bend",
            ),
            (Service::YouTube, "https://youtu.be/abc%0D%0A"),
            (Service::Spotify, "https://open.spotify.com/track/a%23Intent%3Bend"),
            (Service::Instagram, "https://www.instagram.com/user%0A"),
            (Service::TikTok, "https://www.tiktok.com/@user/video/1%3Bx"),
        ];

        for (service, dest) in cases {
            for platform in [Platform::Ios, Platform::Android, Platform::Web] {
                assert_eq!(generate_deep_link(platform, service, dest), dest, "{dest}");
            }
        }
    }

    #[test]
    fn test_youtube_id_taken_from_among_other_params() {
        let dest = "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42";
        assert_eq!(
            generate_deep_link(Platform::Ios, Service::YouTube, dest),
            "vnd.youtube:dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_instagram_and_tiktok_deep_links() {
        assert_eq!(
            generate_deep_link(
                Platform::Ios,
                Service::Instagram,
                "https://www.instagram.com/rustlang/"
            ),
            "instagram://user?username=rustlang"
        );
        assert_eq!(
            generate_deep_link(
                Platform::Android,
                Service::Instagram,
                "https://www.instagram.com/rustlang"
            ),
            "intent://instagram.com/_u/rustlang#Intent;package=com.instagram.android;scheme=https;end"
        );
        assert_eq!(
            generate_deep_link(
                Platform::Ios,
                Service::TikTok,
                "https://www.tiktok.com/@user/video/7231"
            ),
            "snssdk1128://video/7231"
        );
        assert_eq!(
            generate_deep_link(
                Platform::Android,
                Service::TikTok,
                "https://www.tiktok.com/@user/video/7231"
            ),
            "intent://v/7231#Intent;package=com.zhiliaoapp.musically;scheme=https;end"
        );
    }

    #[test]
    fn test_fixed_app_launch_uris_ignore_path() {
        let cases = [
            (Service::Uber, "https://m.uber.com/ul/?pickup=my_location", "uber://"),
            (Service::Lyft, "https://lyft.com/ride?id=lyft", "lyft://"),
            (
                Service::GoogleMaps,
                "https://www.google.com/maps/place/Berlin",
                "comgooglemaps://",
            ),
        ];

        for (service, dest, expected) in cases {
            assert_eq!(generate_deep_link(Platform::Ios, service, dest), expected);
            assert_eq!(generate_deep_link(Platform::Android, service, dest), expected);
            assert_eq!(generate_deep_link(Platform::Web, service, dest), dest);
        }
    }

    #[test]
    fn test_universal_link_services_return_destination() {
        let apple = "https://music.apple.com/us/album/x/123";
        let facebook = "https://facebook.com/page";

        for platform in [Platform::Ios, Platform::Android, Platform::Web] {
            assert_eq!(generate_deep_link(platform, Service::AppleMusic, apple), apple);
            assert_eq!(generate_deep_link(platform, Service::Facebook, facebook), facebook);
        }
    }

    #[test]
    fn test_unknown_service_returns_destination_for_every_platform() {
        let destinations = [
            "https://example.com/page",
            "https://example.com/open.spotify.com/track/abc",
            "not a url at all",
            "",
        ];

        for dest in destinations {
            for platform in [Platform::Ios, Platform::Android, Platform::Web] {
                assert_eq!(detect_service(dest), Service::Unknown);
                assert_eq!(generate_deep_link(platform, Service::Unknown, dest), dest);
            }
        }
    }

    #[test]
    fn test_android_music_destinations_use_intent_with_package() {
        let user_agents = [ANDROID_UA, "android", "ANDROID", "Dalvik/2.1.0 (Linux; U; Android 9)"];
        let destinations = [
            "https://open.spotify.com/track/abc",
            "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M",
            "https://open.spotify.com/artist/0OdUWJ0sBjDrqHygGUXeCF/",
        ];

        for ua in user_agents {
            for dest in destinations {
                let link = deep_link_for(ua, dest);
                assert!(link.starts_with("intent://"), "{link}");
                assert!(link.contains("package=com.spotify.music"), "{link}");
            }
        }
    }

    #[test]
    fn test_deep_link_for_desktop_is_destination() {
        let dest = "https://open.spotify.com/track/abc";
        assert_eq!(deep_link_for(DESKTOP_UA, dest), dest);
        assert_eq!(deep_link_for(IPHONE_UA, dest), "spotify:track:abc");
    }

    #[test]
    fn test_missing_identifier_degrades_to_destination() {
        let dest = "https://open.spotify.com/";
        assert_eq!(generate_deep_link(Platform::Ios, Service::Spotify, dest), dest);
        assert_eq!(
            generate_deep_link(Platform::Android, Service::Instagram, "https://instagram.com"),
            "https://instagram.com"
        );
    }
}
