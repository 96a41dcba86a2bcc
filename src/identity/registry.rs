// src/identity/registry.rs
// =============================================================================
// The fixed table of crawler identities and the headers each one sends.
//
// Header layering, lowest to highest priority:
// 1. Baseline content-negotiation headers (same for every identity)
// 2. The identity's User-Agent
// 3. Caller-supplied extra headers
//
// Unknown identity names are not an error: they get the desktop profile.
// =============================================================================

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, DNT,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

/// Identity used when none is requested, and for unknown names
pub const DEFAULT_IDENTITY: &str = "desktop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub name: &'static str,
    pub user_agent: &'static str,
}

/// Built-in identities, in declaration order (the order "all identities" runs in)
pub const IDENTITIES: [Identity; 7] = [
    Identity {
        name: "desktop",
        user_agent: "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    },
    Identity {
        name: "mobile",
        user_agent: "Mozilla/5.0 (Linux; Android 6.0.1; Nexus 5X Build/MMB29P) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/W.X.Y.Z Mobile Safari/537.36 \
                     (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    },
    Identity {
        name: "image",
        user_agent: "Googlebot-Image/1.0",
    },
    Identity {
        name: "news",
        user_agent: "Googlebot-News",
    },
    Identity {
        name: "video",
        user_agent: "Googlebot-Video/1.0",
    },
    Identity {
        name: "ads",
        user_agent: "AdsBot-Google (+http://www.google.com/adsbot.html)",
    },
    Identity {
        name: "adsbot_mobile",
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 9_1 like Mac OS X) AppleWebKit/601.1.46 \
                     (KHTML, like Gecko) Version/9.0 Mobile/13B143 Safari/601.1 \
                     (compatible; AdsBot-Google-Mobile; +http://www.google.com/mobile/adsbot.html)",
    },
];

// Headers every identity sends beneath its User-Agent
const BASELINE_HEADERS: [(HeaderName, &str); 6] = [
    (ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    (ACCEPT_LANGUAGE, "en-US,en;q=0.5"),
    (ACCEPT_ENCODING, "gzip, deflate"),
    (DNT, "1"),
    (CONNECTION, "keep-alive"),
    (UPGRADE_INSECURE_REQUESTS, "1"),
];

impl Identity {
    // Looks up an identity by name, falling back to desktop
    pub fn resolve(name: &str) -> Identity {
        match IDENTITIES.iter().find(|identity| identity.name == name) {
            Some(identity) => *identity,
            None => {
                tracing::debug!("Unknown identity '{}', using '{}'", name, DEFAULT_IDENTITY);
                IDENTITIES[0]
            }
        }
    }
}

/// Returns true if `name` is one of the built-in identities
pub fn is_known(name: &str) -> bool {
    IDENTITIES.iter().any(|identity| identity.name == name)
}

/// Names of all built-in identities, in declaration order
pub fn all_names() -> Vec<String> {
    IDENTITIES.iter().map(|identity| identity.name.to_string()).collect()
}

/// Builds the request headers for an identity.
///
/// `extra_headers` (if any) override both the baseline headers and the
/// identity's User-Agent.
pub fn headers_for(identity_name: &str, extra_headers: Option<&HeaderMap>) -> HeaderMap {
    let identity = Identity::resolve(identity_name);

    let mut headers = HeaderMap::new();
    for (name, value) in BASELINE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers.insert(USER_AGENT, HeaderValue::from_static(identity.user_agent));

    if let Some(extra) = extra_headers {
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }
    }

    headers
}
