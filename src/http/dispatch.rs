//! Ordered prefix-match route table.
//!
//! Each entry pairs a fixed path with a [`Route`].  The first entry whose
//! pattern is a prefix of the request path wins; the text after the pattern
//! is kept as the remainder so argument-taking routes can parse a suffix
//! such as `/lower_door/open/500`.  Patterns that share a prefix must list
//! the longer one first.

/// Every command the prop understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Raise,
    Lower,
    Stop,
    SetTarget,
    Tare,
    Open,
    Close,
    LowerDoorOpen,
    LowerDoorClose,
    GameComplete,
    Scale,
    Get,
}

/// The prop's route table, in match order.
pub const ROUTES: &[(&str, Route)] = &[
    ("/lower_door/open", Route::LowerDoorOpen),
    ("/lower_door/close", Route::LowerDoorClose),
    ("/raise", Route::Raise),
    ("/lower", Route::Lower),
    ("/stop", Route::Stop),
    ("/set_target", Route::SetTarget),
    ("/tare", Route::Tare),
    ("/open", Route::Open),
    ("/close", Route::Close),
    ("/game_complete", Route::GameComplete),
    ("/scale", Route::Scale),
    ("/get", Route::Get),
];

/// Outcome of matching a path against a route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    NoMatch,
    Matched { route: Route, remainder: &'a str },
}

/// Typed command decoded from a matched route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Raise,
    Lower,
    Stop,
    SetTarget,
    Tare,
    Open,
    Close,
    /// `None` means "open with no timeout".
    LowerDoorOpen { timeout_ms: Option<u32> },
    LowerDoorClose,
    GameComplete,
    /// `None` when the factor is missing.
    SetScale(Option<&'a str>),
    GetWeight,
}

impl<'a> Command<'a> {
    /// Decode a dispatch result.  `None` for [`Dispatch::NoMatch`].
    ///
    /// Malformed arguments never fail the command: they fall back to the
    /// parameterless form.
    pub fn from_dispatch(d: Dispatch<'a>) -> Option<Self> {
        let Dispatch::Matched { route, remainder } = d else {
            return None;
        };
        Some(match route {
            Route::Raise => Self::Raise,
            Route::Lower => Self::Lower,
            Route::Stop => Self::Stop,
            Route::SetTarget => Self::SetTarget,
            Route::Tare => Self::Tare,
            Route::Open => Self::Open,
            Route::Close => Self::Close,
            Route::LowerDoorOpen => Self::LowerDoorOpen {
                timeout_ms: parse_numeric_arg(remainder),
            },
            Route::LowerDoorClose => Self::LowerDoorClose,
            Route::GameComplete => Self::GameComplete,
            Route::Scale => Self::SetScale(text_arg(remainder)),
            Route::Get => Self::GetWeight,
        })
    }
}

/// Extract the path from a raw request.
///
/// Accepts a bare path (`/raise`) or a request line
/// (`GET /raise HTTP/1.1`).  Anything after the first whitespace is dropped.
pub fn request_path(raw: &str) -> &str {
    let raw = raw.trim_start();
    let rest = raw.strip_prefix("GET ").unwrap_or(raw).trim_start();
    rest.split_ascii_whitespace().next().unwrap_or("")
}

/// Find the first table entry whose pattern prefixes `path`.
pub fn dispatch<'a>(table: &[(&str, Route)], path: &'a str) -> Dispatch<'a> {
    if path.is_empty() {
        return Dispatch::NoMatch;
    }
    for &(pattern, route) in table {
        if let Some(remainder) = path.strip_prefix(pattern) {
            return Dispatch::Matched { route, remainder };
        }
    }
    Dispatch::NoMatch
}

/// Parse the numeric suffix one separator character past the pattern.
///
/// `"/500"` and `"?500"` give `Some(500)`; an empty, non-numeric or
/// overflowing suffix gives `None`.
pub fn parse_numeric_arg(remainder: &str) -> Option<u32> {
    let digits = skip_separator(remainder)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Text suffix one separator character past the pattern, if non-empty.
pub fn text_arg(remainder: &str) -> Option<&str> {
    skip_separator(remainder)
}

fn skip_separator(remainder: &str) -> Option<&str> {
    let mut chars = remainder.chars();
    chars.next()?;
    let rest = chars.as_str();
    if rest.is_empty() { None } else { Some(rest) }
}
