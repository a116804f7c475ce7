// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Chat,
    Home,
    About,
    Blog,
    Settings,
    Dashboard,
    NotFound,
}

impl Route {
    /// Pages of the signed-out surface, in sidebar order.
    pub const PUBLIC: [Self; 5] = [
        Self::Chat,
        Self::Home,
        Self::About,
        Self::Blog,
        Self::Settings,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Chat => "/chat",
            Self::Home => "/home",
            Self::About => "/about",
            Self::Blog => "/blog",
            Self::Settings => "/settings",
            Self::Dashboard => "/dashboard",
            Self::NotFound => "/404",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Home => "home",
            Self::About => "about",
            Self::Blog => "blog",
            Self::Settings => "settings",
            Self::Dashboard => "dashboard",
            Self::NotFound => "not found",
        }
    }
}

/// Maps a path to the page to show. Signed-in sessions always land on the
/// dashboard.
pub fn resolve_route(path: &str, authenticated: bool) -> Route {
    if authenticated {
        return Route::Dashboard;
    }
    let trimmed = path.trim_end_matches('/');
    match trimmed {
        "" | "/chat" => Route::Chat,
        "/home" => Route::Home,
        "/about" => Route::About,
        "/blog" => Route::Blog,
        "/settings" => Route::Settings,
        _ => Route::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, resolve_route};

    #[test]
    fn public_paths_resolve_when_signed_out() {
        assert_eq!(resolve_route("/", false), Route::Chat);
        assert_eq!(resolve_route("/chat", false), Route::Chat);
        assert_eq!(resolve_route("/home", false), Route::Home);
        assert_eq!(resolve_route("/about/", false), Route::About);
        assert_eq!(resolve_route("/blog", false), Route::Blog);
        assert_eq!(resolve_route("/settings", false), Route::Settings);
    }

    #[test]
    fn unknown_and_dashboard_paths_are_not_found_when_signed_out() {
        assert_eq!(resolve_route("/dashboard", false), Route::NotFound);
        assert_eq!(resolve_route("/nope", false), Route::NotFound);
    }

    #[test]
    fn signed_in_sessions_land_on_dashboard() {
        for path in ["/", "/home", "/dashboard", "/anything/else"] {
            assert_eq!(resolve_route(path, true), Route::Dashboard);
        }
    }

    #[test]
    fn public_pages_round_trip_their_paths() {
        for route in Route::PUBLIC {
            assert_eq!(resolve_route(route.path(), false), route);
        }
    }
}
