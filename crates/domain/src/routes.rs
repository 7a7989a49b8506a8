//! Static route table mapping URL paths to views.

use serde::{Deserialize, Serialize};

/// A view the shell can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Landing page.
    Home,
    /// Dashboard backed by the protected API.
    Dashboard,
    /// Shown for paths with no route.
    NotFound,
    /// Shown when the sign-in callback could not be completed.
    SignInFailed,
}

impl View {
    /// Human readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Dashboard => "Dashboard",
            Self::NotFound => "Not Found",
            Self::SignInFailed => "Sign-in Failed",
        }
    }
}

/// A single `(path, view)` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Exact path, starting with `/`.
    pub path: &'static str,
    /// View rendered for the path.
    pub view: View,
}

const STANDARD_ROUTES: &[Route] = &[
    Route {
        path: "/",
        view: View::Home,
    },
    Route {
        path: "/dashboard",
        view: View::Dashboard,
    },
];

/// Immutable path to view mapping.
///
/// There are no guards or nested routes; access control belongs to the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl RouteTable {
    /// The application's route table.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            routes: STANDARD_ROUTES,
        }
    }

    /// All routes in declaration order.
    #[must_use]
    pub const fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Looks up the view for a path.
    ///
    /// Query and fragment are ignored, as is a single trailing slash.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<View> {
        let path = normalize(path);
        self.routes
            .iter()
            .find(|route| route.path == path)
            .map(|route| route.view)
    }

    /// Like [`resolve`](Self::resolve) but falls back to [`View::NotFound`].
    #[must_use]
    pub fn view_for(&self, path: &str) -> View {
        self.resolve(path).unwrap_or(View::NotFound)
    }

    /// Path registered for a view, if routable.
    #[must_use]
    pub fn path_of(&self, view: View) -> Option<&'static str> {
        self.routes
            .iter()
            .find(|route| route.view == view)
            .map(|route| route.path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path {
        "" | "/" => "/",
        _ => path.strip_suffix('/').unwrap_or(path),
    }
}
