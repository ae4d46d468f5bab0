//! Navigation table and authentication gate.
//!
//! The view layer is out of scope here; routes carry only what the gate
//! needs: a path, a name, and a "requires authentication" flag. Navigation
//! to a protected route while anonymous resolves to the fallback route
//! without touching the target.

use tracing::debug;

use crate::stores::AuthStore;

/// A navigable route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
}

/// Static route table with an authentication gate.
pub struct Router {
    routes: Vec<Route>,
    fallback: Route,
}

impl Router {
    /// Create a router over a route table.
    ///
    /// `fallback` is the route used for unknown paths and rejected
    /// navigations; it should not itself require authentication.
    #[must_use]
    pub fn new(routes: Vec<Route>, fallback: Route) -> Self {
        Self { routes, fallback }
    }

    /// The storefront's route table: home, products, cart, wishlist, and the
    /// protected account page. Home is the fallback.
    #[must_use]
    pub fn with_default_routes() -> Self {
        let home = Route {
            name: "home",
            path: "/",
            requires_auth: false,
        };

        Self::new(
            vec![
                home,
                Route {
                    name: "products",
                    path: "/products",
                    requires_auth: false,
                },
                Route {
                    name: "cart",
                    path: "/cart",
                    requires_auth: false,
                },
                Route {
                    name: "wishlist",
                    path: "/wishlist",
                    requires_auth: false,
                },
                Route {
                    name: "account",
                    path: "/account",
                    requires_auth: true,
                },
            ],
            home,
        )
    }

    /// Look up a route by path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// Resolve a navigation target, applying the authentication gate.
    ///
    /// The gate is evaluated before every navigation: a protected route is
    /// only reachable while the session is authenticated.
    #[must_use]
    pub fn navigate(&self, path: &str, session: &AuthStore) -> &Route {
        match self.resolve(path) {
            Some(route) if route.requires_auth && !session.is_authenticated() => {
                debug!(path, fallback = self.fallback.path, "Navigation gated");
                &self.fallback
            }
            Some(route) => route,
            None => {
                debug!(path, "Unknown path");
                &self.fallback
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::with_default_routes()
    }
}
