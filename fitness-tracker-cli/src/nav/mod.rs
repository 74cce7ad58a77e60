// Routes and the role-aware navigation shell

use crate::models::User;

/// Every screen the client can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Workouts,
    Goals,
    Admin,
    Profile,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Signup,
        Route::Dashboard,
        Route::Workouts,
        Route::Goals,
        Route::Admin,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/",
            Route::Workouts => "/workouts",
            Route::Goals => "/goals",
            Route::Admin => "/admin",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Signup => "Sign Up",
            Route::Dashboard => "Dashboard",
            Route::Workouts => "Workouts",
            Route::Goals => "Goals",
            Route::Admin => "Admin",
            Route::Profile => "Profile",
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login | Route::Signup)
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl std::str::FromStr for Route {
    type Err = anyhow::Error;

    /// Accepts a path (`/workouts`) or a bare name (`workouts`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let path = match s.as_str() {
            "" | "dashboard" => "/".to_string(),
            p if p.starts_with('/') => p.to_string(),
            p => format!("/{}", p),
        };

        Route::from_path(&path).ok_or_else(|| anyhow::anyhow!("Unknown route: {}", s))
    }
}

/// Where a navigation request actually lands given the current user.
///
/// Checked before a page is entered, so a redirected page never fetches.
pub fn resolve(requested: Route, user: Option<&User>) -> Route {
    match user {
        None if requested.requires_session() => Route::Login,
        Some(_) if !requested.requires_session() => Route::Dashboard,
        Some(u) if requested.requires_admin() && !u.is_admin() => Route::Dashboard,
        _ => requested,
    }
}

/// One entry of the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub route: Route,
    pub label: &'static str,
    pub active: bool,
}

/// Links shown for the current user, with the active one marked by path
pub fn nav_links(user: Option<&User>, current_path: &str) -> Vec<NavLink> {
    let routes: Vec<Route> = match user {
        Some(u) => {
            let mut routes = Vec::with_capacity(5);
            if u.is_admin() {
                routes.push(Route::Admin);
            }
            routes.extend([Route::Dashboard, Route::Workouts, Route::Goals, Route::Profile]);
            routes
        }
        None => vec![Route::Login, Route::Signup],
    };

    routes
        .into_iter()
        .map(|route| NavLink {
            route,
            label: route.title(),
            active: route.path() == current_path,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use pretty_assertions::assert_eq;

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role,
        }
    }

    fn labels(links: &[NavLink]) -> Vec<&'static str> {
        links.iter().map(|l| l.label).collect()
    }

    #[test]
    fn test_anonymous_links() {
        let links = nav_links(None, "/login");
        assert_eq!(labels(&links), vec!["Login", "Sign Up"]);
        assert!(links[0].active);
        assert!(!links[1].active);
    }

    #[test]
    fn test_admin_link_only_for_admins() {
        let admin = user(Role::Admin);
        let links = nav_links(Some(&admin), "/");
        assert_eq!(
            labels(&links),
            vec!["Admin", "Dashboard", "Workouts", "Goals", "Profile"]
        );

        for role in [Role::User, Role::Other] {
            let member = user(role);
            let links = nav_links(Some(&member), "/");
            assert!(links.iter().all(|l| l.route != Route::Admin));
        }
    }

    #[test]
    fn test_active_link_follows_path() {
        let member = user(Role::User);
        let links = nav_links(Some(&member), "/goals");
        let active: Vec<_> = links.iter().filter(|l| l.active).map(|l| l.route).collect();
        assert_eq!(active, vec![Route::Goals]);
    }

    #[test]
    fn test_resolve_redirects() {
        let member = user(Role::User);
        let admin = user(Role::Admin);

        assert_eq!(resolve(Route::Workouts, None), Route::Login);
        assert_eq!(resolve(Route::Admin, None), Route::Login);
        assert_eq!(resolve(Route::Signup, None), Route::Signup);
        assert_eq!(resolve(Route::Admin, Some(&member)), Route::Dashboard);
        assert_eq!(resolve(Route::Admin, Some(&admin)), Route::Admin);
        assert_eq!(resolve(Route::Login, Some(&member)), Route::Dashboard);
        assert_eq!(resolve(Route::Goals, Some(&member)), Route::Goals);
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!("workouts".parse::<Route>().unwrap(), Route::Workouts);
        assert_eq!("/admin".parse::<Route>().unwrap(), Route::Admin);
        assert_eq!("dashboard".parse::<Route>().unwrap(), Route::Dashboard);
        assert!("settings".parse::<Route>().is_err());
    }
}
