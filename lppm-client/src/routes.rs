//! Role-gated navigation
//!
//! Screens are scoped by role prefix (`/admin`, `/dosen`, `/reviewer`,
//! `/mahasiswa`). The guard only decides what to show; the API still
//! authorizes every request.

use std::fmt;

use shared::models::Role;

use crate::store::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Unauthorized,
    Profile,

    AdminDashboard,
    AdminProgramStudi,
    AdminUsers,
    AdminResearch,
    AdminService,

    DosenDashboard,
    DosenResearch,
    DosenResearchNew,
    DosenService,
    DosenServiceNew,

    ReviewerDashboard,
    ReviewerResearch,
    ReviewerService,

    MahasiswaDashboard,
}

impl Route {
    pub const ALL: [Route; 18] = [
        Route::Root,
        Route::Login,
        Route::Unauthorized,
        Route::Profile,
        Route::AdminDashboard,
        Route::AdminProgramStudi,
        Route::AdminUsers,
        Route::AdminResearch,
        Route::AdminService,
        Route::DosenDashboard,
        Route::DosenResearch,
        Route::DosenResearchNew,
        Route::DosenService,
        Route::DosenServiceNew,
        Route::ReviewerDashboard,
        Route::ReviewerResearch,
        Route::ReviewerService,
        Route::MahasiswaDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Unauthorized => "/unauthorized",
            Self::Profile => "/profile",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminProgramStudi => "/admin/program-studi",
            Self::AdminUsers => "/admin/users",
            Self::AdminResearch => "/admin/penelitian",
            Self::AdminService => "/admin/pengabdian",
            Self::DosenDashboard => "/dosen/dashboard",
            Self::DosenResearch => "/dosen/penelitian",
            Self::DosenResearchNew => "/dosen/penelitian/baru",
            Self::DosenService => "/dosen/pengabdian",
            Self::DosenServiceNew => "/dosen/pengabdian/baru",
            Self::ReviewerDashboard => "/reviewer/dashboard",
            Self::ReviewerResearch => "/reviewer/penelitian",
            Self::ReviewerService => "/reviewer/pengabdian",
            Self::MahasiswaDashboard => "/mahasiswa/dashboard",
        }
    }

    /// Exact match; a trailing slash is ignored
    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// `None` means any signed-in user
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Root | Self::Login | Self::Unauthorized | Self::Profile => None,
            Self::AdminDashboard
            | Self::AdminProgramStudi
            | Self::AdminUsers
            | Self::AdminResearch
            | Self::AdminService => Some(&[Role::Admin]),
            Self::DosenDashboard
            | Self::DosenResearch
            | Self::DosenResearchNew
            | Self::DosenService
            | Self::DosenServiceNew => Some(&[Role::Dosen]),
            Self::ReviewerDashboard | Self::ReviewerResearch | Self::ReviewerService => {
                Some(&[Role::Reviewer])
            }
            Self::MahasiswaDashboard => Some(&[Role::Mahasiswa]),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Unauthorized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Guard outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may be shown for `session`
pub fn guard(route: Route, session: &SessionState) -> Navigation {
    let role = session.role().filter(|_| session.is_authenticated);

    if route.is_public() {
        return match (route, role) {
            (Route::Login, Some(role)) => Navigation::Redirect(home_for(role)),
            _ => Navigation::Allow,
        };
    }

    if !session.is_authenticated {
        return Navigation::Redirect(Route::Login);
    }

    if route == Route::Root {
        return match role {
            Some(role) => Navigation::Redirect(home_for(role)),
            None => Navigation::Redirect(Route::Profile),
        };
    }

    match route.allowed_roles() {
        Some(roles) if !role.is_some_and(|r| roles.contains(&r)) => {
            tracing::debug!(route = %route, role = ?role, "Route denied");
            Navigation::Redirect(Route::Unauthorized)
        }
        _ => Navigation::Allow,
    }
}

/// Landing screen after login
pub fn home_for(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminDashboard,
        Role::Dosen => Route::DosenDashboard,
        Role::Reviewer => Route::ReviewerDashboard,
        Role::Mahasiswa => Route::MahasiswaDashboard,
    }
}

/// Sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

const fn item(label: &'static str, route: Route) -> MenuItem {
    MenuItem { label, route }
}

pub fn menu_for(role: Role) -> Vec<MenuItem> {
    let mut menu = match role {
        Role::Admin => vec![
            item("Dashboard", Route::AdminDashboard),
            item("Program Studi", Route::AdminProgramStudi),
            item("Pengguna", Route::AdminUsers),
            item("Penelitian", Route::AdminResearch),
            item("Pengabdian", Route::AdminService),
        ],
        Role::Dosen => vec![
            item("Dashboard", Route::DosenDashboard),
            item("Penelitian", Route::DosenResearch),
            item("Ajukan Penelitian", Route::DosenResearchNew),
            item("Pengabdian", Route::DosenService),
            item("Ajukan Pengabdian", Route::DosenServiceNew),
        ],
        Role::Reviewer => vec![
            item("Dashboard", Route::ReviewerDashboard),
            item("Review Penelitian", Route::ReviewerResearch),
            item("Review Pengabdian", Route::ReviewerService),
        ],
        Role::Mahasiswa => vec![item("Dashboard", Route::MahasiswaDashboard)],
    };
    menu.push(item("Profil", Route::Profile));
    menu
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::User;

    fn session(role: Option<Role>) -> SessionState {
        let user = role.map(|role| {
            serde_json::from_value::<User>(serde_json::json!({
                "id": "u1",
                "name": "Budi",
                "email": "budi@univ.ac.id",
                "role": role,
            }))
            .unwrap()
        });
        SessionState {
            is_authenticated: user.is_some(),
            token: user.as_ref().map(|_| "t".to_string()),
            user,
            ..Default::default()
        }
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        let anon = session(None);
        assert_eq!(
            guard(Route::DosenResearch, &anon),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(guard(Route::Profile, &anon), Navigation::Redirect(Route::Login));
        assert_eq!(guard(Route::Login, &anon), Navigation::Allow);
        assert_eq!(guard(Route::Unauthorized, &anon), Navigation::Allow);
    }

    #[test]
    fn test_wrong_role_is_unauthorized() {
        let reviewer = session(Some(Role::Reviewer));
        assert_eq!(
            guard(Route::AdminUsers, &reviewer),
            Navigation::Redirect(Route::Unauthorized)
        );
        assert_eq!(guard(Route::ReviewerResearch, &reviewer), Navigation::Allow);
        assert_eq!(guard(Route::Profile, &reviewer), Navigation::Allow);
    }

    #[test]
    fn test_signed_in_user_skips_login() {
        let dosen = session(Some(Role::Dosen));
        assert_eq!(
            guard(Route::Login, &dosen),
            Navigation::Redirect(Route::DosenDashboard)
        );
        assert_eq!(
            guard(Route::Root, &dosen),
            Navigation::Redirect(Route::DosenDashboard)
        );
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/admin/program-studi/"), Some(Route::AdminProgramStudi));
        assert_eq!(Route::from_path("/"), Some(Route::Root));
        assert_eq!(Route::from_path("/admin/nope"), None);
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_menu_only_lists_reachable_routes() {
        for role in Role::ALL {
            let s = session(Some(role));
            let menu = menu_for(role);
            assert_eq!(menu[0].route, home_for(role));
            assert!(menu.iter().all(|m| guard(m.route, &s) == Navigation::Allow));
        }
    }
}
