use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The closed set of protected dashboard pages.
///
/// The gate, the access policy, and the admin page-assignment endpoint all
/// share this enum, so a typo in a path string can never silently grant or
/// deny access.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Profile,
    Settings,
    Admin,
    Inventory,
    Production,
    Reports,
    Clients,
    Buyers,
    Suppliers,
    Orders,
    Invoices,
    Machines,
    Maintenance,
    Quality,
    Analytics,
    Planning,
    Shipments,
    Workforce,
    Attendance,
}

impl Page {
    /// All known pages, in the order they appear in the admin UI.
    pub fn all() -> &'static [Page] {
        &[
            Page::Dashboard,
            Page::Profile,
            Page::Settings,
            Page::Admin,
            Page::Inventory,
            Page::Production,
            Page::Reports,
            Page::Clients,
            Page::Buyers,
            Page::Suppliers,
            Page::Orders,
            Page::Invoices,
            Page::Machines,
            Page::Maintenance,
            Page::Quality,
            Page::Analytics,
            Page::Planning,
            Page::Shipments,
            Page::Workforce,
            Page::Attendance,
        ]
    }

    /// The stable identifier used in configs and the admin UI.
    pub fn id(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Profile => "profile",
            Page::Settings => "settings",
            Page::Admin => "admin",
            Page::Inventory => "inventory",
            Page::Production => "production",
            Page::Reports => "reports",
            Page::Clients => "clients",
            Page::Buyers => "buyers",
            Page::Suppliers => "suppliers",
            Page::Orders => "orders",
            Page::Invoices => "invoices",
            Page::Machines => "machines",
            Page::Maintenance => "maintenance",
            Page::Quality => "quality",
            Page::Analytics => "analytics",
            Page::Planning => "planning",
            Page::Shipments => "shipments",
            Page::Workforce => "workforce",
            Page::Attendance => "attendance",
        }
    }

    /// The route path this page is served under.
    pub fn as_path(&self) -> String {
        format!("/{}", self.id())
    }

    /// Resolve a request path to a known page.
    ///
    /// Query strings, fragments, and nested segments are normalized away:
    /// `/inventory/items?sort=asc` resolves to `Inventory`. Unknown segments
    /// resolve to `None`, which downstream policy checks treat as denied.
    pub fn from_path(path: &str) -> Option<Page> {
        let segment = first_segment(path);
        Page::all().iter().copied().find(|p| p.id() == segment)
    }
}

/// Strip query string and fragment, then return the first path segment.
pub(crate) fn first_segment(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}
