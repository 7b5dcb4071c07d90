//! Navigation menu registry.
//!
//! Single source of truth for the dashboard navigation: sections and items
//! are defined once here and consumed by whatever shell renders them.

/// Badge attached to a menu item (e.g. an unread alert count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub content: &'static str,
    pub color: &'static str,
}

/// A single navigation entry, possibly with nested children.
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub title: &'static str,
    /// Lucide icon name.
    pub icon: &'static str,
    pub link: Option<&'static str>,
    pub badge: Option<Badge>,
    pub is_new: bool,
    pub children: &'static [MenuItem],
}

impl MenuItem {
    /// A plain leaf entry pointing at a page.
    pub const fn page(title: &'static str, icon: &'static str, link: &'static str) -> Self {
        Self {
            title,
            icon,
            link: Some(link),
            badge: None,
            is_new: false,
            children: &[],
        }
    }
}

/// A titled group of navigation entries.
#[derive(Debug, Clone, Copy)]
pub struct MenuSection {
    pub heading: &'static str,
    pub items: &'static [MenuItem],
}

pub static NAV_MENU: &[MenuSection] = &[
    MenuSection {
        heading: "Overview",
        items: &[
            MenuItem::page("Dashboard", "layout-dashboard", "/dashboard"),
            MenuItem::page("Analytics", "bar-chart-2", "/analytics"),
        ],
    },
    MenuSection {
        heading: "Threat Intelligence",
        items: &[
            MenuItem::page("Threats", "shield-alert", "/threats"),
            MenuItem::page("Sources", "database", "/sources"),
            MenuItem::page("Reports", "file-text", "/reports"),
            MenuItem::page("Indicators", "target", "/indicators"),
        ],
    },
    MenuSection {
        heading: "Operations",
        items: &[
            MenuItem::page("Incidents", "alert-triangle", "/incidents"),
            MenuItem {
                title: "Alerts",
                icon: "bell",
                link: Some("/alerts"),
                badge: Some(Badge {
                    content: "5",
                    color: "red",
                }),
                is_new: false,
                children: &[],
            },
            MenuItem {
                title: "SOC Co-Pilot",
                icon: "message-square",
                link: Some("/copilot"),
                badge: None,
                is_new: true,
                children: &[],
            },
        ],
    },
    MenuSection {
        heading: "Administration",
        items: &[MenuItem {
            title: "Settings",
            icon: "settings",
            link: None,
            badge: None,
            is_new: false,
            children: SETTINGS_ITEMS,
        }],
    },
];

static SETTINGS_ITEMS: &[MenuItem] = &[
    MenuItem::page("General", "circle", "/settings/general"),
    MenuItem::page("Integrations", "plug", "/integrations"),
    MenuItem::page("API Documentation", "file-code", "/api-docs"),
    MenuItem {
        title: "Tools",
        icon: "wrench",
        link: None,
        badge: None,
        is_new: false,
        children: TOOLS_ITEMS,
    },
    MenuItem::page("Users", "circle", "/settings/users"),
    MenuItem::page("API Keys", "circle", "/settings/api-keys"),
];

static TOOLS_ITEMS: &[MenuItem] = &[
    MenuItem::page("Threat Scanner", "scan", "/tools/threat-scanner"),
    MenuItem::page("IOC Analyzer", "search", "/tools/ioc-analyzer"),
    MenuItem::page("Malware Sandbox", "box", "/tools/malware-sandbox"),
    MenuItem::page("PCAP Analyzer", "activity", "/tools/pcap-analyzer"),
    MenuItem::page("Vulnerability Scanner", "shield", "/tools/vulnerability-scanner"),
];

/// Entries shown under the user avatar.
pub static USER_NAV: &[MenuItem] = &[
    MenuItem::page("Profile", "user", "/profile"),
    MenuItem::page("Settings", "settings", "/settings"),
    MenuItem::page("Logout", "log-out", "/logout"),
];

/// Find a menu item by its link, searching nested children depth-first.
pub fn find_by_link(link: &str) -> Option<&'static MenuItem> {
    fn search(items: &'static [MenuItem], link: &str) -> Option<&'static MenuItem> {
        for item in items {
            if item.link == Some(link) {
                return Some(item);
            }
            if let Some(found) = search(item.children, link) {
                return Some(found);
            }
        }
        None
    }
    NAV_MENU
        .iter()
        .find_map(|section| search(section.items, link))
}

/// Every navigation item, depth-first, nested children included.
pub fn flatten() -> Vec<&'static MenuItem> {
    fn collect(items: &'static [MenuItem], out: &mut Vec<&'static MenuItem>) {
        for item in items {
            out.push(item);
            collect(item.children, out);
        }
    }
    let mut out = Vec::new();
    for section in NAV_MENU {
        collect(section.items, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_top_level_link() {
        let item = find_by_link("/dashboard").unwrap();
        assert_eq!(item.title, "Dashboard");
    }

    #[test]
    fn test_find_deeply_nested_link() {
        let item = find_by_link("/tools/ioc-analyzer").unwrap();
        assert_eq!(item.title, "IOC Analyzer");
    }

    #[test]
    fn test_unknown_link_is_none() {
        assert!(find_by_link("/nope").is_none());
    }

    #[test]
    fn test_alerts_carries_badge() {
        let item = find_by_link("/alerts").unwrap();
        assert_eq!(item.badge.unwrap().content, "5");
    }

    #[test]
    fn test_flatten_includes_nested_items() {
        let all = flatten();
        assert!(all.iter().any(|i| i.title == "Malware Sandbox"));
        assert!(all.iter().any(|i| i.title == "Settings"));
        // 10 top-level-ish items + 6 settings children + 5 tools children.
        assert_eq!(all.len(), 21);
    }
}
