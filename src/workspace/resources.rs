//! Resource catalog
//!
//! Every listable resource is described by static data only: its service,
//! path template, item field and maximum page size.

use crate::error::{Error, Result};
use crate::types::Service;
use std::str::FromStr;

/// Static description of a listable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Name used on the command line
    pub name: &'static str,
    /// Owning API
    pub service: Service,
    /// Path below the service root; `{name}` segments are parameters
    pub path: &'static str,
    /// Response field holding the page's items
    pub items_field: &'static str,
    /// Largest `maxResults` the endpoint accepts
    pub max_page_size: u32,
    /// Columns shown by the table output
    pub default_fields: &'static [&'static str],
    /// One-line summary
    pub description: &'static str,
}

impl ResourceDescriptor {
    /// Names of the path parameters, in path order
    pub fn path_parameters(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter_map(path_parameter_name)
    }

    /// Page size the endpoint will actually serve for a requested size
    pub fn clamp_page_size(&self, page_size: u32) -> u32 {
        page_size.clamp(1, self.max_page_size)
    }
}

/// Parameter name of a `{name}` path segment
pub(crate) fn path_parameter_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// A listable Workspace resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Groups,
    Members,
    MobileDevices,
    ChromeOsDevices,
    Notifications,
    Roles,
    RoleAssignments,
    Events,
    CalendarAcl,
    CalendarList,
    Settings,
}

const ALL: [ResourceKind; 12] = [
    ResourceKind::Users,
    ResourceKind::Groups,
    ResourceKind::Members,
    ResourceKind::MobileDevices,
    ResourceKind::ChromeOsDevices,
    ResourceKind::Notifications,
    ResourceKind::Roles,
    ResourceKind::RoleAssignments,
    ResourceKind::Events,
    ResourceKind::CalendarAcl,
    ResourceKind::CalendarList,
    ResourceKind::Settings,
];

impl ResourceKind {
    /// Every resource, in catalog order
    pub fn all() -> &'static [ResourceKind] {
        &ALL
    }

    /// Name used on the command line
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Static description of this resource
    pub fn descriptor(self) -> &'static ResourceDescriptor {
        match self {
            ResourceKind::Users => &USERS,
            ResourceKind::Groups => &GROUPS,
            ResourceKind::Members => &MEMBERS,
            ResourceKind::MobileDevices => &MOBILE_DEVICES,
            ResourceKind::ChromeOsDevices => &CHROMEOS_DEVICES,
            ResourceKind::Notifications => &NOTIFICATIONS,
            ResourceKind::Roles => &ROLES,
            ResourceKind::RoleAssignments => &ROLE_ASSIGNMENTS,
            ResourceKind::Events => &EVENTS,
            ResourceKind::CalendarAcl => &CALENDAR_ACL,
            ResourceKind::CalendarList => &CALENDAR_LIST,
            ResourceKind::Settings => &SETTINGS,
        }
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ALL.iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                Error::invalid_value(
                    "resource",
                    format!(
                        "unknown resource '{s}', expected one of: {}",
                        ALL.iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
                    ),
                )
            })
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Catalog
// ============================================================================

const USERS: ResourceDescriptor = ResourceDescriptor {
    name: "users",
    service: Service::Directory,
    path: "admin/directory/v1/users",
    items_field: "users",
    max_page_size: 500,
    default_fields: &["primaryEmail", "name.fullName", "suspended", "lastLoginTime"],
    description: "Users of a customer or domain",
};

const GROUPS: ResourceDescriptor = ResourceDescriptor {
    name: "groups",
    service: Service::Directory,
    path: "admin/directory/v1/groups",
    items_field: "groups",
    max_page_size: 200,
    default_fields: &["email", "name", "directMembersCount"],
    description: "Groups of a customer or domain, or of one user",
};

const MEMBERS: ResourceDescriptor = ResourceDescriptor {
    name: "members",
    service: Service::Directory,
    path: "admin/directory/v1/groups/{groupKey}/members",
    items_field: "members",
    max_page_size: 200,
    default_fields: &["email", "role", "type", "status"],
    description: "Members of a group",
};

const MOBILE_DEVICES: ResourceDescriptor = ResourceDescriptor {
    name: "mobile-devices",
    service: Service::Directory,
    path: "admin/directory/v1/customer/{customer}/devices/mobile",
    items_field: "mobiledevices",
    max_page_size: 100,
    default_fields: &["resourceId", "email", "model", "os", "status", "lastSync"],
    description: "Mobile devices of a customer",
};

const CHROMEOS_DEVICES: ResourceDescriptor = ResourceDescriptor {
    name: "chromeos-devices",
    service: Service::Directory,
    path: "admin/directory/v1/customer/{customer}/devices/chromeos",
    items_field: "chromeosdevices",
    max_page_size: 300,
    default_fields: &["deviceId", "serialNumber", "status", "orgUnitPath", "lastSync"],
    description: "Chrome OS devices of a customer",
};

const NOTIFICATIONS: ResourceDescriptor = ResourceDescriptor {
    name: "notifications",
    service: Service::Directory,
    path: "admin/directory/v1/customer/{customer}/notifications",
    items_field: "items",
    max_page_size: 100,
    default_fields: &["notificationId", "subject", "sendTime", "isUnread"],
    description: "Admin console notifications",
};

const ROLES: ResourceDescriptor = ResourceDescriptor {
    name: "roles",
    service: Service::Directory,
    path: "admin/directory/v1/customer/{customer}/roles",
    items_field: "items",
    max_page_size: 100,
    default_fields: &["roleId", "roleName", "isSystemRole", "isSuperAdminRole"],
    description: "Admin roles",
};

const ROLE_ASSIGNMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "role-assignments",
    service: Service::Directory,
    path: "admin/directory/v1/customer/{customer}/roleassignments",
    items_field: "items",
    max_page_size: 200,
    default_fields: &["roleAssignmentId", "roleId", "assignedTo", "scopeType"],
    description: "Admin role assignments",
};

const EVENTS: ResourceDescriptor = ResourceDescriptor {
    name: "events",
    service: Service::Calendar,
    path: "calendar/v3/calendars/{calendarId}/events",
    items_field: "items",
    max_page_size: 2500,
    default_fields: &["id", "summary", "start.dateTime", "end.dateTime", "status"],
    description: "Events on a calendar",
};

const CALENDAR_ACL: ResourceDescriptor = ResourceDescriptor {
    name: "calendar-acl",
    service: Service::Calendar,
    path: "calendar/v3/calendars/{calendarId}/acl",
    items_field: "items",
    max_page_size: 250,
    default_fields: &["id", "role", "scope.type", "scope.value"],
    description: "Access control rules of a calendar",
};

const CALENDAR_LIST: ResourceDescriptor = ResourceDescriptor {
    name: "calendar-list",
    service: Service::Calendar,
    path: "calendar/v3/users/me/calendarList",
    items_field: "items",
    max_page_size: 250,
    default_fields: &["id", "summary", "accessRole", "primary"],
    description: "Calendars on the acting user's calendar list",
};

const SETTINGS: ResourceDescriptor = ResourceDescriptor {
    name: "settings",
    service: Service::Calendar,
    path: "calendar/v3/users/me/settings",
    items_field: "items",
    max_page_size: 250,
    default_fields: &["id", "value"],
    description: "Calendar settings of the acting user",
};
