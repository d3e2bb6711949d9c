//! Typed list options
//!
//! Each enum has exactly one mapping to the string the Google API expects,
//! so the API spellings live in this file only.

use clap::ValueEnum;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASCENDING",
            SortOrder::Descending => "DESCENDING",
        }
    }
}

/// Sort key for users
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UserOrderBy {
    Email,
    #[value(alias = "familyName")]
    FamilyName,
    #[value(alias = "givenName")]
    GivenName,
}

impl UserOrderBy {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            UserOrderBy::Email => "email",
            UserOrderBy::FamilyName => "familyName",
            UserOrderBy::GivenName => "givenName",
        }
    }
}

/// Subset of user fields to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UserProjection {
    Basic,
    Custom,
    Full,
}

impl UserProjection {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            UserProjection::Basic => "basic",
            UserProjection::Custom => "custom",
            UserProjection::Full => "full",
        }
    }
}

/// Whether users are listed as an administrator or as a domain user
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewType {
    #[value(alias = "admin_view")]
    AdminView,
    #[value(alias = "domain_public")]
    DomainPublic,
}

impl ViewType {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            ViewType::AdminView => "admin_view",
            ViewType::DomainPublic => "domain_public",
        }
    }
}

/// Subset of device fields to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceProjection {
    Basic,
    Full,
}

impl DeviceProjection {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            DeviceProjection::Basic => "BASIC",
            DeviceProjection::Full => "FULL",
        }
    }
}

/// Sort key for mobile devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MobileOrderBy {
    #[value(alias = "deviceId")]
    DeviceId,
    Email,
    #[value(alias = "lastSync")]
    LastSync,
    Model,
    Name,
    Os,
    Status,
    Type,
}

impl MobileOrderBy {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            MobileOrderBy::DeviceId => "deviceId",
            MobileOrderBy::Email => "email",
            MobileOrderBy::LastSync => "lastSync",
            MobileOrderBy::Model => "model",
            MobileOrderBy::Name => "name",
            MobileOrderBy::Os => "os",
            MobileOrderBy::Status => "status",
            MobileOrderBy::Type => "type",
        }
    }
}

/// Sort key for Chrome OS devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChromeOsOrderBy {
    #[value(alias = "annotatedLocation")]
    AnnotatedLocation,
    #[value(alias = "annotatedUser")]
    AnnotatedUser,
    #[value(alias = "lastSync")]
    LastSync,
    Notes,
    #[value(alias = "serialNumber")]
    SerialNumber,
    Status,
}

impl ChromeOsOrderBy {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            ChromeOsOrderBy::AnnotatedLocation => "annotatedLocation",
            ChromeOsOrderBy::AnnotatedUser => "annotatedUser",
            ChromeOsOrderBy::LastSync => "lastSync",
            ChromeOsOrderBy::Notes => "notes",
            ChromeOsOrderBy::SerialNumber => "serialNumber",
            ChromeOsOrderBy::Status => "status",
        }
    }
}

/// Sort key for calendar events
///
/// `StartTime` is only accepted together with `singleEvents=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventOrderBy {
    #[value(alias = "startTime")]
    StartTime,
    Updated,
}

impl EventOrderBy {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            EventOrderBy::StartTime => "startTime",
            EventOrderBy::Updated => "updated",
        }
    }
}

/// Minimum access role for calendar list entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MinAccessRole {
    #[value(alias = "freeBusyReader")]
    FreeBusyReader,
    Owner,
    Reader,
    Writer,
}

impl MinAccessRole {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            MinAccessRole::FreeBusyReader => "freeBusyReader",
            MinAccessRole::Owner => "owner",
            MinAccessRole::Reader => "reader",
            MinAccessRole::Writer => "writer",
        }
    }
}

/// Group membership role
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MemberRole {
    Owner,
    Manager,
    Member,
}

impl MemberRole {
    /// API string form
    pub fn as_api_str(self) -> &'static str {
        match self {
            MemberRole::Owner => "OWNER",
            MemberRole::Manager => "MANAGER",
            MemberRole::Member => "MEMBER",
        }
    }

    /// Comma-joined role filter as the members endpoint expects it
    pub fn join(roles: &[MemberRole]) -> String {
        roles
            .iter()
            .map(|r| r.as_api_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Every option a list call can carry
///
/// Options a resource does not accept are ignored when its query string is
/// rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Free-text search (`query` on Directory, `q` on events)
    pub query: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub user_order_by: Option<UserOrderBy>,
    pub user_projection: Option<UserProjection>,
    pub view_type: Option<ViewType>,
    pub device_projection: Option<DeviceProjection>,
    pub mobile_order_by: Option<MobileOrderBy>,
    pub chromeos_order_by: Option<ChromeOsOrderBy>,
    /// Organizational unit filter for Chrome OS devices
    pub org_unit_path: Option<String>,
    pub show_deleted: bool,
    pub show_hidden: bool,
    pub member_roles: Vec<MemberRole>,
    pub include_derived_membership: bool,
    pub role_id: Option<String>,
    /// Notification language
    pub language: Option<String>,
    pub single_events: bool,
    pub event_order_by: Option<EventOrderBy>,
    /// RFC 3339 lower bound for event end times
    pub time_min: Option<String>,
    /// RFC 3339 upper bound for event start times
    pub time_max: Option<String>,
    pub min_access_role: Option<MinAccessRole>,
}
