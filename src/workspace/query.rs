//! List queries
//!
//! A [`ListQuery`] binds a resource to the scope it is listed in and to its
//! typed options, and renders the request path and query string.

use super::options::{EventOrderBy, ListOptions, MemberRole};
use super::resources::{path_parameter_name, ResourceDescriptor, ResourceKind};
use crate::error::{Error, Result};
use url::Url;

/// Customer alias accepted by the Directory API for the caller's account
pub const MY_CUSTOMER: &str = "my_customer";

/// Who and what a list call is about
///
/// Every value is explicit per call; nothing is inherited from earlier calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Customer ID (defaults to [`MY_CUSTOMER`])
    pub customer: Option<String>,
    /// Domain to restrict users and groups to
    pub domain: Option<String>,
    /// User email or ID (groups of a user, role assignments of a user)
    pub user_key: Option<String>,
    /// Group email or ID
    pub group_key: Option<String>,
    /// Calendar ID (`primary` for the acting user's own calendar)
    pub calendar_id: Option<String>,
}

impl Scope {
    /// Customer ID, falling back to [`MY_CUSTOMER`]
    pub fn customer_or_default(&self) -> &str {
        self.customer
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(MY_CUSTOMER)
    }
}

/// One list call, without its paging state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub resource: ResourceKind,
    pub scope: Scope,
    pub options: ListOptions,
}

impl ListQuery {
    /// Create a query with an empty scope and no options
    pub fn new(resource: ResourceKind) -> Self {
        Self {
            resource,
            scope: Scope::default(),
            options: ListOptions::default(),
        }
    }

    /// Set the scope
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the options
    #[must_use]
    pub fn with_options(mut self, options: ListOptions) -> Self {
        self.options = options;
        self
    }

    /// Static description of the queried resource
    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.resource.descriptor()
    }

    /// Request path below the service root, path parameters percent-encoded
    pub fn path(&self) -> Result<String> {
        let mut url = Url::parse("http://localhost/")?;
        self.push_path_segments(&mut url)?;
        Ok(url.path().trim_start_matches('/').to_string())
    }

    /// Absolute request URL below `base_url`
    pub fn url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(base_url)?;
        self.push_path_segments(&mut url)?;
        Ok(url)
    }

    fn push_path_segments(&self, url: &mut Url) -> Result<()> {
        let descriptor = self.descriptor();
        let values = descriptor
            .path
            .split('/')
            .map(|segment| match path_parameter_name(segment) {
                Some(name) => self.path_parameter(name),
                None => Ok(segment.to_string()),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::config("Endpoint URL cannot be used as a base"))?;
        segments.pop_if_empty().extend(values);
        Ok(())
    }

    fn path_parameter(&self, name: &str) -> Result<String> {
        let value = match name {
            "customer" => Some(self.scope.customer_or_default()),
            "groupKey" => self.scope.group_key.as_deref(),
            "calendarId" => self.scope.calendar_id.as_deref(),
            _ => None,
        };
        value
            .filter(|v| !v.is_empty())
            .map(String::from)
            .ok_or_else(|| Error::missing_parameter(self.resource.name(), name))
    }

    /// Query parameters for one page of `page_size` items, excluding the cursor
    ///
    /// `maxResults` is clamped to the resource's maximum page size.
    pub fn query_params(&self, page_size: u32) -> Result<Vec<(String, String)>> {
        self.validate()?;

        let descriptor = self.descriptor();
        let opts = &self.options;
        let mut params = QueryParams::default();

        params.push(
            "maxResults",
            descriptor.clamp_page_size(page_size).to_string(),
        );

        match self.resource {
            ResourceKind::Users => {
                self.push_customer_or_domain(&mut params);
                params.push_opt("query", opts.query.as_deref());
                params.push_opt("orderBy", opts.user_order_by.map(|o| o.as_api_str()));
                params.push_opt("sortOrder", opts.sort_order.map(|o| o.as_api_str()));
                params.push_opt("projection", opts.user_projection.map(|p| p.as_api_str()));
                params.push_opt("viewType", opts.view_type.map(|v| v.as_api_str()));
                params.push_flag("showDeleted", opts.show_deleted);
            }
            ResourceKind::Groups => {
                // userKey alone lists the groups of that user
                match self.scope.user_key.as_deref().filter(|u| !u.is_empty()) {
                    Some(user_key) => params.push("userKey", user_key),
                    None => self.push_customer_or_domain(&mut params),
                }
                params.push_opt("query", opts.query.as_deref());
                params.push_opt("sortOrder", opts.sort_order.map(|o| o.as_api_str()));
            }
            ResourceKind::Members => {
                if !opts.member_roles.is_empty() {
                    params.push("roles", MemberRole::join(&opts.member_roles));
                }
                params.push_flag("includeDerivedMembership", opts.include_derived_membership);
            }
            ResourceKind::MobileDevices => {
                params.push_opt("query", opts.query.as_deref());
                params.push_opt("orderBy", opts.mobile_order_by.map(|o| o.as_api_str()));
                params.push_opt("sortOrder", opts.sort_order.map(|o| o.as_api_str()));
                params.push_opt("projection", opts.device_projection.map(|p| p.as_api_str()));
            }
            ResourceKind::ChromeOsDevices => {
                params.push_opt("query", opts.query.as_deref());
                params.push_opt("orderBy", opts.chromeos_order_by.map(|o| o.as_api_str()));
                params.push_opt("sortOrder", opts.sort_order.map(|o| o.as_api_str()));
                params.push_opt("projection", opts.device_projection.map(|p| p.as_api_str()));
                params.push_opt("orgUnitPath", opts.org_unit_path.as_deref());
            }
            ResourceKind::Notifications => {
                params.push_opt("language", opts.language.as_deref());
            }
            ResourceKind::Roles => {}
            ResourceKind::RoleAssignments => {
                params.push_opt("roleId", opts.role_id.as_deref());
                params.push_opt("userKey", self.scope.user_key.as_deref());
            }
            ResourceKind::Events => {
                params.push_flag("singleEvents", opts.single_events);
                params.push_opt("orderBy", opts.event_order_by.map(|o| o.as_api_str()));
                params.push_opt("timeMin", opts.time_min.as_deref());
                params.push_opt("timeMax", opts.time_max.as_deref());
                params.push_opt("q", opts.query.as_deref());
                params.push_flag("showDeleted", opts.show_deleted);
            }
            ResourceKind::CalendarAcl => {
                params.push_flag("showDeleted", opts.show_deleted);
            }
            ResourceKind::CalendarList => {
                params.push_opt("minAccessRole", opts.min_access_role.map(|r| r.as_api_str()));
                params.push_flag("showDeleted", opts.show_deleted);
                params.push_flag("showHidden", opts.show_hidden);
            }
            ResourceKind::Settings => {}
        }

        Ok(params.0)
    }

    fn push_customer_or_domain(&self, params: &mut QueryParams) {
        match self.scope.domain.as_deref().filter(|d| !d.is_empty()) {
            Some(domain) => params.push("domain", domain),
            None => params.push("customer", self.scope.customer_or_default()),
        }
    }

    /// Reject option combinations the API refuses
    fn validate(&self) -> Result<()> {
        if self.resource == ResourceKind::Events
            && self.options.event_order_by == Some(EventOrderBy::StartTime)
            && !self.options.single_events
        {
            return Err(Error::invalid_value(
                "orderBy",
                "ordering events by start time requires single events",
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    fn push(&mut self, key: &str, value: impl Into<String>) {
        self.0.push((key.to_string(), value.into()));
    }

    fn push_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.push(key, value);
        }
    }

    fn push_flag(&mut self, key: &str, set: bool) {
        if set {
            self.push(key, "true");
        }
    }
}
