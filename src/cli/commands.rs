//! CLI commands and argument parsing

use crate::config::CONFIG_ENV;
use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::workspace::{ListOptions, MemberRole, MinAccessRole, ResourceKind, SortOrder, ViewType};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Google Workspace shell
#[derive(Parser, Debug)]
#[command(name = "gws")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(short = 'C', long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Access token to use instead of the configured credentials
    #[arg(long, global = true, env = "GWS_SHELL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Workspace user a service account acts as
    #[arg(short = 's', long, global = true, env = "GWS_SHELL_SUBJECT")]
    pub subject: Option<String>,

    /// Customer ID for Directory resources
    #[arg(long, global = true)]
    pub customer: Option<String>,

    /// Domain for users and groups
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every item of a resource
    List(ListArgs),

    /// Show the listable resources
    Resources,
}

/// Arguments of `list`
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Resource to list (see `gws resources`)
    pub resource: ResourceKind,

    /// Stop after this many items (0 = all)
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Items requested per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Start from this page token (resumes an interrupted listing)
    #[arg(long)]
    pub page_token: Option<String>,

    /// Print what was fetched when a later page fails
    #[arg(long)]
    pub allow_partial: bool,

    /// Fields to print, as dot paths (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Group email or ID (members)
    #[arg(short, long)]
    pub group: Option<String>,

    /// User email or ID (groups of a user, role assignments)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Calendar ID (events, calendar-acl); `primary` is the acting user's own
    #[arg(long)]
    pub calendar: Option<String>,

    /// Search query
    #[arg(long)]
    pub query: Option<String>,

    /// Sort key; accepted values depend on the resource
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort direction
    #[arg(long, value_enum)]
    pub sort_order: Option<SortOrder>,

    /// Field subset; accepted values depend on the resource
    #[arg(long)]
    pub projection: Option<String>,

    /// List users as an administrator or as a domain user
    #[arg(long, value_enum)]
    pub view_type: Option<ViewType>,

    /// Organizational unit of Chrome OS devices
    #[arg(long)]
    pub org_unit_path: Option<String>,

    /// Include deleted items
    #[arg(long)]
    pub show_deleted: bool,

    /// Include hidden calendars
    #[arg(long)]
    pub show_hidden: bool,

    /// Member roles to include (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub roles: Vec<MemberRole>,

    /// Include indirect group members
    #[arg(long)]
    pub include_derived: bool,

    /// Role ID filter for role assignments
    #[arg(long)]
    pub role_id: Option<String>,

    /// Notification language
    #[arg(long)]
    pub language: Option<String>,

    /// Expand recurring events into instances
    #[arg(long)]
    pub single_events: bool,

    /// Lower bound (RFC 3339) for event end times
    #[arg(long)]
    pub time_min: Option<String>,

    /// Upper bound (RFC 3339) for event start times
    #[arg(long)]
    pub time_max: Option<String>,

    /// Minimum access role of calendar list entries
    #[arg(long, value_enum)]
    pub min_access_role: Option<MinAccessRole>,
}

impl ListArgs {
    /// Typed options for this invocation
    ///
    /// `--order-by` and `--projection` are interpreted per resource.
    pub fn options(&self) -> Result<ListOptions> {
        let mut options = ListOptions {
            query: self.query.clone(),
            sort_order: self.sort_order,
            view_type: self.view_type,
            org_unit_path: self.org_unit_path.clone(),
            show_deleted: self.show_deleted,
            show_hidden: self.show_hidden,
            member_roles: self.roles.clone(),
            include_derived_membership: self.include_derived,
            role_id: self.role_id.clone(),
            language: self.language.clone(),
            single_events: self.single_events,
            time_min: self.time_min.clone(),
            time_max: self.time_max.clone(),
            min_access_role: self.min_access_role,
            ..ListOptions::default()
        };

        if let Some(order_by) = self.order_by.as_deref() {
            match self.resource {
                ResourceKind::Users => {
                    options.user_order_by = Some(parse_choice("order-by", order_by)?);
                }
                ResourceKind::MobileDevices => {
                    options.mobile_order_by = Some(parse_choice("order-by", order_by)?);
                }
                ResourceKind::ChromeOsDevices => {
                    options.chromeos_order_by = Some(parse_choice("order-by", order_by)?);
                }
                ResourceKind::Events => {
                    options.event_order_by = Some(parse_choice("order-by", order_by)?);
                }
                other => {
                    return Err(Error::invalid_value(
                        "order-by",
                        format!("{other} cannot be ordered"),
                    ))
                }
            }
        }

        if let Some(projection) = self.projection.as_deref() {
            match self.resource {
                ResourceKind::Users => {
                    options.user_projection = Some(parse_choice("projection", projection)?);
                }
                ResourceKind::MobileDevices | ResourceKind::ChromeOsDevices => {
                    options.device_projection = Some(parse_choice("projection", projection)?);
                }
                other => {
                    return Err(Error::invalid_value(
                        "projection",
                        format!("{other} has no projections"),
                    ))
                }
            }
        }

        Ok(options)
    }
}

/// Parse a resource-dependent choice, listing the accepted values on error
fn parse_choice<T: ValueEnum>(field: &str, input: &str) -> Result<T> {
    T::from_str(input, true).map_err(|_| {
        let accepted: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        Error::invalid_value(
            field,
            format!("'{input}' is not one of: {}", accepted.join(", ")),
        )
    })
}
