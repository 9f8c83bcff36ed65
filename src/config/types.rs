use serde::Deserialize;

/// Main configuration structure for tender-harvest
///
/// Every section has defaults that reproduce the portal session the scraper
/// was recorded against, so a minimal config file only needs the values the
/// operator actually wants to change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub filters: FilterConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
}

/// Remote API endpoint and the static headers sent with every request
///
/// Tokens are passed through as configuration; there is no refresh flow. An
/// expired `origin-token` shows up as failed pages, not as a crash.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint serving the paginated event listing
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Origin header value
    pub origin: String,

    /// Referer header value
    pub referer: String,

    /// Browser user agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Portal session token sent as x-origin-token
    #[serde(rename = "origin-token")]
    pub origin_token: String,

    /// Value for the x-recaptcha-token header (empty for the public listing)
    #[serde(rename = "recaptcha-token")]
    pub recaptcha_token: String,

    /// Value for the x-xsrf-token header (empty for the public listing)
    #[serde(rename = "xsrf-token")]
    pub xsrf_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://etender.gov.az/api/events".to_string(),
            origin: "https://www.etender.gov.az".to_string(),
            referer: "https://www.etender.gov.az/".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/140.0.0.0 Safari/537.36"
                .to_string(),
            origin_token: "0gQftPlv+3Gv+ItMwph9UDGszzZHmyEgqsyS/tBJp3O+icNkxLLe5tFZ1APwxUg8\
                           sMunRe/v9CGnHP+oBQWB07lQtS7ic78UGZbzZStGSXIB/+dHZhO7acBUn+df+9uo\
                           SWHv5+VRIcfAxLaipsNX6w=="
                .to_string(),
            recaptcha_token: String::new(),
            xsrf_token: String::new(),
        }
    }
}

/// Filter query parameters sent with every page request
///
/// These mirror the portal's own search form. Everything is a string on the
/// wire, including the numeric codes; empty strings mean "no filter".
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Procurement event type code
    #[serde(rename = "event-type")]
    pub event_type: String,

    /// Records per page
    #[serde(rename = "page-size")]
    pub page_size: String,

    /// Event status code
    #[serde(rename = "event-status")]
    pub event_status: String,

    /// Free-text search keyword
    pub keyword: String,

    /// Buyer organization name filter
    #[serde(rename = "buyer-organization-name")]
    pub buyer_organization_name: String,

    /// Private RFx identifier filter
    #[serde(rename = "private-rfx-id")]
    pub private_rfx_id: String,

    /// Lower bound on publish date
    #[serde(rename = "publish-date-from")]
    pub publish_date_from: String,

    /// Upper bound on publish date
    #[serde(rename = "publish-date-to")]
    pub publish_date_to: String,

    /// Awarded participant name filter
    #[serde(rename = "awarded-participant-name")]
    pub awarded_participant_name: String,

    /// Awarded participant VOEN (tax id) filter
    #[serde(rename = "awarded-participant-voen")]
    pub awarded_participant_voen: String,

    /// Document view type filter
    #[serde(rename = "document-view-type")]
    pub document_view_type: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            event_type: "2".to_string(),
            page_size: "15".to_string(),
            event_status: "1".to_string(),
            keyword: String::new(),
            buyer_organization_name: String::new(),
            private_rfx_id: String::new(),
            publish_date_from: String::new(),
            publish_date_to: String::new(),
            awarded_participant_name: String::new(),
            awarded_participant_voen: String::new(),
            document_view_type: String::new(),
        }
    }
}

impl FilterConfig {
    /// Full query-parameter list in the order the portal's frontend sends it,
    /// without the page number (that is overlaid per request)
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("EventType", self.event_type.clone()),
            ("PageSize", self.page_size.clone()),
            ("EventStatus", self.event_status.clone()),
            ("Keyword", self.keyword.clone()),
            ("buyerOrganizationName", self.buyer_organization_name.clone()),
            ("PrivateRfxId", self.private_rfx_id.clone()),
            ("publishDateFrom", self.publish_date_from.clone()),
            ("publishDateTo", self.publish_date_to.clone()),
            ("AwardedparticipantName", self.awarded_participant_name.clone()),
            ("AwardedparticipantVoen", self.awarded_participant_voen.clone()),
            ("DocumentViewType", self.document_view_type.clone()),
        ]
    }
}

/// Scraper pacing and concurrency configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Maximum number of simultaneously in-flight page requests
    #[serde(rename = "concurrent-requests")]
    pub concurrent_requests: usize,

    /// Number of page tasks scheduled per batch
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Pause between batches (milliseconds)
    #[serde(rename = "batch-pause-ms")]
    pub batch_pause_ms: u64,

    /// Courtesy delay before each request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Wall-clock timeout covering one whole request, send to receive (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Idle connections the transport pool may keep per host; must stay looser
    /// than `concurrent-requests` for the semaphore to be the binding limit
    #[serde(rename = "pool-max-idle-per-host")]
    pub pool_max_idle_per_host: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: 5,
            batch_size: 10,
            batch_pause_ms: 500,
            request_delay_ms: 100,
            request_timeout_secs: 30,
            pool_max_idle_per_host: 10,
        }
    }
}

/// Export output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory export files are written into
    pub directory: String,

    /// Base name for export files; a timestamp and extension are appended
    #[serde(rename = "file-stem")]
    pub file_stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            file_stem: "etender_data".to_string(),
        }
    }
}
