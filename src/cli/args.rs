use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "multasgo",
    version,
    about = "traffic-infraction lookup client",
    long_about = "MultasGO looks up Brazilian traffic infractions (CTB) by code or keyword, shows the full record of one infraction and explores the whole catalog with filters, sorting and pages.\n\nExamples:\n  multasgo search cinto\n  multasgo search 5169-1 --format cards\n  multasgo show 5169-1\n  multasgo explore --severity grave --sort fine --direction desc\n  multasgo explore --facets --format json --output explorer.json\n\nTip: Use init-config to write ~/.multasgo/config.yml and keep invocations short."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity on stderr (-v, -vv). MULTASGO_LOG takes precedence."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable ANSI colors."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.multasgo/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "api-url",
        visible_alias = "base-url",
        value_name = "URL",
        global = true,
        help_heading = "Backend",
        help = "Base URL of the MultasGO API (default http://localhost:8080)."
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Backend",
        help = "Per-request timeout in seconds (default 10)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "Backend",
        help = "HTTP(S) proxy for every request."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "search-param",
        value_name = "NAME",
        global = true,
        help_heading = "Backend",
        help = "Name of the search term parameter: q or query (default q)."
    )]
    pub search_param: Option<String>,

    #[arg(
        long = "max-query-length",
        value_name = "N",
        global = true,
        help_heading = "Search",
        help = "Longest accepted search term, in characters (default 100)."
    )]
    pub max_query_length: Option<usize>,

    #[arg(
        long = "legacy-phrases",
        global = true,
        help_heading = "Search",
        help = "Also accept the fixed two-word phrases (e.g. \"cinto segurança\")."
    )]
    pub legacy_phrases: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search infractions by code or keyword.
    Search(SearchArgs),
    /// Show every field of one infraction.
    Show(ShowArgs),
    /// Filter, sort and page through the infraction catalog.
    Explore(ExploreArgs),
    /// Write a commented default config file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "table, cards, json or html (inferred from --output when omitted)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered output to FILE instead of stdout."
    )]
    pub output: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(
        value_name = "QUERY",
        required = true,
        num_args = 1..,
        help = "Infraction code or a single keyword."
    )]
    pub query: Vec<String>,

    #[arg(
        short = 'l',
        long = "limit",
        value_name = "N",
        help_heading = "Search",
        help = "Maximum number of results (default 100)."
    )]
    pub limit: Option<usize>,

    #[arg(
        long = "skip",
        value_name = "N",
        default_value_t = 0,
        help_heading = "Search",
        help = "Number of results to skip."
    )]
    pub skip: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl SearchArgs {
    /// Words given separately on the command line form one query.
    pub fn joined_query(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(value_name = "CODE", help = "Infraction code, e.g. 5169-1.")]
    pub code: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExploreArgs {
    #[arg(
        long = "severity",
        value_name = "LABEL",
        help_heading = "Filters",
        help = "Only this severity (e.g. grave, \"very severe\", \"not applicable\")."
    )]
    pub severity: Option<String>,

    #[arg(
        long = "responsible",
        value_name = "PARTY",
        help_heading = "Filters",
        help = "Only this responsible party (e.g. Condutor, Proprietário)."
    )]
    pub responsible: Option<String>,

    #[arg(
        long = "points",
        value_name = "N",
        help_heading = "Filters",
        help = "Only infractions worth exactly N points."
    )]
    pub points: Option<u32>,

    #[arg(
        short = 's',
        long = "sort",
        value_name = "FIELD",
        help_heading = "Sorting",
        help = "code, description, responsible, points, fine or severity (default code)."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'd',
        long = "direction",
        value_name = "DIR",
        help_heading = "Sorting",
        help = "asc or desc (default asc)."
    )]
    pub direction: Option<String>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        help_heading = "Pages",
        help = "1-based page to show (default 1)."
    )]
    pub page: Option<usize>,

    #[arg(
        long = "page-size",
        value_name = "N",
        help_heading = "Pages",
        help = "Records per page (default 10)."
    )]
    pub page_size: Option<usize>,

    #[arg(
        long = "all-pages",
        help_heading = "Pages",
        help = "Show every page instead of a single one."
    )]
    pub all_pages: bool,

    #[arg(
        short = 'l',
        long = "limit",
        value_name = "N",
        help_heading = "Loading",
        help = "How many records to load from the listing (default 500)."
    )]
    pub limit: Option<usize>,

    #[arg(
        long = "retry",
        value_name = "N",
        default_value_t = 0,
        help_heading = "Loading",
        help = "Retry a failed listing up to N more times."
    )]
    pub retry: usize,

    #[arg(
        long = "no-fallback",
        help_heading = "Loading",
        help = "Fail instead of showing built-in sample data when the listing cannot be loaded."
    )]
    pub no_fallback: bool,

    #[arg(
        long = "facets",
        help_heading = "Output",
        help = "Also list the distinct severities, responsible parties and points."
    )]
    pub facets: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InitConfigArgs {
    #[arg(
        value_name = "FILE",
        help = "Where to write the file (defaults to --config or ~/.multasgo/config.yml)."
    )]
    pub path: Option<String>,
}
