use std::collections::HashMap;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{CliArgs, Command, OutputArgs};
use crate::cli::validation;
use crate::client::{self, ApiClient, ClientConfig, SearchParam};
use crate::config::{self, ConfigFile};
use crate::explorer::{ExplorerCriteria, ExplorerFilters, ExplorerPage, SortDirection, SortField};
use crate::output::{self, ExplorerReport, OutputFormat};
use crate::query::{QueryRules, QueryValidator, DEFAULT_MAX_QUERY_LENGTH, DEFAULT_MIN_QUERY_LENGTH};
use crate::view::{ExplorerLoad, SearchSession, ViewController, ViewState};

const LOG_ENV: &str = "MULTASGO_LOG";

fn render_custom_help(subcommand: Option<&str>) -> String {
    let mut root = CliArgs::command();
    // propagates global args into the subcommands
    root.build();
    let cmd = subcommand
        .and_then(|name| root.find_subcommand(name).cloned())
        .unwrap_or_else(|| root.clone());
    let mut out = String::new();

    match (subcommand, root.get_version()) {
        (None, Some(version)) => out.push_str(&format!("{} {version}\n", root.get_name())),
        (Some(name), _) => out.push_str(&format!("{} {name}\n", root.get_name())),
        (None, None) => out.push_str(&format!("{}\n", root.get_name())),
    }

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if subcommand.is_none() {
        if let Some(long_about) = cmd.get_long_about() {
            out.push('\n');
            out.push_str(&long_about.to_string());
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(root.get_name());
    match subcommand {
        Some(name) => {
            out.push(' ');
            out.push_str(name);
            for arg in cmd.get_positionals() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                out.push_str(&format!(" <{value_name}>"));
            }
            out.push_str(" [OPTIONS]\n\n");
        }
        None => out.push_str(" <COMMAND> [OPTIONS]\n\n"),
    }

    if subcommand.is_none() {
        out.push_str("Commands:\n");
        for sub in root.get_subcommands() {
            let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
            out.push_str(&format!("  {:<12} {}\n", sub.get_name(), about.trim()));
        }
        out.push('\n');
    }

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() || arg.is_positional() {
            continue;
        }

        let heading = arg.get_help_heading().unwrap_or("Options").to_string();

        let idx = match section_idx.get(&heading).copied() {
            Some(i) => i,
            None => {
                sections.push((heading.clone(), Vec::new()));
                let i = sections.len() - 1;
                section_idx.insert(heading, i);
                i
            }
        };

        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();

            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }

            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }

            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    let rendered = format!("--{alias}");
                    if !parts.iter().any(|p| p == &rendered) {
                        parts.push(rendered);
                    }
                }
            }

            let mut flags = parts.join(", ");

            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                flags.push_str(&format!(" <{value_name}>"));
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }

            out.push('\n');
        }
    }

    out
}

fn requested_subcommand() -> Option<String> {
    let root = CliArgs::command();
    std::env::args()
        .skip(1)
        .find(|a| root.find_subcommand(a).is_some())
}

#[derive(Clone, Debug, PartialEq)]
pub enum RunCommand {
    Search {
        query: String,
        skip: usize,
        limit: usize,
    },
    Show {
        code: String,
    },
    Explore {
        criteria: ExplorerCriteria,
        all_pages: bool,
        facets: bool,
        load: ExplorerLoad,
    },
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub command: RunCommand,
    pub client: ClientConfig,
    pub rules: QueryRules,
    pub format: OutputFormat,
    pub output: Option<String>,
    pub no_color: bool,
    pub verbose: u8,
}

fn resolve_format(args: &OutputArgs, cfg_format: Option<&str>) -> Result<OutputFormat, String> {
    if let Some(raw) = args.format.as_deref() {
        return OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid --format '{raw}', expected table, cards, json or html")
        });
    }
    if let Some(inferred) = args.output.as_deref().and_then(output::infer_format_from_path) {
        return Ok(inferred);
    }
    match cfg_format {
        Some(raw) => OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid output_format '{raw}' in config, expected table, cards, json or html")
        }),
        None => Ok(OutputFormat::Table),
    }
}

fn positive(name: &str, value: usize) -> Result<usize, String> {
    if value == 0 {
        return Err(format!("invalid {name}, expected positive integer"));
    }
    Ok(value)
}

pub fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;
    let global = args.global;

    let no_color = global.no_color || cfg.no_color.unwrap_or(false);

    let timeout = global
        .timeout
        .or(cfg.timeout)
        .unwrap_or(client::DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let search_param = match global.search_param.or(cfg.search_param) {
        Some(raw) => SearchParam::parse(&raw)
            .ok_or_else(|| format!("invalid search_param '{raw}', expected q or query"))?,
        None => SearchParam::Q,
    };
    let client_config = ClientConfig {
        base_url: global
            .api_url
            .or(cfg.api_url)
            .unwrap_or_else(|| client::DEFAULT_API_URL.to_string()),
        timeout: Duration::from_secs(timeout),
        search_param,
        proxy: global.proxy.or(cfg.proxy),
    };

    let min_length = positive(
        "min_query_length",
        cfg.min_query_length.unwrap_or(DEFAULT_MIN_QUERY_LENGTH),
    )?;
    let max_length = global
        .max_query_length
        .or(cfg.max_query_length)
        .unwrap_or(DEFAULT_MAX_QUERY_LENGTH);
    if max_length < min_length {
        return Err(format!(
            "invalid max-query-length {max_length}, expected at least {min_length}"
        ));
    }
    let rules = QueryRules {
        min_length,
        max_length,
        allow_legacy_phrases: global.legacy_phrases || cfg.allow_legacy_phrases.unwrap_or(false),
    };

    let cfg_format = cfg.output_format.as_deref();
    let (command, format, output) = match args.command {
        Command::Search(search) => {
            let limit = positive(
                "search_limit",
                search
                    .limit
                    .or(cfg.search_limit)
                    .unwrap_or(client::DEFAULT_SEARCH_LIMIT),
            )?;
            let format = resolve_format(&search.output, cfg_format)?;
            (
                RunCommand::Search {
                    query: search.joined_query(),
                    skip: search.skip,
                    limit,
                },
                format,
                search.output.output,
            )
        }
        Command::Show(show) => {
            let format = resolve_format(&show.output, cfg_format)?;
            (
                RunCommand::Show {
                    code: show.code.trim().to_string(),
                },
                format,
                show.output.output,
            )
        }
        Command::Explore(explore) => {
            let page_size = positive(
                "page_size",
                explore
                    .page_size
                    .or(cfg.page_size)
                    .unwrap_or(crate::explorer::DEFAULT_PAGE_SIZE),
            )?;
            let limit = positive(
                "explorer_limit",
                explore
                    .limit
                    .or(cfg.explorer_limit)
                    .unwrap_or(client::DEFAULT_EXPLORER_LIMIT),
            )?;
            let sort_field = match explore.sort.as_deref() {
                Some(raw) => SortField::parse(raw)
                    .ok_or_else(|| format!("invalid --sort '{raw}'"))?,
                None => SortField::Code,
            };
            let sort_direction = match explore.direction.as_deref() {
                Some(raw) => SortDirection::parse(raw)
                    .ok_or_else(|| format!("invalid --direction '{raw}'"))?,
                None => SortDirection::Ascending,
            };
            let format = resolve_format(&explore.output, cfg_format)?;
            let criteria = ExplorerCriteria {
                filters: ExplorerFilters {
                    severity: explore.severity,
                    responsible_party: explore.responsible,
                    points: explore.points,
                },
                sort_field,
                sort_direction,
                page: explore.page.unwrap_or(1),
                page_size,
            };
            (
                RunCommand::Explore {
                    criteria,
                    all_pages: explore.all_pages,
                    facets: explore.facets,
                    load: ExplorerLoad {
                        limit,
                        retries: explore.retry,
                        fallback: !explore.no_fallback && cfg.explorer_fallback.unwrap_or(true),
                        page_size,
                    },
                },
                format,
                explore.output.output,
            )
        }
        Command::InitConfig(_) => {
            return Err("init-config does not run against the API".to_string());
        }
    };

    Ok(RunConfig {
        command,
        client: client_config,
        rules,
        format,
        output,
        no_color,
        verbose: global.verbose,
    })
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "multasgo=info",
            _ => "multasgo=debug,reqwest=debug",
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .try_init();
}

fn start_spinner(enabled: bool, message: &str) -> Result<ProgressBar, String> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed}]")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

async fn emit(rendered: &[u8], output: Option<&str>) -> Result<(), String> {
    match output {
        Some(path) => {
            let path = config::expand_tilde(path);
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .await
                .map_err(|e| format!("failed to open output file '{}': {e}", path.display()))?;
            outfile
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))?;
            info!(path = %path.display(), bytes = rendered.len(), "output written");
            Ok(())
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))
        }
    }
}

fn explorer_pages(
    explorer: &mut crate::explorer::ExplorerState,
    requested_page: usize,
    all_pages: bool,
) -> Result<Vec<ExplorerPage>, String> {
    if all_pages {
        let mut pages = vec![explorer.current_page()];
        while explorer.next_page() {
            pages.push(explorer.current_page());
        }
        return Ok(pages);
    }
    if !explorer.go_to(requested_page) {
        return Err(format!(
            "page {requested_page} is out of range (1-{})",
            explorer.total_pages()
        ));
    }
    Ok(vec![explorer.current_page()])
}

pub async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let spinner_enabled = run.format.is_interactive() && run.output.is_none();

    let client = ApiClient::new(run.client.clone()).map_err(|e| e.to_string())?;
    debug!(endpoint = %client.endpoint(), "client ready");
    let session = SearchSession::new(client, QueryValidator::new(run.rules.clone()));

    let rendered = match run.command {
        RunCommand::Search { query, skip, limit } => {
            let mut view = ViewController::new();
            if !view.begin() {
                return Ok(());
            }
            let pb = start_spinner(spinner_enabled, &format!("searching \"{}\"", query.trim()))?;
            view.finish(session.search(&query, skip, limit).await);
            pb.finish_and_clear();
            match view.into_state() {
                ViewState::Results(results) => {
                    output::render_search(run.format, &results.query, results.total, &results.records)
                }
                ViewState::Empty(empty) => output::render_empty(
                    run.format,
                    query.trim(),
                    &empty.message,
                    empty.suggestion.as_deref(),
                ),
                ViewState::Error { message } => return Err(message),
                ViewState::Idle | ViewState::Loading => return Ok(()),
            }
        }
        RunCommand::Show { code } => {
            let mut view = ViewController::new();
            if !view.begin() {
                return Ok(());
            }
            let pb = start_spinner(spinner_enabled, &format!("loading {code}"))?;
            view.finish(session.details(&code).await);
            pb.finish_and_clear();
            match view.into_state() {
                ViewState::Results(record) => output::render_record(run.format, &record),
                ViewState::Empty(empty) => return Err(empty.message),
                ViewState::Error { message } => return Err(message),
                ViewState::Idle | ViewState::Loading => return Ok(()),
            }
        }
        RunCommand::Explore {
            criteria,
            all_pages,
            facets,
            load,
        } => {
            let mut view = ViewController::new();
            if !view.begin() {
                return Ok(());
            }
            let pb = start_spinner(spinner_enabled, "loading infractions")?;
            view.finish(session.load_explorer(load).await);
            pb.finish_and_clear();
            match view.into_state() {
                ViewState::Results(mut explorer) => {
                    let requested_page = criteria.page;
                    explorer.apply(criteria);
                    let pages = explorer_pages(&mut explorer, requested_page, all_pages)?;
                    let report = ExplorerReport::new(
                        pages,
                        explorer.snapshot().len(),
                        explorer.criteria(),
                        explorer.source(),
                        facets.then(|| explorer.facets()),
                    );
                    output::render_explorer(run.format, &report)
                }
                ViewState::Empty(empty) => return Err(empty.message),
                ViewState::Error { message } => return Err(message),
                ViewState::Idle | ViewState::Loading => return Ok(()),
            }
        }
    };

    emit(&rendered, run.output.as_deref()).await
}

fn init_config(path: Option<String>, config: Option<String>) -> Result<(), String> {
    let path = match path.or(config) {
        Some(p) => config::expand_tilde(&p),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory for config".to_string())?,
    };
    if config::ensure_default_config_file(&path)? {
        println!(":: Config written to {}", path.display());
    } else {
        println!(":: Config already exists at {}", path.display());
    }
    Ok(())
}

fn load_user_config(explicit: Option<&str>) -> Result<ConfigFile, String> {
    match explicit {
        Some(p) => config::load_config(&config::expand_tilde(p), false),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help(requested_subcommand().as_deref()));
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.global.verbose);

    if let Command::InitConfig(init) = &args.command {
        return init_config(init.path.clone(), args.global.config.clone());
    }

    let cfg = load_user_config(args.global.config.as_deref())?;
    let run = build_run_config(args, cfg)?;
    debug!(verbose = run.verbose, format = ?run.format, "configuration resolved");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
