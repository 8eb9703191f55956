use crate::cli::args::{CliArgs, Command, OutputArgs};
use crate::client::{is_lookup_code, SearchParam};
use crate::explorer::{SortDirection, SortField};
use crate::output::OutputFormat;

fn validate_output(output: &OutputArgs) -> Result<(), String> {
    if let Some(raw) = output.format.as_deref() {
        OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid --format '{raw}', expected table, cards, json or html")
        })?;
    }
    if let Some(path) = output.output.as_deref() {
        if path.trim().is_empty() {
            return Err("invalid --output, expected a file path".to_string());
        }
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    let global = &args.global;
    if let Some(timeout) = global.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(max) = global.max_query_length {
        if max < crate::query::DEFAULT_MIN_QUERY_LENGTH {
            return Err(format!(
                "invalid max-query-length {max}, expected at least {}",
                crate::query::DEFAULT_MIN_QUERY_LENGTH
            ));
        }
    }
    if let Some(raw) = global.search_param.as_deref() {
        SearchParam::parse(raw)
            .ok_or_else(|| format!("invalid --search-param '{raw}', expected q or query"))?;
    }
    if let Some(url) = global.api_url.as_deref() {
        if url.trim().is_empty() {
            return Err("invalid --api-url, expected a URL".to_string());
        }
    }

    match &args.command {
        Command::Search(search) => {
            if let Some(limit) = search.limit {
                if limit == 0 {
                    return Err("invalid limit, expected positive integer".to_string());
                }
            }
            validate_output(&search.output)
        }
        Command::Show(show) => {
            if show.code.trim().is_empty() {
                return Err("an infraction code is required".to_string());
            }
            if !is_lookup_code(&show.code) {
                return Err(format!("invalid infraction code '{}'", show.code.trim()));
            }
            validate_output(&show.output)
        }
        Command::Explore(explore) => {
            if let Some(raw) = explore.sort.as_deref() {
                SortField::parse(raw).ok_or_else(|| {
                    format!(
                        "invalid --sort '{raw}', expected code, description, responsible, points, fine or severity"
                    )
                })?;
            }
            if let Some(raw) = explore.direction.as_deref() {
                SortDirection::parse(raw)
                    .ok_or_else(|| format!("invalid --direction '{raw}', expected asc or desc"))?;
            }
            if explore.page == Some(0) {
                return Err("invalid page, expected positive integer".to_string());
            }
            if explore.page.is_some() && explore.all_pages {
                return Err("use either --page or --all-pages, not both".to_string());
            }
            if explore.page_size == Some(0) {
                return Err("invalid page-size, expected positive integer".to_string());
            }
            if explore.limit == Some(0) {
                return Err("invalid limit, expected positive integer".to_string());
            }
            validate_output(&explore.output)
        }
        Command::InitConfig(_) => Ok(()),
    }
}
