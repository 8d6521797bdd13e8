//! CLI-only commands: parse, render, ask, words, id, history, config.
//!
//! These run without opening the TUI and produce plain text output.

use std::error::Error;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::core::config::Config;
use crate::core::export::{self, ExportFormat};
use crate::core::history::{self, QuotationRecord};
use crate::core::llm::{self, QuotationRequest};
use crate::core::paths;
use crate::core::quotation::{
    DualQuotationResult, QuotationId, amount_in_words, extract_price, format_currency,
    split_dual_response,
};
use crate::core::render::{Audience, Document, RenderContext, render_dual};

type CliResult = Result<(), Box<dyn Error>>;

/// Read a file, or stdin for `None` / `-`.
pub fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Options for rendering a response outside the TUI.
pub struct RenderRequest<'a> {
    pub audiences: &'a [Audience],
    pub format: ExportFormat,
    pub customer_name: Option<&'a str>,
    pub customer_location: Option<&'a str>,
    pub quotation_id: Option<&'a QuotationId>,
    pub date: NaiveDate,
}

fn render_record_docs(
    config: &Config,
    record: &QuotationRecord,
    audiences: &[Audience],
) -> (DualQuotationResult, Vec<Document>) {
    let dual = record.dual_result();
    let ctx = RenderContext::for_record(record, &config.company);
    let docs = audiences.iter().map(|a| render_dual(&dual, *a, &ctx)).collect();
    (dual, docs)
}

fn print_output(content: &str) -> CliResult {
    let mut out = io::stdout().lock();
    out.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// `parse`: split and parse a response, print the JSON result.
pub fn run_parse(file: Option<&Path>) -> CliResult {
    let raw = read_input(file)?;
    let dual = split_dual_response(&raw);
    print_output(&serde_json::to_string_pretty(&dual)?)
}

/// `render`: print the requested documents of a response.
pub fn run_render(config: &Config, file: Option<&Path>, req: &RenderRequest<'_>) -> CliResult {
    let raw = read_input(file)?;
    let dual = split_dual_response(&raw);
    let ctx = RenderContext::new(req.date, &config.company)
        .with_customer(req.customer_name, req.customer_location)
        .with_quotation_id(req.quotation_id);
    let docs: Vec<Document> = req
        .audiences
        .iter()
        .map(|a| render_dual(&dual, *a, &ctx))
        .collect();
    let refs: Vec<&Document> = docs.iter().collect();
    print_output(&export::export_string(&refs, &dual, req.format)?)
}

/// Parse `--quotation-id`, or generate one for `date`.
pub fn quotation_id_arg(arg: Option<&str>, date: NaiveDate) -> Result<QuotationId, Box<dyn Error>> {
    match arg {
        Some(s) => QuotationId::parse(s)
            .ok_or_else(|| format!("invalid quotation number {s:?}: expected 12 digits").into()),
        None => Ok(QuotationId::generate(date)),
    }
}

pub fn default_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(today)
}

/// Options for `ask`.
pub struct AskOptions<'a> {
    pub query: &'a str,
    pub model: Option<&'a str>,
    pub stream: bool,
    pub customer_name: Option<&'a str>,
    pub customer_location: Option<&'a str>,
    pub save: bool,
}

/// `ask`: request a quotation, print the customer document, save it to history.
/// Streamed text goes to stderr as progress; the rendered document goes to stdout.
pub async fn run_ask(config: &Config, opts: AskOptions<'_>) -> CliResult {
    config.llm()?;
    let query = if opts.query == "-" {
        read_input(None)?
    } else {
        opts.query.to_string()
    };
    let query = query.trim();
    if query.is_empty() {
        return Err("empty query".into());
    }

    let model = opts.model.unwrap_or(&config.model_id);
    let request = QuotationRequest {
        query: query.to_string(),
        customer_name: opts.customer_name.map(String::from),
        customer_location: opts.customer_location.map(String::from),
    };
    let on_chunk: Option<llm::OnContentChunk> = opts.stream.then(|| {
        Box::new(|s: &str| {
            let _ = io::stderr().write_all(s.as_bytes());
            let _ = io::stderr().flush();
        }) as llm::OnContentChunk
    });
    let reply = llm::request_quotation(config, model, &request, opts.stream, on_chunk)
        .await
        .map_err(ask_error)?;
    if opts.stream {
        eprintln!();
    }

    let record = QuotationRecord::from_response(
        query,
        &reply.content,
        opts.customer_name,
        opts.customer_location,
        QuotationId::generate_today(),
    );
    let (dual, docs) = render_record_docs(config, &record, &[Audience::Customer]);
    let refs: Vec<&Document> = docs.iter().collect();
    print_output(&export::export_string(&refs, &dual, ExportFormat::Text)?)?;
    for line in reply_summary(&reply, &dual) {
        eprintln!("{line}");
    }

    if opts.save {
        let saved = history::save_quotation(&record, config.max_quotations)?;
        eprintln!("Saved quotation {} ({})", saved.id, record.title);
    }
    Ok(())
}

/// Rate limits get their own hint: the same request may work a minute later.
fn ask_error(e: llm::ChatError) -> Box<dyn Error> {
    if e.is_rate_limited() {
        return format!("{e}\nThe provider is rate limiting requests; wait a moment and retry.")
            .into();
    }
    e.into()
}

/// Lines for stderr after `ask`: truncation warning, total and token usage.
fn reply_summary(reply: &llm::QuotationReply, dual: &DualQuotationResult) -> Vec<String> {
    let mut lines = Vec::new();
    if reply.truncated {
        lines.push("Warning: the response was truncated; the quotation may be incomplete.".to_string());
    }
    if let Some(customer) = dual.customer.as_ref().filter(|c| c.has_table) {
        lines.push(format!("Total: {}", format_currency(customer.total())));
    }
    let usage = reply.usage;
    if usage.total_tokens > 0 {
        lines.push(format!(
            "Tokens: {} prompt + {} completion = {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        ));
    }
    lines
}

/// `words`: amount in Spanish words.
pub fn run_words(amount: &str) -> CliResult {
    if !amount.chars().any(|c| c.is_ascii_digit()) {
        return Err(format!("invalid amount {amount:?}").into());
    }
    println!("{}", amount_in_words(extract_price(amount)));
    Ok(())
}

/// `id`: print a new quotation number.
pub fn run_id(date: Option<NaiveDate>) -> CliResult {
    println!("{}", QuotationId::generate(default_date(date)));
    Ok(())
}

/// `history list`: saved quotations, newest first.
pub fn run_history_list(limit: Option<usize>, query: Option<&str>) -> CliResult {
    let items = history::list_quotations()?;
    let filtered = history::filter_quotations(&items, query.unwrap_or(""));
    let take = limit.unwrap_or(filtered.len());
    for m in filtered.into_iter().take(take) {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            m.id,
            m.quotation_id.as_deref().unwrap_or("-"),
            m.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            m.title,
            m.customer_name.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// `history show`: render a saved quotation to stdout.
pub fn run_history_show(
    config: &Config,
    id: &str,
    audiences: &[Audience],
    format: ExportFormat,
) -> CliResult {
    let record = history::load_quotation(id)?;
    let (dual, docs) = render_record_docs(config, &record, audiences);
    let refs: Vec<&Document> = docs.iter().collect();
    print_output(&export::export_string(&refs, &dual, format)?)
}

/// `history export`: write a saved quotation to a file.
pub fn run_history_export(
    config: &Config,
    id: &str,
    audiences: &[Audience],
    format: ExportFormat,
    out: Option<&Path>,
) -> CliResult {
    let record = history::load_quotation(id)?;
    let (dual, docs) = render_record_docs(config, &record, audiences);
    let refs: Vec<&Document> = docs.iter().collect();
    let content = export::export_string(&refs, &dual, format)?;
    let label = record.export_label();
    let audience = match audiences {
        [single] => Some(*single),
        _ => None,
    };
    let path = export::write_export(
        &content,
        out,
        &export::file_name(&label, audience, format),
    )?;
    println!("{}", path.display());
    Ok(())
}

pub fn run_history_import(config: &Config, file: &Path) -> CliResult {
    let json = read_input(Some(file))?;
    let count = history::import_history(&json, config.max_quotations)?;
    println!("Imported {} quotation(s)", count);
    Ok(())
}

pub fn run_history_rename(id: &str, title: &str) -> CliResult {
    history::rename_quotation(id, title)?;
    Ok(())
}

pub fn run_history_delete(id: &str) -> CliResult {
    history::delete_quotation(id)?;
    println!("Deleted {}", id);
    Ok(())
}

/// `config`: display paths, model, company profile source, and API key status.
pub fn run_config(config: &Config) {
    let show = |p: Option<std::path::PathBuf>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let model_source = if std::env::var("OPENROUTER_MODEL")
        .ok()
        .filter(|s| !s.is_empty())
        .is_some()
    {
        "from OPENROUTER_MODEL"
    } else {
        "default"
    };
    let company_source = config
        .company_source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| format!("built-in (create {} to override)", paths::COMPANY_FILE));
    let api_key_status = if config.openai_config.is_some() {
        "set ✓"
    } else {
        "not set"
    };

    println!("Config:     {}", show(paths::config_dir()));
    println!("Log (TUI):  {}", show(paths::log_file()));
    println!("Quotations: {}", show(paths::quotations_dir()));
    println!("Exports:    {}", show(paths::exports_dir()));
    println!("Model:      {} ({})", config.model_id, model_source);
    println!("Company:    {} [{}]", config.company.name, company_source);
    println!("Max saved:  {}", config.max_quotations);
    println!("API key:    {}", api_key_status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::{ChatError, QuotationReply, TokenUsage};

    const RESPONSE: &str = "\
<!-- CUSTOMER_QUOTATION_START -->
| Descripción | Importe |
|---|---|
| Cemento gris | $100.00 |
| Arena de río | $50.50 |
<!-- CUSTOMER_QUOTATION_END -->";

    fn reply(truncated: bool, total_tokens: u64) -> QuotationReply {
        QuotationReply {
            content: RESPONSE.to_string(),
            usage: TokenUsage {
                prompt_tokens: total_tokens / 2,
                completion_tokens: total_tokens - total_tokens / 2,
                total_tokens,
            },
            truncated,
        }
    }

    #[test]
    fn summary_reports_total_and_usage() {
        let dual = split_dual_response(RESPONSE);
        let lines = reply_summary(&reply(false, 1200), &dual);
        assert_eq!(
            lines,
            vec![
                "Total: $150.50".to_string(),
                "Tokens: 600 prompt + 600 completion = 1200".to_string(),
            ]
        );
    }

    #[test]
    fn summary_warns_on_truncation_and_skips_missing_usage() {
        let dual = split_dual_response("sin marcadores");
        let lines = reply_summary(&reply(true, 0), &dual);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("truncated"));
    }

    #[test]
    fn rate_limit_error_gets_retry_hint() {
        let err = ask_error(ChatError::RateLimited("429 Too Many Requests".into()));
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("retry"));

        let err = ask_error(ChatError::EmptyResponse);
        assert_eq!(err.to_string(), ChatError::EmptyResponse.to_string());
    }
}
