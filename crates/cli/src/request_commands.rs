use std::sync::Arc;

use {
    anyhow::{Context, Result},
    clap::Args,
    forum_alerts::{AlertQueue, AlertStack, report_api_errors},
    forum_gateway::{Method, RequestError, RequestGateway, RequestSpec},
    tracing::debug,
};

#[derive(Args)]
pub struct RequestArgs {
    /// URL, absolute or relative to `http.base_url`.
    url: String,

    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request parameter as `key=value` (repeatable). Values that parse as
    /// JSON are sent as JSON, anything else as a string.
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, serde_json::Value)>,

    /// Extra header as `Name: value` (repeatable).
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Pretty-print the response body as JSON.
    #[arg(long)]
    json: bool,
}

pub async fn handle_request(args: RequestArgs) -> Result<()> {
    let config = forum_config::discover_and_load();
    let alerts = Arc::new(AlertStack::new());
    let gateway = RequestGateway::from_config(&config, alerts.clone())
        .context("failed to build HTTP client")?;

    let spec = build_spec(&args)?;
    debug!(method = %spec.method, url = %spec.url, "sending request");

    match gateway.send(spec).await {
        Ok(body) => {
            print_body(body.as_deref(), args.json)?;
            Ok(())
        },
        Err(e) => {
            surface_api_errors(&*alerts, &e);
            print_alerts(&*alerts);
            Err(e.into())
        },
    }
}

fn build_spec(args: &RequestArgs) -> Result<RequestSpec> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method: {}", args.method))?;

    let mut spec = RequestSpec::new(method, args.url.clone());
    if !args.params.is_empty() {
        let params: serde_json::Map<_, _> = args.params.iter().cloned().collect();
        spec = spec.with_params(serde_json::Value::Object(params));
    }
    for (name, value) in &args.headers {
        spec = spec.with_header(name.clone(), value.clone());
    }
    Ok(spec)
}

/// Validation failures come back as a JSON:API error document; show each
/// error as an alert like the web client does.
fn surface_api_errors(alerts: &dyn AlertQueue, error: &RequestError) {
    if error.is_server_fault() {
        return;
    }
    if let Some(body) = error.body()
        && let Ok(document) = serde_json::from_str::<serde_json::Value>(body)
        && document.get("errors").is_some()
    {
        report_api_errors(alerts, &document);
    }
}

fn print_alerts(alerts: &dyn AlertQueue) {
    for (_, alert) in alerts.visible() {
        eprintln!("[{}] {}", alert.level, alert.message);
    }
}

fn print_body(body: Option<&str>, json: bool) -> Result<()> {
    let Some(body) = body else {
        println!("(empty response)");
        return Ok(());
    };
    if json {
        let value: serde_json::Value =
            serde_json::from_str(body).context("response is not valid JSON")?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{body}");
    }
    Ok(())
}

fn parse_param(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in `{raw}`"));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.into()));
    Ok((key.to_string(), value))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
