use super::traits::ImageAnalyzer;
use crate::{
    domain::drawing::entity::{AnalysisRecord, DictOfVars},
    infrastructure::imaging::compositor::NormalizedDrawing,
};
use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Solves hand-drawn math by sending the drawing to a Gemini vision model.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiAnalyzer {
    pub fn new(
        api_key: String,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageAnalyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        drawing: &NormalizedDrawing,
        dict_of_vars: &DictOfVars,
    ) -> anyhow::Result<Vec<AnalysisRecord>> {
        let body = request_body(drawing, dict_of_vars);

        let res = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            bail!("Gemini returned {}: {}", status, text.trim());
        }

        let payload: GenerateContentResponse =
            res.json().await.context("Gemini response was not valid JSON")?;
        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("Gemini returned no candidates"))?;

        tracing::debug!(answer = %text, "Gemini answered");
        parse_analysis_text(&text)
    }
}

/// `generateContent` payload carrying the prompt and the snapshot PNG inline.
pub fn request_body(drawing: &NormalizedDrawing, dict_of_vars: &DictOfVars) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": build_prompt(dict_of_vars) },
                { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(&drawing.png) } }
            ]
        }],
        "generationConfig": { "responseMimeType": "application/json" }
    })
}

/// Instructions sent with every drawing. `dict_of_vars` is embedded as JSON so
/// previously assigned variables can be substituted.
pub fn build_prompt(dict_of_vars: &DictOfVars) -> String {
    let vars = serde_json::to_string(dict_of_vars).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are given an image of something drawn by hand: a mathematical expression, \
an equation, a set of variable assignments, a graphical word problem or an abstract concept. \
Work out what it shows and answer it.\n\
Use PEMDAS for arithmetic. For an equation, solve for every unknown and return one entry per \
variable. For an assignment such as `x = 4`, return the variable as `expr`, its value as \
`result` and set `assign` to true. For a drawing of a situation or concept, describe it briefly \
in `expr` and give the answer or concept in `result`.\n\
Variables defined earlier, as a JSON object: {vars}. Substitute them wherever they appear.\n\
Reply with a JSON list only, no prose and no Markdown, where every element has the form \
{{\"expr\": string, \"result\": string, \"assign\": boolean}}."
    )
}

/// Parses the model's text answer into records.
///
/// Accepts an optional Markdown code fence around the JSON and a single
/// object in place of a list.
pub fn parse_analysis_text(text: &str) -> anyhow::Result<Vec<AnalysisRecord>> {
    let body = strip_code_fence(text);
    let value: Value = serde_json::from_str(body)
        .with_context(|| format!("analyzer answer is not JSON: {}", body))?;
    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => bail!("unexpected analyzer answer: {}", other),
    };
    items.into_iter().map(record_from_value).collect()
}

fn record_from_value(value: Value) -> anyhow::Result<AnalysisRecord> {
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("analyzer record is not an object: {}", value))?;
    let field = |key: &str| -> anyhow::Result<String> {
        match object.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            None | Some(Value::Null) => bail!("analyzer record is missing `{}`", key),
            Some(other) => Ok(other.to_string()),
        }
    };
    let assign = match object.get("assign") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    };
    Ok(AnalysisRecord {
        expr: field("expr")?,
        result: field("result")?,
        assign,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    match rest.split_once('\n') {
        Some((tag, body)) if !tag.trim_start().starts_with(['[', '{']) => body.trim(),
        _ => rest.trim(),
    }
}
