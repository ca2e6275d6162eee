use anyhow::{Context, anyhow};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::client::{
    Analysis, AnalysisId, AnalysisStatus, AssetDatabase, CalculationMode, Element, ElementId,
    ElementTemplate, OutputBinding, TemplateId,
};
use crate::settings::ConnectionConfig;
use crate::time_range::TimeRange;

/// Blocking JSON adapter from the `AssetDatabase` trait to the asset web
/// API. Pure translation: no retries, no caching; transient failures abort
/// the invocation.
pub struct WebApiClient {
    api_base: String,
    server: String,
    database: String,
}

impl WebApiClient {
    pub fn from_config(config: &ConnectionConfig) -> anyhow::Result<Self> {
        let api_base = config.api_base.clone().ok_or_else(|| {
            anyhow!(
                "no web API base configured\nSuggestions:\n  - pass --api-base\n  - set ANALYSIS_ADMIN_API_BASE\n  - set api_base in settings.json"
            )
        })?;
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            server: config.server.clone().unwrap_or_else(|| "default".to_string()),
            database: config
                .database
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        })
    }

    fn database_url(&self, suffix: &str) -> String {
        format!(
            "{}/servers/{}/databases/{}/{}",
            self.api_base, self.server, self.database, suffix
        )
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let mut request = ureq::get(url);
        for (key, value) in query {
            request = request.query(*key, value);
        }
        let mut response = request
            .call()
            .map_err(|err| anyhow!("GET {url} failed: {err}"))?;
        let raw = response
            .body_mut()
            .read_to_string()
            .map_err(|err| anyhow!("read response from {url}: {err}"))?;
        serde_json::from_str(&raw).with_context(|| format!("decode response from {url}"))
    }
}

#[derive(Debug, Deserialize)]
struct Items<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ElementDto {
    id: String,
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    template: Option<String>,
}

impl From<ElementDto> for Element {
    fn from(dto: ElementDto) -> Self {
        Element {
            id: ElementId::new(dto.id),
            name: dto.name,
            parent: dto.parent.map(ElementId::new),
            template: dto.template.map(TemplateId::new),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TemplateDto {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnalysisDto {
    id: String,
    name: String,
    target: String,
    status: String,
}

impl From<AnalysisDto> for Analysis {
    fn from(dto: AnalysisDto) -> Self {
        let status = match dto.status.as_str() {
            "enabled" => AnalysisStatus::Enabled,
            "disabled" => AnalysisStatus::Disabled,
            "suspended" => AnalysisStatus::Suspended,
            _ => AnalysisStatus::Error,
        };
        Analysis {
            id: AnalysisId::new(dto.id),
            name: dto.name,
            target: ElementId::new(dto.target),
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutputDto {
    #[serde(default)]
    point: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl From<OutputDto> for OutputBinding {
    fn from(dto: OutputDto) -> Self {
        match (dto.point, dto.error) {
            (_, Some(reason)) => OutputBinding::ResolveFailed(reason),
            (Some(point), None) => OutputBinding::Point(point),
            (None, None) => OutputBinding::Unbound,
        }
    }
}

impl AssetDatabase for WebApiClient {
    fn server_name(&self) -> &str {
        &self.server
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    fn find_elements(
        &self,
        root: Option<&ElementId>,
        name_mask: &str,
        recurse: bool,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<Element>> {
        let mut query = vec![
            ("mask", name_mask.to_string()),
            ("recurse", recurse.to_string()),
            ("sort", "name".to_string()),
        ];
        if let Some(root) = root {
            query.push(("root", root.as_str().to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        let found: Items<ElementDto> = self.get_json(&self.database_url("elements"), &query)?;
        Ok(found.items.into_iter().map(Element::from).collect())
    }

    fn find_element_templates(&self, name_mask: &str) -> anyhow::Result<Vec<ElementTemplate>> {
        let query = [("mask", name_mask.to_string()), ("sort", "name".to_string())];
        let found: Items<TemplateDto> = self.get_json(&self.database_url("templates"), &query)?;
        Ok(found
            .items
            .into_iter()
            .map(|dto| ElementTemplate {
                id: TemplateId::new(dto.id),
                name: dto.name,
            })
            .collect())
    }

    fn find_analyses(&self, name_mask: Option<&str>) -> anyhow::Result<Vec<Analysis>> {
        let mut query = vec![("sort", "name".to_string())];
        if let Some(mask) = name_mask {
            query.push(("mask", mask.to_string()));
        }
        let found: Items<AnalysisDto> = self.get_json(&self.database_url("analyses"), &query)?;
        Ok(found.items.into_iter().map(Analysis::from).collect())
    }

    fn element_by_id(&self, id: &ElementId) -> anyhow::Result<Option<Element>> {
        let url = self.database_url(&format!("elements/{}", id.as_str()));
        match ureq::get(&url).call() {
            Ok(mut response) => {
                let raw = response
                    .body_mut()
                    .read_to_string()
                    .map_err(|err| anyhow!("read response from {url}: {err}"))?;
                let dto: ElementDto = serde_json::from_str(&raw)
                    .with_context(|| format!("decode response from {url}"))?;
                Ok(Some(Element::from(dto)))
            }
            Err(ureq::Error::StatusCode(404)) => Ok(None),
            Err(err) => Err(anyhow!("GET {url} failed: {err}")),
        }
    }

    fn resolved_outputs(&self, analysis: &AnalysisId) -> anyhow::Result<Vec<OutputBinding>> {
        let url = self.database_url(&format!("analyses/{}/outputs", analysis.as_str()));
        let found: Items<OutputDto> = self.get_json(&url, &[])?;
        Ok(found.items.into_iter().map(OutputBinding::from).collect())
    }

    fn queue_calculation(
        &self,
        analyses: &[AnalysisId],
        range: &TimeRange,
        mode: CalculationMode,
    ) -> anyhow::Result<()> {
        let url = self.database_url("calculations");
        let body = json!({
            "analyses": analyses.iter().map(AnalysisId::as_str).collect::<Vec<_>>(),
            "start": range.start.to_rfc3339(),
            "end": range.end.to_rfc3339(),
            "mode": mode.wire_name(),
        });
        ureq::post(&url)
            .header("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|err| anyhow!("POST {url} failed: {err}"))?;
        Ok(())
    }
}
