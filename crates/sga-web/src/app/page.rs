use serde::de::DeserializeOwned;
use web_sys::Element;

use super::ui_debug;

/// Mount points the server templates may render. Pages carry at most a
/// few of them.
pub const PROCESS_LIST_ROOT: &str = "sga-processos";
pub const DETAIL_ROOT: &str = "sga-detalhe";
pub const DASHBOARD_ROOT: &str = "sga-dashboard";
pub const STATUS_CHART_ROOT: &str = "sga-dashboard-status";
pub const CLIENT_FORM_ROOT: &str = "sga-cliente";
pub const CLIENT_SEARCH_ROOT: &str = "sga-busca-clientes";

pub const ROWS_SCRIPT: &str = "processos-data";
pub const CHART_LABELS_SCRIPT: &str = "weeklyLabels";
pub const CHART_DATA_SCRIPT: &str = "weeklyData";
pub const STATUS_LABELS_SCRIPT: &str = "statusLabels";
pub const STATUS_DATA_SCRIPT: &str = "statusData";
pub const STATUS_COLORS_SCRIPT: &str = "statusColors";
pub const CLIENT_SCRIPT: &str = "cliente-data";

pub fn element_by_id(id: &str) -> Option<Element> {
  web_sys::window()?
    .document()?
    .get_element_by_id(id)
}

/// Raw text of a `<script type="application/json">` block.
pub fn embedded_text(
  id: &str
) -> Option<String> {
  element_by_id(id)?.text_content()
}

pub fn embedded_json<T: DeserializeOwned>(
  id: &str
) -> Option<T> {
  let text = embedded_text(id)?;
  match serde_json::from_str(&text) {
    | Ok(value) => Some(value),
    | Err(err) => {
      tracing::error!(script = id, error = %err, "embedded JSON did not parse");
      None
    }
  }
}

pub fn attr_u64(
  element: &Element,
  name: &str
) -> Option<u64> {
  element
    .get_attribute(name)?
    .trim()
    .parse()
    .ok()
}

pub fn location_search() -> String {
  web_sys::window()
    .and_then(|window| {
      window.location().search().ok()
    })
    .unwrap_or_default()
}

pub fn location_path() -> String {
  web_sys::window()
    .and_then(|window| {
      window.location().pathname().ok()
    })
    .unwrap_or_default()
}

pub fn navigate(url: &str) {
  ui_debug("page.navigate", url);
  if let Some(window) = web_sys::window()
    && let Err(err) =
      window.location().set_href(url)
  {
    tracing::error!(?err, "navigation failed");
  }
}
