mod api;
mod app;
mod components;

use sga_shared::ProcessRow;
use sga_shared::chart::{
  ChartSeries,
  StatusDistribution
};
use sga_shared::client::ClientForm;
use yew::Callback;

use crate::app::page::{
  self,
  CHART_DATA_SCRIPT,
  CHART_LABELS_SCRIPT,
  CLIENT_FORM_ROOT,
  CLIENT_SCRIPT,
  CLIENT_SEARCH_ROOT,
  DASHBOARD_ROOT,
  DETAIL_ROOT,
  PROCESS_LIST_ROOT,
  ROWS_SCRIPT,
  STATUS_CHART_ROOT,
  STATUS_COLORS_SCRIPT,
  STATUS_DATA_SCRIPT,
  STATUS_LABELS_SCRIPT
};
use crate::app::{
  App,
  AppProps
};
use crate::components::{
  ClientEditForm,
  ClientEditFormProps,
  ClientSearch,
  DetailActions,
  DetailActionsProps,
  StatusChart,
  StatusChartProps,
  WeeklyChart,
  WeeklyChartProps
};

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting SGA frontend"
  );

  let mut mounted = 0;

  if let Some(root) =
    page::element_by_id(PROCESS_LIST_ROOT)
  {
    let rows: Vec<ProcessRow> =
      page::embedded_json(ROWS_SCRIPT)
        .unwrap_or_default();
    tracing::info!(
      rows = rows.len(),
      "mounting process table"
    );
    yew::Renderer::<App>::with_root_and_props(
      root,
      AppProps { rows }
    )
    .render();
    mounted += 1;
  }

  if let Some(root) =
    page::element_by_id(DETAIL_ROOT)
  {
    match page::attr_u64(
      &root,
      "data-processo-pk"
    ) {
      | Some(pk) => {
        yew::Renderer::<DetailActions>::with_root_and_props(
          root,
          DetailActionsProps { pk }
        )
        .render();
        mounted += 1;
      }
      | None => tracing::error!(
        "detail mount has no data-processo-pk"
      )
    }
  }

  if let Some(root) =
    page::element_by_id(DASHBOARD_ROOT)
  {
    let labels = page::embedded_text(
      CHART_LABELS_SCRIPT
    )
    .unwrap_or_else(|| "[]".to_string());
    let values = page::embedded_text(
      CHART_DATA_SCRIPT
    )
    .unwrap_or_else(|| "[]".to_string());
    match ChartSeries::from_embedded(
      &labels, &values
    ) {
      | Ok(series) => {
        yew::Renderer::<WeeklyChart>::with_root_and_props(
          root,
          WeeklyChartProps { series }
        )
        .render();
        mounted += 1;
      }
      | Err(err) => tracing::error!(
        error = %format!("{err:#}"),
        "dashboard chart skipped"
      )
    }
  }

  if let Some(root) =
    page::element_by_id(STATUS_CHART_ROOT)
  {
    let script = |id: &str| {
      page::embedded_text(id)
        .unwrap_or_else(|| "[]".to_string())
    };
    match StatusDistribution::from_embedded(
      &script(STATUS_LABELS_SCRIPT),
      &script(STATUS_DATA_SCRIPT),
      &script(STATUS_COLORS_SCRIPT)
    ) {
      | Ok(chart) => {
        yew::Renderer::<StatusChart>::with_root_and_props(
          root,
          StatusChartProps { chart }
        )
        .render();
        mounted += 1;
      }
      | Err(err) => tracing::error!(
        error = %format!("{err:#}"),
        "status chart skipped"
      )
    }
  }

  if let Some(root) =
    page::element_by_id(CLIENT_SEARCH_ROOT)
  {
    yew::Renderer::<ClientSearch>::with_root(
      root
    )
    .render();
    mounted += 1;
  }

  if let Some(root) =
    page::element_by_id(CLIENT_FORM_ROOT)
  {
    let initial: ClientForm =
      page::embedded_json(CLIENT_SCRIPT)
        .unwrap_or_default();
    yew::Renderer::<ClientEditForm>::with_root_and_props(
      root,
      ClientEditFormProps {
        initial,
        on_saved: Callback::from(
          |saved: ClientForm| {
            app::ui_debug(
              "client.page.saved",
              &saved.nome
            );
            gloo::dialogs::alert(
              "Cliente atualizado."
            );
          }
        ),
        on_cancel: None
      }
    )
    .render();
    mounted += 1;
  }

  if mounted == 0 {
    tracing::warn!(
      "no SGA mount point on this page"
    );
  }
}
