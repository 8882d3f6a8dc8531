use sga_shared::shipping::{
  DetailTab,
  TRACKING_REFRESH_BUSY_LABEL,
  decode_quotes,
  quote_request,
  timeline_location,
  tracking_refresh
};
use sga_shared::{
  DispatchOutcome,
  Dispatcher,
  ShippingQuote,
  Transport
};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_state
};

use crate::api::FetchTransport;
use crate::app::page::{
  element_by_id,
  location_path,
  location_search,
  navigate
};
use crate::app::ui_debug;

const TIMELINE_TAB_BUTTON: &str =
  "timeline-tab";
const TRACKING_CONNECTION_ERROR: &str =
  "Erro de conexão ao tentar atualizar \
   os Correios.";

#[derive(Properties, PartialEq)]
pub struct DetailActionsProps {
  pub pk: u64
}

/// Detail page extras: deep link to the
/// timeline tab, the tracking refresh
/// button and the shipping quote.
#[function_component(DetailActions)]
pub fn detail_actions(
  props: &DetailActionsProps
) -> Html {
  let refreshing = use_state(|| false);
  let quotes =
    use_state(|| None::<Vec<ShippingQuote>>);
  let quoting = use_state(|| false);
  let dispatcher =
    use_state(Dispatcher::new);
  let transport =
    use_state(FetchTransport::from_page);

  use_effect_with((), |_| {
    if DetailTab::from_query(
      &location_search()
    ) == DetailTab::Timeline
    {
      open_timeline_tab();
    }
  });

  let on_refresh = {
    let refreshing = refreshing.clone();
    let dispatcher = (*dispatcher).clone();
    let transport = (*transport).clone();
    let pk = props.pk;
    Callback::from(
      move |e: yew::MouseEvent| {
        e.prevent_default();
        refreshing.set(true);
        let refreshing = refreshing.clone();
        let dispatcher = dispatcher.clone();
        let transport = transport.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let outcome = dispatcher
              .dispatch(
                &transport,
                tracking_refresh(pk)
              )
              .await;
            match outcome {
              | DispatchOutcome::Applied {
                ..
              } => {
                navigate(&timeline_location(
                  &location_path()
                ));
                return;
              }
              | DispatchOutcome::Info(message) => {
                gloo::dialogs::alert(&message);
              }
              | DispatchOutcome::Rejected(
                message
              ) => {
                gloo::dialogs::alert(
                  &format!("Aviso: {message}")
                );
              }
              | DispatchOutcome::ConnectionFailed => {
                gloo::dialogs::alert(
                  TRACKING_CONNECTION_ERROR
                );
              }
              | DispatchOutcome::Busy => {}
            }
            refreshing.set(false);
          }
        );
      }
    )
  };

  let on_quote = {
    let quotes = quotes.clone();
    let quoting = quoting.clone();
    let transport = (*transport).clone();
    let pk = props.pk;
    Callback::from(
      move |_: yew::MouseEvent| {
        quoting.set(true);
        let quotes = quotes.clone();
        let quoting = quoting.clone();
        let transport = transport.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let result = match transport
              .send(&quote_request(pk))
              .await
            {
              | Ok(envelope) => {
                decode_quotes(&envelope)
              }
              | Err(err) => Err(err)
            };
            quoting.set(false);
            match result {
              | Ok(found) => {
                ui_debug(
                  "quote.ok",
                  &format!(
                    "{} service(s)",
                    found.len()
                  )
                );
                quotes.set(Some(found));
              }
              | Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "quote failed");
                gloo::dialogs::alert(
                  &err.to_string()
                );
              }
            }
          }
        );
      }
    )
  };

  let refresh_label = if *refreshing {
    TRACKING_REFRESH_BUSY_LABEL
  } else {
    "Atualizar rastreio"
  };

  html! {
      <div class="d-flex flex-column gap-3">
          <div class="d-flex gap-2">
              <button
                  id="btn-update-tracking"
                  type="button"
                  class="btn btn-outline-primary"
                  disabled={*refreshing}
                  onclick={on_refresh}
              >
                  if *refreshing {
                      <span class="spinner-border spinner-border-sm me-1" role="status"></span>
                  }
                  { refresh_label }
              </button>
              <button
                  type="button"
                  class="btn btn-outline-secondary"
                  disabled={*quoting}
                  onclick={on_quote}
              >
                  { if *quoting { "Cotando..." } else { "Cotar frete" } }
              </button>
          </div>
          { quote_table(&quotes) }
      </div>
  }
}

fn quote_table(
  quotes: &Option<Vec<ShippingQuote>>
) -> Html {
  let Some(quotes) = quotes else {
    return html! {};
  };
  if quotes.is_empty() {
    return html! {
        <div class="text-muted small">{ "Nenhuma opção de frete disponível." }</div>
    };
  }
  html! {
      <table class="table table-sm">
          <thead>
              <tr>
                  <th>{ "Serviço" }</th>
                  <th>{ "Prazo" }</th>
                  <th>{ "Preço" }</th>
                  <th>{ "Entrega prevista" }</th>
              </tr>
          </thead>
          <tbody>
              { for quotes.iter().map(|quote| html! {
                  <tr>
                      <td>{ quote.service.clone() }</td>
                      <td>{ format!("{} dia(s)", quote.days) }</td>
                      <td>{ format!("R$ {:.2}", quote.price).replace('.', ",") }</td>
                      <td>{ quote.expected_delivery.clone() }</td>
                  </tr>
              }) }
          </tbody>
      </table>
  }
}

fn open_timeline_tab() {
  let Some(button) =
    element_by_id(TIMELINE_TAB_BUTTON)
  else {
    return;
  };
  ui_debug(
    "detail.tab",
    "opening timeline from query"
  );
  button.scroll_into_view();
  if let Ok(button) =
    button.dyn_into::<HtmlElement>()
  {
    button.click();
  }
}
