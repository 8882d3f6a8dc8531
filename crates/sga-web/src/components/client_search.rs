use sga_shared::Transport;
use sga_shared::dispatch::CONNECTION_ERROR_MESSAGE;
use sga_shared::client::{ClientForm, ClientSummary, search_request};
use web_sys::HtmlInputElement;
use yew::{Callback, Html, TargetCast, function_component, html, use_state};

use super::ClientEditForm;
use crate::api::FetchTransport;
use crate::app::ui_debug;

/// Client picker of the "criar processo" page: search, pick, register a
/// new client, and edit the picked client in place. The pick lands in the hidden
/// `selected_cliente_id` input the server form reads.
#[function_component(ClientSearch)]
pub fn client_search() -> Html {
    let term = use_state(String::new);
    let results = use_state(|| None::<Vec<ClientForm>>);
    let selected = use_state(|| None::<ClientForm>);
    let editing = use_state(|| false);
    let creating = use_state(|| false);
    let transport = use_state(FetchTransport::from_page);

    let on_term = {
        let term = term.clone();
        Callback::from(move |e: yew::InputEvent| {
            term.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_search = {
        let term = term.clone();
        let results = results.clone();
        let transport = (*transport).clone();
        Callback::from(move |_: yew::MouseEvent| {
            let request = match search_request(&term) {
                Ok(request) => request,
                Err(err) => {
                    ui_debug("client.search.skip", &err.to_string());
                    return;
                }
            };
            let results = results.clone();
            let transport = transport.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match transport.send(&request).await {
                    Ok(envelope) => {
                        let found: Vec<ClientForm> =
                            envelope.field_as("results").unwrap_or_default();
                        ui_debug("client.search.ok", &format!("{} result(s)", found.len()));
                        results.set(Some(found));
                    }
                    Err(err) => {
                        tracing::error!(error = %format!("{err:#}"), "client search failed");
                        gloo::dialogs::alert(CONNECTION_ERROR_MESSAGE);
                    }
                }
            });
        })
    };

    let pick = {
        let selected = selected.clone();
        let results = results.clone();
        let editing = editing.clone();
        let creating = creating.clone();
        Callback::from(move |client: ClientForm| {
            selected.set(Some(client));
            results.set(None);
            editing.set(false);
            creating.set(false);
        })
    };

    let clear = {
        let selected = selected.clone();
        let term = term.clone();
        Callback::from(move |_: yew::MouseEvent| {
            selected.set(None);
            term.set(String::new());
        })
    };

    let hidden_id = (*selected)
        .as_ref()
        .map(|client| client.id.to_string())
        .unwrap_or_default();

    let on_new = {
        let creating = creating.clone();
        Callback::from(move |_: yew::MouseEvent| creating.set(true))
    };

    let body = match (*selected).clone() {
        None if *creating => {
            let on_cancel = {
                let creating = creating.clone();
                Callback::from(move |_| creating.set(false))
            };
            html! {
                <ClientEditForm initial={ClientForm::default()} on_saved={pick.clone()} on_cancel={Some(on_cancel)} />
            }
        }
        Some(client) if *editing => {
            let on_cancel = {
                let editing = editing.clone();
                Callback::from(move |_| editing.set(false))
            };
            html! {
                <ClientEditForm initial={client} on_saved={pick.clone()} on_cancel={Some(on_cancel)} />
            }
        }
        Some(client) => {
            let on_edit = {
                let editing = editing.clone();
                Callback::from(move |_: yew::MouseEvent| editing.set(true))
            };
            html! {
                <div id="card-cliente-selecionado" class="card">
                    <div class="card-body">
                        <h6 id="card-nome" class="card-title">{ &client.nome }</h6>
                        <div id="card-ac" class="small text-muted">{ &client.responsavel }</div>
                        <div id="card-endereco" class="small">
                            { format!("{}, {} - {}/{}", client.logradouro, client.numero, client.cidade, client.estado) }
                        </div>
                        <div id="card-cep" class="small font-monospace">{ &client.cep }</div>
                        <div class="mt-2 d-flex gap-2">
                            <button id="btn-editar-cliente" type="button" class="btn btn-sm btn-outline-primary" onclick={on_edit}>
                                { "Editar" }
                            </button>
                            <button type="button" class="btn btn-sm btn-outline-secondary" onclick={clear}>
                                { "Trocar cliente" }
                            </button>
                        </div>
                    </div>
                </div>
            }
        }
        None => html! {
            <div id="area-busca">
                <div class="input-group">
                    <input
                        id="cliente-search"
                        class="form-control"
                        placeholder="Buscar cliente por nome"
                        value={(*term).clone()}
                        oninput={on_term}
                    />
                    <button id="btn-search" type="button" class="btn btn-outline-primary" onclick={on_search}>
                        { "Buscar" }
                    </button>
                    <button id="btn-novo-cliente" type="button" class="btn btn-outline-success" onclick={on_new}>
                        { "Novo cliente" }
                    </button>
                </div>
                { results_view(&results, &pick) }
            </div>
        },
    };

    html! {
        <>
            <input type="hidden" id="selected_cliente_id" name="cliente" value={hidden_id} />
            { body }
        </>
    }
}

fn results_view(results: &Option<Vec<ClientForm>>, pick: &Callback<ClientForm>) -> Html {
    let Some(found) = results else {
        return html! {};
    };
    if found.is_empty() {
        return html! {
            <div id="search-results" class="list-group mt-2">
                <div class="list-group-item">{ "Nenhum cliente encontrado." }</div>
            </div>
        };
    }
    html! {
        <div id="search-results" class="list-group mt-2">
            { for found.iter().map(|client| {
                let summary = ClientSummary::from(client);
                let pick = pick.clone();
                let client = client.clone();
                html! {
                    <a
                        class="list-group-item list-group-item-action result-item"
                        onclick={move |_| pick.emit(client.clone())}
                    >
                        <strong>{ summary.nome }</strong>
                        <small>{ format!(" ({}/{})", summary.cidade, summary.estado) }</small>
                    </a>
                }
            }) }
        </div>
    }
}
