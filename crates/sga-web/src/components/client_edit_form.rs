use std::rc::Rc;

use sga_shared::client::ClientForm;
use sga_shared::zipcode::{AddressFields, BlurAction, ZipcodeState, on_blur, on_response};
use sga_shared::{DispatchOutcome, Dispatcher, RecordPatch, Transport};
use web_sys::HtmlInputElement;
use yew::{
    Callback, Html, Properties, Reducible, TargetCast, function_component, html, use_reducer,
    use_state,
};

use super::ZipcodeField;
use crate::api::FetchTransport;
use crate::app::ui_debug;

const CREATE_CONNECTION_ERROR: &str = "Erro de comunicação com o servidor.";

#[derive(Properties, PartialEq)]
pub struct ClientEditFormProps {
    /// A form with id 0 registers a new client.
    pub initial: ClientForm,
    pub on_saved: Callback<ClientForm>,
    #[prop_or_default]
    pub on_cancel: Option<Callback<()>>,
}

/// Form fields plus the CEP lookup state. Updates go through the reducer
/// so a lookup that finishes late patches the form as it is then.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormModel {
    pub form: ClientForm,
    pub zipcode: ZipcodeState,
}

pub enum FormAction {
    Field { name: &'static str, value: String },
    CepTyped(String),
    Zipcode(ZipcodeState),
}

impl Reducible for FormModel {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            FormAction::Field { name, value } => {
                if let Err(err) = next.form.set_field(name, &value) {
                    tracing::warn!(error = %err, "client form input ignored");
                    return self;
                }
            }
            FormAction::CepTyped(value) => {
                next.form.cep = value;
                next.zipcode = ZipcodeState::Editing;
            }
            FormAction::Zipcode(state) => {
                fill_address(&mut next.form, &state);
                next.zipcode = state;
            }
        }
        Rc::new(next)
    }
}

#[function_component(ClientEditForm)]
pub fn client_edit_form(props: &ClientEditFormProps) -> Html {
    let model = {
        let initial = props.initial.clone();
        use_reducer(move || FormModel {
            form: initial,
            zipcode: ZipcodeState::default(),
        })
    };
    let busy = use_state(|| false);
    let error = use_state(|| None::<String>);
    let dispatcher = use_state(Dispatcher::new);
    let transport = use_state(FetchTransport::from_page);
    let creating = props.initial.is_new();
    let id_prefix = if creating { "novo" } else { "edit" };

    let text_input = |name: &'static str, label: &'static str, required: bool| {
        let value = model.form.field(name).unwrap_or_default().to_string();
        let oninput = {
            let model = model.clone();
            Callback::from(move |e: yew::InputEvent| {
                model.dispatch(FormAction::Field {
                    name,
                    value: e.target_unchecked_into::<HtmlInputElement>().value(),
                });
            })
        };
        html! {
            <div class="mb-3">
                <label class="form-label" for={format!("{id_prefix}-{name}")}>{ label }</label>
                <input
                    id={format!("{id_prefix}-{name}")}
                    name={name}
                    class="form-control"
                    required={required}
                    value={value}
                    oninput={oninput}
                />
            </div>
        }
    };

    let on_cep_input = {
        let model = model.clone();
        Callback::from(move |value: String| model.dispatch(FormAction::CepTyped(value)))
    };

    let on_cep_blur = {
        let model = model.clone();
        let transport = (*transport).clone();
        Callback::from(move |raw: String| match on_blur(&raw) {
            BlurAction::Ignore => {}
            BlurAction::Reject(state) => model.dispatch(FormAction::Zipcode(state)),
            BlurAction::Lookup(request) => {
                model.dispatch(FormAction::Zipcode(ZipcodeState::Loading));
                let model = model.clone();
                let transport = transport.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let state = match transport.send(&request).await {
                        Ok(envelope) => on_response(&envelope),
                        Err(err) => {
                            tracing::error!(error = %format!("{err:#}"), "Erro busca CEP");
                            ZipcodeState::ConnectionError
                        }
                    };
                    model.dispatch(FormAction::Zipcode(state));
                });
            }
        })
    };

    let on_submit = {
        let model = model.clone();
        let busy = busy.clone();
        let error = error.clone();
        let dispatcher = (*dispatcher).clone();
        let transport = (*transport).clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |e: yew::SubmitEvent| {
            e.prevent_default();
            let built = if creating {
                model.form.create_mutation(&model.zipcode)
            } else {
                model.form.edit_mutation(&model.zipcode)
            };
            let mutation = match built {
                Ok(mutation) => mutation,
                Err(err) => {
                    ui_debug("client.form.invalid", &err.to_string());
                    if model.zipcode.is_invalid() {
                        gloo::dialogs::alert(&err.to_string());
                    }
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            busy.set(true);
            error.set(None);
            let busy = busy.clone();
            let error = error.clone();
            let dispatcher = dispatcher.clone();
            let transport = transport.clone();
            let on_saved = on_saved.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = dispatcher.dispatch(&transport, mutation).await;
                busy.set(false);
                match outcome {
                    DispatchOutcome::Applied {
                        patch: RecordPatch::Client(saved),
                        ..
                    } => {
                        ui_debug("client.form.ok", &saved.nome);
                        on_saved.emit(saved);
                    }
                    DispatchOutcome::Busy => {}
                    DispatchOutcome::ConnectionFailed if creating => {
                        gloo::dialogs::alert(CREATE_CONNECTION_ERROR);
                        error.set(Some(CREATE_CONNECTION_ERROR.to_string()));
                    }
                    other => {
                        if let Some(text) = other.alert_text() {
                            let prefix = if creating { "Erro" } else { "Erro ao editar" };
                            gloo::dialogs::alert(&format!("{prefix}: {text}"));
                            error.set(Some(text));
                        }
                    }
                }
            });
        })
    };

    let submit_disabled = *busy || !model.zipcode.submit_enabled();
    let on_cancel = props.on_cancel.clone();
    let (form_id, submit_id, submit_label) = if creating {
        ("formNovoCliente", "btn-salvar-novo", "Salvar cliente")
    } else {
        ("formEditarCliente", "btn-salvar-edicao", "Salvar alterações")
    };

    html! {
        <form id={form_id} onsubmit={on_submit}>
            { text_input("nome", "Nome", true) }
            { text_input("responsavel", "A/C (responsável)", true) }
            <ZipcodeField
                value={model.form.cep.clone()}
                state={model.zipcode.clone()}
                on_input={on_cep_input}
                on_blur={on_cep_blur}
            />
            { text_input("logradouro", "Logradouro", true) }
            <div class="row">
                <div class="col-4">{ text_input("numero", "Número", true) }</div>
                <div class="col-8">{ text_input("complemento", "Complemento", false) }</div>
            </div>
            { text_input("bairro", "Bairro", true) }
            <div class="row">
                <div class="col-8">{ text_input("cidade", "Cidade", true) }</div>
                <div class="col-4">{ text_input("estado", "UF", true) }</div>
            </div>
            if let Some(message) = (*error).clone() {
                <div class="alert alert-danger">{ message }</div>
            }
            <div class="d-flex justify-content-end gap-2">
                if let Some(on_cancel) = on_cancel {
                    <button type="button" class="btn btn-secondary" onclick={move |_| on_cancel.emit(())}>
                        { "Cancelar" }
                    </button>
                }
                <button id={submit_id} type="submit" class="btn btn-primary" disabled={submit_disabled}>
                    { if *busy { "Salvando..." } else { submit_label } }
                </button>
            </div>
        </form>
    }
}

/// Mirrors the lookup into the address inputs: filled on success,
/// cleared when the CEP does not exist.
fn fill_address(form: &mut ClientForm, state: &ZipcodeState) {
    let mut fields = AddressFields {
        street: form.logradouro.clone(),
        district: form.bairro.clone(),
        city: form.cidade.clone(),
        state: form.estado.clone(),
    };
    fields.apply(state);
    form.logradouro = fields.street;
    form.bairro = fields.district;
    form.cidade = fields.city;
    form.estado = fields.state;
}

#[cfg(test)]
mod tests {
    use sga_shared::ZipcodeAddress;

    use super::*;

    fn model() -> Rc<FormModel> {
        Rc::new(FormModel {
            form: ClientForm {
                id: 9,
                nome: "Lab Central".to_string(),
                ..ClientForm::default()
            },
            zipcode: ZipcodeState::Loading,
        })
    }

    #[test]
    fn late_lookup_keeps_fields_typed_meanwhile() {
        let typed = model().reduce(FormAction::Field {
            name: "numero",
            value: "100".to_string(),
        });
        let looked_up = typed.reduce(FormAction::Zipcode(ZipcodeState::Valid(ZipcodeAddress {
            street: "Praça da Sé".to_string(),
            district: "Sé".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            cep: "01001-000".to_string(),
        })));

        assert_eq!(looked_up.form.numero, "100");
        assert_eq!(looked_up.form.logradouro, "Praça da Sé");
        assert_eq!(looked_up.form.estado, "SP");
        assert!(looked_up.zipcode.submit_enabled());
    }

    #[test]
    fn unknown_field_leaves_the_model_alone() {
        let state = model();
        let next = state.clone().reduce(FormAction::Field {
            name: "telefone",
            value: "1".to_string(),
        });
        assert!(Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn typing_a_cep_resets_the_lookup() {
        let next = model().reduce(FormAction::CepTyped("0100".to_string()));
        assert_eq!(next.form.cep, "0100");
        assert_eq!(next.zipcode, ZipcodeState::Editing);
        assert!(!next.zipcode.submit_enabled());
    }
}
