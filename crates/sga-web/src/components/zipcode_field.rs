use sga_shared::zipcode::ZipcodeState;
use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, TargetCast, classes, function_component, html};

#[derive(Properties, PartialEq)]
pub struct ZipcodeFieldProps {
    pub value: String,
    pub state: ZipcodeState,
    pub on_input: Callback<String>,
    pub on_blur: Callback<String>,
}

#[function_component(ZipcodeField)]
pub fn zipcode_field(props: &ZipcodeFieldProps) -> Html {
    let on_input = props.on_input.clone();
    let on_blur = props.on_blur.clone();
    let feedback_class = match &props.state {
        ZipcodeState::Valid(_) => "valid-feedback d-block",
        ZipcodeState::Incomplete | ZipcodeState::NotFound => "invalid-feedback d-block",
        _ => "form-text",
    };

    html! {
        <div class="mb-3">
            <label class="form-label" for="id_cep">{ "CEP" }</label>
            <div class="input-group">
                <input
                    id="id_cep"
                    name="cep"
                    class={classes!("form-control", props.state.input_class())}
                    inputmode="numeric"
                    maxlength="9"
                    readonly={props.state.is_loading()}
                    value={props.value.clone()}
                    oninput={move |e: yew::InputEvent| {
                        on_input.emit(e.target_unchecked_into::<HtmlInputElement>().value())
                    }}
                    onblur={move |e: yew::FocusEvent| {
                        on_blur.emit(e.target_unchecked_into::<HtmlInputElement>().value())
                    }}
                />
                if props.state.is_loading() {
                    <span class="input-group-text">
                        <span class="spinner-border spinner-border-sm"></span>
                    </span>
                }
            </div>
            if let Some(text) = props.state.status_text() {
                <div class={feedback_class}>{ text }</div>
            }
        </div>
    }
}
