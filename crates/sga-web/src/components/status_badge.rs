use sga_shared::ProcessStatus;
use yew::{Html, Properties, classes, function_component, html};

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: ProcessStatus,
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    html! {
        <span class={classes!("badge", "rounded-pill", props.status.badge_class())}>
            { props.status.label() }
        </span>
    }
}
