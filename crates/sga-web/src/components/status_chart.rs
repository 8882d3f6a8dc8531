use sga_shared::chart::StatusDistribution;
use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct StatusChartProps {
    pub chart: StatusDistribution,
}

/// Doughnut of processes per status, drawn with a conic gradient and a
/// bottom legend.
#[function_component(StatusChart)]
pub fn status_chart(props: &StatusChartProps) -> Html {
    let ring = format!(
        "width:180px;height:180px;border-radius:50%;background:{};",
        props.chart.conic_gradient()
    );

    html! {
        <div class="card">
            <div class="card-header">{ "Processos por status" }</div>
            <div class="card-body d-flex flex-column align-items-center gap-3">
                <div id="chartStatus" class="position-relative" style={ring}>
                    <div
                        class="position-absolute top-50 start-50 translate-middle bg-white rounded-circle d-flex align-items-center justify-content-center fw-semibold"
                        style="width:75%;height:75%;"
                    >
                        { props.chart.total().to_string() }
                    </div>
                </div>
                <ul class="list-unstyled small d-flex flex-wrap justify-content-center gap-3 mb-0">
                    { for props.chart.slices().into_iter().map(|(label, value, color, share)| html! {
                        <li class="d-flex align-items-center gap-1">
                            <span
                                class="rounded-circle d-inline-block"
                                style={format!("width:10px;height:10px;background:{color};")}
                            ></span>
                            { format!("{label}: {value} ({share}%)") }
                        </li>
                    }) }
                </ul>
            </div>
        </div>
    }
}
