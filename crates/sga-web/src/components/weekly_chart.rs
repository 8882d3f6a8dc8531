use sga_shared::chart::ChartSeries;
use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct WeeklyChartProps {
    pub series: ChartSeries,
}

/// Bar series drawn with plain flex boxes; values label each bar.
#[function_component(WeeklyChart)]
pub fn weekly_chart(props: &WeeklyChartProps) -> Html {
    if props.series.labels.is_empty() {
        return html! {
            <div class="text-muted small">{ "Sem dados para o período." }</div>
        };
    }

    html! {
        <div class="card">
            <div class="card-header d-flex justify-content-between">
                <span>{ "Processos na semana" }</span>
                <span class="badge text-bg-light">{ format!("total {}", props.series.total()) }</span>
            </div>
            <div class="card-body d-flex align-items-end gap-2" style="height:220px;">
                { for props.series.bars().into_iter().map(|(label, value, pct)| html! {
                    <div class="flex-fill d-flex flex-column align-items-center justify-content-end h-100">
                        <span class="small fw-semibold">{ value.to_string() }</span>
                        <div
                            class="w-100 bg-primary rounded-top"
                            style={format!("height:{pct}%;min-height:2px;")}
                            title={format!("{label}: {value}")}
                        ></div>
                        <span class="small text-muted mt-1">{ label.to_string() }</span>
                    </div>
                }) }
            </div>
        </div>
    }
}
