mod client_edit_form;
mod client_search;
mod detail_actions;
mod process_modal;
mod process_row;
mod process_table;
mod status_badge;
mod status_chart;
mod weekly_chart;
mod zipcode_field;

pub use client_edit_form::{ClientEditForm, ClientEditFormProps};
pub use client_search::ClientSearch;
pub use detail_actions::{DetailActions, DetailActionsProps};
pub use process_modal::ProcessModal;
pub use process_row::ProcessRowView;
pub use process_table::ProcessTable;
pub use status_badge::StatusBadge;
pub use status_chart::{StatusChart, StatusChartProps};
pub use weekly_chart::{WeeklyChart, WeeklyChartProps};
pub use zipcode_field::ZipcodeField;
