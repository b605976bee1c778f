use pr_core::ReportBuilder;

pub struct AppState {
    pub report_builder: ReportBuilder,
}

impl AppState {
    pub fn new(report_builder: ReportBuilder) -> Self {
        Self { report_builder }
    }
}
