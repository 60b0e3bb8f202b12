pub mod chart_service;
pub mod render_service;
pub mod row_service;
pub mod view_service;
