#[derive(Debug, thiserror::Error)]
pub enum HazardError {
    #[error("Invalid year span: start {start} is after end {end}")]
    InvalidYearSpan { start: i32, end: i32 },
    #[error("No grid cells retained, nothing to normalize")]
    EmptyGrid,
}
